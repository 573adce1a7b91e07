//! The movement rules of the two search levels.

use crate::{path::Cost, Point};
use std::fmt::Debug;

/// The cost of an orthogonal step in the grid-level fixed-point scale.
pub const ORTHO_COST: Cost = 10;
/// The cost of a diagonal step in the grid-level fixed-point scale.
///
/// `14/10` approximates √2 while keeping costs on integers, so the open set can use a
/// plain [`BinaryHeap`](std::collections::BinaryHeap) ordering.
pub const DIAG_COST: Cost = 14;

/// Defines how a search can move along the Grid.
///
/// The grid-level search walks an [`OctileNeighborhood`] (4 cardinal + 4 diagonal
/// directions, diagonals at √2); the abstract search over Gates borrows the
/// [`ManhattanNeighborhood`] heuristic, since its edge costs count grid steps.
///
/// Note that implementations do not check walkability; the search does that, including
/// the corner-cutting rule for diagonal steps.
pub trait Neighborhood: Clone + Debug {
    /// Appends all in-bounds neighbors of `point` with their step cost to `out`.
    fn get_all_neighbors(&self, point: Point, out: &mut Vec<(Point, Cost)>);

    /// A lower bound for the cost of reaching `goal` from `point`.
    ///
    /// Must never over-estimate, or searches stop returning shortest paths.
    fn heuristic(&self, point: Point, goal: Point) -> Cost;
}

fn abs_diff(a: usize, b: usize) -> usize {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// A Neighborhood moving along the 4 cardinal directions, unit cost per step.
///
/// Used as the heuristic of the abstract Gate search, where edge costs are path lengths
/// in grid steps.
#[derive(Clone, Copy, Debug)]
pub struct ManhattanNeighborhood {
    width: usize,
    height: usize,
}

impl ManhattanNeighborhood {
    /// Creates a new ManhattanNeighborhood for a `width` x `height` Grid.
    pub fn new(width: usize, height: usize) -> ManhattanNeighborhood {
        ManhattanNeighborhood { width, height }
    }
}

impl Neighborhood for ManhattanNeighborhood {
    fn get_all_neighbors(&self, point: Point, out: &mut Vec<(Point, Cost)>) {
        let (width, height) = (self.width, self.height);
        for (dx, dy) in [(0isize, -1isize), (1, 0), (0, 1), (-1, 0)] {
            let x = point.0 as isize + dx;
            let y = point.1 as isize + dy;
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                out.push(((x as usize, y as usize), 1));
            }
        }
    }
    fn heuristic(&self, point: Point, goal: Point) -> Cost {
        abs_diff(point.0, goal.0) + abs_diff(point.1, goal.1)
    }
}

/// A Neighborhood moving along the 4 cardinal directions and the 4 diagonals.
///
/// Orthogonal steps cost [`ORTHO_COST`], diagonal steps [`DIAG_COST`]. The heuristic is
/// the octile distance in the same scale, which is admissible for these step costs.
/// Plain Manhattan is not once diagonals are allowed, since it over-estimates a straight
/// diagonal by ~41%.
#[derive(Clone, Copy, Debug)]
pub struct OctileNeighborhood {
    width: usize,
    height: usize,
}

impl OctileNeighborhood {
    /// Creates a new OctileNeighborhood for a `width` x `height` Grid.
    pub fn new(width: usize, height: usize) -> OctileNeighborhood {
        OctileNeighborhood { width, height }
    }
}

impl Neighborhood for OctileNeighborhood {
    fn get_all_neighbors(&self, point: Point, out: &mut Vec<(Point, Cost)>) {
        let (width, height) = (self.width, self.height);
        #[rustfmt::skip]
        let steps = [
            (0isize, -1isize, ORTHO_COST),
            (1, -1, DIAG_COST),
            (1, 0, ORTHO_COST),
            (1, 1, DIAG_COST),
            (0, 1, ORTHO_COST),
            (-1, 1, DIAG_COST),
            (-1, 0, ORTHO_COST),
            (-1, -1, DIAG_COST),
        ];
        for (dx, dy, cost) in steps {
            let x = point.0 as isize + dx;
            let y = point.1 as isize + dy;
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                out.push(((x as usize, y as usize), cost));
            }
        }
    }
    fn heuristic(&self, point: Point, goal: Point) -> Cost {
        let diff_0 = abs_diff(point.0, goal.0);
        let diff_1 = abs_diff(point.1, goal.1);
        let (min, max) = if diff_0 < diff_1 {
            (diff_0, diff_1)
        } else {
            (diff_1, diff_0)
        };
        min * DIAG_COST + (max - min) * ORTHO_COST
    }
}

//! The navigation Grid: a walkability bitmap plus world-space conversion parameters.
//!
//! Two independent Grids exist in a running city, one for pedestrians (sidewalks) and
//! one for vehicles (roads), because the two actor classes have different walkable
//! topology. Mixing them up yields silently-wrong walkability answers, which is why every
//! query that crosses the worker boundary carries an explicit [`ActorClass`].

mod a_star;
pub use a_star::a_star_search;

use crate::{path::Cost, Point};
use std::cmp::Ordering;
use std::sync::Arc;

const WALKABLE: u8 = 1;
const BLOCKED: u8 = 0;

/// Selects which navigation Grid (and surface height) applies to a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorClass {
    /// Agents walking the sidewalk topology.
    Pedestrian,
    /// Agents driving the road topology.
    Vehicle,
}

/// The affine transform between grid cells and world space.
///
/// `world = (grid + 0.5 - offset) / scale` per axis; the `0.5` centers world points on
/// their cell. `surface_height` is the fixed world `y` of converted paths (pedestrians
/// float slightly higher than the road surface, ≈0.2 vs ≈0.1).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridParams {
    /// Cells per world unit.
    pub scale: f32,
    /// Grid-space offset along x.
    pub offset_x: f32,
    /// Grid-space offset along z.
    pub offset_z: f32,
    /// World-space height of every converted point.
    pub surface_height: f32,
}

impl GridParams {
    /// Converts a grid cell to the world-space point at its center.
    pub fn to_world(&self, (x, y): Point) -> [f32; 3] {
        [
            (x as f32 + 0.5 - self.offset_x) / self.scale,
            self.surface_height,
            (y as f32 + 0.5 - self.offset_z) / self.scale,
        ]
    }

    /// Converts a world-space position to the grid cell containing it.
    ///
    /// Returns `None` for positions left of / above the grid origin; bounds against the
    /// grid extents are checked by [`NavGrid::to_grid`].
    pub fn to_grid(&self, wx: f32, wz: f32) -> Option<(isize, isize)> {
        let x = (wx * self.scale + self.offset_x - 0.5).round();
        let y = (wz * self.scale + self.offset_z - 0.5).round();
        if x < 0.0 || y < 0.0 {
            None
        } else {
            Some((x as isize, y as isize))
        }
    }
}

/// A 2D walkability bitmap with its conversion parameters.
///
/// The bitmap is immutable after construction and stored behind an [`Arc`]: cloning a
/// NavGrid (e.g. to hand the pathfinding worker its read-only view) shares the cells
/// instead of copying them, so concurrent searches on several threads are safe without
/// locking. The only way to a modified bitmap is [`with_forced_walkable`], which copies.
///
/// [`with_forced_walkable`]: NavGrid::with_forced_walkable
#[derive(Clone, Debug)]
pub struct NavGrid {
    width: usize,
    height: usize,
    cells: Arc<[u8]>,
    params: GridParams,
}

impl NavGrid {
    /// Builds a Grid by sampling `walkable` for every cell.
    pub fn new(
        width: usize,
        height: usize,
        walkable: impl Fn(Point) -> bool,
        params: GridParams,
    ) -> NavGrid {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(if walkable((x, y)) { WALKABLE } else { BLOCKED });
            }
        }
        NavGrid {
            width,
            height,
            cells: cells.into(),
            params,
        }
    }

    /// Builds a Grid from raw cells (`0` = blocked, anything else = walkable).
    ///
    /// Returns `None` when `cells.len() != width * height`.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<u8>,
        params: GridParams,
    ) -> Option<NavGrid> {
        if cells.len() != width * height {
            return None;
        }
        let cells = cells
            .into_iter()
            .map(|c| if c == 0 { BLOCKED } else { WALKABLE })
            .collect::<Vec<_>>();
        Some(NavGrid {
            width,
            height,
            cells: cells.into(),
            params,
        })
    }

    /// The width of the Grid in cells.
    pub fn width(&self) -> usize {
        self.width
    }
    /// The height of the Grid in cells.
    pub fn height(&self) -> usize {
        self.height
    }
    /// The conversion parameters of this Grid.
    pub fn params(&self) -> GridParams {
        self.params
    }

    /// `true` if `p` lies within the Grid.
    pub fn in_bounds(&self, (x, y): Point) -> bool {
        x < self.width && y < self.height
    }

    /// `true` if `p` is in bounds and walkable.
    pub fn is_walkable(&self, p: Point) -> bool {
        self.in_bounds(p) && self.cells[p.1 * self.width + p.0] == WALKABLE
    }

    /// Converts a grid cell to its world-space center at this Grid's surface height.
    pub fn to_world(&self, p: Point) -> [f32; 3] {
        self.params.to_world(p)
    }

    /// Converts a world-space position to the grid cell containing it.
    pub fn to_grid(&self, wx: f32, wz: f32) -> Option<Point> {
        let (x, y) = self.params.to_grid(wx, wz)?;
        let p = (x as usize, y as usize);
        if self.in_bounds(p) {
            Some(p)
        } else {
            None
        }
    }

    /// A deep copy of this Grid with the given cells forced walkable.
    ///
    /// The precalculator needs start/end cells of a detailed search to be walkable even
    /// when they sit on road markings; forcing them on a clone keeps the change out of
    /// the shared Grid every other search reads.
    pub fn with_forced_walkable(&self, points: &[Point]) -> NavGrid {
        let mut cells = self.cells.to_vec();
        for &(x, y) in points {
            if x < self.width && y < self.height {
                cells[y * self.width + x] = WALKABLE;
            }
        }
        NavGrid {
            width: self.width,
            height: self.height,
            cells: cells.into(),
            params: self.params,
        }
    }

    /// `true` if both Grids view the same cell allocation.
    pub fn shares_cells_with(&self, other: &NavGrid) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

/// Open-set entry: (id, g, f), ordered as a min-heap over f.
#[derive(PartialEq, Eq)]
pub(crate) struct HeuristicElement<Id>(pub Id, pub Cost, pub Cost);
impl<Id: Eq> PartialOrd for HeuristicElement<Id> {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}
impl<Id: Eq> Ord for HeuristicElement<Id> {
    fn cmp(&self, rhs: &Self) -> Ordering {
        rhs.2.cmp(&self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GridParams {
        GridParams {
            scale: 2.0,
            offset_x: 1.0,
            offset_z: 3.0,
            surface_height: 0.2,
        }
    }

    #[test]
    fn world_round_trip() {
        let grid = NavGrid::new(8, 8, |_| true, params());
        for p in [(0, 0), (3, 5), (7, 7)] {
            let [wx, wy, wz] = grid.to_world(p);
            assert_eq!(wy, 0.2);
            assert_eq!(grid.to_grid(wx, wz), Some(p));
        }
    }

    #[test]
    fn to_grid_out_of_bounds() {
        let grid = NavGrid::new(4, 4, |_| true, params());
        assert_eq!(grid.to_grid(100.0, 0.0), None);
        assert_eq!(grid.to_grid(-100.0, -100.0), None);
    }

    #[test]
    fn walkability_and_bounds() {
        let grid = NavGrid::new(4, 4, |(x, _)| x != 2, params());
        assert!(grid.is_walkable((1, 1)));
        assert!(!grid.is_walkable((2, 3)));
        assert!(!grid.is_walkable((4, 0)));
        assert!(!grid.in_bounds((0, 4)));
    }

    #[test]
    fn clones_share_cells() {
        let grid = NavGrid::new(4, 4, |_| true, params());
        let view = grid.clone();
        assert!(grid.shares_cells_with(&view));
    }

    #[test]
    fn forcing_does_not_leak() {
        let grid = NavGrid::new(4, 4, |_| false, params());
        let forced = grid.with_forced_walkable(&[(1, 1)]);
        assert!(forced.is_walkable((1, 1)));
        assert!(!grid.is_walkable((1, 1)));
        assert!(!grid.shares_cells_with(&forced));
    }

    #[test]
    fn from_cells_validates_len() {
        assert!(NavGrid::from_cells(3, 3, vec![1; 9], params()).is_some());
        assert!(NavGrid::from_cells(3, 3, vec![1; 8], params()).is_none());
    }
}

use super::{HeuristicElement, NavGrid};
use crate::{neighbors::Neighborhood, path::Path, Point, PointMap};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A* between two cells of a [`NavGrid`].
///
/// Diagonal steps may not cut corners: both orthogonally adjacent cells of a diagonal
/// move must be walkable. Returns `None` when start or goal is blocked or out of bounds,
/// or when no path exists; a search onto the start cell itself yields a single-point
/// Path of cost 0.
pub fn a_star_search<N: Neighborhood>(
    neighborhood: &N,
    grid: &NavGrid,
    start: Point,
    goal: Point,
) -> Option<Path<Point>> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(Path::from_slice(&[start], 0));
    }

    let size_hint = (grid.width() * grid.height()) / 2;
    let mut visited = PointMap::with_capacity(size_hint.min(1024));
    let mut next = BinaryHeap::with_capacity(64);
    next.push(HeuristicElement(start, 0, 0));
    visited.insert(start, (0, start));

    let mut all_neighbors = vec![];

    while let Some(HeuristicElement(current_id, current_cost, _)) = next.pop() {
        if current_id == goal {
            break;
        }
        match current_cost.cmp(&visited[&current_id].0) {
            Ordering::Greater => continue,
            Ordering::Equal => {}
            Ordering::Less => panic!("Binary Heap failed"),
        }

        all_neighbors.clear();
        neighborhood.get_all_neighbors(current_id, &mut all_neighbors);
        for &(other_id, step_cost) in all_neighbors.iter() {
            if !grid.is_walkable(other_id) {
                continue;
            }
            if cuts_corner(grid, current_id, other_id) {
                continue;
            }
            let other_cost = current_cost + step_cost;

            let mut needs_visit = true;
            if let Some((prev_cost, prev_id)) = visited.get_mut(&other_id) {
                if *prev_cost > other_cost {
                    *prev_cost = other_cost;
                    *prev_id = current_id;
                } else {
                    needs_visit = false;
                }
            } else {
                visited.insert(other_id, (other_cost, current_id));
            }

            if needs_visit {
                let heuristic = neighborhood.heuristic(other_id, goal);
                next.push(HeuristicElement(
                    other_id,
                    other_cost,
                    other_cost + heuristic,
                ));
            }
        }
    }

    if !visited.contains_key(&goal) {
        return None;
    }

    let steps = {
        let mut steps = vec![];
        let mut current = goal;

        while current != start {
            steps.push(current);
            let (_, prev) = visited[&current];
            current = prev;
        }
        steps.push(start);
        steps.reverse();
        steps
    };

    Some(Path::new(steps, visited[&goal].0))
}

/// `true` if moving `from -> to` is a diagonal step squeezing past a blocked corner.
fn cuts_corner(grid: &NavGrid, from: Point, to: Point) -> bool {
    if from.0 == to.0 || from.1 == to.1 {
        return false;
    }
    !grid.is_walkable((from.0, to.1)) || !grid.is_walkable((to.0, from.1))
}

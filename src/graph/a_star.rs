use super::HpaNode;
use crate::grid::HeuristicElement;
use crate::{neighbors::Neighborhood, path::Path, GateId};

use hashbrown::HashMap;
use slab::Slab;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A* over the Gate graph. Edge costs come from the adjacency maps; the heuristic from
/// the Gate grid positions. Endpoints are checked by the caller.
pub(crate) fn a_star_search<N: Neighborhood>(
    nodes: &Slab<HpaNode>,
    start: GateId,
    goal: GateId,
    neighborhood: &N,
) -> Option<Path<GateId>> {
    if start == goal {
        return Some(Path::from_slice(&[start], 0));
    }
    let mut visited: HashMap<GateId, (usize, GateId)> = HashMap::with_capacity(nodes.len());
    let mut next = BinaryHeap::with_capacity(nodes.len() / 2 + 1);
    next.push(HeuristicElement(start, 0, 0));
    visited.insert(start, (0, start));

    while let Some(HeuristicElement(current_id, current_cost, _)) = next.pop() {
        if current_id == goal {
            break;
        }
        match current_cost.cmp(&visited[&current_id].0) {
            Ordering::Greater => continue,
            Ordering::Equal => {}
            Ordering::Less => panic!("Binary Heap failed"),
        }

        let current = &nodes[current_id];

        for (&other_id, edge) in current.edges.iter() {
            let other_cost = current_cost + edge.cost;
            let other = &nodes[other_id];

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
                let heuristic = neighborhood.heuristic(other.gate.pos, nodes[goal].gate.pos);
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

//! Offline construction of the abstract Graph from identified Gates.
//!
//! Runs at city build time, before the worker comes up. Two passes:
//! 1. **Intra-zone**: for every pair of Gates touching the same Zone, run a detailed
//!    grid search between their cells and store the resulting cost and waypoints as an
//!    edge. Gate cells sit on roads and may be marked blocked on the pedestrian grid, so
//!    each search runs on a copy of the grid with the two endpoints forced walkable.
//! 2. **Proximity**: Gate pairs still unconnected after the first pass that sit close
//!    together on the grid get a direct edge without a detailed search. This links the
//!    Gate clusters of busy intersections (different Zone pairs never share a detailed
//!    search) and bridges same-Zone pairs whose detailed search failed.
//!
//! Pairs the grid cannot connect are counted, not fabricated; the macro level simply
//! has no edge there and routes around.

use crate::{
    gates::Gate,
    graph::AbstractGraph,
    grid::{a_star_search, NavGrid},
    neighbors::OctileNeighborhood,
    path::Path,
    GateId, Point,
};
use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters from a [`HpaPrecalculator::build`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrecalcStats {
    /// Intra-zone edges created from successful detailed searches.
    pub intra_edges: usize,
    /// Intra-zone Gate pairs the grid could not connect.
    pub intra_gaps: usize,
    /// Proximity edges created between Gates of different Zone pairs.
    pub inter_edges: usize,
}

/// Builds the abstract Graph linking Gates within and across Zones.
#[derive(Clone, Copy, Debug)]
pub struct HpaPrecalculator {
    /// Maximum Manhattan distance for the inter-zone proximity pass.
    pub proximity_threshold: usize,
}

impl Default for HpaPrecalculator {
    fn default() -> HpaPrecalculator {
        HpaPrecalculator {
            proximity_threshold: 2,
        }
    }
}

impl HpaPrecalculator {
    /// Creates a precalculator with the given proximity threshold.
    pub fn new(proximity_threshold: usize) -> HpaPrecalculator {
        HpaPrecalculator {
            proximity_threshold,
        }
    }

    /// Runs both passes and returns the finished Graph.
    ///
    /// `grid` should be the pedestrian grid; Gate cells themselves are forced walkable
    /// per search, everything else is taken as-is.
    pub fn build(&self, gates: &[Gate], grid: &NavGrid) -> (AbstractGraph, PrecalcStats) {
        let mut graph = AbstractGraph::new(grid.width(), grid.height());
        let ids: Vec<GateId> = gates.iter().map(|gate| graph.add_node(*gate)).collect();

        let mut stats = PrecalcStats::default();
        self.link_intra_zone(gates, &ids, grid, &mut graph, &mut stats);
        self.link_inter_zone(gates, &ids, &mut graph, &mut stats);

        info!(
            "precalc: {} gates, {} intra edges ({} gaps), {} inter edges",
            gates.len(),
            stats.intra_edges,
            stats.intra_gaps,
            stats.inter_edges,
        );
        (graph, stats)
    }

    fn link_intra_zone(
        &self,
        gates: &[Gate],
        ids: &[GateId],
        grid: &NavGrid,
        graph: &mut AbstractGraph,
        stats: &mut PrecalcStats,
    ) {
        let mut pairs = Vec::new();
        for (i, a) in gates.iter().enumerate() {
            for (j, b) in gates.iter().enumerate().skip(i + 1) {
                if shares_zone(a, b) {
                    pairs.push((i, j));
                }
            }
        }

        let searched = search_pairs(&pairs, gates, grid);

        for ((i, j), path) in pairs.into_iter().zip(searched) {
            match path {
                Some(path) => {
                    // cost in steps, not in scaled heuristic units
                    let cost = path.len().saturating_sub(1);
                    graph.add_edge(ids[i], ids[j], cost, Some(path));
                    stats.intra_edges += 1;
                }
                None => {
                    debug!(
                        "precalc: no route between gates at {:?} and {:?} (zones {:?}/{:?})",
                        gates[i].pos, gates[j].pos, gates[i].zones, gates[j].zones,
                    );
                    stats.intra_gaps += 1;
                }
            }
        }
    }

    fn link_inter_zone(
        &self,
        gates: &[Gate],
        ids: &[GateId],
        graph: &mut AbstractGraph,
        stats: &mut PrecalcStats,
    ) {
        for (i, a) in gates.iter().enumerate() {
            for (j, b) in gates.iter().enumerate().skip(i + 1) {
                if graph.has_edge(ids[i], ids[j]) {
                    continue;
                }
                let dist = manhattan(a.pos, b.pos);
                if dist <= self.proximity_threshold {
                    graph.add_edge(ids[i], ids[j], dist, None);
                    stats.inter_edges += 1;
                }
            }
        }
    }
}

fn shares_zone(a: &Gate, b: &Gate) -> bool {
    let (a0, a1) = a.zones;
    let (b0, b1) = b.zones;
    a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1
}

fn manhattan(a: Point, b: Point) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[cfg(feature = "parallel")]
fn search_pairs(
    pairs: &[(usize, usize)],
    gates: &[Gate],
    grid: &NavGrid,
) -> Vec<Option<Path<Point>>> {
    pairs
        .par_iter()
        .map(|&(i, j)| search_pair(gates[i].pos, gates[j].pos, grid))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn search_pairs(
    pairs: &[(usize, usize)],
    gates: &[Gate],
    grid: &NavGrid,
) -> Vec<Option<Path<Point>>> {
    pairs
        .iter()
        .map(|&(i, j)| search_pair(gates[i].pos, gates[j].pos, grid))
        .collect()
}

fn search_pair(
    a: Point,
    b: Point,
    grid: &NavGrid,
) -> Option<Path<Point>> {
    // gate cells sit on roads, which the base grid may mark blocked
    let search_grid = grid.with_forced_walkable(&[a, b]);
    let neighborhood = OctileNeighborhood::new(search_grid.width(), search_grid.height());
    a_star_search(&neighborhood, &search_grid, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridParams;

    fn params() -> GridParams {
        GridParams {
            scale: 1.0,
            offset_x: 0.0,
            offset_z: 0.0,
            surface_height: 0.2,
        }
    }

    fn open_grid(width: usize, height: usize) -> NavGrid {
        NavGrid::new(width, height, |_| true, params())
    }

    fn gate(zones: (u32, u32), pos: Point) -> Gate {
        Gate { zones, pos }
    }

    #[test]
    fn gates_of_one_zone_are_linked_with_detail() {
        let grid = open_grid(10, 10);
        let gates = [gate((1, 2), (0, 5)), gate((2, 3), (9, 5))];

        let (graph, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.intra_edges, 1);
        assert_eq!(stats.intra_gaps, 0);
        assert_eq!(graph.edge_count(), 1);
        let node = graph.node(0).unwrap();
        let edge = &node.edges[&1];
        assert_eq!(edge.cost, 9);
        let detail = edge.detail.as_ref().unwrap();
        assert_eq!(detail.len(), 10);
    }

    #[test]
    fn unreachable_pair_is_a_gap_not_an_edge() {
        // wall down the middle, no crossing
        let grid = NavGrid::new(10, 10, |(x, _)| x != 5, params());
        let gates = [gate((1, 2), (0, 5)), gate((2, 3), (9, 5))];

        let (graph, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.intra_edges, 0);
        assert_eq!(stats.intra_gaps, 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn blocked_gate_cells_are_forced_open() {
        // both gate cells blocked in the base grid, interior open
        let grid = NavGrid::new(10, 10, |p| p != (0, 5) && p != (9, 5), params());
        let gates = [gate((1, 2), (0, 5)), gate((2, 3), (9, 5))];

        let (_, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.intra_edges, 1);
        // the shared grid itself is untouched
        assert!(!grid.is_walkable((0, 5)));
        assert!(!grid.is_walkable((9, 5)));
    }

    #[test]
    fn nearby_gates_of_different_pairs_get_proximity_edges() {
        let grid = open_grid(10, 10);
        let gates = [gate((1, 2), (5, 5)), gate((3, 4), (6, 6))];

        let (graph, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.inter_edges, 1);
        assert_eq!(stats.intra_edges, 0);
        let edge = &graph.node(0).unwrap().edges[&1];
        assert_eq!(edge.cost, 2);
        assert!(edge.detail.is_none());
    }

    #[test]
    fn failed_intra_pair_is_bridged_by_proximity() {
        // diagonal neighbors whose flanking cells are both blocked: the corner-cut
        // rule makes the detailed search fail, the proximity pass still links them
        let grid = NavGrid::new(4, 4, |p| p != (1, 0) && p != (0, 1), params());
        let gates = [gate((1, 2), (0, 0)), gate((2, 3), (1, 1))];

        let (graph, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.intra_gaps, 1);
        assert_eq!(stats.intra_edges, 0);
        assert_eq!(stats.inter_edges, 1);
        let edge = &graph.node(0).unwrap().edges[&1];
        assert_eq!(edge.cost, 2);
        assert!(edge.detail.is_none());
    }

    #[test]
    fn distant_gates_of_different_pairs_stay_unlinked() {
        let grid = open_grid(10, 10);
        let gates = [gate((1, 2), (0, 0)), gate((3, 4), (9, 9))];

        let (graph, stats) = HpaPrecalculator::default().build(&gates, &grid);

        assert_eq!(stats.inter_edges, 0);
        assert_eq!(graph.edge_count(), 0);
    }
}

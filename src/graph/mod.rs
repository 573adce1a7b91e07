//! The abstract Graph: Gates as nodes, precomputed low-level paths as edges.
//!
//! Macro-level routing across many Zones runs A* over this Graph instead of the full
//! Grid. Nodes wrap the [`Gate`]s found by the identifier; edges carry the cost (and for
//! intra-zone edges the full detail path) computed by the precalculator. Gate counts stay
//! in the hundreds for city-scale maps, so the Graph is small enough to rebuild from a
//! [`GraphSnapshot`] in negligible time.

mod a_star;
mod snapshot;
pub use snapshot::{GraphSnapshot, SnapshotEdge, SnapshotNode};

use crate::{
    gates::Gate,
    neighbors::ManhattanNeighborhood,
    path::{Cost, Path},
    GateId, Point, ZoneId,
};
use hashbrown::HashMap;
use log::warn;
use slab::Slab;

/// An edge between two Gates.
///
/// Intra-zone edges keep the detail path so the route inside a Zone can be replayed
/// without re-searching; inter-zone proximity edges carry only their cost.
#[derive(Clone, Debug)]
pub struct HpaEdge {
    /// Path length in grid steps.
    pub cost: Cost,
    /// The precomputed low-level path, if one was searched.
    pub detail: Option<Path<Point>>,
}

/// A node of the abstract Graph, wrapping one Gate.
#[derive(Clone, Debug)]
pub struct HpaNode {
    /// The node's id, identical to the slab key it lives under.
    pub id: GateId,
    /// The Gate this node represents.
    pub gate: Gate,
    /// Adjacency: target node id to edge. Symmetric with the target's entry.
    pub edges: HashMap<GateId, HpaEdge>,
}

/// The Gate graph, plus a per-Zone index of its nodes.
#[derive(Clone, Debug)]
pub struct AbstractGraph {
    nodes: Slab<HpaNode>,
    zones: HashMap<ZoneId, Vec<GateId>>,
    dims: (usize, usize),
    heuristic: ManhattanNeighborhood,
}

impl AbstractGraph {
    /// Creates an empty Graph for a `width` x `height` Grid.
    ///
    /// The dimensions size the Manhattan heuristic of [`find_path`](Self::find_path).
    pub fn new(width: usize, height: usize) -> AbstractGraph {
        AbstractGraph {
            nodes: Slab::new(),
            zones: HashMap::new(),
            dims: (width, height),
            heuristic: ManhattanNeighborhood::new(width, height),
        }
    }

    /// Adds a Gate as a node, registering it under both adjoining Zones.
    ///
    /// The returned id is how every other operation refers to this Gate.
    pub fn add_node(&mut self, gate: Gate) -> GateId {
        let id = self.nodes.insert(HpaNode {
            id: 0,
            gate,
            edges: HashMap::new(),
        });
        self.nodes[id].id = id;

        let (za, zb) = gate.zones;
        self.zones.entry(za).or_default().push(id);
        if zb != za {
            self.zones.entry(zb).or_default().push(id);
        }
        id
    }

    /// Adds an edge between two Gates, in both directions.
    ///
    /// A missing endpoint makes this a logged no-op rather than an error, since the
    /// precalculator keeps going when single links cannot be established. An already
    /// connected pair is left untouched, so no duplicate edges exist between the same
    /// ordered pair.
    pub fn add_edge(&mut self, a: GateId, b: GateId, cost: Cost, detail: Option<Path<Point>>) {
        if a == b {
            return;
        }
        if !self.nodes.contains(a) || !self.nodes.contains(b) {
            warn!("edge {} -> {} references a missing gate; skipped", a, b);
            return;
        }
        if self.nodes[a].edges.contains_key(&b) {
            return;
        }

        let back = detail.as_ref().map(|path| path.reversed());
        self.nodes[a].edges.insert(b, HpaEdge { cost, detail });
        self.nodes[b].edges.insert(a, HpaEdge { cost, detail: back });
    }

    /// Macro-level A* over the Gates.
    ///
    /// Heuristic is the Manhattan distance between Gate grid positions, matching the
    /// step-count edge costs. Returns the visited node ids in order, or `None` when
    /// either id is missing or the Gates are not connected (e.g. a precalculation gap).
    /// All search state is per-call, so repeated searches never see stale fields.
    pub fn find_path(&self, start: GateId, goal: GateId) -> Option<Path<GateId>> {
        if !self.nodes.contains(start) || !self.nodes.contains(goal) {
            return None;
        }
        a_star::a_star_search(&self.nodes, start, goal, &self.heuristic)
    }

    /// The node behind `id`, if it exists.
    pub fn node(&self, id: GateId) -> Option<&HpaNode> {
        self.nodes.get(id)
    }

    /// `true` if `a` and `b` are directly connected.
    pub fn has_edge(&self, a: GateId, b: GateId) -> bool {
        self.nodes
            .get(a)
            .map_or(false, |node| node.edges.contains_key(&b))
    }

    /// The ids of all Gates registered in `zone`.
    pub fn gates_in_zone(&self, zone: ZoneId) -> &[GateId] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (GateId, &HpaNode)> {
        self.nodes.iter()
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the Graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of unordered connected Gate pairs.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|(_, n)| n.edges.len()).sum::<usize>() / 2
    }
}

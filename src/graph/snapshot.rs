//! Flat node/edge lists for persisting an [`AbstractGraph`] across sessions.
//!
//! Detail paths are deliberately left out: they dominate the payload size and are cheap
//! to recompute, while the graph topology (which Gates exist and what the crossings
//! cost) is the part worth keeping.

use super::AbstractGraph;
use crate::{gates::Gate, path::Cost, GateId, Point, SnapshotError, ZoneId};

/// One node of a [`GraphSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotNode {
    /// The node's id in the source Graph.
    pub id: GateId,
    /// The two Zones the Gate connects.
    pub zones: (ZoneId, ZoneId),
    /// The Gate's grid cell.
    pub pos: Point,
}

/// One undirected edge of a [`GraphSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotEdge {
    /// Source node id.
    pub from: GateId,
    /// Target node id.
    pub to: GateId,
    /// Path length in grid steps.
    pub cost: Cost,
}

/// A serialized [`AbstractGraph`]: nodes first, then undirected edges.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSnapshot {
    /// Grid width the Graph was built for.
    pub width: usize,
    /// Grid height the Graph was built for.
    pub height: usize,
    /// All nodes, ordered by id.
    pub nodes: Vec<SnapshotNode>,
    /// Each connected pair once, with `from < to`.
    pub edges: Vec<SnapshotEdge>,
}

impl AbstractGraph {
    /// Flattens the Graph into a snapshot, omitting detail paths.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<SnapshotNode> = self
            .iter()
            .map(|(id, node)| SnapshotNode {
                id,
                zones: node.gate.zones,
                pos: node.gate.pos,
            })
            .collect();
        nodes.sort_by_key(|n| n.id);

        let mut edges = Vec::new();
        for (id, node) in self.iter() {
            for (&target, edge) in node.edges.iter() {
                if id < target {
                    edges.push(SnapshotEdge {
                        from: id,
                        to: target,
                        cost: edge.cost,
                    });
                }
            }
        }
        edges.sort_by_key(|e| (e.from, e.to));

        let (width, height) = self.dims;
        GraphSnapshot {
            width,
            height,
            nodes,
            edges,
        }
    }

    /// Rebuilds a Graph from a snapshot: nodes first, then edges.
    ///
    /// Node ids must be the dense `0..n` sequence a build pass produces; anything else
    /// (gaps, duplicates, reordered ids) is rejected, as is an edge referencing a node
    /// the snapshot does not contain. Duplicate edges collapse into one, mirroring
    /// [`add_edge`](AbstractGraph::add_edge).
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<AbstractGraph, SnapshotError> {
        let mut graph = AbstractGraph::new(snapshot.width, snapshot.height);

        for node in &snapshot.nodes {
            let id = graph.add_node(Gate {
                zones: node.zones,
                pos: node.pos,
            });
            if id != node.id {
                return Err(SnapshotError::NodeIdMismatch {
                    expected: id,
                    found: node.id,
                });
            }
        }

        for edge in &snapshot.edges {
            if graph.node(edge.from).is_none() {
                return Err(SnapshotError::UnknownEndpoint(edge.from));
            }
            if graph.node(edge.to).is_none() {
                return Err(SnapshotError::UnknownEndpoint(edge.to));
            }
            graph.add_edge(edge.from, edge.to, edge.cost, None);
        }

        Ok(graph)
    }
}

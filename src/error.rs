use crate::GateId;
use thiserror::Error;

/// Failure of the channel boundary between simulation and pathfinding worker.
///
/// Routing failures are not errors; they travel back as `None` paths inside a normal
/// response. This type only covers the worker being gone entirely.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorkerError {
    /// The worker thread has shut down; its channels are closed.
    #[error("pathfinding worker disconnected")]
    Disconnected,
}

/// A malformed [`GraphSnapshot`](crate::graph::GraphSnapshot).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Node ids were not the dense, ordered sequence a build pass produces.
    #[error("snapshot node id {found} where {expected} was expected (duplicate or gap)")]
    NodeIdMismatch {
        /// The id this position in the node list must carry.
        expected: GateId,
        /// The id actually found.
        found: GateId,
    },
    /// An edge referenced a node missing from the snapshot.
    #[error("snapshot edge references missing gate {0}")]
    UnknownEndpoint(GateId),
}

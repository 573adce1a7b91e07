#![warn(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! Hierarchical pathfinding for grid-based city simulations.
//!
//! ## Introduction
//! A city simulation moves thousands of agents (pedestrians and vehicles) across a large
//! walkability Grid. Running a full A* on the main loop for every agent does not scale, and
//! the two actor classes walk different topologies: sidewalks for pedestrians, roads for
//! vehicles. This crate splits the problem in two:
//!
//! - **Offline**: the city is partitioned into Zones (districts).
//!   [`GateIdentifier`](gates::GateIdentifier) scans every pair of adjacent Zones for the
//!   road that connects them and places a Gate on a walkable cell of the crossing.
//!   [`HpaPrecalculator`](precalc::HpaPrecalculator) then links the Gates into an
//!   [`AbstractGraph`](graph::AbstractGraph) by running detailed searches between all Gates
//!   of a Zone, so that macro-level routing across many Zones only ever touches a few
//!   hundred Graph nodes.
//! - **Online**: a [`PathfindingWorker`](worker::PathfindingWorker) running on its own
//!   thread answers per-agent requests with a plain Grid-level A*, backed by a bounded
//!   path cache. The Grid bitmaps are shared with the worker as immutable views, so no
//!   request ever copies the map.
//!
//! ## Examples
//! Building a grid and spawning the worker:
//! ```
//! use city_pathfinding::prelude::*;
//! use city_pathfinding::cache::CacheConfig;
//!
//! // 0 = walkable, 1 = blocked
//! let map = [
//!     [0, 0, 0, 1, 0],
//!     [0, 1, 0, 1, 0],
//!     [0, 1, 0, 0, 0],
//!     [0, 1, 1, 1, 0],
//!     [0, 0, 0, 0, 0],
//! ];
//! let (width, height) = (map[0].len(), map.len());
//!
//! let params = GridParams {
//!     scale: 1.0,
//!     offset_x: 0.0,
//!     offset_z: 0.0,
//!     surface_height: 0.2,
//! };
//! let grid = NavGrid::new(width, height, |(x, y)| map[y][x] == 0, params);
//!
//! let worker = PathfindingWorker::spawn();
//! worker
//!     .send(WorkerRequest::Init(Box::new(InitParams {
//!         pedestrian: grid.clone(),
//!         vehicle: grid,
//!         cache: CacheConfig::default(),
//!     })))
//!     .unwrap();
//! assert!(matches!(worker.recv().unwrap(), WorkerResponse::InitComplete));
//!
//! worker
//!     .send(WorkerRequest::FindPath(PathRequest {
//!         agent: 7,
//!         start: (0, 0),
//!         end: (4, 4),
//!         class: ActorClass::Pedestrian,
//!     }))
//!     .unwrap();
//!
//! match worker.recv().unwrap() {
//!     WorkerResponse::Path(result) => {
//!         assert_eq!(result.agent, 7);
//!         assert!(result.path.is_some());
//!     }
//!     other => panic!("unexpected response: {:?}", other),
//! }
//! ```
//!
//! Requests are fire-and-forget: the caller correlates responses by agent id and is free
//! to have many requests in flight. The worker answers every request exactly once, in
//! arrival order, and never crashes on a bad one: out-of-range or unroutable requests
//! come back as a `None` path for that agent.
//!
//! ## Offline precalculation
//! ```
//! use city_pathfinding::prelude::*;
//!
//! # let params = GridParams { scale: 1.0, offset_x: 0.0, offset_z: 0.0, surface_height: 0.1 };
//! # let grid = NavGrid::new(12, 12, |_| true, params);
//! let zones = vec![
//!     Zone { id: 0, plots: vec![Rect::new(0.0, 0.0, 5.0, 12.0)] },
//!     Zone { id: 1, plots: vec![Rect::new(7.0, 0.0, 12.0, 12.0)] },
//! ];
//! let roads = vec![Rect::new(5.0, 0.0, 7.0, 12.0)];
//!
//! let identifier = GateIdentifier::default();
//! let (gates, stats) = identifier.identify(&zones, &roads, &grid);
//! assert_eq!(stats.gates_emitted, gates.len());
//!
//! let (graph, _stats) = HpaPrecalculator::default().build(&gates, &grid);
//! assert_eq!(graph.len(), gates.len());
//! ```

/// The type used to reference a Gate node in the abstract Graph.
pub type GateId = usize;

/// The type used to reference a Zone (city district).
pub type ZoneId = u32;

/// A shorthand for cells on the navigation Grid.
pub type Point = (usize, usize);

/// A specialized [`HashMap`](hashbrown::HashMap) for Points.
pub type PointMap<V> = hashbrown::HashMap<Point, V>;
/// A specialized [`HashSet`](hashbrown::HashSet) for Points.
pub type PointSet = hashbrown::HashSet<Point>;

/// The id an agent uses to correlate [`PathResult`](worker::PathResult)s with its requests.
pub type AgentId = u64;

pub mod cache;
mod error;
pub mod gates;
pub mod graph;
pub mod grid;
pub mod neighbors;
pub mod path;
pub mod precalc;
pub mod worker;

pub use error::{SnapshotError, WorkerError};

/// The most common imports, bundled.
pub mod prelude {
    pub use crate::gates::{Gate, GateIdentifier, GatePolicy, Rect, Zone};
    pub use crate::graph::AbstractGraph;
    pub use crate::grid::{ActorClass, GridParams, NavGrid};
    pub use crate::precalc::HpaPrecalculator;
    pub use crate::worker::{
        InitParams, PathRequest, PathResult, PathfindingWorker, WorkerRequest, WorkerResponse,
    };
    pub use crate::{AgentId, GateId, Point, ZoneId};
}

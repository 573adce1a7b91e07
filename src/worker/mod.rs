//! The background pathfinding worker.
//!
//! The simulation's main loop cannot afford to block on searches, so all per-agent
//! pathfinding runs on a single dedicated thread. Communication is two unbounded
//! channels of plain enums: requests go in, responses come out, and every request is
//! answered exactly once, in arrival order. The worker owns its cache and read-only
//! Grid views outright, so the loop never takes a lock.
//!
//! A request that cannot be served (out of range, blocked endpoints, no route, worker
//! not yet initialized) comes back as a `None` path for that agent rather than an error
//! that could stall the caller. Panics are caught and the worker keeps serving: a
//! routing panic answers the agent with a `None` path, anything else becomes a
//! [`WorkerResponse::Fault`].

use crate::{
    cache::{CacheConfig, CacheStats, PathCache},
    error::WorkerError,
    grid::{a_star_search, ActorClass, NavGrid},
    neighbors::OctileNeighborhood,
    path::WorldPath,
    AgentId, Point,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

/// Everything the worker needs to start serving requests.
#[derive(Clone, Debug)]
pub struct InitParams {
    /// The sidewalk Grid.
    pub pedestrian: NavGrid,
    /// The road Grid.
    pub vehicle: NavGrid,
    /// Settings for the worker-private path cache.
    pub cache: CacheConfig,
}

/// One agent's routing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRequest {
    /// Correlates the eventual [`PathResult`] with the asking agent.
    pub agent: AgentId,
    /// Start cell on the Grid of `class`.
    pub start: Point,
    /// End cell on the Grid of `class`.
    pub end: Point,
    /// Which Grid (and surface height) to route on.
    pub class: ActorClass,
}

/// The answer to one [`PathRequest`].
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    /// The agent id copied from the request.
    pub agent: AgentId,
    /// The route in world space, or `None` when the request could not be served.
    pub path: Option<WorldPath>,
}

/// Messages accepted by the worker.
#[derive(Clone, Debug)]
pub enum WorkerRequest {
    /// Install the Grids and cache settings. May be sent again to swap maps at runtime.
    Init(Box<InitParams>),
    /// Route one agent.
    FindPath(PathRequest),
    /// Drop every cached route. Counters survive.
    ClearCache,
    /// Ask for the cache counters.
    GetCacheStats,
    /// Stop the worker thread. Sent automatically on drop.
    Shutdown,
}

/// Messages produced by the worker.
#[derive(Clone, Debug)]
pub enum WorkerResponse {
    /// The Grids are installed; [`WorkerRequest::FindPath`] will now route.
    InitComplete,
    /// The answer to a [`WorkerRequest::FindPath`].
    Path(PathResult),
    /// The cache was cleared.
    CacheCleared,
    /// The current cache counters.
    CacheStats(CacheStats),
    /// A request panicked while being served. The worker is still running.
    Fault(String),
}

/// Handle to the worker thread. Dropping it shuts the thread down.
#[derive(Debug)]
pub struct PathfindingWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResponse>,
    thread: Option<JoinHandle<()>>,
}

impl PathfindingWorker {
    /// Starts the worker thread. It idles until [`WorkerRequest::Init`] arrives.
    pub fn spawn() -> PathfindingWorker {
        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (resp_tx, resp_rx) = crossbeam_channel::unbounded();
        let thread = std::thread::Builder::new()
            .name("pathfinding-worker".into())
            .spawn(move || worker_loop(req_rx, resp_tx))
            .ok();
        if thread.is_none() {
            warn!("failed to spawn pathfinding worker thread");
        }
        PathfindingWorker {
            tx: req_tx,
            rx: resp_rx,
            thread,
        }
    }

    /// Queues a request for the worker.
    pub fn send(&self, request: WorkerRequest) -> Result<(), WorkerError> {
        self.tx.send(request).map_err(|_| WorkerError::Disconnected)
    }

    /// Blocks until the next response.
    pub fn recv(&self) -> Result<WorkerResponse, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Takes the next response if one is ready, without blocking.
    pub fn try_recv(&self) -> Result<Option<WorkerResponse>, WorkerError> {
        match self.rx.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

impl Drop for PathfindingWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// The worker's Grids and cache, present only after Init.
struct ReadyState {
    pedestrian: NavGrid,
    vehicle: NavGrid,
    cache: PathCache,
}

impl ReadyState {
    fn grid(&self, class: ActorClass) -> &NavGrid {
        match class {
            ActorClass::Pedestrian => &self.pedestrian,
            ActorClass::Vehicle => &self.vehicle,
        }
    }
}

fn worker_loop(requests: Receiver<WorkerRequest>, responses: Sender<WorkerResponse>) {
    let mut state: Option<ReadyState> = None;
    for request in requests.iter() {
        if matches!(request, WorkerRequest::Shutdown) {
            debug!("pathfinding worker shutting down");
            break;
        }
        let agent = match &request {
            WorkerRequest::FindPath(request) => Some(request.agent),
            _ => None,
        };
        let response = match catch_unwind(AssertUnwindSafe(|| serve(&mut state, request))) {
            Ok(response) => response,
            Err(panic) => match agent {
                // a routing panic still answers the asking agent
                Some(agent) => {
                    warn!(
                        "request for agent {} panicked: {}",
                        agent,
                        panic_message(&panic)
                    );
                    WorkerResponse::Path(PathResult { agent, path: None })
                }
                None => WorkerResponse::Fault(panic_message(&panic)),
            },
        };
        if responses.send(response).is_err() {
            // handle gone, nobody left to answer
            break;
        }
    }
}

fn serve(state: &mut Option<ReadyState>, request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::Init(params) => {
            debug!(
                "worker init: pedestrian {}x{}, vehicle {}x{}",
                params.pedestrian.width(),
                params.pedestrian.height(),
                params.vehicle.width(),
                params.vehicle.height(),
            );
            *state = Some(ReadyState {
                pedestrian: params.pedestrian,
                vehicle: params.vehicle,
                cache: PathCache::new(params.cache),
            });
            WorkerResponse::InitComplete
        }
        WorkerRequest::FindPath(request) => match state {
            Some(state) => WorkerResponse::Path(find_path(state, request)),
            None => {
                warn!("path request from agent {} before init", request.agent);
                WorkerResponse::Path(PathResult {
                    agent: request.agent,
                    path: None,
                })
            }
        },
        WorkerRequest::ClearCache => {
            if let Some(state) = state {
                state.cache.clear();
            }
            WorkerResponse::CacheCleared
        }
        WorkerRequest::GetCacheStats => {
            let stats = state
                .as_ref()
                .map(|state| state.cache.stats())
                .unwrap_or_default();
            WorkerResponse::CacheStats(stats)
        }
        // handled by the loop
        WorkerRequest::Shutdown => WorkerResponse::Fault("shutdown reached serve".into()),
    }
}

fn find_path(state: &mut ReadyState, request: PathRequest) -> PathResult {
    let agent = request.agent;
    let grid = state.grid(request.class);

    if !grid.is_walkable(request.start) || !grid.is_walkable(request.end) {
        debug!(
            "agent {}: unroutable endpoints {:?} -> {:?}",
            agent, request.start, request.end,
        );
        return PathResult { agent, path: None };
    }

    if request.start == request.end {
        let point = grid.to_world(request.start);
        return PathResult {
            agent,
            path: Some(WorldPath::new(vec![point])),
        };
    }

    let key = (request.class, request.start, request.end);
    if let Some(cached) = state.cache.get(&key) {
        return PathResult {
            agent,
            path: Some(cached.clone()),
        };
    }

    let grid = state.grid(request.class);
    let neighborhood = OctileNeighborhood::new(grid.width(), grid.height());
    let Some(grid_path) = a_star_search(&neighborhood, grid, request.start, request.end) else {
        debug!(
            "agent {}: no route {:?} -> {:?}",
            agent, request.start, request.end,
        );
        return PathResult { agent, path: None };
    };

    let world = WorldPath::new(grid_path.iter().map(|&p| grid.to_world(p)).collect());
    state
        .cache
        .insert(key, grid_path.iter().copied().collect(), world.clone());

    PathResult {
        agent,
        path: Some(world),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

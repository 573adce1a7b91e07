use city_pathfinding::cache::CacheConfig;
use city_pathfinding::prelude::*;

fn params(surface_height: f32) -> GridParams {
    GridParams {
        scale: 1.0,
        offset_x: 0.0,
        offset_z: 0.0,
        surface_height,
    }
}

fn open_grid(size: usize) -> NavGrid {
    NavGrid::new(size, size, |_| true, params(0.2))
}

fn spawn_initialized(grid: NavGrid) -> PathfindingWorker {
    let worker = PathfindingWorker::spawn();
    worker
        .send(WorkerRequest::Init(Box::new(InitParams {
            pedestrian: grid.clone(),
            vehicle: grid,
            cache: CacheConfig::default(),
        })))
        .unwrap();
    assert!(matches!(
        worker.recv().unwrap(),
        WorkerResponse::InitComplete
    ));
    worker
}

fn request_path(worker: &PathfindingWorker, agent: u64, start: Point, end: Point) -> PathResult {
    worker
        .send(WorkerRequest::FindPath(PathRequest {
            agent,
            start,
            end,
            class: ActorClass::Pedestrian,
        }))
        .unwrap();
    match worker.recv().unwrap() {
        WorkerResponse::Path(result) => result,
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn open_diagonal_has_euclidean_length() {
    let worker = spawn_initialized(open_grid(10));
    let result = request_path(&worker, 1, (0, 0), (9, 9));
    assert_eq!(result.agent, 1);

    let path = result.path.unwrap();
    assert_eq!(path.len(), 10);
    let expected = 9.0 * std::f32::consts::SQRT_2;
    assert!(
        (path.length - expected).abs() < 1e-3,
        "length {} != {}",
        path.length,
        expected,
    );
}

#[test]
fn blocked_column_forces_a_longer_detour() {
    // column x = 5 blocked except the gap at (5, 0)
    let grid = NavGrid::new(10, 10, |(x, y)| x != 5 || y == 0, params(0.2));
    let worker = spawn_initialized(grid);

    let result = request_path(&worker, 2, (0, 5), (9, 5));
    let path = result.path.unwrap();

    for point in &path.points {
        let cell = ((point[0] - 0.5) as usize, (point[2] - 0.5) as usize);
        assert!(cell != (5, 5), "route went through the wall");
    }
    assert!(path.points.contains(&[5.5, 0.2, 0.5]), "route missed the gap");
    assert!(path.length > 9.0 + 1e-3, "detour should beat the straight line");
}

#[test]
fn unreachable_goal_yields_none() {
    // solid wall, no gap
    let grid = NavGrid::new(10, 10, |(x, _)| x != 5, params(0.2));
    let worker = spawn_initialized(grid);

    let result = request_path(&worker, 3, (0, 5), (9, 5));
    assert!(result.path.is_none());
}

#[test]
fn out_of_bounds_request_yields_none() {
    let worker = spawn_initialized(open_grid(10));
    let result = request_path(&worker, 4, (0, 0), (100, 100));
    assert!(result.path.is_none());
}

#[test]
fn blocked_endpoint_yields_none() {
    let grid = NavGrid::new(10, 10, |p| p != (9, 9), params(0.2));
    let worker = spawn_initialized(grid);
    let result = request_path(&worker, 5, (0, 0), (9, 9));
    assert!(result.path.is_none());
}

#[test]
fn repeated_requests_are_identical_and_cached() {
    let worker = spawn_initialized(open_grid(10));

    let first = request_path(&worker, 6, (0, 0), (9, 3));
    let second = request_path(&worker, 7, (0, 0), (9, 3));
    assert_eq!(first.path, second.path);

    worker.send(WorkerRequest::GetCacheStats).unwrap();
    match worker.recv().unwrap() {
        WorkerResponse::CacheStats(stats) => {
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.misses, 1);
            assert_eq!(stats.stored, 1);
            assert_eq!(stats.occupancy, 1);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn identical_requests_are_deterministic_across_workers() {
    let first = {
        let worker = spawn_initialized(open_grid(12));
        request_path(&worker, 8, (1, 1), (10, 4)).path.unwrap()
    };
    let second = {
        let worker = spawn_initialized(open_grid(12));
        request_path(&worker, 8, (1, 1), (10, 4)).path.unwrap()
    };
    assert_eq!(first, second);
}

#[test]
fn clear_cache_empties_the_cache_and_is_acknowledged() {
    let worker = spawn_initialized(open_grid(10));
    request_path(&worker, 9, (0, 0), (5, 5));

    worker.send(WorkerRequest::ClearCache).unwrap();
    assert!(matches!(
        worker.recv().unwrap(),
        WorkerResponse::CacheCleared
    ));

    worker.send(WorkerRequest::GetCacheStats).unwrap();
    match worker.recv().unwrap() {
        WorkerResponse::CacheStats(stats) => {
            assert_eq!(stats.occupancy, 0);
            assert_eq!(stats.stored, 1);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn actor_classes_route_on_their_own_grids() {
    // pedestrians can cross, vehicles cannot
    let pedestrian = NavGrid::new(10, 10, |_| true, params(0.2));
    let vehicle = NavGrid::new(10, 10, |(x, _)| x != 5, params(0.1));

    let worker = PathfindingWorker::spawn();
    worker
        .send(WorkerRequest::Init(Box::new(InitParams {
            pedestrian,
            vehicle,
            cache: CacheConfig::default(),
        })))
        .unwrap();
    assert!(matches!(
        worker.recv().unwrap(),
        WorkerResponse::InitComplete
    ));

    for (class, expect_path, height) in [
        (ActorClass::Pedestrian, true, 0.2),
        (ActorClass::Vehicle, false, 0.1),
    ] {
        worker
            .send(WorkerRequest::FindPath(PathRequest {
                agent: 10,
                start: (0, 5),
                end: (9, 5),
                class,
            }))
            .unwrap();
        match worker.recv().unwrap() {
            WorkerResponse::Path(result) => {
                assert_eq!(result.path.is_some(), expect_path);
                if let Some(path) = result.path {
                    assert!(path.points.iter().all(|p| p[1] == height));
                }
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}

#[test]
fn many_requests_in_flight_answer_in_order() {
    let worker = spawn_initialized(open_grid(10));
    for agent in 0..20u64 {
        worker
            .send(WorkerRequest::FindPath(PathRequest {
                agent,
                start: (0, 0),
                end: (9, (agent % 10) as usize),
                class: ActorClass::Pedestrian,
            }))
            .unwrap();
    }
    for agent in 0..20u64 {
        match worker.recv().unwrap() {
            WorkerResponse::Path(result) => {
                assert_eq!(result.agent, agent);
                assert!(result.path.is_some());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}

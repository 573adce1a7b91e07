extern crate city_pathfinding;
use env_logger::Env;

use criterion::{criterion_group, criterion_main, Criterion};

use city_pathfinding::grid::a_star_search;
use city_pathfinding::neighbors::OctileNeighborhood;
use city_pathfinding::prelude::*;
use oorandom::Rand32;

// Setup logging output
fn init() {
    let env = Env::default().filter_or("LOG_LEVEL", "info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn params() -> GridParams {
    GridParams {
        scale: 1.0,
        offset_x: 0.0,
        offset_z: 0.0,
        surface_height: 0.2,
    }
}

fn random_grid(width: usize, height: usize, blocked_per_mille: u32) -> NavGrid {
    let mut rng = Rand32::new(4);
    let cells: Vec<u8> = (0..width * height)
        .map(|_| {
            if rng.rand_range(0..1000) < blocked_per_mille {
                0
            } else {
                1
            }
        })
        .collect();
    NavGrid::from_cells(width, height, cells, params()).unwrap()
}

fn random_zones(grid_size: usize, per_side: usize) -> (Vec<Zone>, Vec<Rect>) {
    // per_side x per_side districts separated by 2-unit roads
    let span = grid_size as f32 / per_side as f32;
    let road_half = 1.0;
    let mut zones = Vec::new();
    let mut roads = Vec::new();
    for zx in 0..per_side {
        for zz in 0..per_side {
            let min_x = zx as f32 * span + road_half;
            let min_z = zz as f32 * span + road_half;
            zones.push(Zone {
                id: (zx * per_side + zz) as u32,
                plots: vec![Rect::new(min_x, min_z, min_x + span - 2.0, min_z + span - 2.0)],
            });
        }
    }
    for i in 1..per_side {
        let at = i as f32 * span;
        roads.push(Rect::new(at - road_half, 0.0, at + road_half, grid_size as f32));
        roads.push(Rect::new(0.0, at - road_half, grid_size as f32, at + road_half));
    }
    (zones, roads)
}

fn bench_grid_a_star(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid A*");

    for (size, blocked) in [(128, 0), (128, 200), (512, 200)] {
        let grid = random_grid(size, size, blocked);
        let neighborhood = OctileNeighborhood::new(size, size);
        let id = format!("Grid Size: ({0}, {0}), Blocked: {1}‰", size, blocked);
        group.bench_function(&id, |b| {
            b.iter(|| a_star_search(&neighborhood, &grid, (1, 1), (size - 2, size - 2)))
        });
    }
}

fn bench_precalculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Precalculation");
    group.sample_size(10);

    // Log to stdout
    init();

    let size = 256;
    let grid = random_grid(size, size, 100);
    let (zones, roads) = random_zones(size, 4);
    let (gates, _) = GateIdentifier::default().identify(&zones, &roads, &grid);

    let id = format!(
        "Identify + Build, Grid Size: ({0}, {0}), Zones: {1}",
        size,
        zones.len()
    );
    group.bench_function(&id, |b| {
        b.iter(|| {
            let (gates, _) = GateIdentifier::default().identify(&zones, &roads, &grid);
            HpaPrecalculator::default().build(&gates, &grid)
        })
    });

    let id = format!("Build Only, Gates: {}", gates.len());
    group.bench_function(&id, |b| {
        b.iter(|| HpaPrecalculator::default().build(&gates, &grid))
    });
}

fn bench_worker_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Worker Round Trip");

    let size = 128;
    let grid = random_grid(size, size, 0);
    let worker = PathfindingWorker::spawn();
    worker
        .send(WorkerRequest::Init(Box::new(InitParams {
            pedestrian: grid.clone(),
            vehicle: grid,
            cache: city_pathfinding::cache::CacheConfig::default(),
        })))
        .unwrap();
    let WorkerResponse::InitComplete = worker.recv().unwrap() else {
        panic!("init failed");
    };

    let mut rng = Rand32::new(7);
    group.bench_function("Cold Requests, Grid Size: (128, 128)", |b| {
        b.iter(|| {
            let start = (rng.rand_range(0..128) as usize, rng.rand_range(0..128) as usize);
            let end = (rng.rand_range(0..128) as usize, rng.rand_range(0..128) as usize);
            worker
                .send(WorkerRequest::FindPath(PathRequest {
                    agent: 0,
                    start,
                    end,
                    class: ActorClass::Pedestrian,
                }))
                .unwrap();
            worker.recv().unwrap()
        })
    });

    group.bench_function("Cached Request, Grid Size: (128, 128)", |b| {
        b.iter(|| {
            worker
                .send(WorkerRequest::FindPath(PathRequest {
                    agent: 0,
                    start: (1, 1),
                    end: (126, 126),
                    class: ActorClass::Pedestrian,
                }))
                .unwrap();
            worker.recv().unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_grid_a_star,
    bench_precalculation,
    bench_worker_round_trip
);
criterion_main!(benches);

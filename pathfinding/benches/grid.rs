//! Benchmarks `GridMap`-backed Dijkstra/A* over a synthetic random map,
//! in place of the teacher's `benches/bitgrid.rs` (which benchmarked
//! against fixture `.scen` files under `maps/bitgrid` that this crate
//! doesn't ship). Grounded on that file's `criterion_group`/per-algorithm
//! `bench_function` shape and its `run` helper, with a seeded random
//! board standing in for the fixture walk.

use criterion::{criterion_group, criterion_main, Criterion};
use pathfinding::{
    GridMap, Heuristic, OctileHeuristic, SearchConfig, SearchParameters, SearchScope,
    UnidirectionalSearch, UniformCostExpansionPolicy, ZeroHeuristic,
};
use rand::Rng;
use rand_pcg::Pcg64;

fn random_map(w: u32, h: u32, open_chance: f64) -> GridMap {
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7a);
    let mut map = GridMap::new(w, h);
    for y in 0..h {
        for x in 0..w {
            map.set_traversable(x, y, rng.gen_bool(open_chance));
        }
    }
    map.set_traversable(0, 0, true);
    map.set_traversable(w - 1, h - 1, true);
    map
}

fn run_all_corners<H: Heuristic>(map: &GridMap, heuristic: &H) {
    let mut policy = UniformCostExpansionPolicy::new(map, true);
    let scope = SearchScope::new();
    let corners = [
        (0, 0, map.width() - 1, map.height() - 1),
        (map.width() - 1, 0, 0, map.height() - 1),
    ];
    for (sx, sy, gx, gy) in corners {
        let problem = scope.new_problem(map.xy_to_packed(sx, sy), map.xy_to_packed(gx, gy));
        let mut search = UnidirectionalSearch::new(&mut policy, heuristic, SearchConfig::default());
        let _ = search.get_path(&problem, &SearchParameters::default());
    }
}

fn benchmark(c: &mut Criterion) {
    let map = random_map(256, 256, 0.8);

    let mut group = c.benchmark_group("grid_search_256x256");
    group.bench_function("dijkstra", |b| {
        b.iter(|| run_all_corners(&map, &ZeroHeuristic));
    });
    group.bench_function("astar", |b| {
        let h = OctileHeuristic::new(&map);
        b.iter(|| run_all_corners(&map, &h));
    });
    group.finish();
}

criterion_group! {
    name = bench;
    config = Criterion::default();
    targets = benchmark
}

criterion_main!(bench);

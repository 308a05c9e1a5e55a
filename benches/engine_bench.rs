use criterion::{black_box, criterion_group, criterion_main, Criterion};

use irredenta::map::region::WorldMap;
use irredenta::simulate::{grid_map, play_random_game};

fn bench_adjacency_build(c: &mut Criterion) {
    let map = grid_map(20, 20);
    let ids = map.region_ids();
    c.bench_function("adjacency_build_400_regions", |b| {
        b.iter(|| WorldMap::build(black_box(&map), black_box(&ids)))
    });
}

fn bench_random_game(c: &mut Criterion) {
    let map = grid_map(5, 4);
    c.bench_function("random_game_5x4_grid", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            play_random_game(black_box(&map), seed)
        })
    });
}

criterion_group!(benches, bench_adjacency_build, bench_random_game);
criterion_main!(benches);

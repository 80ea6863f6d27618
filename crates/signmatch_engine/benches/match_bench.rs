use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

use signmatch_engine::MatchAgainst;
use signmatch_grid::{Map, MapSet, SignValue, Tag};

fn grid_map(tag: &str, size: u32, seed: u8) -> Arc<Map> {
    let cells: Vec<SignValue> = (0..size as usize * size as usize)
        .map(|i| SignValue::new((i as u8).wrapping_mul(31).wrapping_add(seed)))
        .collect();
    Arc::new(Map::from_cells(Tag::new(tag).expect("tag"), size, size, cells).expect("map"))
}

fn bench_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_pass");

    for size in [16u32, 32, 64].iter() {
        let subject = grid_map("subject", *size, 0);
        let set = MapSet::from_maps(vec![
            grid_map("a", 4, 1),
            grid_map("b", 4, 7),
            grid_map("c", 4, 13),
        ])
        .expect("set");
        let placements = (*size - 4 + 1) as u64;
        group.throughput(Throughput::Elements(placements * placements));
        group.bench_function(format!("subject_{size}x{size}"), |b| {
            b.iter(|| {
                black_box(&subject)
                    .match_against(black_box(&set))
                    .expect("pass")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match);
criterion_main!(benches);

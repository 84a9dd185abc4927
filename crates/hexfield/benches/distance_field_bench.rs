use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexfield::{trace_sight, DistanceField, HexCell, Occluder, RectBounds, SightConfig, Unbounded};

fn bench_distance_field_unbounded(c: &mut Criterion) {
    // Radius 8 covers the longest artillery brackets in typical catalogs
    c.bench_function("distance_field_unbounded_r8", |b| {
        b.iter(|| DistanceField::compute(black_box(HexCell::ORIGIN), black_box(8), &Unbounded));
    });
}

fn bench_distance_field_board(c: &mut Criterion) {
    let bounds = RectBounds::new(40, 30);
    c.bench_function("distance_field_board_r12", |b| {
        b.iter(|| DistanceField::compute(black_box(HexCell::new(20, 15)), black_box(12), &bounds));
    });
}

fn bench_trace_sight(c: &mut Criterion) {
    let config = SightConfig::default();
    c.bench_function("trace_sight_ridge_line", |b| {
        b.iter(|| {
            trace_sight(
                black_box(HexCell::new(0, 0)),
                black_box(HexCell::new(12, 7)),
                1,
                2,
                config,
                |cell| Occluder::open((cell.column + cell.row) % 4),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_distance_field_unbounded,
    bench_distance_field_board,
    bench_trace_sight
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use duration_timestamp::{
    apply_parts, decompose_difference, parse_duration, ConvertOptions, RolloverPolicy,
};
use std::hint::black_box;

/// 2024-01-31T13:14:15.161Z
const BASE: i64 = 1_706_706_855_161;

const SPANS: &[(&str, i64)] = &[
    ("one_second", 1_000),
    ("one_month", 31 * 86_400_000),
    ("ten_years", 3_652 * 86_400_000),
    ("five_centuries", 182_621 * 86_400_000 + 12_345_678),
];

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    for rollover in [RolloverPolicy::Overflow, RolloverPolicy::Clamp] {
        let options = ConvertOptions { rollover };
        for (name, span) in SPANS {
            group.bench_function(format!("{name}/{rollover:?}"), |b| {
                b.iter(|| decompose_difference(black_box(BASE + span), black_box(BASE), &options))
            });
        }
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let options = ConvertOptions::default();
    let mut group = c.benchmark_group("apply");

    group.bench_function("parse_and_apply_full", |b| {
        b.iter(|| {
            let parts = parse_duration(black_box("1y 2mo 3w 4d 5h 6m 7s 250ms"));
            apply_parts(&parts, black_box(BASE), &options)
        })
    });

    group.bench_function("fractional_calendar", |b| {
        let parts = parse_duration("1.5y 2.25mo");
        b.iter(|| apply_parts(black_box(&parts), black_box(BASE), &options))
    });

    group.finish();
}

criterion_group!(benches, bench_decompose, bench_apply);
criterion_main!(benches);

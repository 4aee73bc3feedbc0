//! Performance benchmarks for the evaluator and the equity engine.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use gto_core::cards::{parse_board, parse_card, Card};
use gto_core::equity::equity_vs_random;
use gto_core::hand_evaluator::evaluate_seven;

fn bench_evaluate_seven(c: &mut Criterion) {
    let hands: Vec<[Card; 7]> = [
        "AsKsQsJsTs2h3d",
        "AsAhAdAcKs2h3d",
        "AsAd9h9c5s3d2c",
        "AsKd9h7c5s3d2c",
        "9s8d7h6c5sKdKh",
    ]
    .iter()
    .map(|s| parse_board(s).unwrap().try_into().unwrap())
    .collect();

    let mut group = c.benchmark_group("evaluate_seven");
    group.throughput(Throughput::Elements(hands.len() as u64));
    group.bench_function("mixed_categories", |b| {
        b.iter(|| {
            for hand in &hands {
                black_box(evaluate_seven(black_box(hand)));
            }
        })
    });
    group.finish();
}

fn bench_equity(c: &mut Criterion) {
    let hero = [parse_card("As").unwrap(), parse_card("Ah").unwrap()];

    let mut group = c.benchmark_group("equity");
    group.sample_size(10);
    group.bench_function("aa_vs_one_10k", |b| {
        b.iter(|| equity_vs_random(black_box(hero), &[], 1, 10_000, 42).unwrap())
    });
    group.bench_function("aa_vs_five_10k", |b| {
        b.iter(|| equity_vs_random(black_box(hero), &[], 5, 10_000, 42).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_evaluate_seven, bench_equity);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use lob_engine::bus::{Backpressure, EventBus};
use lob_engine::core::{Order, Side};
use lob_engine::engine::OrderBookEngine;
use lob_engine::matching::PriceTimePriorityStrategy;
use std::sync::Arc;

fn make_limit(id: u64, side: Side, price: f64, qty: u32) -> Order {
    Order::limit(id, price, qty, side)
}

fn bench_resting_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("resting inserts, non-crossing");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("add_order 10k non-crossing buys", |b| {
        b.iter_batched(
            || {
                let bus = Arc::new(EventBus::new());
                bus.add_listener(|_e| {}, 8192, Backpressure::Drop).unwrap();
                OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus)
            },
            |mut engine| {
                for i in 0..10_000u64 {
                    let price = 50.0 + (i % 500) as f64;
                    engine.add_order(make_limit(i, Side::Buy, price, 10));
                }
                engine
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_crossing_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching for 10k crossing orders");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("match_orders 10k", |b| {
        b.iter_batched(
            || {
                let bus = Arc::new(EventBus::new());
                bus.add_listener(|_e| {}, 8192, Backpressure::Drop).unwrap();
                let mut engine = OrderBookEngine::new(Box::new(PriceTimePriorityStrategy::new()), bus);
                for i in 0..10_000u64 {
                    engine.add_order(make_limit(i, Side::Sell, 1000.0 + (i % 500) as f64, 10));
                }
                engine
            },
            |mut engine| {
                for i in 10_000..20_000u64 {
                    engine.add_order(make_limit(i, Side::Buy, 1500.0, 10));
                }
                engine
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_resting_inserts, bench_crossing_matches);
criterion_main!(benches);

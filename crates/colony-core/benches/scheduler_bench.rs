//! Criterion benchmarks for conversion scheduling.
//!
//! - `order_for_application`: full collection + stable sort on a dense world
//! - `reorder_costly`: one forward move across the whole costly ordering

use colony_core::scheduler;
use colony_core::test_utils::dense_world;
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_order(c: &mut Criterion) {
    let world = dense_world(64, 4);
    c.bench_function("order_for_application_64x64x4", |b| {
        b.iter(|| scheduler::order_for_application(&world))
    });
}

fn bench_reorder(c: &mut Criterion) {
    let mut world = dense_world(64, 4);
    let last = scheduler::partition(&world).costly.len() - 1;
    c.bench_function("reorder_costly_full_span", |b| {
        b.iter(|| scheduler::reorder_costly(&mut world, 0, last))
    });
}

criterion_group!(benches, bench_order, bench_reorder);
criterion_main!(benches);

//! Basic benchmarks for the `opaque_slot` crate.
//!
//! The allocation tracking exists to demonstrate the crate's core promise:
//! slot operations perform no heap allocation of their own (the `String`
//! scenarios allocate only because `String` itself does).
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use opaque_slot::Slot;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestPayload = u64;
const TEST_VALUE: TestPayload = 1024;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("slot_basic");

    let allocs_op = allocs.operation("store_and_drop");
    group.bench_function("store_and_drop", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(Slot::<16>::of(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("reassign");
    group.bench_function("reassign", |b| {
        b.iter_custom(|iters| {
            let mut slot = Slot::<16>::of(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for i in 0..iters {
                slot.assign(black_box(i));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("get");
    group.bench_function("get", |b| {
        b.iter_custom(|iters| {
            let slot = Slot::<16>::of(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(slot.get::<TestPayload>().unwrap());
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("contains_mismatch");
    group.bench_function("contains_mismatch", |b| {
        b.iter_custom(|iters| {
            let slot = Slot::<16>::of(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(slot.contains::<i32>());
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_slot");
    group.bench_function("clone_slot", |b| {
        b.iter_custom(|iters| {
            let slot = Slot::<16>::of(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(slot.clone()));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}

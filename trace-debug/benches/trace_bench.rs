//! Benchmarks for the trace facility
//!
//! Compares the held-check fast path against emitting records with and
//! without a stack walk.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trace_debug::{
    BacktraceFrameSource, CallerFrameSource, ColorChoice, Destination, Facility, FrameSource,
    Sink, TraceConfig,
};

fn facility_with<F: FrameSource + 'static>(frames: F) -> Facility {
    let config = TraceConfig::builder().color(ColorChoice::Never).build();
    Facility::with_parts(
        config,
        Box::new(frames),
        Sink::new(std::io::sink(), std::io::sink()),
    )
}

fn bench_check_held(c: &mut Criterion) {
    let facility = facility_with(BacktraceFrameSource::new());

    c.bench_function("check_held", |b| {
        b.iter(|| black_box(facility.check(Destination::Secondary, black_box(false), "held", 4)))
    });
}

fn bench_trace_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_depth");
    let facility = facility_with(BacktraceFrameSource::new());

    for depth in [0usize, 1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("backtrace", depth), &depth, |b, &depth| {
            b.iter(|| facility.trace(Destination::Secondary, "bench", depth))
        });
    }

    let caller = facility_with(CallerFrameSource::new());
    group.bench_function("caller", |b| {
        b.iter(|| caller.trace(Destination::Secondary, "bench", 1))
    });

    group.finish();
}

fn bench_trace_array(c: &mut Criterion) {
    let facility = facility_with(CallerFrameSource::new());
    let data: Vec<u64> = (0..1024).collect();

    c.bench_function("trace_array_1024", |b| {
        b.iter(|| facility.trace_array(Destination::Secondary, black_box(&data), 0, 1024, 0))
    });
}

criterion_group!(benches, bench_check_held, bench_trace_depth, bench_trace_array);

criterion_main!(benches);

#![deny(warnings)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use svgtrace::*;

const SHAPES: &str = "\
M10,80 C40,10 65,10 95,80 S150,150 180,80 Q200,40 220,80 T260,80 L260,200 H10 Z \
M40,120 c0,-10 20,-10 20,0 s-20,10 -20,0 z \
M100,120 q10,-20 20,0 t20,0 v40 h-40 z \
M300,0 L400,0 L400,100 L300,100 Z";

fn curve_benchmark(c: &mut Criterion) {
    let cubic = Cubic::new((158.0, 70.0), (210.0, 250.0), (25.0, 190.0), (219.0, 89.0));
    let quad = Quad::new((158.0, 70.0), (210.0, 250.0), (219.0, 89.0));
    let mut group = c.benchmark_group("curve");
    group
        .bench_function("cubic samples", |b| {
            b.iter(|| black_box(cubic).samples(1.0).count())
        })
        .bench_function("quad samples", |b| {
            b.iter(|| black_box(quad).samples(1.0).count())
        });
    group.finish();
}

fn parse_benchmark(c: &mut Criterion) {
    let segments = split_segments(SHAPES).expect("failed to split path data");
    let mut group = c.benchmark_group("parse");
    group
        .throughput(Throughput::Bytes(SHAPES.len() as u64))
        .bench_function("split", |b| b.iter(|| split_segments(black_box(SHAPES))))
        .bench_function("args", |b| {
            b.iter(|| {
                for segment in segments.iter() {
                    let mut chars = segment.chars();
                    if let Some(cmd) = chars.next() {
                        let _ = black_box(parse_args(cmd, chars.as_str()));
                    }
                }
            })
        })
        .bench_function("transform", |b| {
            b.iter(|| black_box("translate(10,20) rotate(30 5 5) scale(2)").parse::<Transform>())
        });
    group.finish();
}

fn trace_benchmark(c: &mut Criterion) {
    let tr: Transform = "translate(10,20) rotate(30) scale(2)"
        .parse()
        .expect("failed to parse transform");
    let mut group = c.benchmark_group("trace");
    for resolution in [-2, 0, 2, 4] {
        let options = TraceOptions {
            resolution,
            ..TraceOptions::default()
        };
        let points = Path::new(SHAPES, Style::default(), tr, options)
            .expect("invalid path")
            .points()
            .expect("failed to trace path")
            .len();
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(
            BenchmarkId::new("sections", resolution),
            &options,
            |b, options| {
                b.iter(|| {
                    let path = Path::new(SHAPES, Style::default(), tr, *options)
                        .expect("invalid path");
                    path.sections().map(|sections| sections.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    curve_benchmark,
    parse_benchmark,
    trace_benchmark
);
criterion_main!(benches);

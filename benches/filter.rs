use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use edgecam::{FrameFilter, FrameLayout, Mode, Resolution};
use std::hint::black_box;

fn banded_frame(res: Resolution) -> Vec<u8> {
    let layout = FrameLayout::new(res.width, res.height).unwrap();
    let mut data = vec![128u8; layout.total_len()];
    for (i, px) in data[..layout.luma_len()].iter_mut().enumerate() {
        let (x, y) = (i % layout.width, i / layout.width);
        *px = if ((x + y) / 16) % 2 == 0 { 40 } else { 210 };
    }
    data
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_filter");

    for res in [Resolution::VGA, Resolution::HD_720P, Resolution::FHD_1080P] {
        let input = banded_frame(res);
        let mut output = vec![0u8; input.len()];
        group.throughput(Throughput::Elements(res.pixels()));

        group.bench_with_input(BenchmarkId::new("passthrough", res), &input, |b, input| {
            let filter = FrameFilter::new();
            b.iter(|| {
                filter
                    .process(black_box(input), res.width, res.height, &mut output, Mode::PassThrough)
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("edge", res), &input, |b, input| {
            let filter = FrameFilter::new();
            b.iter(|| {
                filter
                    .process(black_box(input), res.width, res.height, &mut output, Mode::EdgeDetect)
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("edge_parallel", res), &input, |b, input| {
            let filter = FrameFilter::new().with_parallel(true);
            b.iter(|| {
                filter
                    .process(black_box(input), res.width, res.height, &mut output, Mode::EdgeDetect)
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("edge_stats", res), &input, |b, input| {
            let filter = FrameFilter::new();
            b.iter(|| {
                filter
                    .process_with_stats(
                        black_box(input),
                        res.width,
                        res.height,
                        &mut output,
                        Mode::EdgeDetect,
                    )
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);

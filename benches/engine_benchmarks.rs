//! Performance benchmarks for the frame quality pipeline
//!
//! Run with: cargo bench
//!
//! Each stage is measured on its own, plus a full engine pass per frame,
//! across common preview resolutions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use framegauge::analysis::{
    extract, frame_difference, FrameStatistics, GradientField, Orientation, StatsAccelerator,
    StridedAccelerator,
};
use framegauge::testing::{noise_plane, with_row_padding};
use framegauge::{EngineConfig, MetricsEngine, RawFrame};
use std::time::Duration;

const RESOLUTIONS: [(u32, u32, &str); 3] = [(320, 240, "240p"), (640, 480, "480p"), (1280, 720, "720p")];

/// Padding typical of camera planes aligned to 64 bytes
fn aligned_stride(width: u32) -> u32 {
    (width + 63) / 64 * 64 + 64
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("Luma Extraction");

    for (width, height, name) in RESOLUTIONS {
        let stride = aligned_stride(width);
        let padded = with_row_padding(&noise_plane(width, height, 1), width, height, stride, 0);
        group.throughput(Throughput::Bytes((width * height) as u64));

        group.bench_with_input(BenchmarkId::new("padded", name), &padded, |b, data| {
            b.iter(|| {
                let frame = RawFrame::new(data, width, height, stride, Duration::ZERO);
                black_box(extract(&frame).map(|luma| luma.len()))
            })
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analysis Stages");

    for (width, height, name) in RESOLUTIONS {
        let plane = noise_plane(width, height, 2);
        let previous = noise_plane(width, height, 3);
        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(BenchmarkId::new("statistics", name), &plane, |b, data| {
            b.iter(|| black_box(FrameStatistics::from_pixels(data)))
        });

        group.bench_with_input(BenchmarkId::new("strided_accelerator", name), &plane, |b, data| {
            b.iter(|| black_box(StridedAccelerator.compute_mean_std(data, width, height, width)))
        });

        group.bench_with_input(BenchmarkId::new("gradient_orientation", name), &plane, |b, data| {
            b.iter(|| {
                let field = GradientField::from_pixels(data, width as usize, height as usize);
                black_box(Orientation::estimate(&field))
            })
        });

        group.bench_with_input(BenchmarkId::new("motion", name), &plane, |b, data| {
            b.iter(|| black_box(frame_difference(data, Some(previous.as_slice()))))
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine Frame");
    group.sample_size(30);

    for (width, height, name) in RESOLUTIONS {
        let frames = [noise_plane(width, height, 4), noise_plane(width, height, 5)];
        let mut config = EngineConfig::default();
        config.throttle.min_interval_ms = 0;
        let mut engine = MetricsEngine::new(&config).expect("default config is valid");
        let mut tick = 0u64;

        group.bench_function(BenchmarkId::new("process", name), |b| {
            b.iter(|| {
                tick += 1;
                let data = &frames[(tick % 2) as usize];
                let ts = Duration::from_millis(tick);
                black_box(engine.on_frame(data, width, height, width, ts).ok())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_stages, bench_engine);
criterion_main!(benches);

//! Property tests for the metrics engine
//!
//! Randomized frames, strides and arrival times: published metrics must stay in
//! range, smoothing must converge without overshoot, and row padding must never
//! change a result.

use framegauge::analysis::{FrameStatistics, GradientField, Orientation};
use framegauge::quality::{MetricTargets, RawMeasurements};
use framegauge::testing::{noise_plane, with_row_padding};
use framegauge::{FrameOutcome, MetricValues, MetricsEngine};
use proptest::prelude::*;
use std::time::Duration;

fn metric_list(v: &MetricValues) -> [f64; 7] {
    [
        v.sharpness,
        v.angle,
        v.tilt_vertical,
        v.frontal,
        v.brightness,
        v.shake,
        v.distance,
    ]
}

fn single_frame_targets(plane: &[u8], width: u32, height: u32) -> MetricValues {
    let stats = FrameStatistics::from_pixels(plane);
    let orientation = Orientation::estimate(&GradientField::from_pixels(
        plane,
        width as usize,
        height as usize,
    ));
    MetricTargets::from_measurements(&RawMeasurements {
        mean: stats.mean,
        stddev: stats.stddev,
        angle_deg: orientation.angle_deg,
        tilt_deg: orientation.tilt_deg,
        shake_raw: 0.0,
    })
    .0
}

/// Frame geometry plus a seed for its content.
fn frame_geometry() -> impl Strategy<Value = (u32, u32, u32, u64)> {
    (1u32..48, 1u32..48, 0u32..9, any::<u64>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn published_metrics_stay_in_range(
        frames in prop::collection::vec(frame_geometry(), 1..12),
        gaps in prop::collection::vec(0u64..400, 12),
    ) {
        let mut engine = MetricsEngine::default();
        let mut ts = Duration::ZERO;

        for (i, (w, h, pad, seed)) in frames.into_iter().enumerate() {
            let plane = noise_plane(w, h, seed);
            let padded = with_row_padding(&plane, w, h, w + pad, 0xAB);
            ts += Duration::from_millis(gaps[i]);

            match engine.on_frame(&padded, w, h, w + pad, ts) {
                Ok(FrameOutcome::Published(metrics)) => {
                    prop_assert!(metrics.values().within_ranges(), "{:?}", metrics);
                    prop_assert_eq!(metrics.is_capture_ready(), metrics.flags().all());
                }
                Ok(FrameOutcome::Throttled) => {}
                Err(e) => prop_assert!(false, "valid frame rejected: {}", e),
            }
            prop_assert!(engine.current_metrics().values().within_ranges());
        }
    }

    #[test]
    fn static_input_converges_without_overshoot(
        (w, h, _pad, seed) in frame_geometry(),
        steps in 2usize..40,
    ) {
        let plane = noise_plane(w, h, seed);
        let target = metric_list(&single_frame_targets(&plane, w, h));

        let mut engine = MetricsEngine::default();
        let mut previous = metric_list(engine.current_metrics().values());

        for i in 0..steps {
            let outcome = engine
                .on_frame(&plane, w, h, w, Duration::from_millis(i as u64 * 200))
                .unwrap();
            let current = match outcome {
                FrameOutcome::Published(m) => metric_list(m.values()),
                FrameOutcome::Throttled => unreachable!("frames are 200 ms apart"),
            };

            for k in 0..7 {
                let (lo, hi) = if previous[k] <= target[k] {
                    (previous[k], target[k])
                } else {
                    (target[k], previous[k])
                };
                prop_assert!(
                    current[k] >= lo - 1e-9 && current[k] <= hi + 1e-9,
                    "metric {} left [{}, {}]: {}", k, lo, hi, current[k]
                );
            }
            previous = current;
        }
    }

    #[test]
    fn row_padding_never_changes_metrics(
        (w, h, pad, seed) in frame_geometry(),
        pad_byte in any::<u8>(),
    ) {
        let first = noise_plane(w, h, seed);
        let second = noise_plane(w, h, seed.wrapping_add(1));

        let mut dense = MetricsEngine::default();
        let mut padded = MetricsEngine::default();

        for (i, plane) in [first, second].iter().enumerate() {
            let ts = Duration::from_millis(i as u64 * 300);
            let with_pad = with_row_padding(plane, w, h, w + pad, pad_byte);
            let a = dense.on_frame(plane, w, h, w, ts).unwrap();
            let b = padded.on_frame(&with_pad, w, h, w + pad, ts).unwrap();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn undersized_buffers_never_publish(
        (w, h, pad, seed) in frame_geometry(),
        missing in 1usize..16,
    ) {
        let plane = noise_plane(w, h, seed);
        let mut padded = with_row_padding(&plane, w, h, w + pad, 0);
        let keep = padded.len().saturating_sub(missing);
        padded.truncate(keep);

        let mut engine = MetricsEngine::default();
        let before = engine.current_metrics();
        prop_assert!(engine.on_frame(&padded, w, h, w + pad, Duration::ZERO).is_err());
        prop_assert_eq!(engine.current_metrics(), before);
    }
}

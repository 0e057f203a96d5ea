//! Raw measurement → bounded target mapping.

use crate::analysis::frontal_score;
use crate::types::{
    MetricValues, ANGLE_RANGE, DISTANCE_RANGE, SHAKE_RANGE, TILT_RANGE,
};

/// Standard deviation treated as fully sharp.
pub const SHARPNESS_FULL_SCALE_STD: f64 = 64.0;
/// Mean absolute frame difference treated as maximal shake.
pub const SHAKE_FULL_SCALE_DIFF: f64 = 30.0;

/// Unbounded per-frame measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawMeasurements {
    pub mean: f64,
    pub stddev: f64,
    pub angle_deg: f64,
    pub tilt_deg: f64,
    pub shake_raw: f64,
}

/// Single-frame target values, already inside the metric ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTargets(pub MetricValues);

impl MetricTargets {
    pub fn from_measurements(raw: &RawMeasurements) -> Self {
        let brightness = linear(raw.mean, 0.0, 255.0, 0.0, 100.0);
        let sharpness = linear(raw.stddev, 0.0, SHARPNESS_FULL_SCALE_STD, 0.0, 100.0);
        let shake_percent = linear(raw.shake_raw, 0.0, SHAKE_FULL_SCALE_DIFF, 0.0, 100.0);

        // Distance has no signal of its own: blurrier means assumed further away.
        let distance = linear(
            100.0 - sharpness,
            0.0,
            100.0,
            *DISTANCE_RANGE.start(),
            *DISTANCE_RANGE.end(),
        );

        MetricTargets(MetricValues {
            sharpness,
            angle: raw.angle_deg.clamp(*ANGLE_RANGE.start(), *ANGLE_RANGE.end()),
            tilt_vertical: raw.tilt_deg.clamp(*TILT_RANGE.start(), *TILT_RANGE.end()),
            frontal: frontal_score(raw.angle_deg, raw.tilt_deg),
            brightness,
            shake: (shake_percent * 5.0 / 100.0).clamp(*SHAKE_RANGE.start(), *SHAKE_RANGE.end()),
            distance,
        })
    }

    pub fn values(&self) -> &MetricValues {
        &self.0
    }
}

/// Map `value` from [in_lo, in_hi] onto [out_lo, out_hi], clamped.
fn linear(value: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    let t = ((value - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    out_lo + t * (out_hi - out_lo)
}

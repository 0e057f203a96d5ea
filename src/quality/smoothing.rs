//! Per-metric exponential moving average.
//!
//! Deliberately continuous: nothing resets on resolution change or stream restart.

use crate::config::SmoothingConfig;
use crate::types::MetricValues;

/// One step of a first-order low-pass filter.
#[inline]
pub fn smooth(current: f64, target: f64, alpha: f64) -> f64 {
    current + (target - current) * alpha
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalSmoother {
    alphas: SmoothingConfig,
}

impl TemporalSmoother {
    pub fn new(alphas: SmoothingConfig) -> Self {
        Self { alphas }
    }

    /// Move every metric of `current` towards `target`, staying within ranges.
    pub fn step(&self, current: &MetricValues, target: &MetricValues) -> MetricValues {
        let a = &self.alphas;
        MetricValues {
            sharpness: smooth(current.sharpness, target.sharpness, a.sharpness_alpha),
            angle: smooth(current.angle, target.angle, a.angle_alpha),
            tilt_vertical: smooth(current.tilt_vertical, target.tilt_vertical, a.tilt_alpha),
            frontal: smooth(current.frontal, target.frontal, a.frontal_alpha),
            brightness: smooth(current.brightness, target.brightness, a.brightness_alpha),
            shake: smooth(current.shake, target.shake, a.shake_alpha),
            distance: smooth(current.distance, target.distance, a.distance_alpha),
        }
        .clamped()
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}

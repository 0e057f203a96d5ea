//! Threshold classification of smoothed metrics.
//!
//! No hysteresis: flags follow the smoothed values frame to frame.

use crate::config::ThresholdConfig;
use crate::types::{MetricFlags, MetricValues, Metrics};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClassifier {
    thresholds: ThresholdConfig,
}

impl ThresholdClassifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn flags(&self, values: &MetricValues) -> MetricFlags {
        let t = &self.thresholds;
        let within = |v: f64, [lo, hi]: [f64; 2]| v >= lo && v <= hi;

        MetricFlags {
            sharpness: values.sharpness >= t.min_sharpness,
            angle: values.angle.abs() <= t.max_abs_angle,
            tilt_vertical: values.tilt_vertical.abs() <= t.max_abs_tilt,
            frontal: values.frontal >= t.min_frontal,
            brightness: within(values.brightness, t.brightness_range),
            shake: values.shake <= t.max_shake,
            distance: within(values.distance, t.distance_range),
        }
    }

    /// Build a complete snapshot from smoothed values.
    pub fn classify(&self, values: MetricValues) -> Metrics {
        Metrics::from_parts(values, self.flags(&values))
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

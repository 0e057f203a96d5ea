/// Quality scoring over raw frame measurements
///
/// Turns per-frame measurements into the published metric set:
/// 1. Map raw measurements onto bounded target values
/// 2. Smooth each metric towards its target (exponential moving average)
/// 3. Classify the smoothed values against fixed thresholds
pub mod classifier;
pub mod smoothing;
pub mod targets;

pub use classifier::ThresholdClassifier;
pub use smoothing::{smooth, TemporalSmoother};
pub use targets::{MetricTargets, RawMeasurements};

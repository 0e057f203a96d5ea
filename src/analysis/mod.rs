//! Per-frame measurements over a luma plane.
//!
//! Each stage works on a [`DenseLuma`](crate::types::DenseLuma) produced by
//! [`luma::extract`]:
//! 1. Mean and standard deviation of intensities
//! 2. Sobel gradients and the orientation proxies derived from them
//! 3. Subsampled difference against the previous frame
pub mod gradient;
pub mod luma;
pub mod motion;
pub mod orientation;
pub mod statistics;

pub use gradient::GradientField;
pub use luma::extract;
pub use motion::frame_difference;
pub use orientation::{frontal_score, Orientation};
pub use statistics::{FrameStatistics, StatsAccelerator, StridedAccelerator};

/// Stride used by the subsampled scans (orientation, motion).
pub const SAMPLE_STRIDE: usize = 4;

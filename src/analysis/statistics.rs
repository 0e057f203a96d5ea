//! Intensity statistics.
//!
//! The pure path here is always available. A [`StatsAccelerator`] can be plugged
//! into the engine to compute the same numbers straight from the padded capture
//! buffer; it is an optimization only.

use crate::types::DenseLuma;

/// Mean and population standard deviation of pixel intensities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStatistics {
    pub mean: f64,
    pub stddev: f64,
}

impl FrameStatistics {
    pub fn compute(luma: &DenseLuma<'_>) -> Self {
        Self::from_pixels(luma.pixels())
    }

    /// Two passes with `f64` accumulators.
    pub fn from_pixels(pixels: &[u8]) -> Self {
        if pixels.is_empty() {
            return Self::default();
        }

        let n = pixels.len() as f64;
        let sum: f64 = pixels.iter().map(|&p| p as f64).sum();
        let mean = sum / n;

        let var = pixels
            .iter()
            .map(|&p| {
                let d = p as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            mean,
            stddev: var.sqrt(),
        }
    }
}

/// Optional fast path for mean/stddev.
///
/// Implementations return `(0.0, 0.0)` when the input is unusable (empty buffer,
/// zero dimensions or stride). The engine treats that answer as degraded and
/// recomputes with [`FrameStatistics::from_pixels`].
pub trait StatsAccelerator: Send {
    fn compute_mean_std(&self, buffer: &[u8], width: u32, height: u32, row_stride: u32) -> (f32, f32);

    fn name(&self) -> &str {
        "accelerator"
    }
}

/// Reference accelerator reading the padded buffer in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct StridedAccelerator;

impl StatsAccelerator for StridedAccelerator {
    fn compute_mean_std(&self, buffer: &[u8], width: u32, height: u32, row_stride: u32) -> (f32, f32) {
        if buffer.is_empty() || width == 0 || height == 0 || row_stride == 0 {
            return (0.0, 0.0);
        }

        let (width, height, stride) = (width as usize, height as usize, row_stride as usize);
        if stride < width || buffer.len() < stride * (height - 1) + width {
            return (0.0, 0.0);
        }

        let rows = || (0..height).map(|y| &buffer[y * stride..y * stride + width]);
        let n = (width * height) as f64;

        let sum: f64 = rows()
            .flat_map(|row| row.iter())
            .map(|&p| p as f64)
            .sum();
        let mean = sum / n;

        let var: f64 = rows()
            .flat_map(|row| row.iter())
            .map(|&p| {
                let d = p as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        (mean as f32, var.sqrt() as f32)
    }

    fn name(&self) -> &str {
        "strided"
    }
}

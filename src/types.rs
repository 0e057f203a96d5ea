//! Frame and metric types shared across the engine.

use crate::errors::FrameDefect;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::RangeInclusive;
use std::time::Duration;

/// A single-channel plane as delivered by the capture layer.
///
/// Rows are `row_stride` bytes apart; bytes past `width` in each row are padding
/// and carry no image content. The engine borrows the buffer for one call only.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub row_stride: u32,
    /// Arrival time, monotonic relative to the start of the stream.
    pub timestamp: Duration,
}

impl<'a> RawFrame<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, row_stride: u32, timestamp: Duration) -> Self {
        Self {
            data,
            width,
            height,
            row_stride,
            timestamp,
        }
    }

    /// A frame without row padding.
    pub fn dense(data: &'a [u8], width: u32, height: u32, timestamp: Duration) -> Self {
        Self::new(data, width, height, width, timestamp)
    }

    /// Borrow a decoded grayscale image as a frame.
    pub fn from_gray_image(image: &'a GrayImage, timestamp: Duration) -> Self {
        let (width, height) = image.dimensions();
        Self::dense(image.as_raw(), width, height, timestamp)
    }

    /// Minimum buffer length implied by the geometry.
    pub fn required_len(&self) -> Option<usize> {
        (self.row_stride as usize).checked_mul(self.height as usize)
    }

    pub fn validate(&self) -> Result<(), FrameDefect> {
        if self.width == 0 {
            return Err(FrameDefect::ZeroWidth);
        }
        if self.height == 0 {
            return Err(FrameDefect::ZeroHeight);
        }
        if self.row_stride < self.width {
            return Err(FrameDefect::StrideTooSmall {
                stride: self.row_stride,
                width: self.width,
            });
        }
        let required = self.required_len().unwrap_or(usize::MAX);
        if self.data.len() < required {
            return Err(FrameDefect::BufferTooShort {
                len: self.data.len(),
                required,
            });
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Row-major luma plane of exactly `width * height` bytes.
///
/// Borrows the capture buffer when it had no padding, owns a compacted copy otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseLuma<'a> {
    pixels: Cow<'a, [u8]>,
    width: u32,
    height: u32,
}

impl<'a> DenseLuma<'a> {
    pub(crate) fn borrowed(pixels: &'a [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            pixels: Cow::Borrowed(pixels),
            width,
            height,
        }
    }

    pub(crate) fn owned(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            pixels: Cow::Owned(pixels),
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True when no copy was made during extraction.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.pixels, Cow::Borrowed(_))
    }

    pub fn into_pixels(self) -> Cow<'a, [u8]> {
        self.pixels
    }
}

pub const SHARPNESS_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const ANGLE_RANGE: RangeInclusive<f64> = -45.0..=45.0;
pub const TILT_RANGE: RangeInclusive<f64> = -30.0..=30.0;
pub const FRONTAL_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const BRIGHTNESS_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const SHAKE_RANGE: RangeInclusive<f64> = 0.0..=5.0;
/// Approximate subject distance. Derived from sharpness only, not a calibrated depth.
pub const DISTANCE_RANGE: RangeInclusive<f64> = 0.2..=3.5;

pub(crate) fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

/// The seven scalar quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    /// Contrast-based sharpness, percent.
    pub sharpness: f64,
    /// Dominant edge orientation, degrees.
    pub angle: f64,
    /// Top/bottom edge-energy imbalance mapped to degrees.
    pub tilt_vertical: f64,
    /// How squarely the subject faces the camera, percent.
    pub frontal: f64,
    /// Mean luma, percent.
    pub brightness: f64,
    /// Frame-to-frame difference, 0..5.
    pub shake: f64,
    /// Heuristic subject distance in metres, inverse of sharpness.
    pub distance: f64,
}

impl MetricValues {
    /// Targets of an all-black frame.
    pub const BLANK: MetricValues = MetricValues {
        sharpness: 0.0,
        angle: 0.0,
        tilt_vertical: 0.0,
        frontal: 100.0,
        brightness: 0.0,
        shake: 0.0,
        distance: 3.5,
    };

    pub fn clamped(self) -> Self {
        Self {
            sharpness: clamp_to(self.sharpness, &SHARPNESS_RANGE),
            angle: clamp_to(self.angle, &ANGLE_RANGE),
            tilt_vertical: clamp_to(self.tilt_vertical, &TILT_RANGE),
            frontal: clamp_to(self.frontal, &FRONTAL_RANGE),
            brightness: clamp_to(self.brightness, &BRIGHTNESS_RANGE),
            shake: clamp_to(self.shake, &SHAKE_RANGE),
            distance: clamp_to(self.distance, &DISTANCE_RANGE),
        }
    }

    pub fn within_ranges(&self) -> bool {
        SHARPNESS_RANGE.contains(&self.sharpness)
            && ANGLE_RANGE.contains(&self.angle)
            && TILT_RANGE.contains(&self.tilt_vertical)
            && FRONTAL_RANGE.contains(&self.frontal)
            && BRIGHTNESS_RANGE.contains(&self.brightness)
            && SHAKE_RANGE.contains(&self.shake)
            && DISTANCE_RANGE.contains(&self.distance)
    }
}

impl Default for MetricValues {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Per-metric pass/fail verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricFlags {
    pub sharpness: bool,
    pub angle: bool,
    pub tilt_vertical: bool,
    pub frontal: bool,
    pub brightness: bool,
    pub shake: bool,
    pub distance: bool,
}

impl MetricFlags {
    pub fn all(&self) -> bool {
        self.sharpness
            && self.angle
            && self.tilt_vertical
            && self.frontal
            && self.brightness
            && self.shake
            && self.distance
    }

    /// Names of the metrics currently failing, for logging.
    pub fn failing(&self) -> Vec<&'static str> {
        [
            ("sharpness", self.sharpness),
            ("angle", self.angle),
            ("tilt_vertical", self.tilt_vertical),
            ("frontal", self.frontal),
            ("brightness", self.brightness),
            ("shake", self.shake),
            ("distance", self.distance),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Published quality snapshot. Immutable once built; replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    values: MetricValues,
    flags: MetricFlags,
    capture_ready: bool,
}

impl Metrics {
    pub(crate) fn from_parts(values: MetricValues, flags: MetricFlags) -> Self {
        Self {
            values,
            flags,
            capture_ready: flags.all(),
        }
    }

    pub fn values(&self) -> &MetricValues {
        &self.values
    }

    pub fn flags(&self) -> &MetricFlags {
        &self.flags
    }

    pub fn is_capture_ready(&self) -> bool {
        self.capture_ready
    }

    pub fn sharpness(&self) -> f64 {
        self.values.sharpness
    }

    pub fn angle(&self) -> f64 {
        self.values.angle
    }

    pub fn tilt_vertical(&self) -> f64 {
        self.values.tilt_vertical
    }

    pub fn frontal(&self) -> f64 {
        self.values.frontal
    }

    pub fn brightness(&self) -> f64 {
        self.values.brightness
    }

    pub fn shake(&self) -> f64 {
        self.values.shake
    }

    pub fn distance(&self) -> f64 {
        self.values.distance
    }
}

/// Result of handing one frame to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// A new snapshot was published.
    Published(Metrics),
    /// The frame arrived too soon after the last processed one and was skipped.
    Throttled,
}

impl FrameOutcome {
    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            FrameOutcome::Published(metrics) => Some(metrics),
            FrameOutcome::Throttled => None,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, FrameOutcome::Published(_))
    }
}

/// Whether the engine holds a previous frame to measure motion against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    Tracking,
}

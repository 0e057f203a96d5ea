//! Frame quality orchestration
//!
//! `MetricsEngine` owns everything that persists between frames: the
//! previous luma plane, the current smoothed snapshot and the throttle.
//! Per admitted frame it runs:
//! 1. Luma extraction (stride stripping)
//! 2. Statistics, gradients and orientation
//! 3. Motion against the previous plane (zero while idle)
//! 4. Target mapping, smoothing and classification
//! 5. Snapshot publication, then the plane becomes the new previous frame
pub mod jitter;
pub mod publish;
pub mod shared;

pub use jitter::JitterSynth;
pub use publish::{MetricsPublisher, MetricsReader};
pub use shared::SharedEngine;

use crate::analysis::{
    extract, frame_difference, FrameStatistics, GradientField, Orientation, StatsAccelerator,
};
use crate::assert_invariant;
use crate::config::{EngineConfig, FallbackMode};
use crate::errors::QualityError;
use crate::invariants::{DENSE_LEN_MATCHES_GEOMETRY, METRICS_WITHIN_RANGES, READY_IS_AND_OF_FLAGS};
use crate::quality::{MetricTargets, RawMeasurements, TemporalSmoother, ThresholdClassifier};
use crate::timing::FrameThrottle;
use crate::types::{DenseLuma, EngineState, FrameOutcome, MetricValues, Metrics, RawFrame};
use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;

/// How mean/stddev are obtained, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatsMode {
    Pure,
    Accelerated,
    DemoJitter,
}

enum StatsPath {
    Pure,
    Accelerated(Box<dyn StatsAccelerator>),
    DemoJitter(JitterSynth),
}

impl StatsPath {
    fn resolve(accelerator: Option<Box<dyn StatsAccelerator>>, config: &EngineConfig) -> Self {
        match (accelerator, config.fallback.mode) {
            (Some(accelerator), _) => StatsPath::Accelerated(accelerator),
            (None, FallbackMode::Pure) => StatsPath::Pure,
            (None, FallbackMode::DemoJitter) => {
                log::warn!("No statistics accelerator installed, running demo jitter instead of measuring");
                StatsPath::DemoJitter(JitterSynth::new(config.fallback.jitter_seed))
            }
        }
    }

    fn mode(&self) -> StatsMode {
        match self {
            StatsPath::Pure => StatsMode::Pure,
            StatsPath::Accelerated(_) => StatsMode::Accelerated,
            StatsPath::DemoJitter(_) => StatsMode::DemoJitter,
        }
    }
}

/// Dense plane kept for the next frame's motion estimate.
struct PreviousFrame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

/// Per-engine frame accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameCounters {
    pub processed: u64,
    pub throttled: u64,
    pub rejected: u64,
}

pub struct MetricsEngine {
    smoother: TemporalSmoother,
    classifier: ThresholdClassifier,
    throttle: FrameThrottle,
    stats: StatsPath,
    previous: Option<PreviousFrame>,
    snapshot: Metrics,
    publisher: MetricsPublisher,
    counters: FrameCounters,
}

impl MetricsEngine {
    /// Engine measuring with the built-in algorithms (or jitter, if configured).
    pub fn new(config: &EngineConfig) -> Result<Self, QualityError> {
        Self::with_initial(config, MetricValues::BLANK)
    }

    /// Engine starting its smoothing from `initial` instead of a blank frame.
    pub fn with_initial(config: &EngineConfig, initial: MetricValues) -> Result<Self, QualityError> {
        config.validate()?;
        Ok(Self::build(config, initial, None))
    }

    /// Engine computing mean/stddev through `accelerator`.
    pub fn with_accelerator(
        config: &EngineConfig,
        accelerator: Box<dyn StatsAccelerator>,
    ) -> Result<Self, QualityError> {
        Self::with_accelerator_and_initial(config, accelerator, MetricValues::BLANK)
    }

    /// Accelerated engine starting its smoothing from `initial`.
    pub fn with_accelerator_and_initial(
        config: &EngineConfig,
        accelerator: Box<dyn StatsAccelerator>,
        initial: MetricValues,
    ) -> Result<Self, QualityError> {
        config.validate()?;
        Ok(Self::build(config, initial, Some(accelerator)))
    }

    fn build(
        config: &EngineConfig,
        initial: MetricValues,
        accelerator: Option<Box<dyn StatsAccelerator>>,
    ) -> Self {
        let classifier = ThresholdClassifier::new(config.thresholds);
        let snapshot = classifier.classify(initial.clamped());
        let stats = StatsPath::resolve(accelerator, config);

        log::info!(
            "Metrics engine ready: {:?} statistics, throttle {:?}",
            stats.mode(),
            config.throttle.min_interval()
        );

        Self {
            smoother: TemporalSmoother::new(config.smoothing),
            classifier,
            throttle: FrameThrottle::new(config.throttle.min_interval()),
            stats,
            previous: None,
            snapshot,
            publisher: MetricsPublisher::new(snapshot),
            counters: FrameCounters::default(),
        }
    }

    /// Frame entry point for a capture callback.
    pub fn on_frame(
        &mut self,
        buffer: &[u8],
        width: u32,
        height: u32,
        row_stride: u32,
        timestamp: Duration,
    ) -> Result<FrameOutcome, QualityError> {
        self.process(&RawFrame::new(buffer, width, height, row_stride, timestamp))
    }

    /// Analyse one frame and publish a new snapshot.
    ///
    /// Throttled frames return [`FrameOutcome::Throttled`]. Invalid frames
    /// return an error and leave the current snapshot untouched.
    pub fn process(&mut self, frame: &RawFrame<'_>) -> Result<FrameOutcome, QualityError> {
        if !self.throttle.admits(frame.timestamp) {
            self.counters.throttled += 1;
            log::trace!("Frame at {:?} throttled", frame.timestamp);
            return Ok(FrameOutcome::Throttled);
        }

        let dense = match extract(frame) {
            Ok(dense) => dense,
            Err(defect) => {
                self.counters.rejected += 1;
                log::warn!(
                    "Discarding {}x{} frame (stride {}): {}",
                    frame.width,
                    frame.height,
                    frame.row_stride,
                    defect
                );
                return Err(defect.into());
            }
        };

        assert_invariant!(
            dense.len() == frame.pixel_count(),
            DENSE_LEN_MATCHES_GEOMETRY,
            "engine::process"
        );

        let values = match self.stats {
            StatsPath::DemoJitter(_) => self.jittered(),
            _ => self.measured(frame, &dense),
        };

        let metrics = self.publish(values);
        self.store_previous(dense);
        self.throttle.mark_processed(frame.timestamp);
        self.counters.processed += 1;

        log::debug!(
            "Frame {} at {:?}: ready={} failing={:?}",
            self.counters.processed,
            frame.timestamp,
            metrics.is_capture_ready(),
            metrics.flags().failing()
        );

        Ok(FrameOutcome::Published(metrics))
    }

    fn measured(&self, frame: &RawFrame<'_>, dense: &DenseLuma<'_>) -> MetricValues {
        let stats = self.statistics(frame, dense);
        let orientation = Orientation::estimate(&GradientField::compute(dense));
        let shake_raw = frame_difference(dense.pixels(), self.previous_pixels(dense));

        let raw = RawMeasurements {
            mean: stats.mean,
            stddev: stats.stddev,
            angle_deg: orientation.angle_deg,
            tilt_deg: orientation.tilt_deg,
            shake_raw,
        };
        let targets = MetricTargets::from_measurements(&raw);
        log::trace!("Raw {:?} -> targets {:?}", raw, targets.values());

        self.smoother.step(self.snapshot.values(), targets.values())
    }

    fn statistics(&self, frame: &RawFrame<'_>, dense: &DenseLuma<'_>) -> FrameStatistics {
        if let StatsPath::Accelerated(accelerator) = &self.stats {
            let (mean, stddev) =
                accelerator.compute_mean_std(frame.data, frame.width, frame.height, frame.row_stride);
            if (mean, stddev) != (0.0, 0.0) {
                return FrameStatistics {
                    mean: mean as f64,
                    stddev: stddev as f64,
                };
            }
            log::debug!("{} accelerator degraded, using built-in statistics", accelerator.name());
        }
        FrameStatistics::compute(dense)
    }

    /// Previous plane, only when it has the same geometry as `current`.
    fn previous_pixels(&self, current: &DenseLuma<'_>) -> Option<&[u8]> {
        let previous = self.previous.as_ref()?;
        if previous.width != current.width() || previous.height != current.height() {
            log::debug!(
                "Resolution changed {}x{} -> {}x{}, motion restarts",
                previous.width,
                previous.height,
                current.width(),
                current.height()
            );
            return None;
        }
        Some(&previous.pixels)
    }

    fn jittered(&mut self) -> MetricValues {
        let previous = *self.snapshot.values();
        match &mut self.stats {
            StatsPath::DemoJitter(synth) => synth.perturb(&previous),
            _ => previous,
        }
    }

    fn publish(&mut self, values: MetricValues) -> Metrics {
        let metrics = self.classifier.classify(values);

        assert_invariant!(
            metrics.values().within_ranges(),
            METRICS_WITHIN_RANGES,
            "engine::publish"
        );
        assert_invariant!(
            metrics.is_capture_ready() == metrics.flags().all(),
            READY_IS_AND_OF_FLAGS,
            "engine::publish"
        );

        self.snapshot = metrics;
        self.publisher.publish(metrics);
        metrics
    }

    /// Keep `dense` as the previous plane, reusing the old allocation when
    /// the plane is still borrowed from the capture buffer.
    fn store_previous(&mut self, dense: DenseLuma<'_>) {
        let (width, height) = (dense.width(), dense.height());
        let pixels = match dense.into_pixels() {
            Cow::Owned(pixels) => pixels,
            Cow::Borrowed(pixels) => {
                let mut buffer = self.previous.take().map(|p| p.pixels).unwrap_or_default();
                buffer.clear();
                buffer.extend_from_slice(pixels);
                buffer
            }
        };
        self.previous = Some(PreviousFrame {
            pixels,
            width,
            height,
        });
    }

    /// Latest published snapshot.
    pub fn current_metrics(&self) -> Metrics {
        self.snapshot
    }

    /// Read handle for a display layer, usable from other threads.
    pub fn subscribe(&self) -> MetricsReader {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> EngineState {
        if self.previous.is_some() {
            EngineState::Tracking
        } else {
            EngineState::Idle
        }
    }

    pub fn stats_mode(&self) -> StatsMode {
        self.stats.mode()
    }

    pub fn counters(&self) -> FrameCounters {
        self.counters
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::build(&EngineConfig::default(), MetricValues::BLANK, None)
    }
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine")
            .field("state", &self.state())
            .field("stats", &self.stats.mode())
            .field("snapshot", &self.snapshot)
            .field("counters", &self.counters)
            .finish()
    }
}

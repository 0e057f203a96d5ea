//! Engine handle for capture stacks that may deliver frames concurrently.
//!
//! The mutex spans the whole of `process`, from extraction to publication, and
//! the dense plane is moved into the engine's previous-frame slot before the
//! guard drops. Readers go through the watch channel and never take the lock.
//!
//! Capture stacks that deliver planes without timestamps use
//! [`SharedEngine::on_live_frame`], which stamps each plane with the handle's
//! [`FrameClock`]. All clones share that clock.

use super::{FrameCounters, MetricsEngine, MetricsReader};
use crate::errors::QualityError;
use crate::timing::FrameClock;
use crate::types::{FrameOutcome, Metrics, RawFrame};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<MetricsEngine>>,
    reader: MetricsReader,
    clock: FrameClock,
}

impl SharedEngine {
    pub fn new(engine: MetricsEngine) -> Self {
        Self::with_clock(engine, FrameClock::new())
    }

    /// Share an existing timebase, e.g. the one the capture layer already uses.
    pub fn with_clock(engine: MetricsEngine, clock: FrameClock) -> Self {
        let reader = engine.subscribe();
        Self {
            inner: Arc::new(Mutex::new(engine)),
            reader,
            clock,
        }
    }

    pub fn process(&self, frame: &RawFrame<'_>) -> Result<FrameOutcome, QualityError> {
        let mut engine = self.inner.lock().map_err(|_| QualityError::PoisonedLock)?;
        engine.process(frame)
    }

    pub fn on_frame(
        &self,
        buffer: &[u8],
        width: u32,
        height: u32,
        row_stride: u32,
        timestamp: Duration,
    ) -> Result<FrameOutcome, QualityError> {
        self.process(&RawFrame::new(buffer, width, height, row_stride, timestamp))
    }

    /// Frame entry point for callbacks that carry no timestamp.
    ///
    /// The plane is stamped on arrival, before waiting for the engine lock.
    pub fn on_live_frame(
        &self,
        buffer: &[u8],
        width: u32,
        height: u32,
        row_stride: u32,
    ) -> Result<FrameOutcome, QualityError> {
        self.process(&self.clock.stamp(buffer, width, height, row_stride))
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Latest snapshot, without touching the engine lock.
    pub fn current_metrics(&self) -> Metrics {
        self.reader.current()
    }

    pub fn subscribe(&self) -> MetricsReader {
        self.reader.clone()
    }

    pub fn counters(&self) -> Result<FrameCounters, QualityError> {
        let engine = self.inner.lock().map_err(|_| QualityError::PoisonedLock)?;
        Ok(engine.counters())
    }
}

impl std::fmt::Debug for SharedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("current", &self.reader.current())
            .field("clock", &self.clock.timestamp())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_concurrent_delivery_is_serialized() {
        let shared = SharedEngine::new(MetricsEngine::default());
        let plane = vec![100u8; 32 * 24];

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                let plane = plane.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        // Spread timestamps so every frame clears the throttle
                        let ts = Duration::from_millis((t * 25 + i) * 1000);
                        shared.on_frame(&plane, 32, 24, 32, ts).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let counters = shared.counters().unwrap();
        assert_eq!(counters.processed + counters.throttled, 100);
        assert!(counters.processed > 0);
        assert!(shared.current_metrics().values().within_ranges());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let shared = SharedEngine::new(MetricsEngine::default());
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the engine lock");
        })
        .join();

        let result = shared.on_frame(&[0u8; 4], 2, 2, 2, Duration::ZERO);
        assert_eq!(result, Err(QualityError::PoisonedLock));
        // Readers are unaffected
        let _ = shared.current_metrics();
    }

    #[test]
    fn test_live_frames_are_stamped_and_throttled() {
        let clock = FrameClock::from_instant(Instant::now());
        let shared = SharedEngine::with_clock(MetricsEngine::default(), clock.clone());
        let plane = vec![90u8; 8 * 8];

        assert!(shared.on_live_frame(&plane, 8, 8, 8).unwrap().is_published());
        let burst: Vec<_> = (0..5)
            .map(|_| shared.on_live_frame(&plane, 8, 8, 8).unwrap())
            .collect();

        let counters = shared.counters().unwrap();
        assert_eq!(counters.processed + counters.throttled, 6);
        // Five back-to-back 8x8 frames arrive well inside 120 ms of the first
        assert!(burst.iter().any(|outcome| !outcome.is_published()));
        assert_eq!(shared.clock().start_instant(), clock.start_instant());
    }

    #[test]
    fn test_live_frames_are_validated() {
        let shared = SharedEngine::new(MetricsEngine::default());
        let result = shared.on_live_frame(&[0u8; 3], 2, 2, 2);
        assert!(matches!(result, Err(QualityError::InvalidFrame(_))));
    }
}

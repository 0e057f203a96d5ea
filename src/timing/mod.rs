//! Frame timestamps and rate limiting
//!
//! A monotonic clock for stamping frames whose capture layer supplies no
//! timestamp, and the throttle that bounds how often the engine does real work.

mod throttle;

pub use throttle::FrameThrottle;

use crate::types::RawFrame;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Stream timebase shared by everything that stamps frames.
///
/// Clones share the same start instant, so frames stamped from several capture
/// callbacks land on one consistent timeline for the throttle.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Arc<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::from_instant(Instant::now())
    }

    pub fn from_instant(start: Instant) -> Self {
        Self {
            start: Arc::new(start),
        }
    }

    /// Time since the stream started.
    #[inline]
    pub fn timestamp(&self) -> Duration {
        self.start.elapsed()
    }

    /// Timestamp of `instant` on this timebase; instants before the start map to zero.
    #[inline]
    pub fn timestamp_at(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(*self.start)
    }

    /// Wrap a just-delivered plane in a frame stamped with the current time.
    pub fn stamp<'a>(&self, data: &'a [u8], width: u32, height: u32, row_stride: u32) -> RawFrame<'a> {
        RawFrame::new(data, width, height, row_stride, self.timestamp())
    }

    pub fn start_instant(&self) -> Instant {
        *self.start
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

use std::time::Duration;

/// Drops frames that arrive too soon after the last processed one.
///
/// Keyed on a single timestamp, no queueing. Callers record a frame with
/// [`FrameThrottle::mark_processed`] only once it was actually processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_processed: Option<Duration>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_processed: None,
        }
    }

    /// Whether a frame stamped `timestamp` should be processed.
    ///
    /// The gap is measured in either direction: a small backward step (jitter,
    /// reordering) is dropped like any close frame, while a stream restart
    /// jumps back by more than the interval and is admitted.
    pub fn admits(&self, timestamp: Duration) -> bool {
        match self.last_processed {
            None => true,
            Some(last) => abs_diff(timestamp, last) >= self.min_interval,
        }
    }

    pub fn mark_processed(&mut self, timestamp: Duration) {
        self.last_processed = Some(timestamp);
    }

    pub fn last_processed(&self) -> Option<Duration> {
        self.last_processed
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

fn abs_diff(a: Duration, b: Duration) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

//! framegauge: real-time frame quality metrics for luma camera streams
//!
//! Feeds single-channel camera frames through a small measurement pipeline and
//! publishes a smoothed, human-readable quality snapshot used to decide when a
//! frame is worth capturing.
//!
//! # Metrics
//! - Brightness and sharpness from intensity statistics
//! - Rotation angle and vertical tilt from Sobel gradients
//! - Frontal-ness combining both orientation proxies
//! - Shake from frame-to-frame differences
//! - Distance, a heuristic inverse of sharpness (not a depth measurement)
//!
//! All of them are perceptual proxies, not calibrated measurements.
//!
//! # Usage
//! ```rust,no_run
//! use framegauge::{EngineConfig, MetricsEngine};
//! use std::time::Duration;
//!
//! let mut engine = MetricsEngine::new(&EngineConfig::default()).unwrap();
//! let reader = engine.subscribe();
//!
//! // From the camera's frame callback:
//! let plane = vec![128u8; 640 * 480];
//! engine.on_frame(&plane, 640, 480, 640, Duration::from_millis(0)).unwrap();
//!
//! // From the display side:
//! let metrics = reader.current();
//! println!("ready: {}", metrics.is_capture_ready());
//! ```
pub mod analysis;
pub mod config;
pub mod engine;
pub mod errors;
pub mod invariants;
pub mod quality;
pub mod testing;
pub mod timing;
pub mod types;

// Re-exports for convenience
pub use config::{EngineConfig, FallbackMode};
pub use engine::{MetricsEngine, MetricsReader, SharedEngine, StatsMode};
pub use errors::{FrameDefect, QualityError};
pub use types::{DenseLuma, EngineState, FrameOutcome, MetricFlags, MetricValues, Metrics, RawFrame};

/// Initialize logging for the engine
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "framegauge=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

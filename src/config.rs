//! Configuration management for framegauge
//!
//! Provides loading, saving and validation of the engine's tunables: smoothing
//! factors, pass/fail thresholds, the frame throttle and the fallback strategy.

use crate::errors::QualityError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub smoothing: SmoothingConfig,
    pub thresholds: ThresholdConfig,
    pub throttle: ThrottleConfig,
    pub fallback: FallbackConfig,
}

/// Exponential moving average factors, one per metric (0 < alpha <= 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub brightness_alpha: f64,
    pub sharpness_alpha: f64,
    pub angle_alpha: f64,
    pub tilt_alpha: f64,
    pub frontal_alpha: f64,
    pub distance_alpha: f64,
    pub shake_alpha: f64,
}

/// Pass/fail thresholds applied to smoothed metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Minimum sharpness percent
    pub min_sharpness: f64,
    /// Maximum absolute dominant angle (degrees)
    pub max_abs_angle: f64,
    /// Maximum absolute vertical tilt (degrees)
    pub max_abs_tilt: f64,
    /// Minimum frontal percent
    pub min_frontal: f64,
    /// Acceptable brightness percent [low, high]
    pub brightness_range: [f64; 2],
    /// Maximum shake (0-5 scale)
    pub max_shake: f64,
    /// Acceptable estimated distance [near, far]
    pub distance_range: [f64; 2],
}

/// Frame rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Frames arriving sooner than this after the last processed frame are dropped
    pub min_interval_ms: u64,
}

/// What to do when no statistics accelerator is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Measure every frame with the built-in algorithms
    #[default]
    Pure,
    /// Demo behaviour: perturb the previous snapshot instead of measuring
    DemoJitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FallbackConfig {
    pub mode: FallbackMode,
    /// Seed for the jitter generator; random when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_seed: Option<u64>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            brightness_alpha: 0.25,
            sharpness_alpha: 0.25,
            angle_alpha: 0.20,
            tilt_alpha: 0.20,
            frontal_alpha: 0.20,
            distance_alpha: 0.20,
            shake_alpha: 0.25,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_sharpness: 60.0,
            max_abs_angle: 5.0,
            max_abs_tilt: 5.0,
            min_frontal: 80.0,
            brightness_range: [30.0, 85.0],
            max_shake: 1.5,
            distance_range: [0.5, 2.0],
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { min_interval_ms: 120 }
    }
}

impl ThrottleConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl SmoothingConfig {
    fn alphas(&self) -> [(&'static str, f64); 7] {
        [
            ("brightness_alpha", self.brightness_alpha),
            ("sharpness_alpha", self.sharpness_alpha),
            ("angle_alpha", self.angle_alpha),
            ("tilt_alpha", self.tilt_alpha),
            ("frontal_alpha", self.frontal_alpha),
            ("distance_alpha", self.distance_alpha),
            ("shake_alpha", self.shake_alpha),
        ]
    }
}

impl EngineConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, QualityError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| QualityError::config(format!("Failed to read config file: {}", e)))?;

        let config: EngineConfig = toml::from_str(&contents)
            .map_err(|e| QualityError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QualityError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                QualityError::config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| QualityError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| QualityError::config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("framegauge.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), QualityError> {
        for (name, alpha) in self.smoothing.alphas() {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(QualityError::config(format!(
                    "{} must be in (0, 1], got {}",
                    name, alpha
                )));
            }
        }

        let t = &self.thresholds;
        if t.max_abs_angle < 0.0 || t.max_abs_tilt < 0.0 || t.max_shake < 0.0 {
            return Err(QualityError::config("Angle, tilt and shake limits must be non-negative"));
        }
        if t.brightness_range[0] > t.brightness_range[1] {
            return Err(QualityError::config("Brightness range must be ordered [low, high]"));
        }
        if t.distance_range[0] > t.distance_range[1] {
            return Err(QualityError::config("Distance range must be ordered [near, far]"));
        }

        if self.throttle.min_interval_ms > 10_000 {
            return Err(QualityError::config("Throttle interval must be at most 10000 ms"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.smoothing.brightness_alpha, 0.25);
        assert_eq!(config.smoothing.angle_alpha, 0.20);
        assert_eq!(config.thresholds.min_sharpness, 60.0);
        assert_eq!(config.thresholds.distance_range, [0.5, 2.0]);
        assert_eq!(config.throttle.min_interval(), Duration::from_millis(120));
        assert_eq!(config.fallback.mode, FallbackMode::Pure);
    }

    #[test]
    fn test_config_validation() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());

        let mut bad_alpha = config.clone();
        bad_alpha.smoothing.tilt_alpha = 0.0;
        assert!(bad_alpha.validate().is_err());

        let mut bad_range = EngineConfig::default();
        bad_range.thresholds.brightness_range = [90.0, 10.0];
        assert!(bad_range.validate().is_err());
    }

    #[test]
    fn test_config_toml_format() {
        let config = EngineConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[smoothing]"));
        assert!(toml_string.contains("[thresholds]"));
        assert!(toml_string.contains("[throttle]"));
        assert!(toml_string.contains("[fallback]"));
        assert!(toml_string.contains("mode = \"pure\""));
    }

    #[test]
    fn test_partial_fallback_section_parses() {
        let text = r#"
            [smoothing]
            brightness_alpha = 0.5
            sharpness_alpha = 0.5
            angle_alpha = 0.5
            tilt_alpha = 0.5
            frontal_alpha = 0.5
            distance_alpha = 0.5
            shake_alpha = 0.5

            [thresholds]
            min_sharpness = 50.0
            max_abs_angle = 10.0
            max_abs_tilt = 10.0
            min_frontal = 70.0
            brightness_range = [20.0, 90.0]
            max_shake = 2.0
            distance_range = [0.3, 2.5]

            [throttle]
            min_interval_ms = 0

            [fallback]
            mode = "demo_jitter"
            jitter_seed = 7
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.fallback.mode, FallbackMode::DemoJitter);
        assert_eq!(config.fallback.jitter_seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = EngineConfig::load_from_file("nonexistent_framegauge.toml");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), EngineConfig::default());
    }
}

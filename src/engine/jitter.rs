//! Demo fallback: synthetic metric drift.
//!
//! Only selected when no statistics accelerator is installed and the
//! configuration explicitly asks for `demo_jitter`. It never measures the frame;
//! it nudges the previous snapshot by bounded uniform noise.

use crate::types::MetricValues;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Maximum per-frame perturbation of each metric.
pub const JITTER_AMPLITUDE: MetricValues = MetricValues {
    sharpness: 2.0,
    angle: 0.5,
    tilt_vertical: 0.5,
    frontal: 1.5,
    brightness: 1.5,
    shake: 0.1,
    distance: 0.05,
};

#[derive(Debug, Clone)]
pub struct JitterSynth {
    rng: StdRng,
    amplitude: MetricValues,
}

impl JitterSynth {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            amplitude: JITTER_AMPLITUDE,
        }
    }

    pub fn perturb(&mut self, previous: &MetricValues) -> MetricValues {
        let a = self.amplitude;
        MetricValues {
            sharpness: previous.sharpness + self.noise(a.sharpness),
            angle: previous.angle + self.noise(a.angle),
            tilt_vertical: previous.tilt_vertical + self.noise(a.tilt_vertical),
            frontal: previous.frontal + self.noise(a.frontal),
            brightness: previous.brightness + self.noise(a.brightness),
            shake: previous.shake + self.noise(a.shake),
            distance: previous.distance + self.noise(a.distance),
        }
        .clamped()
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.gen_range(-amplitude..=amplitude)
    }
}

//! Orientation proxies derived from the gradient field.
//!
//! Neither number is a geometric measurement. The angle is the principal
//! orientation of the dominant edge structure (structure tensor), which tracks
//! horizontal framing skew. The tilt compares edge energy in the top and bottom
//! halves of the frame.

use super::gradient::GradientField;
use super::SAMPLE_STRIDE;

/// Degrees of tilt reported for a fully one-sided edge distribution.
pub const TILT_SCALE_DEG: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Dominant edge angle in degrees, in (-90, 90].
    pub angle_deg: f64,
    /// Top/bottom imbalance in degrees, in [-30, 30].
    pub tilt_deg: f64,
}

impl Orientation {
    pub fn estimate(field: &GradientField) -> Self {
        let mut sxx = 0.0f64;
        let mut syy = 0.0f64;
        let mut sxy = 0.0f64;
        let mut top = 0.0f64;
        let mut bottom = 0.0f64;

        let half = field.height / 2;
        let width = field.width.max(1);

        for i in (0..field.len()).step_by(SAMPLE_STRIDE) {
            let gx = field.gx[i] as f64;
            let gy = field.gy[i] as f64;

            sxx += gx * gx;
            syy += gy * gy;
            sxy += gx * gy;

            let energy = gx.abs() + gy.abs();
            if i / width < half {
                top += energy;
            } else {
                bottom += energy;
            }
        }

        Self {
            angle_deg: dominant_angle(sxx, syy, sxy),
            tilt_deg: vertical_tilt(top, bottom),
        }
    }
}

fn dominant_angle(sxx: f64, syy: f64, sxy: f64) -> f64 {
    if sxx + syy == 0.0 {
        return 0.0;
    }
    (0.5 * (2.0 * sxy).atan2(sxx - syy)).to_degrees()
}

fn vertical_tilt(top: f64, bottom: f64) -> f64 {
    let total = bottom + top;
    if total == 0.0 {
        return 0.0;
    }
    (bottom - top) / total * TILT_SCALE_DEG
}

/// "Facing the camera" percentage from the two orientation proxies.
///
/// Takes raw estimates; the combined ratio is clamped, not the inputs.
pub fn frontal_score(angle_deg: f64, tilt_deg: f64) -> f64 {
    let normalized = ((angle_deg.abs() / 45.0 + tilt_deg.abs() / 30.0) / 2.0).clamp(0.0, 1.0);
    (1.0 - normalized) * 100.0
}

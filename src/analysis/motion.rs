//! Frame-to-frame intensity difference, a cheap proxy for device shake.

use super::SAMPLE_STRIDE;

/// Mean absolute difference over every 4th pixel.
///
/// Returns 0 when there is no previous frame or its length differs from the
/// current one (cold start, resolution change).
pub fn frame_difference(current: &[u8], previous: Option<&[u8]>) -> f64 {
    let previous = match previous {
        Some(previous) if previous.len() == current.len() => previous,
        _ => return 0.0,
    };

    let mut total = 0u64;
    let mut samples = 0u64;
    for (&a, &b) in current
        .iter()
        .step_by(SAMPLE_STRIDE)
        .zip(previous.iter().step_by(SAMPLE_STRIDE))
    {
        total += a.abs_diff(b) as u64;
        samples += 1;
    }

    if samples == 0 {
        return 0.0;
    }
    total as f64 / samples as f64
}

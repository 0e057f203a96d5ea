//! Synthetic luma planes
//!
//! Every generator returns a dense, row-major `width * height` buffer.
//! [`with_row_padding`] turns one into a padded capture plane.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub fn uniform_plane(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; width as usize * height as usize]
}

/// Alternating `low`/`high` squares of `cell` pixels.
pub fn checkerboard(width: u32, height: u32, cell: u32, low: u8, high: u8) -> Vec<u8> {
    let cell = cell.max(1);
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x / cell) + (y / cell)) % 2 == 0))
        .map(|light| if light { high } else { low })
        .collect()
}

/// Vertical bars of `period / 2` pixels: edges run top to bottom.
pub fn vertical_stripes(width: u32, height: u32, period: u32, low: u8, high: u8) -> Vec<u8> {
    let half = (period / 2).max(1);
    (0..height)
        .flat_map(|_| (0..width).map(move |x| if (x / half) % 2 == 0 { low } else { high }))
        .collect()
}

/// Horizontal bars of `period / 2` pixels: edges run left to right.
pub fn horizontal_bands(width: u32, height: u32, period: u32, low: u8, high: u8) -> Vec<u8> {
    let half = (period / 2).max(1);
    (0..height)
        .flat_map(|y| (0..width).map(move |_| if (y / half) % 2 == 0 { low } else { high }))
        .collect()
}

/// Uniform random plane, reproducible from `seed`.
pub fn noise_plane(width: u32, height: u32, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width as usize * height as usize).map(|_| rng.gen()).collect()
}

/// Shift a plane right by `dx` and down by `dy`, filling with `fill`.
pub fn shifted(plane: &[u8], width: u32, height: u32, dx: u32, dy: u32, fill: u8) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let (dx, dy) = (dx as usize, dy as usize);
    let mut out = vec![fill; w * h];
    for y in dy..h {
        for x in dx..w {
            out[y * w + x] = plane[(y - dy) * w + (x - dx)];
        }
    }
    out
}

/// Re-lay a dense plane with `row_stride` bytes per row, padding with `pad`.
pub fn with_row_padding(plane: &[u8], width: u32, height: u32, row_stride: u32, pad: u8) -> Vec<u8> {
    let (w, stride) = (width as usize, row_stride as usize);
    assert!(stride >= w, "row stride must cover the width");
    let mut out = vec![pad; stride * height as usize];
    for (row, src) in out.chunks_mut(stride).zip(plane.chunks(w)) {
        row[..w].copy_from_slice(src);
    }
    out
}

/// Timestamps for a stream delivered at a fixed cadence.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticStream {
    pub interval: Duration,
    next: Duration,
}

impl SyntheticStream {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Duration::ZERO,
        }
    }

    /// ~30 fps capture cadence.
    pub fn camera_rate() -> Self {
        Self::new(Duration::from_micros(33_333))
    }
}

impl Iterator for SyntheticStream {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next += self.interval;
        Some(current)
    }
}

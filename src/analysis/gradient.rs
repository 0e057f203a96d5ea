//! Sobel gradients over a dense luma plane.
//!
//!   Gx = [-1 0 1]      Gy = [-1 -2 -1]
//!        [-2 0 2]           [ 0  0  0]
//!        [-1 0 1]           [ 1  2  1]
//!
//! Out-of-bounds neighbours replicate the nearest edge pixel, so a flat plane
//! produces zero gradients everywhere including the border.

use crate::types::DenseLuma;

/// Horizontal and vertical gradients, one value per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    pub gx: Vec<f32>,
    pub gy: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl GradientField {
    pub fn compute(luma: &DenseLuma<'_>) -> Self {
        Self::from_pixels(luma.pixels(), luma.width() as usize, luma.height() as usize)
    }

    pub fn from_pixels(pixels: &[u8], width: usize, height: usize) -> Self {
        let len = width * height;
        debug_assert!(pixels.len() >= len);

        let mut gx = vec![0.0f32; len];
        let mut gy = vec![0.0f32; len];

        if len == 0 {
            return Self { gx, gy, width, height };
        }

        let at = |x: usize, y: usize| pixels[y * width + x] as f32;

        for y in 0..height {
            let up = y.saturating_sub(1);
            let down = (y + 1).min(height - 1);
            for x in 0..width {
                let left = x.saturating_sub(1);
                let right = (x + 1).min(width - 1);

                let tl = at(left, up);
                let tc = at(x, up);
                let tr = at(right, up);
                let ml = at(left, y);
                let mr = at(right, y);
                let bl = at(left, down);
                let bc = at(x, down);
                let br = at(right, down);

                let idx = y * width + x;
                gx[idx] = (tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl);
                gy[idx] = (bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr);
            }
        }

        Self { gx, gy, width, height }
    }

    pub fn len(&self) -> usize {
        self.gx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gx.is_empty()
    }
}

//! Testing utilities for framegauge
//!
//! Synthetic luma planes with known statistics, for tests and benchmarks that
//! must run without a camera.

pub mod synthetic_data;

pub use synthetic_data::{
    checkerboard, horizontal_bands, noise_plane, shifted, uniform_plane, vertical_stripes,
    with_row_padding, SyntheticStream,
};

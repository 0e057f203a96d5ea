//! Luma plane compaction.
//!
//! Camera planes frequently carry padding at the end of each row so that rows
//! start on aligned addresses. Everything downstream assumes a dense plane.
use crate::errors::FrameDefect;
use crate::types::{DenseLuma, RawFrame};

/// Strip row padding from a captured plane.
///
/// Returns the capture buffer itself when it has no padding.
pub fn extract<'a>(frame: &RawFrame<'a>) -> Result<DenseLuma<'a>, FrameDefect> {
    frame.validate()?;

    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.row_stride as usize;

    if stride == width {
        return Ok(DenseLuma::borrowed(
            &frame.data[..width * height],
            frame.width,
            frame.height,
        ));
    }

    let mut dense = Vec::with_capacity(width * height);
    for row in frame.data.chunks(stride).take(height) {
        dense.extend_from_slice(&row[..width]);
    }

    Ok(DenseLuma::owned(dense, frame.width, frame.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dense_frame_is_not_copied() {
        let buf: Vec<u8> = (0..12).collect();
        let frame = RawFrame::dense(&buf, 4, 3, Duration::ZERO);
        let luma = extract(&frame).unwrap();
        assert!(luma.is_borrowed());
        assert_eq!(luma.pixels(), buf.as_slice());
    }

    #[test]
    fn test_padding_is_stripped() {
        // 3x2 image with two garbage bytes per row
        let buf = [1, 2, 3, 99, 99, 4, 5, 6, 99, 99];
        let frame = RawFrame::new(&buf, 3, 2, 5, Duration::ZERO);
        let luma = extract(&frame).unwrap();
        assert!(!luma.is_borrowed());
        assert_eq!(luma.pixels(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!((luma.width(), luma.height()), (3, 2));
    }

    #[test]
    fn test_trailing_bytes_beyond_plane_are_ignored() {
        let buf = [9u8; 20];
        let frame = RawFrame::dense(&buf, 4, 4, Duration::ZERO);
        let luma = extract(&frame).unwrap();
        assert_eq!(luma.len(), 16);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let buf = [0u8; 9];
        let frame = RawFrame::new(&buf, 3, 2, 5, Duration::ZERO);
        assert_eq!(
            extract(&frame),
            Err(FrameDefect::BufferTooShort { len: 9, required: 10 })
        );
    }
}

use thiserror::Error;

/// Geometry problems that make a captured plane unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameDefect {
    #[error("width must be positive")]
    ZeroWidth,
    #[error("height must be positive")]
    ZeroHeight,
    #[error("row stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: u32, width: u32 },
    #[error("buffer holds {len} bytes, need at least {required}")]
    BufferTooShort { len: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityError {
    /// The frame is discarded; the previous snapshot stays current.
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameDefect),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Engine lock poisoned by previous panic")]
    PoisonedLock,
}

impl QualityError {
    pub fn config(message: impl Into<String>) -> Self {
        QualityError::Config(message.into())
    }

    /// Whether the error concerns a single frame only.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, QualityError::InvalidFrame(_))
    }
}

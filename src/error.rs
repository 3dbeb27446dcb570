//! Error types for fill and dispatch operations.

/// Invalid input rejected by the fill kernel.
///
/// These are fatal for the call that produced them and are returned to the
/// caller unchanged, whichever execution path ran the job.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FillError {
    #[error("image has zero area")]
    EmptyImage,
    #[error("{width}x{height} image is too large to address")]
    ImageTooLarge { width: usize, height: usize },
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(usize),
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("constraint mask has {actual} bytes, expected {expected}")]
    MaskLength { expected: usize, actual: usize },
    #[error("seed ({x}, {y}) is outside the {width}x{height} image")]
    SeedOutOfBounds {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },
    #[error("tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f32),
}

/// Failure observed by a caller awaiting a dispatched fill.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Fill(#[from] FillError),
    /// The background channel failed while the request was in flight.
    /// Retrying runs the job inline.
    #[error("background fill channel failed: {0}")]
    ChannelFailed(String),
    #[error("fill dispatcher was torn down before the job completed")]
    TornDown,
    #[error("fill request was abandoned without a reply")]
    Abandoned,
}

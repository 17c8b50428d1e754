//! Error types for soft-canvas2d.

use thiserror::Error;

/// Result type alias using Canvas2dError.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

/// Errors that can occur in Canvas 2D operations.
///
/// Geometry never fails: degenerate paths, arcs and joins are absorbed by the
/// pipeline. Errors are reserved for external input that cannot be interpreted.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Invalid gradient stop offset (must be 0.0-1.0).
    #[error("Invalid gradient stop offset: {0} (must be 0.0-1.0)")]
    InvalidGradientStop(f64),

    /// Invalid argument passed to a Canvas 2D method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Path data could not be parsed.
    #[error("Path error: {0}")]
    PathError(String),
}

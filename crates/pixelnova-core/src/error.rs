//! Error types for configuration-edge operations.
//!
//! The interactive path (pointer and keyboard handling) never errors; invalid input there is
//! dropped silently. Setters and structural edits report problems through [`CanvasError`] and
//! leave the previous state in place.

use thiserror::Error;

use crate::layer::LayerId;

/// Canvas errors.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Raster is {actual_width}x{actual_height}, document is {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Brush size {size} outside 1..={max}")]
    InvalidBrushSize { size: u32, max: u32 },
    #[error("Bucket tolerance {0} outside 1..=10")]
    InvalidTolerance(u8),
    #[error("Invalid scale: {0}")]
    InvalidScale(f64),
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),
    #[error("Cannot remove the last layer")]
    LastLayer,
    #[error("Buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CanvasError {
    fn from(err: std::io::Error) -> Self {
        CanvasError::Config(err.to_string())
    }
}

//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{CanvasError, CanvasResult};
use crate::raster::MAX_DIMENSION;

/// Default undo depth.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Settings a [`Canvas`](crate::Canvas) is created with.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub document_width: u32,
    pub document_height: u32,
    pub initial_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub history_depth: usize,
    pub brush_size: u32,
    pub max_brush_size: u32,
    pub bucket_tolerance: u8,
    pub primary_color: Rgba,
    pub secondary_color: Rgba,
    /// Lifting a selection clears its source pixels (move) instead of leaving them (copy).
    pub clear_original: bool,
    pub grid_enabled: bool,
    /// Smallest scale at which the pixel grid is drawn.
    pub grid_min_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_width: 32,
            document_height: 32,
            initial_scale: 4.0,
            min_scale: 1.0,
            max_scale: 32.0,
            history_depth: DEFAULT_HISTORY_DEPTH,
            brush_size: 1,
            max_brush_size: 64,
            bucket_tolerance: 1,
            primary_color: Rgba::black(),
            secondary_color: Rgba::white(),
            clear_original: true,
            grid_enabled: true,
            grid_min_scale: 4.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading editor config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> CanvasResult<()> {
        validate_dimensions(self.document_width, self.document_height)?;
        let finite_positive = |s: f64| s.is_finite() && s > 0.0;
        if !finite_positive(self.min_scale) || !finite_positive(self.max_scale) {
            return Err(CanvasError::Config(format!(
                "scale range [{}, {}] must be positive",
                self.min_scale, self.max_scale
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(CanvasError::Config(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        if !finite_positive(self.initial_scale) {
            return Err(CanvasError::InvalidScale(self.initial_scale));
        }
        if self.history_depth == 0 {
            return Err(CanvasError::Config("history_depth must be at least 1".into()));
        }
        if self.max_brush_size == 0 {
            return Err(CanvasError::Config("max_brush_size must be at least 1".into()));
        }
        validate_brush_size(self.brush_size, self.max_brush_size)?;
        validate_tolerance(self.bucket_tolerance)?;
        Ok(())
    }
}

pub(crate) fn validate_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

pub(crate) fn validate_brush_size(size: u32, max: u32) -> CanvasResult<()> {
    if size == 0 || size > max {
        return Err(CanvasError::InvalidBrushSize { size, max });
    }
    Ok(())
}

pub(crate) fn validate_tolerance(tolerance: u8) -> CanvasResult<()> {
    if !(1..=10).contains(&tolerance) {
        return Err(CanvasError::InvalidTolerance(tolerance));
    }
    Ok(())
}

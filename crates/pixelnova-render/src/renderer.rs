//! Renderer trait abstraction.

use kurbo::{Affine, Size};
use peniko::Color;
use pixelnova_core::Canvas;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("Invalid device pixel ratio {0}")]
    InvalidScaleFactor(f64),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Color the frame is cleared to.
    pub background_color: Color,
    /// Draw the brush footprint under the pointer.
    pub show_cursor: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(0, 0, 0, 0),
            show_cursor: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Hide the cursor preview, e.g. on touch devices.
    pub fn with_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }

    /// Document-to-device transform: viewport translate and scale, then the pixel ratio.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.canvas.viewport().transform()
    }

    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(RenderError::InvalidViewport { width, height });
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(RenderError::InvalidScaleFactor(self.scale_factor));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
///
/// A backend consumes the display list built by [`crate::DisplayList::build`] and draws it
/// into whatever surface it owns. Rendering never modifies the canvas.
pub trait Renderer {
    /// Draw one frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

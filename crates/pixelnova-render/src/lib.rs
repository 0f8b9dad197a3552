//! PixelNova Render Library
//!
//! Compositor and renderer abstraction for PixelNova.
//! The default implementation is a CPU rasterizer; GPU backends consume the same display list.

pub mod compositor;
mod renderer;
pub mod software;

pub use compositor::{Dash, DisplayList, DrawOp};
pub use renderer::{RenderContext, RenderError, RenderResult, Renderer};
pub use software::SoftwareRenderer;

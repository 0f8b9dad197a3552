//! PixelNova Core Library
//!
//! Platform-agnostic document model, tools and undo history for the PixelNova pixel-art
//! editor. Rendering lives in `pixelnova-render`.

pub mod canvas;
pub mod color;
pub mod config;
pub mod drawing;
pub mod error;
pub mod history;
pub mod input;
pub mod layer;
pub mod raster;
pub mod redraw;
pub mod selection;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, CanvasEvent, HorizontalAnchor, ResizeAnchor, VerticalAnchor};
pub use color::{Paint, Rgba};
pub use config::EditorConfig;
pub use error::{CanvasError, CanvasResult};
pub use history::{HistoryEntry, HistoryStack};
pub use input::{Command, KeyEvent, Modifiers, PointerButton, PointerEvent, ShortcutRegistry};
pub use layer::{Layer, LayerId, LayerStore};
pub use raster::{PixelRect, Raster};
pub use redraw::RedrawScheduler;
pub use selection::{FloatingSelection, SelectionManager, SelectionState};
pub use tools::{Tool, ToolKind};
pub use viewport::Viewport;

// Re-export kurbo for hosts building pointer events.
pub use kurbo;

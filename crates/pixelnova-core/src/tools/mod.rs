//! Drawing tools and the per-stroke dispatch.
//!
//! A [`Tool`] is a closed set of variants. The canvas forwards `on_start`, `on_move` and
//! `on_end` with a fresh [`ToolContext`] each time; tools keep only owned state between calls.

mod brush;
mod fill;
mod shape;

pub use brush::BrushTool;
pub use fill::flood_fill;
pub use shape::{ShapeKind, ShapeTool};

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::color::{Paint, Rgba};
use crate::drawing::PixelPoint;
use crate::input::PointerButton;
use crate::layer::{LayerId, LayerStore};
use crate::raster::Raster;
use crate::selection::SelectionManager;
use crate::viewport::Viewport;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Line,
    Square,
    Circle,
    Bucket,
    Eyedropper,
    Select,
    Pan,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Bucket,
        ToolKind::Eyedropper,
        ToolKind::Select,
        ToolKind::Pan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Square => "Square",
            ToolKind::Circle => "Circle",
            ToolKind::Bucket => "Fill",
            ToolKind::Eyedropper => "Color Picker",
            ToolKind::Select => "Select",
            ToolKind::Pan => "Pan",
        }
    }

    pub fn shortcut(self) -> &'static str {
        match self {
            ToolKind::Pencil => "B",
            ToolKind::Eraser => "E",
            ToolKind::Line => "L",
            ToolKind::Square => "S",
            ToolKind::Circle => "C",
            ToolKind::Bucket => "G",
            ToolKind::Eyedropper => "I",
            ToolKind::Select => "M",
            ToolKind::Pan => "H",
        }
    }

    /// Tools whose footprint follows the brush size (and get a hover cursor preview).
    pub fn uses_brush(self) -> bool {
        matches!(
            self,
            ToolKind::Pencil | ToolKind::Eraser | ToolKind::Line | ToolKind::Square | ToolKind::Circle
        )
    }
}

/// Everything a tool may touch during one callback.
pub struct ToolContext<'a> {
    pub viewport: &'a mut Viewport,
    pub layers: &'a mut LayerStore,
    pub selected_layer_id: LayerId,
    pub primary_color: Rgba,
    pub secondary_color: Rgba,
    pub brush_size: u32,
    pub bucket_tolerance: u8,
    pub selection: &'a mut SelectionManager,
    pub clear_original: bool,
}

impl ToolContext<'_> {
    /// The selected layer's raster, if it exists and is visible.
    pub fn target(&mut self) -> Option<&mut Raster> {
        visible_raster(self.layers, self.selected_layer_id)
    }

    pub fn color_for(&self, button: PointerButton) -> Rgba {
        match button {
            PointerButton::Secondary => self.secondary_color,
            _ => self.primary_color,
        }
    }
}

/// A layer's raster when the layer exists and is visible.
pub(crate) fn visible_raster(layers: &mut LayerStore, id: LayerId) -> Option<&mut Raster> {
    layers
        .get_mut(id)
        .filter(|layer| layer.visible)
        .map(|layer| &mut layer.raster)
}

/// One pointer sample routed to a tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeInput {
    /// Document pixel under the pointer.
    pub pixel: PixelPoint,
    /// Screen position, used by tools that work in screen space.
    pub screen: Point,
    pub button: PointerButton,
}

/// A color reported by the eyedropper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickedColor {
    pub color: Rgba,
    /// Picked with the secondary button.
    pub secondary: bool,
}

/// What a tool callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolOutcome {
    /// Visible state changed; a composite is due.
    pub redraw: bool,
    /// The finished stroke changed layer data; a history entry is due.
    pub committed: bool,
    pub picked: Option<PickedColor>,
}

impl ToolOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw(redraw: bool) -> Self {
        Self {
            redraw,
            ..Self::default()
        }
    }

    pub fn commit(committed: bool) -> Self {
        Self {
            redraw: committed,
            committed,
            picked: None,
        }
    }
}

/// Select tool stroke phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectPhase {
    #[default]
    Idle,
    Marquee,
    Moving,
}

/// A tool with its per-stroke state.
#[derive(Debug, Clone)]
pub enum Tool {
    Pencil(BrushTool),
    Eraser(BrushTool),
    Line(ShapeTool),
    Square(ShapeTool),
    Circle(ShapeTool),
    Bucket { changed: Option<bool> },
    Eyedropper { active: bool },
    Select { phase: SelectPhase },
    Pan { last: Option<Point> },
}

impl Tool {
    pub fn new(kind: ToolKind, filled: bool) -> Self {
        match kind {
            ToolKind::Pencil => Tool::Pencil(BrushTool::new(false)),
            ToolKind::Eraser => Tool::Eraser(BrushTool::new(true)),
            ToolKind::Line => Tool::Line(ShapeTool::new(ShapeKind::Line, false)),
            ToolKind::Square => Tool::Square(ShapeTool::new(ShapeKind::Square, filled)),
            ToolKind::Circle => Tool::Circle(ShapeTool::new(ShapeKind::Circle, filled)),
            ToolKind::Bucket => Tool::Bucket { changed: None },
            ToolKind::Eyedropper => Tool::Eyedropper { active: false },
            ToolKind::Select => Tool::Select {
                phase: SelectPhase::Idle,
            },
            ToolKind::Pan => Tool::Pan { last: None },
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Pencil(_) => ToolKind::Pencil,
            Tool::Eraser(_) => ToolKind::Eraser,
            Tool::Line(_) => ToolKind::Line,
            Tool::Square(_) => ToolKind::Square,
            Tool::Circle(_) => ToolKind::Circle,
            Tool::Bucket { .. } => ToolKind::Bucket,
            Tool::Eyedropper { .. } => ToolKind::Eyedropper,
            Tool::Select { .. } => ToolKind::Select,
            Tool::Pan { .. } => ToolKind::Pan,
        }
    }

    /// Whether a stroke is in progress.
    pub fn is_active(&self) -> bool {
        match self {
            Tool::Pencil(brush) | Tool::Eraser(brush) => brush.is_active(),
            Tool::Line(shape) | Tool::Square(shape) | Tool::Circle(shape) => shape.is_active(),
            Tool::Bucket { changed } => changed.is_some(),
            Tool::Eyedropper { active } => *active,
            Tool::Select { phase } => *phase != SelectPhase::Idle,
            Tool::Pan { last } => last.is_some(),
        }
    }

    /// Change the filled flag of shape tools. Ignored by other tools.
    pub fn set_filled(&mut self, filled: bool) {
        if let Tool::Square(shape) | Tool::Circle(shape) = self {
            shape.filled = filled;
        }
    }

    pub fn on_start(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let (x, y) = input.pixel;
        match self {
            Tool::Pencil(brush) | Tool::Eraser(brush) => brush.start(ctx, input),
            Tool::Line(shape) | Tool::Square(shape) | Tool::Circle(shape) => {
                shape.start(ctx, input)
            }
            Tool::Bucket { changed } => {
                let color = ctx.color_for(input.button);
                let tolerance = ctx.bucket_tolerance;
                let filled = ctx
                    .target()
                    .is_some_and(|raster| flood_fill(raster, x, y, Paint::Color(color), tolerance));
                *changed = Some(filled);
                ToolOutcome::redraw(filled)
            }
            Tool::Eyedropper { active } => {
                *active = true;
                let picked = ctx.layers.sample(x, y).map(|color| PickedColor {
                    color,
                    secondary: input.button == PointerButton::Secondary,
                });
                ToolOutcome {
                    redraw: false,
                    committed: false,
                    picked,
                }
            }
            Tool::Select { phase } => {
                if ctx.selection.begin_move(x, y) {
                    *phase = SelectPhase::Moving;
                } else {
                    ctx.selection.start_selection(x, y);
                    *phase = SelectPhase::Marquee;
                }
                ToolOutcome::redraw(true)
            }
            Tool::Pan { last } => {
                *last = Some(input.screen);
                ToolOutcome::none()
            }
        }
    }

    pub fn on_move(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let (x, y) = input.pixel;
        match self {
            Tool::Pencil(brush) | Tool::Eraser(brush) => brush.update(ctx, input),
            Tool::Line(shape) | Tool::Square(shape) | Tool::Circle(shape) => {
                shape.update(ctx, input)
            }
            Tool::Bucket { .. } | Tool::Eyedropper { .. } => ToolOutcome::none(),
            Tool::Select { phase } => match phase {
                SelectPhase::Marquee => ToolOutcome::redraw(ctx.selection.update_selection(x, y)),
                SelectPhase::Moving => ToolOutcome::redraw(ctx.selection.update_move(x, y)),
                SelectPhase::Idle => ToolOutcome::none(),
            },
            Tool::Pan { last } => {
                let Some(prev) = *last else {
                    return ToolOutcome::none();
                };
                ctx.viewport.pan(input.screen - prev);
                *last = Some(input.screen);
                ToolOutcome::redraw(true)
            }
        }
    }

    pub fn on_end(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        match self {
            Tool::Pencil(brush) | Tool::Eraser(brush) => brush.end(),
            Tool::Line(shape) | Tool::Square(shape) | Tool::Circle(shape) => shape.end(ctx, input),
            Tool::Bucket { changed } => ToolOutcome {
                redraw: false,
                committed: changed.take().unwrap_or(false),
                picked: None,
            },
            Tool::Eyedropper { active } => {
                *active = false;
                ToolOutcome::none()
            }
            Tool::Select { phase } => {
                let clear_original = ctx.clear_original;
                let changed = match std::mem::take(phase) {
                    SelectPhase::Marquee => {
                        let target = visible_raster(ctx.layers, ctx.selected_layer_id);
                        ctx.selection.finish_selection(target.as_deref(), clear_original);
                        false
                    }
                    SelectPhase::Moving => {
                        let target = visible_raster(ctx.layers, ctx.selected_layer_id);
                        ctx.selection.finish_move(target)
                    }
                    SelectPhase::Idle => return ToolOutcome::none(),
                };
                ToolOutcome {
                    redraw: true,
                    committed: changed,
                    picked: None,
                }
            }
            Tool::Pan { last } => {
                *last = None;
                ToolOutcome::none()
            }
        }
    }

    /// End the current stroke without a final pointer position (pointer left the canvas).
    pub fn finish(&mut self, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let input = match self {
            Tool::Line(shape) | Tool::Square(shape) | Tool::Circle(shape) => match shape.last() {
                Some(pixel) => StrokeInput {
                    pixel,
                    screen: Point::ZERO,
                    button: PointerButton::Primary,
                },
                None => return ToolOutcome::none(),
            },
            _ => StrokeInput {
                pixel: (0, 0),
                screen: Point::ZERO,
                button: PointerButton::Primary,
            },
        };
        self.on_end(ctx, input)
    }
}

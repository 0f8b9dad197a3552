//! Frame composition as an ordered display list.
//!
//! [`DisplayList::build`] walks the canvas once and emits the draw operations in paint order.
//! Geometry stays in document coordinates; the list carries the document-to-device transform.
//! Outline and grid strokes are one device pixel wide regardless of zoom.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::{Color, Fill};
use pixelnova_core::{PixelRect, Raster, Rgba, ToolKind};

use crate::renderer::RenderContext;

/// Side of one checkerboard square, in document pixels.
pub const CHECKER_SIZE: f64 = 0.5;
pub const CHECKER_LIGHT: Rgba = Rgba::new(0xE5, 0xE7, 0xEB, 255);
pub const CHECKER_DARK: Rgba = Rgba::new(0xD1, 0xD5, 0xDB, 255);

pub const SELECTED_LAYER_OPACITY: f32 = 1.0;
pub const INACTIVE_LAYER_OPACITY: f32 = 0.5;
/// Opacity of a floating buffer while it is being dragged.
pub const MOVING_SELECTION_OPACITY: f32 = 0.8;

/// Dimming outside the selection, `rgba(0, 0, 0, 0.3)`.
pub const SELECTION_SHADE: Rgba = Rgba::new(0, 0, 0, 77);
pub const GRID_COLOR: Rgba = Rgba::new(128, 128, 128, 128);
/// Selection outline dash pattern in device pixels: 6 on, 4 off.
pub const SELECTION_DASH: (f64, f64) = (6.0, 4.0);

/// Dash pattern along an outline, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
    pub offset: f64,
}

impl Dash {
    pub fn is_on(&self, distance: f64) -> bool {
        let period = self.on + self.off;
        if period <= 0.0 {
            return true;
        }
        (distance + self.offset).rem_euclid(period) < self.on
    }
}

/// One paint operation.
#[derive(Debug, Clone)]
pub enum DrawOp<'a> {
    /// Replace every frame pixel.
    Clear(Color),
    /// Transparency pattern over `bounds`.
    Checkerboard {
        bounds: Rect,
        check: f64,
        light: Color,
        dark: Color,
    },
    /// Raster drawn 1:1 in document pixels with its top-left corner at `origin`.
    Image {
        raster: &'a Raster,
        origin: Point,
        opacity: f32,
    },
    FillPath {
        path: BezPath,
        fill: Fill,
        color: Color,
    },
    FillRect { rect: Rect, color: Color },
    /// Rectangle outline one device pixel wide, drawn just inside the edge.
    Outline {
        rect: Rect,
        color: Color,
        dash: Option<Dash>,
    },
    /// One line per document pixel boundary across `bounds`.
    Grid { bounds: Rect, color: Color },
}

/// Draw operations for one frame, in paint order.
#[derive(Debug, Clone)]
pub struct DisplayList<'a> {
    pub transform: Affine,
    pub ops: Vec<DrawOp<'a>>,
}

impl<'a> DisplayList<'a> {
    pub fn build(ctx: &RenderContext<'a>) -> Self {
        let canvas = ctx.canvas;
        let doc = Rect::new(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
        let mut ops = vec![
            DrawOp::Clear(ctx.background_color),
            DrawOp::Checkerboard {
                bounds: doc,
                check: CHECKER_SIZE,
                light: CHECKER_LIGHT.into(),
                dark: CHECKER_DARK.into(),
            },
        ];

        let selected = canvas.selected_layer_id();
        for layer in canvas.layers().iter().filter(|l| l.visible) {
            let opacity = if layer.id == selected {
                SELECTED_LAYER_OPACITY
            } else {
                INACTIVE_LAYER_OPACITY
            };
            ops.push(DrawOp::Image {
                raster: &layer.raster,
                origin: Point::ZERO,
                opacity,
            });
        }

        let selection = canvas.selection();
        if let Some(floating) = selection.floating() {
            let opacity = if floating.is_moving() {
                MOVING_SELECTION_OPACITY
            } else {
                1.0
            };
            ops.push(DrawOp::Image {
                raster: &floating.buffer,
                origin: Point::new(f64::from(floating.origin.0), f64::from(floating.origin.1)),
                opacity,
            });
        }

        if let Some(bounds) = selection.bounds() {
            push_selection_overlay(&mut ops, doc, bounds);
        }

        if canvas.grid_visible() {
            ops.push(DrawOp::Grid {
                bounds: doc,
                color: GRID_COLOR.into(),
            });
        }

        if ctx.show_cursor {
            if let Some(cursor) = canvas.brush_cursor() {
                let base = if canvas.active_tool() == ToolKind::Eraser {
                    Rgba::white()
                } else {
                    canvas.primary_color()
                };
                let preview = Rgba { a: base.a / 2, ..base };
                ops.push(DrawOp::FillRect {
                    rect: cursor.to_kurbo(),
                    color: preview.into(),
                });
                ops.push(DrawOp::Outline {
                    rect: cursor.to_kurbo(),
                    color: Rgba::white().into(),
                    dash: None,
                });
            }
        }

        Self {
            transform: ctx.transform(),
            ops,
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn has_grid(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Grid { .. }))
    }
}

/// Shade everything but the selection, then a white and a black dash offset against each other.
fn push_selection_overlay(ops: &mut Vec<DrawOp<'_>>, doc: Rect, bounds: PixelRect) {
    let rect = bounds.to_kurbo();
    let mut path = BezPath::new();
    push_rect(&mut path, doc);
    push_rect(&mut path, rect);
    ops.push(DrawOp::FillPath {
        path,
        fill: Fill::EvenOdd,
        color: SELECTION_SHADE.into(),
    });

    let (on, off) = SELECTION_DASH;
    ops.push(DrawOp::Outline {
        rect,
        color: Rgba::white().into(),
        dash: Some(Dash { on, off, offset: 0.0 }),
    });
    ops.push(DrawOp::Outline {
        rect,
        color: Rgba::black().into(),
        dash: Some(Dash { on, off, offset: on }),
    });
}

fn push_rect(path: &mut BezPath, rect: Rect) {
    path.move_to((rect.x0, rect.y0));
    path.line_to((rect.x1, rect.y0));
    path.line_to((rect.x1, rect.y1));
    path.line_to((rect.x0, rect.y1));
    path.close_path();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use pixelnova_core::{Canvas, EditorConfig, PointerButton, PointerEvent};

    fn canvas() -> Canvas {
        Canvas::new(EditorConfig {
            document_width: 4,
            document_height: 4,
            ..EditorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_grid_only_when_zoomed_in() {
        let mut c = canvas();
        c.set_scale(4.0).unwrap();
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        assert!(DisplayList::build(&ctx).has_grid());

        c.set_scale(3.9).unwrap();
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        assert!(!DisplayList::build(&ctx).has_grid());

        c.set_scale(8.0).unwrap();
        c.set_grid_enabled(false);
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        assert!(!DisplayList::build(&ctx).has_grid());
    }

    #[test]
    fn test_layer_opacity_follows_selection() {
        let mut c = canvas();
        let bottom = c.selected_layer_id();
        c.add_layer("Top");
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        let list = DisplayList::build(&ctx);
        let opacities: Vec<f32> = list
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { opacity, .. } => Some(*opacity),
                _ => None,
            })
            .collect();
        assert_eq!(opacities, vec![INACTIVE_LAYER_OPACITY, SELECTED_LAYER_OPACITY]);

        c.set_layer_visible(bottom, false).unwrap();
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        let images = DisplayList::build(&ctx)
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count();
        assert_eq!(images, 1);
    }

    #[test]
    fn test_order_and_selection_overlay() {
        let mut c = canvas();
        c.set_active_tool(ToolKind::Select);
        let a = c.viewport().canvas_to_screen(1.5, 1.5);
        let b = c.viewport().canvas_to_screen(3.5, 3.5);
        c.handle_pointer(PointerEvent::Down {
            position: a,
            button: PointerButton::Primary,
        });
        c.handle_pointer(PointerEvent::Move { position: b });

        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        let list = DisplayList::build(&ctx);
        assert!(matches!(list.ops[0], DrawOp::Clear(_)));
        assert!(matches!(list.ops[1], DrawOp::Checkerboard { .. }));
        let shade = list.ops.iter().position(|op| {
            matches!(
                op,
                DrawOp::FillPath {
                    fill: Fill::EvenOdd,
                    ..
                }
            )
        });
        let grid = list.ops.iter().position(|op| matches!(op, DrawOp::Grid { .. }));
        assert!(shade.is_some());
        assert!(shade < grid);
        let dashed = list
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Outline { dash: Some(_), .. }))
            .count();
        assert_eq!(dashed, 2);
    }

    #[test]
    fn test_cursor_preview_only_when_idle() {
        let mut c = canvas();
        let p = c.viewport().canvas_to_screen(2.5, 2.5);
        c.handle_pointer(PointerEvent::Move { position: p });
        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0));
        assert!(
            DisplayList::build(&ctx)
                .ops
                .iter()
                .any(|op| matches!(op, DrawOp::FillRect { .. }))
        );

        let ctx = RenderContext::new(&c, Size::new(16.0, 16.0)).with_cursor(false);
        assert!(
            !DisplayList::build(&ctx)
                .ops
                .iter()
                .any(|op| matches!(op, DrawOp::FillRect { .. }))
        );
    }

    #[test]
    fn test_dash_pattern() {
        let dash = Dash {
            on: 6.0,
            off: 4.0,
            offset: 0.0,
        };
        assert!(dash.is_on(0.0));
        assert!(dash.is_on(5.0));
        assert!(!dash.is_on(6.0));
        assert!(dash.is_on(10.0));
        let shifted = Dash { offset: 6.0, ..dash };
        assert!(!shifted.is_on(0.0));
        assert!(shifted.is_on(4.0));
    }
}

//! Line, square and circle: preview tools that redraw over a saved copy of the layer.

use super::{StrokeInput, ToolContext, ToolOutcome};
use crate::color::Paint;
use crate::drawing::{self, PixelPoint};
use crate::raster::{PixelRect, Raster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Square,
    Circle,
}

#[derive(Debug, Clone)]
struct ShapeStroke {
    anchor: PixelPoint,
    last: PixelPoint,
    paint: Paint,
    /// Layer content before the stroke started.
    baseline: Raster,
}

#[derive(Debug, Clone)]
pub struct ShapeTool {
    pub kind: ShapeKind,
    pub filled: bool,
    stroke: Option<ShapeStroke>,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind, filled: bool) -> Self {
        Self {
            kind,
            filled,
            stroke: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    pub(super) fn last(&self) -> Option<PixelPoint> {
        self.stroke.as_ref().map(|s| s.last)
    }

    pub(super) fn start(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let paint = Paint::Color(ctx.color_for(input.button));
        let size = ctx.brush_size;
        let Some(raster) = ctx.target() else {
            return ToolOutcome::none();
        };
        let baseline = raster.clone();
        draw_shape(raster, self.kind, self.filled, input.pixel, input.pixel, size, paint);
        self.stroke = Some(ShapeStroke {
            anchor: input.pixel,
            last: input.pixel,
            paint,
            baseline,
        });
        ToolOutcome::redraw(true)
    }

    pub(super) fn update(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let Some(stroke) = self.stroke.as_mut() else {
            return ToolOutcome::none();
        };
        if stroke.last == input.pixel {
            return ToolOutcome::none();
        }
        stroke.last = input.pixel;
        let size = ctx.brush_size;
        let Some(raster) = ctx.target() else {
            return ToolOutcome::none();
        };
        raster.copy_from(&stroke.baseline);
        draw_shape(raster, self.kind, self.filled, stroke.anchor, input.pixel, size, stroke.paint);
        ToolOutcome::redraw(true)
    }

    pub(super) fn end(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let Some(stroke) = self.stroke.take() else {
            return ToolOutcome::none();
        };
        let size = ctx.brush_size;
        let Some(raster) = ctx.target() else {
            return ToolOutcome::none();
        };
        raster.copy_from(&stroke.baseline);
        draw_shape(raster, self.kind, self.filled, stroke.anchor, input.pixel, size, stroke.paint);
        ToolOutcome::commit(*raster != stroke.baseline)
    }
}

/// Rasterize one shape spanning `from` to `to` into `raster`.
pub fn draw_shape(
    raster: &mut Raster,
    kind: ShapeKind,
    filled: bool,
    from: PixelPoint,
    to: PixelPoint,
    brush_size: u32,
    paint: Paint,
) -> bool {
    let mut changed = false;
    match kind {
        ShapeKind::Line => {
            for (x, y) in drawing::line(from, to) {
                changed |= raster.stamp(x, y, brush_size, paint);
            }
        }
        ShapeKind::Square if filled => {
            let rect = PixelRect::from_corners(from, to);
            let rect = PixelRect { x1: rect.x1 + 1, y1: rect.y1 + 1, ..rect };
            changed = raster.fill_rect(rect, paint);
        }
        ShapeKind::Square => {
            for (x, y) in drawing::rect_outline(from, to) {
                changed |= raster.stamp(x, y, brush_size, paint);
            }
        }
        ShapeKind::Circle => {
            let (center, radius) = drawing::circle_from_drag(from, to);
            let points = if filled {
                // One pixel of margin so the cross expansion still reaches the edges.
                let clip = PixelRect::new(
                    -1,
                    -1,
                    raster.width() as i32 + 2,
                    raster.height() as i32 + 2,
                );
                drawing::filled_circle_clipped(center, radius, clip)
            } else {
                drawing::circle_outline(center, radius)
            };
            for (x, y) in drawing::expand_cross(&points, brush_size > 1) {
                changed |= raster.paint(x, y, paint);
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    const RED: Paint = Paint::Color(Rgba::new(255, 0, 0, 255));

    fn count(raster: &Raster) -> usize {
        raster.data().chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    #[test]
    fn test_square_outline_and_filled() {
        let mut r = Raster::new(8, 8);
        draw_shape(&mut r, ShapeKind::Square, false, (1, 1), (4, 3), 1, RED);
        assert_eq!(count(&r), 10);
        assert_eq!(r.pixel(2, 2), Some(Rgba::transparent()));

        let mut r = Raster::new(8, 8);
        draw_shape(&mut r, ShapeKind::Square, true, (4, 3), (1, 1), 1, RED);
        assert_eq!(count(&r), 12);
        assert!(r.pixel(2, 2).is_some_and(|c| c.a == 255));
    }

    #[test]
    fn test_line_with_brush() {
        let mut r = Raster::new(8, 8);
        draw_shape(&mut r, ShapeKind::Line, false, (2, 2), (4, 2), 2, RED);
        // x from 1..=4, y from 1..=2
        assert_eq!(count(&r), 8);
    }

    #[test]
    fn test_circle_expands_with_brush() {
        let mut thin = Raster::new(16, 16);
        draw_shape(&mut thin, ShapeKind::Circle, false, (2, 2), (10, 10), 1, RED);
        let mut thick = Raster::new(16, 16);
        draw_shape(&mut thick, ShapeKind::Circle, false, (2, 2), (10, 10), 3, RED);
        assert!(count(&thick) > count(&thin));
        assert_eq!(thin.pixel(6, 6), Some(Rgba::transparent()));

        let mut disc = Raster::new(16, 16);
        draw_shape(&mut disc, ShapeKind::Circle, true, (2, 2), (10, 10), 1, RED);
        assert!(disc.pixel(6, 6).is_some_and(|c| c.a == 255));
    }
}

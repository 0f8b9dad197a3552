//! Pencil and eraser.

use super::{StrokeInput, ToolContext, ToolOutcome};
use crate::color::Paint;
use crate::drawing::{self, PixelPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stroke {
    last: PixelPoint,
    paint: Paint,
    changed: bool,
}

/// Freehand square-brush tool. The eraser variant stamps transparency.
#[derive(Debug, Clone, Default)]
pub struct BrushTool {
    erase: bool,
    stroke: Option<Stroke>,
}

impl BrushTool {
    pub fn new(erase: bool) -> Self {
        Self {
            erase,
            stroke: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    pub(super) fn start(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let paint = if self.erase {
            Paint::Transparent
        } else {
            Paint::Color(ctx.color_for(input.button))
        };
        let size = ctx.brush_size;
        let (x, y) = input.pixel;
        let changed = ctx
            .target()
            .is_some_and(|raster| raster.stamp(x, y, size, paint));
        self.stroke = Some(Stroke {
            last: input.pixel,
            paint,
            changed,
        });
        ToolOutcome::redraw(changed)
    }

    /// Stamp every point of the segment from the previous sample, so fast moves leave no gaps.
    pub(super) fn update(&mut self, ctx: &mut ToolContext<'_>, input: StrokeInput) -> ToolOutcome {
        let Some(stroke) = self.stroke.as_mut() else {
            return ToolOutcome::none();
        };
        if stroke.last == input.pixel {
            return ToolOutcome::none();
        }
        let size = ctx.brush_size;
        let mut changed = false;
        if let Some(raster) = ctx.target() {
            for (x, y) in drawing::line(stroke.last, input.pixel) {
                changed |= raster.stamp(x, y, size, stroke.paint);
            }
        }
        stroke.last = input.pixel;
        stroke.changed |= changed;
        ToolOutcome::redraw(changed)
    }

    pub(super) fn end(&mut self) -> ToolOutcome {
        match self.stroke.take() {
            Some(stroke) => ToolOutcome::commit(stroke.changed),
            None => ToolOutcome::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::input::PointerButton;
    use crate::layer::LayerStore;
    use crate::selection::SelectionManager;
    use crate::viewport::Viewport;
    use kurbo::Point;

    fn at(x: i32, y: i32, button: PointerButton) -> StrokeInput {
        StrokeInput {
            pixel: (x, y),
            screen: Point::ZERO,
            button,
        }
    }

    fn run(erase: bool, size: u32, points: &[(i32, i32)], layers: &mut LayerStore) -> ToolOutcome {
        let id = layers.ids()[0];
        let mut viewport = Viewport::default();
        let mut selection = SelectionManager::new();
        let mut ctx = ToolContext {
            viewport: &mut viewport,
            layers,
            selected_layer_id: id,
            primary_color: Rgba::new(255, 0, 0, 255),
            secondary_color: Rgba::new(0, 255, 0, 255),
            brush_size: size,
            bucket_tolerance: 1,
            selection: &mut selection,
            clear_original: true,
        };
        let mut tool = BrushTool::new(erase);
        let (first, rest) = points.split_first().unwrap();
        tool.start(&mut ctx, at(first.0, first.1, PointerButton::Primary));
        for p in rest {
            tool.update(&mut ctx, at(p.0, p.1, PointerButton::Primary));
        }
        tool.end()
    }

    fn painted(layers: &LayerStore) -> Vec<(i32, i32)> {
        let raster = &layers.layers()[0].raster;
        let mut out = Vec::new();
        for y in 0..raster.height() as i32 {
            for x in 0..raster.width() as i32 {
                if raster.pixel(x, y).is_some_and(|c| c.a > 0) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_single_stamp() {
        let mut layers = LayerStore::new(8, 8);
        let out = run(false, 1, &[(5, 5)], &mut layers);
        assert!(out.committed);
        assert_eq!(painted(&layers), vec![(5, 5)]);
    }

    #[test]
    fn test_fast_move_interpolates() {
        let mut layers = LayerStore::new(8, 8);
        run(false, 1, &[(0, 2), (6, 2)], &mut layers);
        assert_eq!(painted(&layers).len(), 7);
    }

    #[test]
    fn test_size_three_stamp() {
        let mut layers = LayerStore::new(8, 8);
        run(false, 3, &[(1, 1)], &mut layers);
        assert_eq!(painted(&layers).len(), 9);
        assert!(painted(&layers).contains(&(0, 0)));
        assert!(painted(&layers).contains(&(2, 2)));
    }

    #[test]
    fn test_eraser_clears() {
        let mut layers = LayerStore::new(4, 4);
        let id = layers.ids()[0];
        layers
            .replace_raster(id, crate::raster::Raster::filled(4, 4, Rgba::white()))
            .unwrap();
        let out = run(true, 2, &[(2, 2)], &mut layers);
        assert!(out.committed);
        assert_eq!(painted(&layers).len(), 12);
    }

    #[test]
    fn test_no_change_no_commit() {
        let mut layers = LayerStore::new(4, 4);
        let out = run(true, 1, &[(1, 1), (2, 2)], &mut layers);
        assert!(!out.committed);
    }
}

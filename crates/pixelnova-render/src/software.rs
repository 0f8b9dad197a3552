//! CPU rasterizer for the display list.
//!
//! Every device pixel is sampled at its center and mapped back into document space, so
//! document pixels stay hard-edged at any zoom.

use kurbo::{Affine, Point, Rect, Shape};
use peniko::{Color, Fill};
use pixelnova_core::{Raster, Rgba};

use crate::compositor::{Dash, DisplayList, DrawOp};
use crate::renderer::{RenderContext, RenderResult, Renderer};

/// Renders frames into an RGBA8 [`Raster`] the host can upload or encode.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    frame: Raster,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self {
            frame: Raster::new(0, 0),
        }
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &Raster {
        &self.frame
    }

    pub fn into_frame(self) -> Raster {
        self.frame
    }

    /// Render a display list into the current frame buffer.
    pub fn draw(&mut self, list: &DisplayList<'_>) {
        let inverse = list.transform.inverse();
        for op in &list.ops {
            match op {
                DrawOp::Clear(color) => {
                    let (w, h) = self.frame.size();
                    self.frame = Raster::filled(w, h, Rgba::from(*color));
                }
                DrawOp::Checkerboard {
                    bounds,
                    check,
                    light,
                    dark,
                } => {
                    let light = Rgba::from(*light);
                    let dark = Rgba::from(*dark);
                    self.fill_sampled(list.transform, inverse, *bounds, 1.0, |p| {
                        if !bounds.contains(p) {
                            return None;
                        }
                        let cx = (p.x / check).floor() as i64;
                        let cy = (p.y / check).floor() as i64;
                        Some(if (cx + cy) % 2 == 0 { light } else { dark })
                    });
                }
                DrawOp::Image {
                    raster,
                    origin,
                    opacity,
                } => {
                    let bounds = Rect::from_origin_size(
                        *origin,
                        (f64::from(raster.width()), f64::from(raster.height())),
                    );
                    self.fill_sampled(list.transform, inverse, bounds, *opacity, |p| {
                        let x = (p.x - origin.x).floor() as i32;
                        let y = (p.y - origin.y).floor() as i32;
                        raster.pixel(x, y).filter(|c| c.a > 0)
                    });
                }
                DrawOp::FillPath { path, fill, color } => {
                    let color = Rgba::from(*color);
                    let fill = *fill;
                    self.fill_sampled(list.transform, inverse, path.bounding_box(), 1.0, |p| {
                        let winding = path.winding(p);
                        let inside = match fill {
                            Fill::EvenOdd => winding % 2 != 0,
                            Fill::NonZero => winding != 0,
                        };
                        inside.then_some(color)
                    });
                }
                DrawOp::FillRect { rect, color } => {
                    let color = Rgba::from(*color);
                    self.fill_sampled(list.transform, inverse, *rect, 1.0, |p| {
                        rect.contains(p).then_some(color)
                    });
                }
                DrawOp::Outline { rect, color, dash } => {
                    self.outline(list.transform.transform_rect_bbox(*rect), *color, *dash);
                }
                DrawOp::Grid { bounds, color } => self.grid(list.transform, *bounds, *color),
            }
        }
    }

    /// Visit the device pixels covering `bounds` and blend whatever `sample` returns.
    fn fill_sampled(
        &mut self,
        transform: Affine,
        inverse: Affine,
        bounds: Rect,
        opacity: f32,
        sample: impl Fn(Point) -> Option<Rgba>,
    ) {
        let Some((x0, y0, x1, y1)) = self.clip(transform.transform_rect_bbox(bounds)) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if let Some(color) = sample(p) {
                    self.blend(x, y, color, opacity);
                }
            }
        }
    }

    /// Walk the pixel ring just inside `device`, clockwise from the top-left corner.
    fn outline(&mut self, device: Rect, color: Color, dash: Option<Dash>) {
        let x0 = device.x0.round() as i32;
        let y0 = device.y0.round() as i32;
        let x1 = device.x1.round() as i32 - 1;
        let y1 = device.y1.round() as i32 - 1;
        if x1 < x0 || y1 < y0 {
            return;
        }
        let color = Rgba::from(color);

        let mut ring = Vec::new();
        ring.extend((x0..x1).map(|x| (x, y0)));
        ring.extend((y0..y1).map(|y| (x1, y)));
        ring.extend((x0 + 1..=x1).rev().map(|x| (x, y1)));
        ring.extend((y0 + 1..=y1).rev().map(|y| (x0, y)));
        if ring.is_empty() {
            ring.push((x0, y0));
        }

        for (i, (x, y)) in ring.into_iter().enumerate() {
            if dash.is_none_or(|d| d.is_on(i as f64)) {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn grid(&mut self, transform: Affine, bounds: Rect, color: Color) {
        let (w, h) = self.frame.size();
        let Some((cx0, cy0, cx1, cy1)) = self.clip(transform.transform_rect_bbox(bounds)) else {
            return;
        };
        let device = transform.transform_rect_bbox(bounds);
        let right = device.x1.round() as i32;
        let bottom = device.y1.round() as i32;

        // Lines cross each other; paint each pixel once.
        let mut mask = vec![false; w as usize * h as usize];
        let mut mark = |x: i32, y: i32| {
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                mask[y as usize * w as usize + x as usize] = true;
            }
        };

        let mut gx = bounds.x0.ceil();
        while gx <= bounds.x1 {
            let col = ((transform * Point::new(gx, bounds.y0)).x.round() as i32).min(right - 1);
            for y in cy0..cy1 {
                mark(col, y);
            }
            gx += 1.0;
        }
        let mut gy = bounds.y0.ceil();
        while gy <= bounds.y1 {
            let row = ((transform * Point::new(bounds.x0, gy)).y.round() as i32).min(bottom - 1);
            for x in cx0..cx1 {
                mark(x, row);
            }
            gy += 1.0;
        }

        let color = Rgba::from(color);
        for (i, hit) in mask.into_iter().enumerate() {
            if hit {
                let x = (i % w as usize) as i32;
                let y = (i / w as usize) as i32;
                self.blend(x, y, color, 1.0);
            }
        }
    }

    /// Integer device span of `device` inside the frame, end-exclusive.
    fn clip(&self, device: Rect) -> Option<(i32, i32, i32, i32)> {
        let (w, h) = self.frame.size();
        let x0 = device.x0.floor().max(0.0) as i32;
        let y0 = device.y0.floor().max(0.0) as i32;
        let x1 = device.x1.ceil().min(f64::from(w)) as i32;
        let y1 = device.y1.ceil().min(f64::from(h)) as i32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba, opacity: f32) {
        if let Some(dst) = self.frame.pixel(x, y) {
            self.frame.set_pixel(x, y, color.over(dst, opacity));
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        let width = ctx.viewport_size.width.round() as u32;
        let height = ctx.viewport_size.height.round() as u32;
        if self.frame.size() != (width, height) {
            log::debug!("Resizing frame buffer to {width}x{height}");
            self.frame = Raster::new(width, height);
        }
        let list = DisplayList::build(ctx);
        self.draw(&list);
        Ok(())
    }
}

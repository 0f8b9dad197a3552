//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Multiplier step for one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Share of the container a fitted document occupies.
pub const FIT_MARGIN: f64 = 0.8;

/// Pixel coordinates from [`Viewport::screen_to_canvas`] are clamped to `±COORD_LIMIT`.
pub const COORD_LIMIT: i32 = 1 << 16;

/// Viewport maps document pixels to screen pixels.
///
/// `screen = canvas * scale + translate`. Panning moves the translate, zooming changes the scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the document origin.
    pub translate: Vec2,
    /// Screen pixels per document pixel.
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 4.0,
            min_scale: 1.0,
            max_scale: 32.0,
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, min_scale: f64, max_scale: f64) -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: scale.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    /// Document-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.translate)
    }

    /// Continuous document coordinates under a screen point.
    pub fn screen_to_canvas_point(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    /// The document pixel under a screen point, clamped to [`COORD_LIMIT`].
    pub fn screen_to_canvas(&self, screen: Point) -> (i32, i32) {
        let p = self.screen_to_canvas_point(screen);
        let limit = f64::from(COORD_LIMIT);
        (
            p.x.floor().clamp(-limit, limit) as i32,
            p.y.floor().clamp(-limit, limit) as i32,
        )
    }

    /// Screen position of a document pixel's top-left corner.
    pub fn canvas_to_screen(&self, x: f64, y: f64) -> Point {
        self.transform() * Point::new(x, y)
    }

    /// Move the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite pan delta {delta:?}");
            return;
        }
        self.translate += delta;
    }

    /// Zoom by `factor`, keeping the document point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> CanvasResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CanvasError::InvalidScale(factor));
        }
        if !anchor.is_finite() {
            return Err(CanvasError::InvalidScale(f64::NAN));
        }
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return Ok(());
        }

        let world = self.screen_to_canvas_point(anchor);
        self.scale = new_scale;
        let moved = self.canvas_to_screen(world.x, world.y);
        self.translate += anchor - moved;
        Ok(())
    }

    /// One wheel step anchored at the cursor: negative `delta_y` zooms in.
    pub fn zoom_wheel(&mut self, delta_y: f64, anchor: Point) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let factor = if delta_y < 0.0 {
            1.0 + WHEEL_ZOOM_STEP
        } else {
            1.0 - WHEEL_ZOOM_STEP
        };
        if let Err(err) = self.zoom_at(factor, anchor) {
            log::warn!("Wheel zoom rejected: {err}");
        }
    }

    /// Set the scale directly (clamped) without touching the translate.
    pub fn set_scale(&mut self, scale: f64) -> CanvasResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CanvasError::InvalidScale(scale));
        }
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        Ok(())
    }

    /// Center a document of size `doc` in a container of size `container` at the current scale.
    pub fn center(&mut self, container: Size, doc: Size) {
        let tx = (container.width - doc.width * self.scale) / 2.0;
        let ty = (container.height - doc.height * self.scale) / 2.0;
        if !tx.is_finite() || !ty.is_finite() {
            log::warn!("Cannot center {doc:?} in {container:?}");
            return;
        }
        self.translate = Vec2::new(tx, ty);
    }

    /// Pick a scale that shows the whole document with some margin, then center it.
    pub fn fit(&mut self, container: Size, doc: Size) {
        if doc.width <= 0.0 || doc.height <= 0.0 || container.is_zero_area() {
            log::warn!("Cannot fit {doc:?} in {container:?}");
            return;
        }
        let fitted = (container.width / doc.width).min(container.height / doc.height) * FIT_MARGIN;
        if !fitted.is_finite() || fitted <= 0.0 {
            return;
        }
        self.scale = fitted.clamp(self.min_scale, self.max_scale);
        self.center(container, doc);
    }

    /// Reset translate and restore `scale`.
    pub fn reset(&mut self, scale: f64) {
        self.translate = Vec2::ZERO;
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.translate, Vec2::ZERO);
        assert!((viewport.scale - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_floors() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.translate = Vec2::new(10.0, 10.0);
        assert_eq!(viewport.screen_to_canvas(Point::new(10.0, 10.0)), (0, 0));
        assert_eq!(viewport.screen_to_canvas(Point::new(13.9, 13.9)), (0, 0));
        assert_eq!(viewport.screen_to_canvas(Point::new(14.0, 18.0)), (1, 2));
        assert_eq!(viewport.screen_to_canvas(Point::new(9.0, 9.0)), (-1, -1));
    }

    #[test]
    fn test_screen_to_canvas_clamps_far_points() {
        let mut viewport = Viewport::new(1.0, 1.0, 32.0);
        viewport.pan(Vec2::new(1e12, -1e12));
        assert_eq!(
            viewport.screen_to_canvas(Point::ZERO),
            (-COORD_LIMIT, COORD_LIMIT)
        );
        assert_eq!(
            viewport.screen_to_canvas(Point::new(f64::MAX, f64::MIN)),
            (COORD_LIMIT, -COORD_LIMIT)
        );
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new(3.0, 1.0, 32.0);
        viewport.translate = Vec2::new(30.0, -20.0);
        for (x, y) in [(0, 0), (5, 7), (31, 2)] {
            let screen = viewport.canvas_to_screen(f64::from(x), f64::from(y));
            assert_eq!(viewport.screen_to_canvas(screen), (x, y));
            let inside = screen + Vec2::new(1.5, 2.9);
            assert_eq!(viewport.screen_to_canvas(inside), (x, y));
        }
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.translate = Vec2::new(12.0, 8.0);
        let anchor = Point::new(100.0, 60.0);
        let before = viewport.screen_to_canvas_point(anchor);
        viewport.zoom_at(2.0, anchor).unwrap();
        let after = viewport.screen_to_canvas_point(anchor);
        assert!((viewport.scale - 8.0).abs() < f64::EPSILON);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.zoom_at(0.001, Point::ZERO).unwrap();
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
        viewport.zoom_at(1000.0, Point::ZERO).unwrap();
        assert!((viewport.scale - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_zoom_keeps_state() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.translate = Vec2::new(5.0, 5.0);
        let before = viewport.clone();
        assert!(viewport.zoom_at(0.0, Point::ZERO).is_err());
        assert!(viewport.zoom_at(f64::NAN, Point::ZERO).is_err());
        assert!(viewport.set_scale(-2.0).is_err());
        assert!(viewport.set_scale(f64::INFINITY).is_err());
        viewport.pan(Vec2::new(f64::NAN, 1.0));
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_wheel_direction() {
        let mut viewport = Viewport::new(10.0, 1.0, 32.0);
        viewport.zoom_wheel(-1.0, Point::ZERO);
        assert!((viewport.scale - 11.0).abs() < 1e-9);
        viewport.zoom_wheel(1.0, Point::ZERO);
        assert!((viewport.scale - 9.9).abs() < 1e-9);
    }

    #[test]
    fn test_pan_then_set_scale() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.pan(Vec2::new(10.0, 10.0));
        viewport.set_scale(2.0).unwrap();
        assert_eq!(viewport.screen_to_canvas(Point::new(20.0, 20.0)), (5, 5));
    }

    #[test]
    fn test_center_and_fit() {
        let mut viewport = Viewport::new(4.0, 1.0, 32.0);
        viewport.center(Size::new(200.0, 100.0), Size::new(16.0, 16.0));
        assert_eq!(viewport.translate, Vec2::new(68.0, 18.0));

        viewport.fit(Size::new(400.0, 200.0), Size::new(10.0, 10.0));
        assert!((viewport.scale - 16.0).abs() < 1e-9);
        assert_eq!(viewport.translate, Vec2::new(120.0, 20.0));

        viewport.fit(Size::new(10_000.0, 10_000.0), Size::new(1.0, 1.0));
        assert!((viewport.scale - 32.0).abs() < f64::EPSILON);
    }
}

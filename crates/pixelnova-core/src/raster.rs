//! RGBA8 pixel buffers and integer pixel rectangles.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Paint, Rgba};
use crate::error::{CanvasError, CanvasResult};

/// Largest accepted width or height of a document.
pub const MAX_DIMENSION: u32 = 4096;

/// Axis-aligned pixel rectangle, end-exclusive: covers `x0..x1` by `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x.saturating_add(width.max(0)),
            y1: y.saturating_add(height.max(0)),
        }
    }

    /// Normalized rectangle spanning two corner points, whatever the drag direction.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x0: self.x0.saturating_add(dx),
            y0: self.y0.saturating_add(dy),
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
        }
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        let r = PixelRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { PixelRect::default() } else { r }
    }

    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

/// Row-major, non-premultiplied RGBA8 image.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let mut raster = Self::new(width, height);
        for px in raster.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
        raster
    }

    /// Wrap decoded RGBA8 bytes. The length must be exactly `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> CanvasResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CanvasError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.offset(x, y)
            .map(|i| Rgba::from_slice(&self.data[i..i + 4]))
    }

    /// Write one pixel. Returns `true` when the stored value changed.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        let px = &mut self.data[i..i + 4];
        let value = color.to_array();
        if px == value {
            return false;
        }
        px.copy_from_slice(&value);
        true
    }

    pub fn paint(&mut self, x: i32, y: i32, paint: Paint) -> bool {
        self.set_pixel(x, y, paint.rgba())
    }

    /// Stamp a square brush of `size` pixels centered on `(x, y)`.
    ///
    /// The square covers `[x - o, x - o + size)` on each axis with `o = size / 2`, clipped to
    /// the raster.
    pub fn stamp(&mut self, x: i32, y: i32, size: u32, paint: Paint) -> bool {
        let size = size.max(1) as i32;
        let o = size / 2;
        self.fill_rect(
            PixelRect::new(x.saturating_sub(o), y.saturating_sub(o), size, size),
            paint,
        )
    }

    /// Fill a rectangle, clipped to the raster.
    pub fn fill_rect(&mut self, rect: PixelRect, paint: Paint) -> bool {
        let rect = rect.intersect(&self.bounds());
        let mut changed = false;
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                changed |= self.paint(x, y, paint);
            }
        }
        changed
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Copy a region into a new raster. Parts outside this raster come back transparent.
    pub fn extract(&self, rect: PixelRect) -> Raster {
        let w = rect.width().max(0) as u32;
        let h = rect.height().max(0) as u32;
        let mut out = Raster::new(w, h);
        let clipped = rect.intersect(&self.bounds());
        for y in clipped.y0..clipped.y1 {
            let src = self.offset(clipped.x0, y);
            let dst = out.offset(clipped.x0 - rect.x0, y - rect.y0);
            if let (Some(src), Some(dst)) = (src, dst) {
                let len = clipped.width() as usize * 4;
                out.data[dst..dst + len].copy_from_slice(&self.data[src..src + len]);
            }
        }
        out
    }

    /// Draw `src` with its top-left at `(x, y)`. Pixels with alpha > 0 replace the destination;
    /// transparent pixels leave it untouched.
    pub fn blit(&mut self, src: &Raster, x: i32, y: i32) -> bool {
        let mut changed = false;
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                match src.pixel(sx, sy) {
                    Some(color) if color.a > 0 => {
                        changed |= self.set_pixel(x + sx, y + sy, color);
                    }
                    _ => {}
                }
            }
        }
        changed
    }

    /// Overwrite contents with `other` when both have the same size.
    pub fn copy_from(&mut self, other: &Raster) -> bool {
        if self.size() != other.size() {
            return false;
        }
        self.data.copy_from_slice(&other.data);
        true
    }

    /// Source-over composite `src` onto this raster at a uniform opacity. Sizes must match.
    pub fn composite(&mut self, src: &Raster, opacity: f32) {
        if self.size() != src.size() {
            return;
        }
        for (dst, s) in self.data.chunks_exact_mut(4).zip(src.data.chunks_exact(4)) {
            let out = Rgba::from_slice(s).over(Rgba::from_slice(dst), opacity);
            dst.copy_from_slice(&out.to_array());
        }
    }

    /// A new raster of `width` by `height` with this raster placed at `(dx, dy)`. Pixels falling
    /// outside are cropped; the uncovered area is transparent.
    pub fn reflowed(&self, width: u32, height: u32, dx: i32, dy: i32) -> Raster {
        let mut out = Raster::new(width, height);
        let target = out.bounds();
        let placed = self.bounds().translate(dx, dy).intersect(&target);
        for y in placed.y0..placed.y1 {
            let src = self.offset(placed.x0 - dx, y - dy);
            let dst = out.offset(placed.x0, y);
            if let (Some(src), Some(dst)) = (src, dst) {
                let len = placed.width() as usize * 4;
                out.data[dst..dst + len].copy_from_slice(&self.data[src..src + len]);
            }
        }
        out
    }

    /// Distinct non-transparent colors in first-seen (row-major) order.
    pub fn extract_palette(&self) -> Vec<Rgba> {
        let mut seen = HashSet::new();
        self.data
            .chunks_exact(4)
            .map(Rgba::from_slice)
            .filter(|c| c.a > 0 && seen.insert(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);
    const BLUE: Rgba = Rgba::new(0, 0, 255, 255);

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = Raster::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            CanvasError::BufferSize {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_pixel_bounds() {
        let mut r = Raster::new(4, 3);
        assert!(r.set_pixel(3, 2, RED));
        assert_eq!(r.pixel(3, 2), Some(RED));
        assert!(!r.set_pixel(3, 2, RED));
        assert!(!r.set_pixel(4, 0, RED));
        assert!(!r.set_pixel(-1, 0, RED));
        assert_eq!(r.pixel(0, 3), None);
    }

    #[test]
    fn test_stamp_even_size() {
        let mut r = Raster::new(8, 8);
        r.stamp(4, 4, 2, RED.into());
        let painted: Vec<(i32, i32)> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| r.pixel(x, y) == Some(RED))
            .collect();
        assert_eq!(painted, vec![(3, 3), (4, 3), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_stamp_odd_size_clipped() {
        let mut r = Raster::new(4, 4);
        r.stamp(0, 0, 3, RED.into());
        assert_eq!(r.pixel(0, 0), Some(RED));
        assert_eq!(r.pixel(1, 1), Some(RED));
        assert_eq!(r.pixel(2, 2), Some(Rgba::transparent()));
    }

    #[test]
    fn test_extract_and_blit() {
        let mut r = Raster::new(4, 4);
        r.set_pixel(1, 1, RED);
        r.set_pixel(2, 1, BLUE);
        let piece = r.extract(PixelRect::new(1, 1, 2, 1));
        assert_eq!(piece.size(), (2, 1));
        assert_eq!(piece.pixel(1, 0), Some(BLUE));

        let mut dst = Raster::filled(4, 4, Rgba::white());
        dst.blit(&piece, 0, 3);
        assert_eq!(dst.pixel(0, 3), Some(RED));
        assert_eq!(dst.pixel(1, 3), Some(BLUE));
    }

    #[test]
    fn test_extract_outside_is_transparent() {
        let r = Raster::filled(2, 2, RED);
        let piece = r.extract(PixelRect::new(1, 1, 2, 2));
        assert_eq!(piece.pixel(0, 0), Some(RED));
        assert_eq!(piece.pixel(1, 1), Some(Rgba::transparent()));
    }

    #[test]
    fn test_blit_skips_transparent() {
        let mut src = Raster::new(2, 1);
        src.set_pixel(0, 0, RED);
        let mut dst = Raster::filled(2, 1, BLUE);
        dst.blit(&src, 0, 0);
        assert_eq!(dst.pixel(0, 0), Some(RED));
        assert_eq!(dst.pixel(1, 0), Some(BLUE));
    }

    #[test]
    fn test_reflowed_crop_and_grow() {
        let mut r = Raster::new(2, 2);
        r.set_pixel(0, 0, RED);
        r.set_pixel(1, 1, BLUE);

        let grown = r.reflowed(4, 4, 1, 1);
        assert_eq!(grown.pixel(1, 1), Some(RED));
        assert_eq!(grown.pixel(2, 2), Some(BLUE));
        assert_eq!(grown.pixel(0, 0), Some(Rgba::transparent()));

        let cropped = r.reflowed(1, 1, -1, -1);
        assert_eq!(cropped.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_palette_order() {
        let mut r = Raster::new(3, 1);
        r.set_pixel(0, 0, BLUE);
        r.set_pixel(1, 0, RED);
        r.set_pixel(2, 0, BLUE);
        assert_eq!(r.extract_palette(), vec![BLUE, RED]);
    }

    #[test]
    fn test_rect_normalization() {
        let a = PixelRect::from_corners((5, 1), (2, 4));
        assert_eq!(a, PixelRect { x0: 2, y0: 1, x1: 5, y1: 4 });
        assert_eq!(a.width(), 3);
        assert!(PixelRect::from_corners((3, 3), (3, 8)).is_empty());
    }

    #[test]
    fn test_rect_saturates_at_extremes() {
        let r = PixelRect::new(i32::MAX - 1, 0, 10, 10);
        assert_eq!(r.x1, i32::MAX);
        assert_eq!(r.width(), 1);
        let wide = PixelRect::from_corners((i32::MIN, 0), (i32::MAX, 1));
        assert_eq!(wide.width(), i32::MAX);
        assert_eq!(r.translate(5, 0).x0, i32::MAX);

        let mut raster = Raster::new(2, 2);
        assert!(!raster.stamp(i32::MIN, i32::MAX, 4, Paint::Color(RED)));
        assert!(raster.is_blank());
    }
}

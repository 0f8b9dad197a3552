//! Bucket fill.

use crate::color::Paint;
use crate::raster::Raster;

/// 4-connected flood fill from `(x, y)`.
///
/// A pixel joins the region when each RGBA channel is within `tolerance` of the seed pixel.
/// Returns `false` (and changes nothing) when the seed is outside the raster or already has
/// the fill color.
pub fn flood_fill(raster: &mut Raster, x: i32, y: i32, paint: Paint, tolerance: u8) -> bool {
    let Some(target) = raster.pixel(x, y) else {
        return false;
    };
    let fill = paint.rgba();
    if target == fill {
        return false;
    }

    let width = raster.width() as usize;
    let mut visited = vec![false; width * raster.height() as usize];
    let mut stack = vec![(x, y)];
    let mut filled = 0usize;

    while let Some((px, py)) = stack.pop() {
        if !raster.in_bounds(px, py) {
            continue;
        }
        let index = py as usize * width + px as usize;
        if visited[index] {
            continue;
        }
        visited[index] = true;

        let matches = raster
            .pixel(px, py)
            .is_some_and(|c| c.within_tolerance(target, tolerance));
        if !matches {
            continue;
        }
        raster.set_pixel(px, py, fill);
        filled += 1;
        stack.extend([(px - 1, py), (px + 1, py), (px, py - 1), (px, py + 1)]);
    }

    log::debug!("Bucket filled {filled} pixels from ({x}, {y})");
    filled > 0
}

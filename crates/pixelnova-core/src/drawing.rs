//! Integer rasterization of lines, rectangles and circles.
//!
//! All functions return pixel coordinates in document space; callers clip against the raster.

use std::collections::{BTreeMap, HashSet};

use crate::raster::PixelRect;

/// A pixel coordinate.
pub type PixelPoint = (i32, i32);

/// Bresenham line, both endpoints included.
///
/// Error terms are kept in `i64` so endpoints anywhere in the `i32` range are accepted.
pub fn line(from: PixelPoint, to: PixelPoint) -> Vec<PixelPoint> {
    let (mut x0, mut y0) = (i64::from(from.0), i64::from(from.1));
    let (x1, y1) = (i64::from(to.0), i64::from(to.1));
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let len = usize::try_from(dx.max(dy)).unwrap_or(usize::MAX);
    let mut points = Vec::with_capacity(len.min(1 << 16).saturating_add(1));

    loop {
        // Stays between the endpoints, so it fits in i32.
        points.push((x0 as i32, y0 as i32));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
    points
}

/// Perimeter of the rectangle spanned by two corners (inclusive).
pub fn rect_outline(a: PixelPoint, b: PixelPoint) -> Vec<PixelPoint> {
    let (min_x, max_x) = (a.0.min(b.0), a.0.max(b.0));
    let (min_y, max_y) = (a.1.min(b.1), a.1.max(b.1));
    let mut points = Vec::new();
    for x in min_x..=max_x {
        points.push((x, min_y));
        if max_y != min_y {
            points.push((x, max_y));
        }
    }
    for y in (min_y + 1)..max_y {
        points.push((min_x, y));
        if max_x != min_x {
            points.push((max_x, y));
        }
    }
    points
}

/// Round half up, matching how pointer midpoints are snapped to pixels.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Center and radius of the circle inscribed in a drag box.
///
/// The center is the rounded midpoint, the radius half the longer side, rounded.
pub fn circle_from_drag(from: PixelPoint, to: PixelPoint) -> (PixelPoint, i32) {
    let dx = to.0.abs_diff(from.0);
    let dy = to.1.abs_diff(from.1);
    let cx = round_half_up((f64::from(from.0) + f64::from(to.0)) / 2.0);
    let cy = round_half_up((f64::from(from.1) + f64::from(to.1)) / 2.0);
    let radius = round_half_up(f64::from(dx.max(dy)) / 2.0);
    ((cx, cy), radius)
}

fn push_octants(center: PixelPoint, x: i32, y: i32, points: &mut Vec<PixelPoint>) {
    let (cx, cy) = center;
    if x == 0 {
        points.extend([(cx, cy + y), (cx, cy - y), (cx + y, cy), (cx - y, cy)]);
    } else if x == y {
        points.extend([
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
        ]);
    } else if x < y {
        points.extend([
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ]);
    }
}

/// Midpoint circle outline. May contain duplicates for tiny radii.
pub fn circle_outline(center: PixelPoint, radius: i32) -> Vec<PixelPoint> {
    let radius = radius.max(0);
    let mut points = Vec::new();
    let mut x = 0;
    let mut y = radius;
    // Decision variable scaled by 4 to stay in integers.
    let mut p = 5 - 4 * i64::from(radius);

    push_octants(center, x, y, &mut points);
    while x < y {
        x += 1;
        if p < 0 {
            p += 4 * (2 * i64::from(x) + 1);
        } else {
            y -= 1;
            p += 4 * (2 * i64::from(x - y) + 1);
        }
        push_octants(center, x, y, &mut points);
    }
    points
}

/// Disc made of every row span between the outline's leftmost and rightmost pixel.
pub fn filled_circle(center: PixelPoint, radius: i32) -> Vec<PixelPoint> {
    circle_spans(center, radius)
        .into_iter()
        .flat_map(|(y, (min, max))| (min..=max).map(move |x| (x, y)))
        .collect()
}

/// The part of [`filled_circle`] that falls inside `clip`.
pub fn filled_circle_clipped(center: PixelPoint, radius: i32, clip: PixelRect) -> Vec<PixelPoint> {
    circle_spans(center, radius)
        .into_iter()
        .filter(|&(y, _)| y >= clip.y0 && y < clip.y1)
        .flat_map(|(y, (min, max))| {
            (min.max(clip.x0)..=max.min(clip.x1.saturating_sub(1))).map(move |x| (x, y))
        })
        .collect()
}

fn circle_spans(center: PixelPoint, radius: i32) -> BTreeMap<i32, (i32, i32)> {
    let mut rows: BTreeMap<i32, (i32, i32)> = BTreeMap::new();
    for (x, y) in circle_outline(center, radius) {
        rows.entry(y)
            .and_modify(|(min, max)| {
                *min = (*min).min(x);
                *max = (*max).max(x);
            })
            .or_insert((x, x));
    }
    rows
}

/// Deduplicate points, optionally growing each one by its 4-neighbours.
pub fn expand_cross(points: &[PixelPoint], grow: bool) -> Vec<PixelPoint> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &(x, y) in points {
        let candidates: &[PixelPoint] = if grow {
            &[(x, y), (x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
        } else {
            &[(x, y)]
        };
        for &p in candidates {
            if seen.insert(p) {
                out.push(p);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        assert_eq!(line((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_line_reversed_and_diagonal() {
        assert_eq!(line((2, 2), (0, 0)), vec![(2, 2), (1, 1), (0, 0)]);
        assert_eq!(line((1, 1), (1, 1)), vec![(1, 1)]);
        let steep = line((0, 0), (1, 4));
        assert_eq!(steep.len(), 5);
        assert_eq!(steep.first(), Some(&(0, 0)));
        assert_eq!(steep.last(), Some(&(1, 4)));
    }

    #[test]
    fn test_rect_outline() {
        let mut pts = rect_outline((2, 2), (0, 0));
        pts.sort();
        assert_eq!(
            pts,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
        assert_eq!(rect_outline((1, 1), (1, 1)), vec![(1, 1)]);
    }

    #[test]
    fn test_circle_from_drag() {
        assert_eq!(circle_from_drag((0, 0), (4, 4)), ((2, 2), 2));
        assert_eq!(circle_from_drag((0, 0), (3, 1)), ((2, 1), 2));
        assert_eq!(circle_from_drag((4, 4), (0, 0)), ((2, 2), 2));
        assert_eq!(
            circle_from_drag((i32::MIN, 0), (i32::MAX, 0)),
            ((0, 0), i32::MAX)
        );
    }

    #[test]
    fn test_line_near_integer_limits() {
        assert_eq!(
            line((i32::MAX - 1, i32::MIN), (i32::MAX, i32::MIN + 1)),
            vec![(i32::MAX - 1, i32::MIN), (i32::MAX, i32::MIN + 1)]
        );
    }

    #[test]
    fn test_filled_circle_clipped() {
        let clip = PixelRect::new(0, 0, 6, 6);
        let expected: Vec<_> = filled_circle((5, 5), 3)
            .into_iter()
            .filter(|&(x, y)| clip.contains(x, y))
            .collect();
        assert_eq!(filled_circle_clipped((5, 5), 3, clip), expected);
        assert_eq!(
            filled_circle_clipped((0, 0), 60_000, PixelRect::new(0, 0, 4, 4)).len(),
            16
        );
    }

    #[test]
    fn test_circle_outline_radius_two() {
        let pts = expand_cross(&circle_outline((5, 5), 2), false);
        for &(x, y) in &pts {
            let d2 = (x - 5).pow(2) + (y - 5).pow(2);
            assert!((2..=8).contains(&d2), "({x}, {y}) off the ring");
        }
        assert!(pts.contains(&(5, 7)));
        assert!(pts.contains(&(3, 5)));
        assert!(!pts.contains(&(5, 5)));
    }

    #[test]
    fn test_filled_circle_contains_center() {
        let pts = filled_circle((5, 5), 3);
        assert!(pts.contains(&(5, 5)));
        assert!(pts.contains(&(2, 5)));
        assert!(!pts.contains(&(2, 2)));
    }

    #[test]
    fn test_expand_cross() {
        assert_eq!(expand_cross(&[(0, 0), (0, 0)], false), vec![(0, 0)]);
        let grown = expand_cross(&[(0, 0), (1, 0)], true);
        assert_eq!(grown.len(), 8);
    }
}

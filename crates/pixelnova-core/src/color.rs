//! Color values used by layers, tools and the eyedropper.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// The color as a `[r, g, b, a]` array, the layout of a raster pixel.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_slice(px: &[u8]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    /// True when every channel differs from `other` by at most `tolerance`.
    pub fn within_tolerance(self, other: Rgba, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }

    /// Parse a CSS-like color string.
    ///
    /// Accepts `transparent`, `#rgb`, `#rrggbb`, `#rrggbbaa` and `rgba(r, g, b, a)` /
    /// `rgb(r, g, b)` with `a` in `0..=1`.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }

        if let Some(hex) = color.strip_prefix('#') {
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                3 => Some(Self::new(
                    channel(&hex[0..1])? * 17,
                    channel(&hex[1..2])? * 17,
                    channel(&hex[2..3])? * 17,
                    255,
                )),
                6 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => None,
            };
        }

        let inner = color
            .strip_prefix("rgba(")
            .or_else(|| color.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse().ok()?;
        let g = parts[1].parse().ok()?;
        let b = parts[2].parse().ok()?;
        let a = match parts.get(3) {
            Some(alpha) => {
                let alpha: f64 = alpha.parse().ok()?;
                if !(0.0..=1.0).contains(&alpha) {
                    return None;
                }
                (alpha * 255.0).round() as u8
            }
            None => 255,
        };
        Some(Self::new(r, g, b, a))
    }

    /// Format for the host UI: `#RRGGBB` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.2})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }

    /// Composite `self` over `dst` (source-over) with an extra opacity multiplier.
    pub fn over(self, dst: Rgba, opacity: f32) -> Rgba {
        let sa = f32::from(self.a) / 255.0 * opacity.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return dst;
        }
        let da = f32::from(dst.a) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::transparent();
        }
        let mix = |s: u8, d: u8| {
            let s = f32::from(s);
            let d = f32::from(d);
            ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// What a brush writes into a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    /// Replace the pixel with this color.
    Color(Rgba),
    /// Clear the pixel (the eraser).
    Transparent,
}

impl Paint {
    pub fn rgba(self) -> Rgba {
        match self {
            Paint::Color(color) => color,
            Paint::Transparent => Rgba::transparent(),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Color(color)
    }
}

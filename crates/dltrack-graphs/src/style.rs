//! Per-model series style derived from a SHA-256 hash of the model name.
//!
//! The digest is read as a 256-bit big-endian integer `h`:
//! hue `h % 360`, saturation `0.55 + (h % 35) / 100`, lightness
//! `0.35 + (h % 25) / 100`, marker `h % 14`, line style `(h >> 8) % 4`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, PI, TAU};
use std::fmt;

/// Marker shape drawn at every data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    /// Filled circle.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Triangle pointing up.
    TriangleUp,
    /// Triangle pointing down.
    TriangleDown,
    /// Square rotated by 45 degrees.
    Diamond,
    /// Regular pentagon.
    Pentagon,
    /// Five-pointed star.
    Star,
    /// Regular hexagon.
    Hexagon,
    /// Diagonal cross.
    Cross,
    /// Upright cross.
    Plus,
    /// Diamond compressed horizontally.
    ThinDiamond,
    /// Triangle pointing left.
    TriangleLeft,
    /// Triangle pointing right.
    TriangleRight,
    /// Regular octagon.
    Octagon,
}

/// Marker cycle indexed by `h % 14`.
pub const MARKERS: [MarkerShape; 14] = [
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::TriangleUp,
    MarkerShape::TriangleDown,
    MarkerShape::Diamond,
    MarkerShape::Pentagon,
    MarkerShape::Star,
    MarkerShape::Hexagon,
    MarkerShape::Cross,
    MarkerShape::Plus,
    MarkerShape::ThinDiamond,
    MarkerShape::TriangleLeft,
    MarkerShape::TriangleRight,
    MarkerShape::Octagon,
];

/// Stroke pattern of a series line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    /// Continuous line.
    Solid,
    /// Long dashes.
    Dashed,
    /// Alternating dash and dot.
    DashDot,
    /// Dots.
    Dotted,
}

/// Line style cycle indexed by `(h >> 8) % 4`.
pub const LINE_STYLES: [LineStyle; 4] = [
    LineStyle::Solid,
    LineStyle::Dashed,
    LineStyle::DashDot,
    LineStyle::Dotted,
];

impl LineStyle {
    /// On/off lengths in pixels for a 2 px stroke. Empty means solid.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[12.0, 6.0],
            Self::DashDot => &[12.0, 5.0, 3.0, 5.0],
            Self::Dotted => &[3.0, 5.0],
        }
    }

    /// The pattern as an SVG `stroke-dasharray` value.
    pub fn svg_dasharray(self) -> Option<String> {
        let pattern = self.dash_pattern();
        if pattern.is_empty() {
            return None;
        }
        Some(
            pattern
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.0, self.1, self.2]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for plotters::style::RGBColor {
    fn from(rgb: Rgb) -> Self {
        Self(rgb.0, rgb.1, rgb.2)
    }
}

/// Color, marker and line style of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Line and marker color.
    pub color: Rgb,
    /// Marker shape.
    pub marker: MarkerShape,
    /// Line stroke pattern.
    pub line: LineStyle,
}

impl SeriesStyle {
    /// Style for `name`. The same name always yields the same style.
    pub fn for_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());

        let hue = f64::from(digest_mod(&digest, 360)) / 360.0;
        let saturation = 0.55 + f64::from(digest_mod(&digest, 35)) / 100.0;
        let lightness = 0.35 + f64::from(digest_mod(&digest, 25)) / 100.0;
        let (r, g, b) = hls_to_rgb(hue, lightness, saturation);

        // (h >> 8) % 4 only sees the low two bits of the second-to-last byte
        let line = LINE_STYLES[usize::from(digest[digest.len() - 2] & 0b11)];

        Self {
            color: Rgb(channel(r), channel(g), channel(b)),
            marker: MARKERS[digest_mod(&digest, 14) as usize],
            line,
        }
    }
}

/// Remainder of a big-endian byte string modulo `m`.
fn digest_mod(bytes: &[u8], m: u32) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc * 256 + u32::from(b)) % m)
}

fn channel(value: f64) -> u8 {
    (value * 255.0) as u8
}

/// HLS to RGB, each component in `0.0..=1.0`.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    const ONE_THIRD: f64 = 1.0 / 3.0;
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - (l * s) };
    let m1 = 2.0 * l - m2;
    (
        hue_component(m1, m2, h + ONE_THIRD),
        hue_component(m1, m2, h),
        hue_component(m1, m2, h - ONE_THIRD),
    )
}

fn hue_component(m1: f64, m2: f64, hue: f64) -> f64 {
    const ONE_SIXTH: f64 = 1.0 / 6.0;
    const TWO_THIRD: f64 = 2.0 / 3.0;
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRD {
        m1 + (m2 - m1) * (TWO_THIRD - hue) * 6.0
    } else {
        m1
    }
}

/// Geometry of a marker in pixel space, shared by both renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerGlyph {
    /// Filled circle.
    Disc {
        /// Center point.
        center: (f64, f64),
        /// Radius in pixels.
        radius: f64,
    },
    /// Filled polygon.
    Polygon(Vec<(f64, f64)>),
    /// Stroked line segments.
    Strokes(Vec<[(f64, f64); 2]>),
}

impl MarkerGlyph {
    /// Glyph for `shape` centered on `center`, `size` being the outer radius.
    pub fn new(shape: MarkerShape, center: (f64, f64), size: f64) -> Self {
        let (cx, cy) = center;
        match shape {
            MarkerShape::Circle => Self::Disc {
                center,
                radius: size,
            },
            MarkerShape::Square => Self::Polygon(regular_polygon(center, size, 4, -3.0 * FRAC_PI_4)),
            MarkerShape::TriangleUp => Self::Polygon(regular_polygon(center, size, 3, -FRAC_PI_2)),
            MarkerShape::TriangleDown => Self::Polygon(regular_polygon(center, size, 3, FRAC_PI_2)),
            MarkerShape::TriangleLeft => Self::Polygon(regular_polygon(center, size, 3, PI)),
            MarkerShape::TriangleRight => Self::Polygon(regular_polygon(center, size, 3, 0.0)),
            MarkerShape::Diamond => Self::Polygon(regular_polygon(center, size, 4, -FRAC_PI_2)),
            MarkerShape::ThinDiamond => Self::Polygon(
                regular_polygon(center, size, 4, -FRAC_PI_2)
                    .into_iter()
                    .map(|(x, y)| (cx + (x - cx) * 0.6, y))
                    .collect(),
            ),
            MarkerShape::Pentagon => Self::Polygon(regular_polygon(center, size, 5, -FRAC_PI_2)),
            MarkerShape::Hexagon => Self::Polygon(regular_polygon(center, size, 6, -FRAC_PI_2)),
            MarkerShape::Octagon => Self::Polygon(regular_polygon(center, size, 8, FRAC_PI_8)),
            MarkerShape::Star => Self::Polygon(
                (0..10)
                    .map(|i| {
                        let radius = if i % 2 == 0 { size } else { size * 0.4 };
                        let angle = -FRAC_PI_2 + f64::from(i) * PI / 5.0;
                        (cx + radius * angle.cos(), cy + radius * angle.sin())
                    })
                    .collect(),
            ),
            MarkerShape::Cross => {
                let d = size * FRAC_PI_4.cos();
                Self::Strokes(vec![
                    [(cx - d, cy - d), (cx + d, cy + d)],
                    [(cx - d, cy + d), (cx + d, cy - d)],
                ])
            }
            MarkerShape::Plus => Self::Strokes(vec![
                [(cx - size, cy), (cx + size, cy)],
                [(cx, cy - size), (cx, cy + size)],
            ]),
        }
    }
}

fn regular_polygon(center: (f64, f64), radius: f64, sides: u32, start: f64) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|k| {
            let angle = start + f64::from(k) * TAU / f64::from(sides);
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for DiffPDF: geometry, text boxes, page pairs, and the
// option enums shared between the command line and the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// PDF user-space resolution.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert a point value to device pixels at `dpi`, rounding to the nearest pixel.
pub fn pixel_offset_for_point_value(dpi: f32, points: f32) -> u32 {
    (points * dpi / POINTS_PER_INCH).round().max(0.0) as u32
}

// -- Geometry ---------------------------------------------------------------

/// A size in points (or pixels, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A floating-point rectangle with a top-left origin and y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow the rectangle by `by` on all four sides.
    pub fn expanded(&self, by: f32) -> Self {
        Self::new(
            self.x - by,
            self.y - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// True when the closed rectangles share at least one point, so
    /// rectangles that merely touch along an edge count.
    pub fn touches(&self, other: &RectF) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &RectF) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn united(&self, other: &RectF) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}

/// An integer rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn to_rect_f(self) -> RectF {
        RectF::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

// -- Text -------------------------------------------------------------------

/// A positioned run of text as reported by the document backend (points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub rect: RectF,
    pub text: String,
}

impl TextBox {
    pub fn new(rect: RectF, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }
}

/// The comparison unit of text-mode diffing: one character or one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub rect: RectF,
    pub text: String,
}

// -- Pages ------------------------------------------------------------------

/// One page of the left document matched against one page of the right
/// document, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePair {
    pub left: usize,
    pub right: usize,
    /// Identical text, different pixels.
    pub has_visual_difference: bool,
}

impl PagePair {
    pub fn new(left: usize, right: usize, has_visual_difference: bool) -> Self {
        Self {
            left,
            right,
            has_visual_difference,
        }
    }
}

/// Outcome of classifying a page pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difference {
    None,
    Textual,
    Visual,
}

/// Which side(s) of a page pair an output receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavePages {
    Both,
    Left,
    Right,
}

// -- Options ----------------------------------------------------------------

/// Failure to parse one of the option enums from its command-line name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Declares a fieldless option enum with stable names used both on the
/// command line and in JSON configuration files.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

named_enum! {
    /// Granularity of the comparison.
    ComparisonMode, "comparison mode" {
        Visual => "visual",
        Characters => "characters",
        Words => "words",
    }
}

impl Default for ComparisonMode {
    fn default() -> Self {
        Self::Words
    }
}

named_enum! {
    /// Pixel operator used when compositing the two renderings.
    CompositionMode, "composition mode" {
        Difference => "Difference",
        Exclusion => "Exclusion",
        SourceXorDestination => "SourceXorDestination",
        NotSourceXorDestination => "NotSourceXorDestination",
    }
}

named_enum! {
    /// Outline style of highlight regions.
    PenStyle, "pen style" {
        NoPen => "NoPen",
        SolidLine => "SolidLine",
        DashLine => "DashLine",
        DotLine => "DotLine",
        DashDotLine => "DashDotLine",
        DashDotDotLine => "DashDotDotLine",
    }
}

named_enum! {
    /// Fill pattern of highlight regions.
    BrushStyle, "brush style" {
        NoBrush => "NoBrush",
        SolidPattern => "SolidPattern",
        Dense1Pattern => "Dense1Pattern",
        Dense2Pattern => "Dense2Pattern",
        Dense3Pattern => "Dense3Pattern",
        Dense4Pattern => "Dense4Pattern",
        Dense5Pattern => "Dense5Pattern",
        Dense6Pattern => "Dense6Pattern",
        Dense7Pattern => "Dense7Pattern",
        HorPattern => "HorPattern",
        VerPattern => "VerPattern",
        CrossPattern => "CrossPattern",
        BDiagPattern => "BDiagPattern",
        FDiagPattern => "FDiagPattern",
        DiagCrossPattern => "DiagCrossPattern",
    }
}

named_enum! {
    /// Container written for the diff output.
    OutputFormat, "output format" {
        /// One multi-page PDF per output.
        Pdf => "pdf",
        /// One PNG per differing page pair.
        Png => "png",
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Pdf
    }
}

named_enum! {
    /// Token dump verbosity for diagnosing text comparisons.
    DebugTexts, "debug level" {
        Off => "off",
        Texts => "texts",
        /// Also print coordinates in y, x order.
        TextsAndYx => "texts-yx",
    }
}

impl Default for DebugTexts {
    fn default() -> Self {
        Self::Off
    }
}

// -- Colors -----------------------------------------------------------------

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TOMATO: Color = Color::rgb(255, 99, 71);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Replace the alpha channel with `opacity` percent (clamped to 0..=100).
    pub fn with_opacity(self, opacity: u8) -> Self {
        let percent = u32::from(opacity.min(100));
        Self {
            a: ((percent * 255 + 50) / 100) as u8,
            ..self
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A small table of SVG color keywords accepted on the command line.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("coral", Color::rgb(255, 127, 80)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("gold", Color::rgb(255, 215, 0)),
    ("gray", Color::rgb(128, 128, 128)),
    ("green", Color::rgb(0, 128, 0)),
    ("lightblue", Color::rgb(173, 216, 230)),
    ("lightgreen", Color::rgb(144, 238, 144)),
    ("lime", Color::rgb(0, 255, 0)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("purple", Color::rgb(128, 0, 128)),
    ("red", Color::rgb(255, 0, 0)),
    ("tomato", Color::TOMATO),
    ("white", Color::rgb(255, 255, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
];

impl FromStr for Color {
    type Err = UnknownVariant;

    /// Parse `#rgb`, `#rrggbb` or a color keyword (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnknownVariant {
            kind: "color",
            value: s.to_string(),
        };
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Color::rgb(r * 17, g * 17, b * 17)),
                [r1, r2, g1, g2, b1, b2] => {
                    Ok(Color::rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2))
                }
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(invalid)
    }
}

/// Page-edge bands (points) excluded from comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margins {
    /// The included area of a page of `size` points, in points.
    pub fn point_rect(&self, size: SizeF) -> RectF {
        RectF::new(
            self.left as f32,
            self.top as f32,
            size.width - (self.left as f32 + self.right as f32),
            size.height - (self.top as f32 + self.bottom as f32),
        )
    }

    /// The included area of an image of `size` pixels rendered at `dpi`.
    pub fn pixel_rect(&self, width: u32, height: u32, dpi: f32) -> PixelRect {
        let top = pixel_offset_for_point_value(dpi, self.top as f32);
        let left = pixel_offset_for_point_value(dpi, self.left as f32);
        let right = pixel_offset_for_point_value(dpi, self.right as f32);
        let bottom = pixel_offset_for_point_value(dpi, self.bottom as f32);
        let x = left.min(width);
        let y = top.min(height);
        PixelRect::new(
            x,
            y,
            width.saturating_sub(right).saturating_sub(x),
            height.saturating_sub(bottom).saturating_sub(y),
        )
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Highlight renderer — paint highlight regions onto a page rendering with a
// patterned, translucent fill and an optionally dashed outline.

use diffpdf_core::{BrushStyle, Color, DiffConfig, PenStyle, RectF};
use image::{Pixel, Rgba, RgbaImage};
use tracing::{debug, instrument};

/// 4x4 ordered-dither thresholds used for the dense brush patterns.
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Spacing of the hatch brush lines, in pixels.
const HATCH_SPACING: i64 = 8;

/// Outline and fill used for highlights, colors already carrying the
/// configured opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    pub pen_style: PenStyle,
    pub pen: Color,
    pub brush_style: BrushStyle,
    pub brush: Color,
}

impl HighlightStyle {
    pub fn from_config(config: &DiffConfig) -> Self {
        Self {
            pen_style: config.pen_style,
            pen: config.pen(),
            brush_style: config.brush_style,
            brush: config.brush(),
        }
    }
}

/// Paint `regions` onto `image`.
///
/// Overlapping regions are filled once, as a union. When the bounding box of
/// all regions is smaller than `square_size` in both dimensions, a single
/// `square_size` square at its top-left corner is painted instead so tiny
/// differences stay visible.
#[instrument(skip_all, fields(regions = regions.len(), square_size))]
pub fn paint_highlights(
    image: &mut RgbaImage,
    regions: &[RectF],
    style: &HighlightStyle,
    square_size: u32,
) {
    let Some(bounds) = regions.iter().copied().reduce(|a, b| a.united(&b)) else {
        return;
    };
    let square = square_size as f32;
    let enlarged;
    let regions = if bounds.width < square && bounds.height < square {
        debug!("Expanding point-sized highlight to one tile");
        enlarged = [RectF::new(bounds.x, bounds.y, square, square)];
        &enlarged[..]
    } else {
        regions
    };

    let pixel_rects: Vec<Span> = regions
        .iter()
        .filter_map(|rect| Span::of(rect, image.width(), image.height()))
        .collect();
    fill_union(image, &pixel_rects, style.brush_style, style.brush);
    if style.pen_style != PenStyle::NoPen {
        for span in &pixel_rects {
            stroke(image, span, style.pen_style, style.pen);
        }
    }
}

/// Half-open pixel span `[x0, x1) x [y0, y1)` clipped to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Span {
    fn of(rect: &RectF, width: u32, height: u32) -> Option<Self> {
        let clamp_x = |v: f32| (v.round().max(0.0) as u32).min(width);
        let clamp_y = |v: f32| (v.round().max(0.0) as u32).min(height);
        let span = Self {
            x0: clamp_x(rect.left()),
            y0: clamp_y(rect.top()),
            x1: clamp_x(rect.right()),
            y1: clamp_y(rect.bottom()),
        };
        (span.x1 > span.x0 && span.y1 > span.y0).then_some(span)
    }

    /// Outline pixels clockwise from the top-left corner, each visited once.
    fn perimeter(&self) -> Vec<(u32, u32)> {
        let (right, bottom) = (self.x1 - 1, self.y1 - 1);
        let mut points: Vec<(u32, u32)> = (self.x0..=right).map(|x| (x, self.y0)).collect();
        points.extend((self.y0 + 1..=bottom).map(|y| (right, y)));
        if bottom > self.y0 {
            points.extend((self.x0..right).rev().map(|x| (x, bottom)));
        }
        if right > self.x0 {
            points.extend((self.y0 + 1..bottom).rev().map(|y| (self.x0, y)));
        }
        points
    }
}

fn brush_covers(style: BrushStyle, x: u32, y: u32) -> bool {
    let dense = |threshold: u8| BAYER_4X4[(y % 4) as usize][(x % 4) as usize] < threshold;
    let (xi, yi) = (x as i64, y as i64);
    let horizontal = yi % HATCH_SPACING == 0;
    let vertical = xi % HATCH_SPACING == 0;
    let backward = (xi + yi) % HATCH_SPACING == 0;
    let forward = (xi - yi).rem_euclid(HATCH_SPACING) == 0;
    match style {
        BrushStyle::NoBrush => false,
        BrushStyle::SolidPattern => true,
        BrushStyle::Dense1Pattern => dense(15),
        BrushStyle::Dense2Pattern => dense(14),
        BrushStyle::Dense3Pattern => dense(10),
        BrushStyle::Dense4Pattern => dense(8),
        BrushStyle::Dense5Pattern => dense(6),
        BrushStyle::Dense6Pattern => dense(2),
        BrushStyle::Dense7Pattern => dense(1),
        BrushStyle::HorPattern => horizontal,
        BrushStyle::VerPattern => vertical,
        BrushStyle::CrossPattern => horizontal || vertical,
        BrushStyle::BDiagPattern => backward,
        BrushStyle::FDiagPattern => forward,
        BrushStyle::DiagCrossPattern => backward || forward,
    }
}

fn fill_union(image: &mut RgbaImage, spans: &[Span], style: BrushStyle, color: Color) {
    if style == BrushStyle::NoBrush || spans.is_empty() {
        return;
    }
    let width = image.width() as usize;
    let mut covered = vec![false; width * image.height() as usize];
    for span in spans {
        for y in span.y0..span.y1 {
            let row = y as usize * width;
            covered[row + span.x0 as usize..row + span.x1 as usize].fill(true);
        }
    }
    let paint = Rgba(color.to_rgba());
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if covered[y as usize * width + x as usize] && brush_covers(style, x, y) {
            pixel.blend(&paint);
        }
    }
}

/// On/off run lengths, in pixels, of each dashed pen.
fn dash_pattern(style: PenStyle) -> &'static [u32] {
    match style {
        PenStyle::DashLine => &[4, 2],
        PenStyle::DotLine => &[1, 2],
        PenStyle::DashDotLine => &[4, 2, 1, 2],
        PenStyle::DashDotDotLine => &[4, 2, 1, 2, 1, 2],
        PenStyle::SolidLine | PenStyle::NoPen => &[],
    }
}

fn stroke(image: &mut RgbaImage, span: &Span, style: PenStyle, color: Color) {
    let pattern = dash_pattern(style);
    let period: u32 = pattern.iter().sum();
    let paint = Rgba(color.to_rgba());
    for (step, (x, y)) in span.perimeter().into_iter().enumerate() {
        if period == 0 || dash_on(pattern, step as u32 % period) {
            image.get_pixel_mut(x, y).blend(&paint);
        }
    }
}

fn dash_on(pattern: &[u32], mut offset: u32) -> bool {
    for (index, run) in pattern.iter().enumerate() {
        if offset < *run {
            return index % 2 == 0;
        }
        offset -= run;
    }
    false
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory document backend.
//
// Pages are described as a size, a list of text boxes and a list of filled
// rectangles. Rendering is deterministic: the background is white, each
// rectangle is filled with its color and each text box is drawn as a solid
// dark glyph block. Used by tests, benchmarks and demos where no PDF engine
// is available.

use diffpdf_core::error::{DiffPdfError, Result};
use diffpdf_core::{Color, PixelRect, RectF, SizeF, TextBox};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::{SourceDocument, SourcePage};
use crate::raster;

/// Ink color used for text glyph blocks.
const GLYPH_INK: Color = Color::rgb(40, 40, 40);

/// A synthetic page.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    size: SizeF,
    text: Vec<TextBox>,
    shapes: Vec<(RectF, Color)>,
    readable: bool,
}

impl MemoryPage {
    /// A blank page of `width` x `height` points.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SizeF::new(width, height),
            text: Vec::new(),
            shapes: Vec::new(),
            readable: true,
        }
    }

    /// US Letter, 612 x 792 points.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Add a text box at `rect` (points).
    pub fn with_text(mut self, rect: RectF, text: impl Into<String>) -> Self {
        self.text.push(TextBox::new(rect, text));
        self
    }

    /// Add a filled rectangle at `rect` (points).
    pub fn with_rect(mut self, rect: RectF, color: Color) -> Self {
        self.shapes.push((rect, color));
        self
    }

    /// Make page lookup fail, simulating a damaged page.
    pub fn unreadable(mut self) -> Self {
        self.readable = false;
        self
    }

    fn paint(canvas: &mut RgbaImage, rect: &RectF, scale: f32, color: Color) {
        let x0 = (rect.left() * scale).round().max(0.0) as i32;
        let y0 = (rect.top() * scale).round().max(0.0) as i32;
        let x1 = (rect.right() * scale).round() as i32;
        let y1 = (rect.bottom() * scale).round() as i32;
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        draw_filled_rect_mut(
            canvas,
            Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32),
            Rgba(color.to_rgba()),
        );
    }
}

impl SourcePage for MemoryPage {
    fn size(&self) -> SizeF {
        self.size
    }

    fn render(&self, dpi: f32, region: Option<PixelRect>) -> Result<RgbaImage> {
        if dpi <= 0.0 {
            return Err(DiffPdfError::Render(format!("invalid resolution {dpi}")));
        }
        let scale = dpi / diffpdf_core::POINTS_PER_INCH;
        let width = (self.size.width * scale).round().max(1.0) as u32;
        let height = (self.size.height * scale).round().max(1.0) as u32;

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(Color::WHITE.to_rgba()));
        for (rect, color) in &self.shapes {
            Self::paint(&mut canvas, rect, scale, *color);
        }
        for text_box in &self.text {
            Self::paint(&mut canvas, &text_box.rect, scale, GLYPH_INK);
        }

        Ok(match region {
            Some(region) => raster::crop(&canvas, region),
            None => canvas,
        })
    }

    fn text_boxes(&self) -> Result<Vec<TextBox>> {
        Ok(self.text.clone())
    }
}

/// A synthetic document made of [`MemoryPage`]s.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    name: String,
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }
}

impl SourceDocument for MemoryDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn SourcePage + '_>> {
        match self.pages.get(index) {
            Some(page) if page.readable => Ok(Box::new(page.clone())),
            _ => Err(DiffPdfError::UnreadablePage {
                document: self.name.clone(),
                page: index + 1,
            }),
        }
    }
}

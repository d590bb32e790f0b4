// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pdfium backend — render pages and extract positioned text through the
// `pdfium-render` bindings. Only compiled with the "pdfium" feature.

use std::path::Path;

use diffpdf_core::error::{DiffPdfError, Result};
use diffpdf_core::{POINTS_PER_INCH, PixelRect, RectF, SizeF, TextBox};
use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use super::{DocumentLoader, SourceDocument, SourcePage};
use crate::raster;

/// Loads documents through a dynamically bound pdfium library.
pub struct PdfiumLoader {
    pdfium: Pdfium,
}

impl PdfiumLoader {
    /// Bind to pdfium in the working directory, falling back to the system
    /// library search path.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| {
                DiffPdfError::BackendUnavailable(format!("failed to load the pdfium library: {err:?}"))
            })?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl DocumentLoader for PdfiumLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn open(&self, path: &Path) -> Result<Box<dyn SourceDocument + '_>> {
        let name = path.display().to_string();
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|err| match err {
                PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                    DiffPdfError::LockedDocument(name.clone())
                }
                other => {
                    debug!(error = ?other, "pdfium rejected document");
                    DiffPdfError::InvalidDocument(name.clone())
                }
            })?;
        info!(pages = document.pages().len(), "Opened {}", name);
        Ok(Box::new(PdfiumDocument { name, document }))
    }
}

struct PdfiumDocument<'a> {
    name: String,
    document: PdfDocument<'a>,
}

impl SourceDocument for PdfiumDocument<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<Box<dyn SourcePage + '_>> {
        let unreadable = || DiffPdfError::UnreadablePage {
            document: self.name.clone(),
            page: index + 1,
        };
        let page_index = PdfPageIndex::try_from(index).map_err(|_| unreadable())?;
        let page = self.document.pages().get(page_index).map_err(|_| unreadable())?;
        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl SourcePage for PdfiumPage<'_> {
    fn size(&self) -> SizeF {
        SizeF::new(self.page.width().value, self.page.height().value)
    }

    fn render(&self, dpi: f32, region: Option<PixelRect>) -> Result<RgbaImage> {
        let scale = dpi / POINTS_PER_INCH;
        let size = self.size();
        let width = (size.width * scale).round().max(1.0) as u32;
        let height = (size.height * scale).round().max(1.0) as u32;
        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);
        let bitmap = self
            .page
            .render_with_config(&config)
            .map_err(|err| DiffPdfError::Render(format!("pdfium render failed: {err:?}")))?;
        let image = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            DiffPdfError::Render(format!("unexpected bitmap size for {width}x{height} page"))
        })?;
        Ok(match region {
            Some(region) => raster::crop(&image, region),
            None => image,
        })
    }

    /// Words built from the page's characters, split on whitespace and on
    /// line changes. Pdfium reports bottom-up coordinates; they are flipped
    /// to a top-left origin here.
    fn text_boxes(&self) -> Result<Vec<TextBox>> {
        let page_height = self.page.height().value;
        let text = self
            .page
            .text()
            .map_err(|err| DiffPdfError::PdfError(format!("text extraction failed: {err:?}")))?;

        let mut boxes = Vec::new();
        let mut word: Option<TextBox> = None;
        for ch in text.chars().iter() {
            let Some(glyph) = ch.unicode_char() else {
                continue;
            };
            if glyph.is_whitespace() {
                boxes.extend(word.take());
                continue;
            }
            let Ok(bounds) = ch.loose_bounds() else {
                continue;
            };
            let rect = RectF::new(
                bounds.left().value,
                page_height - bounds.top().value,
                bounds.right().value - bounds.left().value,
                bounds.top().value - bounds.bottom().value,
            );
            word = match word.take() {
                Some(mut current) if continues_word(&current.rect, &rect) => {
                    current.rect = current.rect.united(&rect);
                    current.text.push(glyph);
                    Some(current)
                }
                previous => {
                    boxes.extend(previous);
                    Some(TextBox::new(rect, glyph.to_string()))
                }
            };
        }
        boxes.extend(word);
        Ok(boxes)
    }
}

/// A glyph continues a word when it sits on the same line just after it.
fn continues_word(word: &RectF, glyph: &RectF) -> bool {
    let same_line = (word.bottom() - glyph.bottom()).abs() <= glyph.height.max(1.0) / 2.0;
    let adjacent = glyph.left() >= word.left() && glyph.left() - word.right() <= glyph.height;
    same_line && adjacent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_on_one_line_join_a_word() {
        let word = RectF::new(10.0, 10.0, 20.0, 10.0);
        assert!(continues_word(&word, &RectF::new(30.5, 10.0, 5.0, 10.0)));
        assert!(!continues_word(&word, &RectF::new(10.0, 30.0, 5.0, 10.0)));
        assert!(!continues_word(&word, &RectF::new(0.0, 10.0, 5.0, 10.0)));
    }
}

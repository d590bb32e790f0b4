// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble composed page images into a PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. The same pages always serialise to the same bytes:
// images get sequential XObject names and the trailer `/ID` is a digest of
// the page pixels.

use std::path::Path;

use diffpdf_core::error::{DiffPdfError, Result};
use image::RgbaImage;
use lopdf::{Object, StringFormat};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObject, XObjectId, XObjectTransform,
};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

const MM_PER_INCH: f32 = 25.4;

/// Builds a PDF with one full-bleed image per page.
///
/// Each page is sized so the image, placed at `dpi`, covers it exactly.
pub struct PdfWriter {
    document: PdfDocument,
    pages: Vec<PdfPage>,
    dpi: f32,
    content_hash: Sha256,
}

impl PdfWriter {
    pub fn new(title: &str, dpi: f32) -> Self {
        Self {
            document: PdfDocument::new(title),
            pages: Vec::new(),
            dpi,
            content_hash: Sha256::new(),
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a page showing `image`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn add_page(&mut self, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        let rgb = flatten_rgb(image);
        self.content_hash.update(width.to_be_bytes());
        self.content_hash.update(height.to_be_bytes());
        self.content_hash.update(&rgb);

        let raw = RawImage {
            pixels: RawImageData::U8(rgb),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        // `PdfDocument::add_image` picks a random name; register under a
        // sequential one instead.
        let xobject_id = XObjectId(format!("Im{}", self.pages.len() + 1));
        self.document
            .resources
            .xobjects
            .map
            .insert(xobject_id.clone(), XObject::Image(raw));

        let page_w = Mm(width as f32 / self.dpi * MM_PER_INCH);
        let page_h = Mm(height as f32 / self.dpi * MM_PER_INCH);
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(self.dpi),
                rotate: None,
            },
        }];

        self.pages.push(PdfPage::new(page_w, page_h, ops));
        debug!(page = self.pages.len(), page_w_mm = page_w.0, page_h_mm = page_h.0, "Page added");
    }

    /// Serialise the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let page_total = self.pages.len();
        self.document.with_pages(self.pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let saved = self
            .document
            .save(&PdfSaveOptions::default(), &mut warnings);

        let digest = self.content_hash.finalize();
        let output = with_document_id(&saved, &digest[..16])?;
        debug!(
            pages = page_total,
            warnings = warnings.len(),
            output_bytes = output.len(),
            "PDF serialised"
        );
        Ok(output)
    }

    /// Serialise the document and write it to `path`.
    pub fn write_to_file(self, path: &Path) -> Result<()> {
        let pages = self.pages.len();
        let bytes = self.finish()?;
        std::fs::write(path, &bytes).map_err(|err| DiffPdfError::OutputWrite {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        info!(pages, "Wrote PDF to {}", path.display());
        Ok(())
    }
}

/// Replace the random trailer `/ID` printpdf writes with `id`, used for both
/// the permanent and the changing identifier.
fn with_document_id(pdf: &[u8], id: &[u8]) -> Result<Vec<u8>> {
    let mut document = lopdf::Document::load_mem(pdf)
        .map_err(|err| DiffPdfError::PdfError(format!("cannot reload generated PDF: {err}")))?;
    let id = Object::String(id.to_vec(), StringFormat::Hexadecimal);
    document.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| DiffPdfError::PdfError(format!("cannot serialise PDF: {err}")))?;
    Ok(output)
}

/// Drop alpha by compositing over white. Composed pages are opaque, so this
/// is normally a plain channel drop.
fn flatten_rgb(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let over_white = |channel: u8| -> u8 {
            ((channel as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        rgb.extend_from_slice(&[over_white(r), over_white(g), over_white(b)]);
    }
    rgb
}

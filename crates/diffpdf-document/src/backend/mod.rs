// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document backend abstraction.
//
// The comparison pipeline only needs three things from a page: its size in
// points, a raster rendering at a given resolution, and its positioned text
// runs. Everything else about a PDF engine stays behind these traits.
//
// Backends are not required to be thread-safe. The pipeline calls them from a
// single thread and moves only owned images and text into its worker pool.

pub mod memory;
#[cfg(feature = "pdfium")]
pub mod pdfium;

use std::path::Path;

use diffpdf_core::error::Result;
use diffpdf_core::{PixelRect, SizeF, TextBox};
use image::RgbaImage;

pub use memory::{MemoryDocument, MemoryPage};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumLoader;

/// One page of a source document.
pub trait SourcePage {
    /// Page size in points.
    fn size(&self) -> SizeF;

    /// Rasterise the page at `dpi` (both axes). When `region` is given, only
    /// that pixel sub-rectangle of the full rendering is returned.
    fn render(&self, dpi: f32, region: Option<PixelRect>) -> Result<RgbaImage>;

    /// Positioned text runs in points, top-left origin, in content order.
    fn text_boxes(&self) -> Result<Vec<TextBox>>;
}

/// An opened, read-only, 0-indexed collection of pages.
pub trait SourceDocument {
    /// Display name, normally the path the document was opened from.
    fn name(&self) -> &str;

    fn page_count(&self) -> usize;

    /// Look up a page. Fails with `UnreadablePage` when the page cannot be read.
    fn page(&self, index: usize) -> Result<Box<dyn SourcePage + '_>>;
}

/// Opens documents from the filesystem.
pub trait DocumentLoader {
    /// Open `path`, failing with `InvalidDocument` or `LockedDocument`.
    fn open(&self, path: &Path) -> Result<Box<dyn SourceDocument + '_>>;
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF probe — structural check of an input document with `lopdf` before it
// is handed to the rendering backend.

use std::path::Path;

use diffpdf_core::error::{DiffPdfError, Result};
use lopdf::Document;
use tracing::{debug, info, instrument};

/// A parsed, unlocked PDF whose page tree is readable.
///
/// Opening a probe tells an unparseable file apart from an encrypted one, so
/// the caller can report `InvalidDocument` and `LockedDocument` distinctly
/// whatever backend later renders the pages.
#[derive(Debug)]
pub struct PdfProbe {
    document: Document,
    source_path: String,
}

impl PdfProbe {
    /// Parse the PDF at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let source_path = path_ref.display().to_string();
        info!("Probing PDF: {}", source_path);

        let document = Document::load(path_ref).map_err(|err| match err {
            lopdf::Error::Decryption(_) => DiffPdfError::LockedDocument(source_path.clone()),
            other => {
                debug!(%other, "lopdf rejected document");
                DiffPdfError::InvalidDocument(source_path.clone())
            }
        })?;
        Self::checked(document, source_path)
    }

    /// Parse a PDF already in memory. `name` is used in error messages.
    #[instrument(skip(data), fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8], name: &str) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| match err {
            lopdf::Error::Decryption(_) => DiffPdfError::LockedDocument(name.to_string()),
            _ => DiffPdfError::InvalidDocument(name.to_string()),
        })?;
        Self::checked(document, name.to_string())
    }

    fn checked(document: Document, source_path: String) -> Result<Self> {
        if document.is_encrypted() {
            return Err(DiffPdfError::LockedDocument(source_path));
        }
        let pages = document.get_pages().len();
        if pages == 0 {
            debug!("Document has an empty page tree");
        }
        debug!(pages, "PDF probed");
        Ok(Self {
            document,
            source_path,
        })
    }

    /// Number of pages in the document's page tree.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::PdfWriter;
    use image::{Rgba, RgbaImage};

    #[test]
    fn garbage_bytes_are_an_invalid_document() {
        let err = PdfProbe::from_bytes(b"definitely not a pdf", "junk.pdf").unwrap_err();
        assert!(matches!(err, DiffPdfError::InvalidDocument(name) if name == "junk.pdf"));
    }

    #[test]
    fn missing_file_is_an_invalid_document() {
        let err = PdfProbe::open("/nonexistent/diffpdf/input.pdf").unwrap_err();
        assert!(matches!(err, DiffPdfError::InvalidDocument(_)));
    }

    #[test]
    fn written_pdf_probes_with_its_page_count() {
        let mut writer = PdfWriter::new("probe test", 72.0);
        let page = RgbaImage::from_pixel(20, 30, Rgba([255, 255, 255, 255]));
        writer.add_page(&page);
        writer.add_page(&page);
        let bytes = writer.finish().unwrap();

        let probe = PdfProbe::from_bytes(&bytes, "written.pdf").unwrap();
        assert_eq!(probe.page_count(), 2);
        assert_eq!(probe.source_path(), "written.pdf");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpdf-document — Page-by-page comparison of two PDF documents.
//
// Provides page selection, text tokenizing and alignment, page-pair
// classification, text and visual difference location, highlight painting and
// composition, output page layout with PDF / PNG writers, and the pipeline
// that drives them over a pluggable document backend.

pub mod backend;
pub mod diff;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod select;
pub mod text;

// Re-export the primary entry points so callers can use `diffpdf_document::Differ` etc.
pub use backend::{DocumentLoader, MemoryDocument, MemoryPage, SourceDocument, SourcePage};
pub use output::{WriteFailure, WriteReport};
pub use pdf::{PdfProbe, PdfWriter};
pub use pipeline::{CancelToken, DiffReport, Differ, RunSummary};

#[cfg(feature = "pdfium")]
pub use backend::PdfiumLoader;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output sinks — receive composed pages in order and write them as one PDF
// or as numbered PNG files.
//
// Write failures never abort a run. Each failed file is logged, recorded in the
// `WriteReport` and the remaining pages are still attempted.

use std::path::{Path, PathBuf};

use diffpdf_core::OutputFormat;
use image::RgbaImage;
use serde::Serialize;
use tracing::{info, warn};

use super::naming::numbered_image_path;
use crate::pdf::PdfWriter;
use crate::raster::save_png;

/// One file that could not be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Files written by a sink and the ones that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<WriteFailure>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: WriteReport) {
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }

    fn record(&mut self, path: PathBuf, result: diffpdf_core::Result<()>) {
        match result {
            Ok(()) => self.written.push(path),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to write output");
                self.failures.push(WriteFailure {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Destination for composed output pages.
pub trait PageSink {
    /// Accept the next page. Pages arrive in output order.
    fn push(&mut self, page: &RgbaImage);

    /// Flush everything still pending.
    fn finish(self: Box<Self>) -> WriteReport;
}

/// Open the sink for `format` writing to `path`.
pub fn open_sink(format: OutputFormat, path: &Path, dpi: f32) -> Box<dyn PageSink> {
    match format {
        OutputFormat::Pdf => Box::new(PdfSink::new(path, dpi)),
        OutputFormat::Png => Box::new(PngSink::new(path)),
    }
}

/// Collects pages into a single PDF written on [`PageSink::finish`]. No file
/// is created when no page was pushed.
pub struct PdfSink {
    path: PathBuf,
    writer: PdfWriter,
}

impl PdfSink {
    pub fn new(path: &Path, dpi: f32) -> Self {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "DiffPDF".to_string());
        Self {
            path: path.to_path_buf(),
            writer: PdfWriter::new(&title, dpi),
        }
    }
}

impl PageSink for PdfSink {
    fn push(&mut self, page: &RgbaImage) {
        self.writer.add_page(page);
    }

    fn finish(self: Box<Self>) -> WriteReport {
        let mut report = WriteReport::default();
        if self.writer.page_count() == 0 {
            info!(path = %self.path.display(), "No pages to write");
            return report;
        }
        let PdfSink { path, writer } = *self;
        let result = writer.write_to_file(&path);
        report.record(path, result);
        report
    }
}

/// Writes each page immediately as `<base>-N.<ext>`, N counting from 1.
pub struct PngSink {
    base: PathBuf,
    count: usize,
    report: WriteReport,
}

impl PngSink {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            count: 0,
            report: WriteReport::default(),
        }
    }
}

impl PageSink for PngSink {
    fn push(&mut self, page: &RgbaImage) {
        self.count += 1;
        let path = numbered_image_path(&self.base, self.count);
        let result = save_png(page, &path);
        self.report.record(path, result);
    }

    fn finish(self: Box<Self>) -> WriteReport {
        info!(
            written = self.report.written.len(),
            failed = self.report.failures.len(),
            "Image output complete"
        );
        self.report
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline — classify page pairs, highlight the differing ones and hand the
// composed pages to the output sinks in order.
//
// Backend access stays on the calling thread. For each batch of differing
// pairs the renderings and tokens are loaded sequentially into owned values,
// highlighted in parallel on a dedicated rayon pool, and then composed and
// written strictly in pair order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use diffpdf_core::error::{DiffPdfError, Result};
use diffpdf_core::{
    ComparisonMode, DiffConfig, Difference, PagePair, PixelRect, RectF, SavePages, Token,
};
use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::backend::SourceDocument;
use crate::diff::text::page_tokens;
use crate::diff::{classify, text_highlights, visual_highlights};
use crate::output::{PageSink, WriteReport, compose_page, open_sink, separate_path};
use crate::render::{HighlightStyle, composite, paint_highlights};
use crate::select::{pair_pages, parse_page_range};

/// Shared flag asking a running comparison to stop at the next page pair.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(DiffPdfError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Everything needed to highlight one page pair, owned so it can move into
/// the worker pool.
#[derive(Debug)]
pub struct PairInput {
    pub pair: PagePair,
    pub left: RgbaImage,
    pub right: RgbaImage,
    /// Token sequences of both sides in text modes.
    pub tokens: Option<(Vec<Token>, Vec<Token>)>,
    /// Pixel region compared in visual mode when margins are set.
    pub inclusion: Option<PixelRect>,
}

/// Highlight regions for both sides of a pair, in output pixels.
pub fn compute_regions(input: &PairInput, config: &DiffConfig) -> (Vec<RectF>, Vec<RectF>) {
    match &input.tokens {
        Some((left, right)) => text_highlights(left, right, config.dpi(), config),
        None => {
            let regions =
                visual_highlights(&input.left, &input.right, config.square_size, input.inclusion);
            (regions.clone(), regions)
        }
    }
}

/// Produce the left and right output renderings of a pair. In composition
/// mode the left rendering is kept and the right one is replaced by the
/// composite of both.
pub fn highlight_pair(input: PairInput, config: &DiffConfig) -> (RgbaImage, RgbaImage) {
    if let (ComparisonMode::Visual, Some(mode)) = (config.mode, config.composition) {
        let composed = composite(&input.left, &input.right, mode);
        return (input.left, composed);
    }
    let (regions_left, regions_right) = compute_regions(&input, config);
    debug!(
        left_page = input.pair.left,
        right_page = input.pair.right,
        left_regions = regions_left.len(),
        right_regions = regions_right.len(),
        "Highlights computed"
    );
    let style = HighlightStyle::from_config(config);
    let PairInput {
        mut left,
        mut right,
        ..
    } = input;
    if !regions_left.is_empty() {
        paint_highlights(&mut left, &regions_left, &style, config.square_size);
    }
    if !regions_right.is_empty() {
        paint_highlights(&mut right, &regions_right, &style, config.square_size);
    }
    (left, right)
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Differing page pairs in output order.
    pub pairs: Vec<PagePair>,
    /// Pairs that differed but could not be rendered.
    pub skipped: usize,
    pub report: WriteReport,
}

/// One entry of the JSON diff report, with 1-based page numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedPair {
    pub left_page: usize,
    pub right_page: usize,
    pub visual_difference: bool,
}

/// Serialisable summary written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub left: String,
    pub right: String,
    pub pairs: Vec<ReportedPair>,
    pub skipped: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<crate::output::WriteFailure>,
}

impl RunSummary {
    pub fn to_report(&self, left: &str, right: &str) -> DiffReport {
        DiffReport {
            left: left.to_string(),
            right: right.to_string(),
            pairs: self
                .pairs
                .iter()
                .map(|pair| ReportedPair {
                    left_page: pair.left + 1,
                    right_page: pair.right + 1,
                    visual_difference: pair.has_visual_difference,
                })
                .collect(),
            skipped: self.skipped,
            written: self.report.written.clone(),
            failures: self.report.failures.clone(),
        }
    }
}

/// Compares two documents with one configuration.
pub struct Differ<'a> {
    config: &'a DiffConfig,
    left: &'a dyn SourceDocument,
    right: &'a dyn SourceDocument,
    cancel: CancelToken,
}

impl<'a> Differ<'a> {
    pub fn new(
        config: &'a DiffConfig,
        left: &'a dyn SourceDocument,
        right: &'a dyn SourceDocument,
    ) -> Self {
        Self {
            config,
            left,
            right,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Classify the selected page pairs and return the differing ones.
    ///
    /// Pages are paired in lock-step. A pair whose pages cannot be read or
    /// classified is logged and skipped.
    #[instrument(skip(self), fields(left = self.left.name(), right = self.right.name(), mode = %self.config.mode))]
    pub fn generate_diff_statuses(&self) -> Result<Vec<PagePair>> {
        let left_pages = parse_page_range(&self.config.pages_doc1, self.left.page_count())?;
        let right_pages = parse_page_range(&self.config.pages_doc2, self.right.page_count())?;
        let pairs = pair_pages(&left_pages, &right_pages);
        info!(pairs = pairs.len(), "Comparing page pairs");

        let mut statuses = Vec::new();
        for (left_index, right_index) in pairs {
            self.cancel.check()?;
            match self.classify_pair(left_index, right_index) {
                Ok(Difference::None) => {}
                Ok(difference) => {
                    debug!(left_index, right_index, ?difference, "Pages differ");
                    statuses.push(PagePair::new(
                        left_index,
                        right_index,
                        difference == Difference::Visual,
                    ));
                }
                Err(err) => {
                    warn!(left_index, right_index, error = %err, "Skipping page pair");
                }
            }
        }
        info!(differing = statuses.len(), "Classification complete");
        Ok(statuses)
    }

    fn classify_pair(&self, left_index: usize, right_index: usize) -> Result<Difference> {
        let left_page = self.left.page(left_index)?;
        let right_page = self.right.page(right_index)?;
        classify(
            left_page.as_ref(),
            right_page.as_ref(),
            self.config.mode,
            self.config.margins.as_ref(),
        )
    }

    /// Load the renderings (and tokens in text modes) of a pair at the
    /// output resolution.
    pub fn load_pair(&self, pair: PagePair) -> Result<PairInput> {
        let dpi = self.config.dpi();
        let left_page = self.left.page(pair.left)?;
        let right_page = self.right.page(pair.right)?;
        let left = left_page.render(dpi, None)?;
        let right = right_page.render(dpi, None)?;

        let tokens = if self.config.compares_text() {
            Some((
                page_tokens(left_page.as_ref(), left_page.as_ref(), self.config, 1)?,
                page_tokens(right_page.as_ref(), left_page.as_ref(), self.config, 2)?,
            ))
        } else {
            None
        };
        let inclusion = match (&tokens, &self.config.margins) {
            (None, Some(margins)) => Some(margins.pixel_rect(left.width(), left.height(), dpi)),
            _ => None,
        };
        Ok(PairInput {
            pair,
            left,
            right,
            tokens,
            inclusion,
        })
    }

    /// Render `statuses` into `sink`, showing `pages`. Returns the number of
    /// pairs that had to be skipped.
    #[instrument(skip(self, statuses, sink), fields(pairs = statuses.len()))]
    pub fn render_pages(
        &self,
        statuses: &[PagePair],
        pages: SavePages,
        sink: &mut dyn PageSink,
    ) -> Result<usize> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|err| {
                DiffPdfError::InvalidConfiguration(format!("cannot start worker pool: {err}"))
            })?;
        let batch_size = pool.current_num_threads().max(1) * 2;
        let mut skipped = 0;

        for batch in statuses.chunks(batch_size) {
            let mut inputs = Vec::with_capacity(batch.len());
            for pair in batch {
                self.cancel.check()?;
                match self.load_pair(*pair) {
                    Ok(input) => inputs.push(input),
                    Err(err) => {
                        skipped += 1;
                        warn!(
                            left_page = pair.left,
                            right_page = pair.right,
                            error = %err,
                            "Skipping page pair"
                        );
                    }
                }
            }

            let config = self.config;
            let rendered: Vec<(RgbaImage, RgbaImage)> = pool.install(|| {
                inputs
                    .into_par_iter()
                    .map(|input| highlight_pair(input, config))
                    .collect()
            });
            for (left, right) in &rendered {
                sink.push(&compose_page(left, right, pages));
            }
        }
        Ok(skipped)
    }

    /// Where each output pass goes: one combined output, or one per document.
    pub fn output_plan(&self) -> Result<Vec<(SavePages, PathBuf)>> {
        let format = self.config.output_format;
        if self.config.print_separate {
            return Ok(vec![
                (SavePages::Left, separate_path(Path::new(self.left.name()), format)),
                (SavePages::Right, separate_path(Path::new(self.right.name()), format)),
            ]);
        }
        let output = self.config.output.clone().ok_or_else(|| {
            DiffPdfError::InvalidConfiguration(
                "must supply an output file if not printing two separate diffs".into(),
            )
        })?;
        Ok(vec![(SavePages::Both, output)])
    }

    /// Run the whole comparison and write every output. Nothing is written
    /// when no page pair differs.
    #[instrument(skip(self), fields(left = self.left.name(), right = self.right.name()))]
    pub fn run(&self) -> Result<RunSummary> {
        let plan = self.output_plan()?;
        let pairs = self.generate_diff_statuses()?;
        let mut summary = RunSummary {
            pairs,
            ..RunSummary::default()
        };
        if summary.pairs.is_empty() {
            info!("No differences found");
            return Ok(summary);
        }

        for (pages, path) in plan {
            let mut sink = open_sink(self.config.output_format, &path, self.config.dpi());
            summary.skipped += self.render_pages(&summary.pairs, pages, sink.as_mut())?;
            summary.report.merge(sink.finish());
        }
        info!(
            pairs = summary.pairs.len(),
            written = summary.report.written.len(),
            failed = summary.report.failures.len(),
            "Comparison complete"
        );
        Ok(summary)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Comparison configuration.
//
// A `DiffConfig` is built once (from the command line, a JSON file, or the
// builder), validated once, and then shared read-only by every component.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DiffPdfError, Result};
use crate::types::{
    BrushStyle, Color, ComparisonMode, CompositionMode, DebugTexts, Margins, OutputFormat,
    POINTS_PER_INCH, PenStyle,
};

/// Settings for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Comparison granularity.
    pub mode: ComparisonMode,
    /// Combined side-by-side output file.
    pub output: Option<PathBuf>,
    /// Write one single-sided output per source document instead.
    pub print_separate: bool,
    /// Container written for each output.
    pub output_format: OutputFormat,
    /// Page-range expression for the first document (empty = all pages).
    pub pages_doc1: String,
    /// Page-range expression for the second document (empty = all pages).
    pub pages_doc2: String,
    /// Composite the renderings instead of highlighting (visual mode only).
    pub composition: Option<CompositionMode>,
    /// Merge adjacent highlighted words or characters.
    pub combine_highlight: bool,
    /// Merge tolerance in device pixels for text highlights.
    pub overlap: u32,
    /// Tile edge length for visual comparison, in device pixels.
    pub square_size: u32,
    /// Multiplier applied to 72 DPI for the output rendering.
    pub zoom: u32,
    /// Highlight opacity in percent.
    pub opacity: u8,
    pub pen_style: PenStyle,
    pub pen_color: Color,
    pub brush_style: BrushStyle,
    pub brush_color: Color,
    /// Page-edge bands excluded from comparison.
    pub margins: Option<Margins>,
    /// Worker threads for highlighting; 0 means one per CPU.
    pub jobs: usize,
    pub debug: DebugTexts,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            mode: ComparisonMode::Words,
            output: None,
            print_separate: false,
            output_format: OutputFormat::Pdf,
            pages_doc1: String::new(),
            pages_doc2: String::new(),
            composition: None,
            combine_highlight: false,
            overlap: 5,
            square_size: 5,
            zoom: 2,
            opacity: 50,
            pen_style: PenStyle::NoPen,
            pen_color: Color::TOMATO,
            brush_style: BrushStyle::SolidPattern,
            brush_color: Color::TOMATO,
            margins: None,
            jobs: 0,
            debug: DebugTexts::Off,
        }
    }
}

impl DiffConfig {
    pub fn builder() -> DiffConfigBuilder {
        DiffConfigBuilder::default()
    }

    /// Output rendering resolution.
    pub fn dpi(&self) -> f32 {
        POINTS_PER_INCH * self.zoom as f32
    }

    /// True when the run compares text rather than pixels.
    pub fn compares_text(&self) -> bool {
        self.mode != ComparisonMode::Visual
    }

    /// Outline color with the configured opacity applied.
    pub fn pen(&self) -> Color {
        self.pen_color.with_opacity(self.opacity)
    }

    /// Fill color with the configured opacity applied.
    pub fn brush(&self) -> Color {
        self.brush_color.with_opacity(self.opacity)
    }

    /// Check every cross-field constraint. Soft recommendations are logged as
    /// warnings and do not fail validation.
    pub fn validate(&self) -> Result<()> {
        if self.composition.is_some() && self.mode != ComparisonMode::Visual {
            return Err(DiffPdfError::InvalidConfiguration(
                "compositionMode can only be used with visual comparison".into(),
            ));
        }
        match (&self.output, self.print_separate) {
            (None, false) => {
                return Err(DiffPdfError::InvalidConfiguration(
                    "must supply an output file if not printing two separate diffs".into(),
                ));
            }
            (Some(_), true) => {
                return Err(DiffPdfError::InvalidConfiguration(
                    "cannot combine print-separate with an output path".into(),
                ));
            }
            _ => {}
        }
        if self.square_size == 0 {
            return Err(DiffPdfError::InvalidConfiguration(
                "squareSize must be at least 1".into(),
            ));
        }
        if self.zoom == 0 {
            return Err(DiffPdfError::InvalidConfiguration(
                "zoom must be at least 1".into(),
            ));
        }
        if self.opacity > 100 {
            return Err(DiffPdfError::InvalidConfiguration(format!(
                "opacity must be between 0 and 100, got {}",
                self.opacity
            )));
        }

        if self.square_size < 2 {
            warn!(square_size = self.square_size, "squareSize recommended to be >= 2");
        }
        if self.zoom > 8 {
            warn!(zoom = self.zoom, "zoom should be between 1 and 8");
        }
        if self.opacity == 0 {
            warn!("opacity 0 makes highlights invisible; should be between 1 and 100");
        }
        Ok(())
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DiffConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Incremental construction of a validated [`DiffConfig`].
#[derive(Debug, Clone, Default)]
pub struct DiffConfigBuilder {
    config: DiffConfig,
}

impl DiffConfigBuilder {
    pub fn mode(mut self, mode: ComparisonMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    pub fn print_separate(mut self, separate: bool) -> Self {
        self.config.print_separate = separate;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn pages(mut self, doc1: impl Into<String>, doc2: impl Into<String>) -> Self {
        self.config.pages_doc1 = doc1.into();
        self.config.pages_doc2 = doc2.into();
        self
    }

    pub fn composition(mut self, mode: CompositionMode) -> Self {
        self.config.composition = Some(mode);
        self
    }

    pub fn combine_highlight(mut self, combine: bool) -> Self {
        self.config.combine_highlight = combine;
        self
    }

    pub fn overlap(mut self, overlap: u32) -> Self {
        self.config.overlap = overlap;
        self
    }

    pub fn square_size(mut self, size: u32) -> Self {
        self.config.square_size = size;
        self
    }

    pub fn zoom(mut self, zoom: u32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.config.opacity = opacity;
        self
    }

    pub fn pen(mut self, style: PenStyle, color: Color) -> Self {
        self.config.pen_style = style;
        self.config.pen_color = color;
        self
    }

    pub fn brush(mut self, style: BrushStyle, color: Color) -> Self {
        self.config.brush_style = style;
        self.config.brush_color = color;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.config.margins = Some(margins);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn debug(mut self, debug: DebugTexts) -> Self {
        self.config.debug = debug;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<DiffConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

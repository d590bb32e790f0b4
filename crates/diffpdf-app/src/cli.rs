// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their translation into a `DiffConfig`.

use std::path::PathBuf;

use clap::Parser;
use diffpdf_core::error::Result;
use diffpdf_core::{
    BrushStyle, Color, ComparisonMode, CompositionMode, DebugTexts, DiffConfig, Margins,
    OutputFormat, PenStyle,
};

#[derive(Parser, Debug)]
#[command(name = "diffpdf")]
#[command(about = "Compare two PDF documents page by page and write highlighted differences", long_about = None)]
pub struct Cli {
    /// First (left) PDF file
    #[arg(value_name = "FILE1")]
    pub file1: PathBuf,

    /// Second (right) PDF file
    #[arg(value_name = "FILE2")]
    pub file2: PathBuf,

    /// Compare rendered pixels
    #[arg(short = 'V', long, conflicts_with_all = ["characters", "words"])]
    pub visual: bool,

    /// Compare text character by character
    #[arg(short = 'c', long, conflicts_with = "words")]
    pub characters: bool,

    /// Compare text word by word (the default)
    #[arg(short = 'w', long)]
    pub words: bool,

    /// Combined side-by-side output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write one output per document, named <document>.diff.pdf
    #[arg(short = 's', long = "printSeparate", alias = "print-separate")]
    pub print_separate: bool,

    /// Pages of the first document, e.g. "1-3,5"
    #[arg(long = "pagesDoc1", alias = "pages-doc1", default_value = "")]
    pub pages_doc1: String,

    /// Pages of the second document
    #[arg(long = "pagesDoc2", alias = "pages-doc2", default_value = "")]
    pub pages_doc2: String,

    /// Composite the pages instead of highlighting (visual mode only):
    /// Difference, Exclusion, SourceXorDestination, NotSourceXorDestination
    #[arg(long = "compositionMode", alias = "composition-mode")]
    pub composition: Option<CompositionMode>,

    /// Merge highlights of neighbouring words
    #[arg(short = 'H', long = "combineHighlight", alias = "combine-highlight")]
    pub combine_highlight: bool,

    /// Gap in pixels bridged when combining highlights
    #[arg(long, default_value_t = 5)]
    pub overlap: u32,

    /// Tile edge length in pixels for visual comparison
    #[arg(long = "squareSize", alias = "square-size", default_value_t = 5)]
    pub square_size: u32,

    /// Rendering zoom; output resolution is 72 dpi times this
    #[arg(long, default_value_t = 2)]
    pub zoom: u32,

    /// Highlight opacity in percent
    #[arg(long, default_value_t = 50)]
    pub opacity: u8,

    /// Highlight outline: NoPen, SolidLine, DashLine, DotLine, DashDotLine, DashDotDotLine
    #[arg(long = "penStyle", alias = "pen-style", default_value = "NoPen")]
    pub pen_style: PenStyle,

    /// Highlight outline color (#rrggbb, #rgb or a name)
    #[arg(long = "penColor", alias = "pen-color", default_value = "tomato")]
    pub pen_color: Color,

    /// Highlight fill: NoBrush, SolidPattern, Dense1Pattern..Dense7Pattern,
    /// HorPattern, VerPattern, CrossPattern, BDiagPattern, FDiagPattern, DiagCrossPattern
    #[arg(long = "brushStyle", alias = "brush-style", default_value = "SolidPattern")]
    pub brush_style: BrushStyle,

    /// Highlight fill color
    #[arg(long = "brushColor", alias = "brush-color", default_value = "tomato")]
    pub brush_color: Color,

    /// Points excluded at the top of each page
    #[arg(long = "topMargin", alias = "top-margin")]
    pub top_margin: Option<u32>,

    /// Points excluded at the left of each page
    #[arg(long = "leftMargin", alias = "left-margin")]
    pub left_margin: Option<u32>,

    /// Points excluded at the right of each page
    #[arg(long = "rightMargin", alias = "right-margin")]
    pub right_margin: Option<u32>,

    /// Points excluded at the bottom of each page
    #[arg(long = "bottomMargin", alias = "bottom-margin")]
    pub bottom_margin: Option<u32>,

    /// Write one PNG per differing page instead of a PDF
    #[arg(long)]
    pub images: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Load the whole configuration from a JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Write a JSON report of the differing pages and written files
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Log every compared token
    #[arg(long)]
    pub debug_texts: bool,

    /// Log every compared token, y coordinate first
    #[arg(long, conflicts_with = "debug_texts")]
    pub debug_texts_yx: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    fn mode(&self) -> ComparisonMode {
        if self.visual {
            ComparisonMode::Visual
        } else if self.characters {
            ComparisonMode::Characters
        } else {
            ComparisonMode::Words
        }
    }

    fn margins(&self) -> Option<Margins> {
        let edges = [
            self.top_margin,
            self.left_margin,
            self.right_margin,
            self.bottom_margin,
        ];
        if edges.iter().all(Option::is_none) {
            return None;
        }
        Some(Margins {
            top: self.top_margin.unwrap_or(0),
            left: self.left_margin.unwrap_or(0),
            right: self.right_margin.unwrap_or(0),
            bottom: self.bottom_margin.unwrap_or(0),
        })
    }

    fn debug(&self) -> DebugTexts {
        if self.debug_texts_yx {
            DebugTexts::TextsAndYx
        } else if self.debug_texts {
            DebugTexts::Texts
        } else {
            DebugTexts::Off
        }
    }

    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.verbose || self.debug_texts || self.debug_texts_yx {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build and validate the configuration described by the flags.
    pub fn to_config(&self) -> Result<DiffConfig> {
        let mut builder = DiffConfig::builder()
            .mode(self.mode())
            .print_separate(self.print_separate)
            .output_format(if self.images {
                OutputFormat::Png
            } else {
                OutputFormat::Pdf
            })
            .pages(self.pages_doc1.clone(), self.pages_doc2.clone())
            .combine_highlight(self.combine_highlight)
            .overlap(self.overlap)
            .square_size(self.square_size)
            .zoom(self.zoom)
            .opacity(self.opacity)
            .pen(self.pen_style, self.pen_color)
            .brush(self.brush_style, self.brush_color)
            .jobs(self.jobs)
            .debug(self.debug());
        if let Some(output) = &self.output {
            builder = builder.output(output.clone());
        }
        if let Some(mode) = self.composition {
            builder = builder.composition(mode);
        }
        if let Some(margins) = self.margins() {
            builder = builder.margins(margins);
        }
        builder.build()
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpdf — command-line entry point.
//
// Parses the flags into a validated `DiffConfig`, checks both inputs with the
// lopdf probe, runs the comparison over the PDF backend and maps any error to
// an exit status.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use diffpdf_core::error::{DiffPdfError, Result};
use diffpdf_core::severity::diagnose;
use diffpdf_core::DiffConfig;
use diffpdf_document::{PdfProbe, RunSummary};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            let diagnosis = diagnose(&err);
            tracing::error!(error = %err, severity = ?diagnosis.severity, "diffpdf failed");
            eprintln!("error: {err}");
            eprintln!("hint: {}", diagnosis.hint);
            failure_status(diagnosis.exit_code)
        }
    }
}

/// Process status for a failure. Codes outside 1..=255 are clamped so a
/// failure never reads as success.
fn failure_status(code: i32) -> ExitCode {
    ExitCode::from(failure_code(code))
}

fn failure_code(code: i32) -> u8 {
    code.clamp(1, 255) as u8
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => DiffConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => cli.to_config()?,
    };
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    // Reject unreadable and locked inputs before any rendering starts.
    for path in [&cli.file1, &cli.file2] {
        let probe = PdfProbe::open(path)?;
        tracing::debug!(path = probe.source_path(), pages = probe.page_count(), "Input accepted");
    }

    let summary = compare(&config, &cli.file1, &cli.file2)?;

    if let Some(report_path) = &cli.report {
        let report = summary.to_report(
            &cli.file1.display().to_string(),
            &cli.file2.display().to_string(),
        );
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?).map_err(|err| {
            DiffPdfError::OutputWrite {
                path: report_path.display().to_string(),
                reason: err.to_string(),
            }
        })?;
    }

    if summary.pairs.is_empty() {
        println!("No differences found");
        return Ok(ExitCode::SUCCESS);
    }
    println!(
        "{} differing page pair(s), {} file(s) written",
        summary.pairs.len(),
        summary.report.written.len()
    );
    for path in &summary.report.written {
        println!("  {}", path.display());
    }

    match summary.report.failures.first() {
        None => Ok(ExitCode::SUCCESS),
        Some(first) => {
            for failure in &summary.report.failures {
                eprintln!("failed to write {}: {}", failure.path.display(), failure.reason);
            }
            let err = DiffPdfError::OutputWrite {
                path: first.path.display().to_string(),
                reason: first.reason.clone(),
            };
            Ok(failure_status(diagnose(&err).exit_code))
        }
    }
}

#[cfg(feature = "pdfium")]
fn compare(config: &DiffConfig, file1: &Path, file2: &Path) -> Result<RunSummary> {
    use diffpdf_document::{Differ, DocumentLoader, PdfiumLoader};

    let loader = PdfiumLoader::new()?;
    let left = loader.open(file1)?;
    let right = loader.open(file2)?;
    Differ::new(config, left.as_ref(), right.as_ref()).run()
}

#[cfg(not(feature = "pdfium"))]
fn compare(_config: &DiffConfig, _file1: &Path, _file2: &Path) -> Result<RunSummary> {
    Err(DiffPdfError::BackendUnavailable(
        "diffpdf was built without a PDF rendering backend".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_codes_stay_in_range() {
        assert_eq!(failure_code(4), 4);
        assert_eq!(failure_code(0), 1);
        assert_eq!(failure_code(-3), 1);
        assert_eq!(failure_code(256), 255);
        assert_eq!(failure_code(130), 130);
    }

    #[test]
    fn write_failure_maps_to_its_documented_code() {
        let err = DiffPdfError::OutputWrite {
            path: "out.pdf".into(),
            reason: "disk full".into(),
        };
        assert_eq!(failure_code(diagnose(&err).exit_code), 4);
    }
}

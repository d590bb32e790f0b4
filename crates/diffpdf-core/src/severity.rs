// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error severity for the comparison pipeline.
//
// Every error is either fatal (the run stops, usually before any document is
// rasterised) or recoverable (one page pair or one output file is skipped and
// the run carries on). Each classification carries a plain hint for the
// command-line user.

use crate::error::DiffPdfError;

/// How the pipeline reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the run.
    Fatal,
    /// Skip the affected page pair or file and continue.
    Recoverable,
}

/// An error classification with a suggestion for the user.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub severity: Severity,
    /// What the user should try.
    pub hint: String,
    /// Process exit status when this error ends the run.
    pub exit_code: i32,
}

/// Classify an error for reporting.
pub fn diagnose(err: &DiffPdfError) -> Diagnosis {
    match err {
        DiffPdfError::InvalidDocument(path) => Diagnosis {
            severity: Severity::Fatal,
            hint: format!("Check that '{path}' exists and is a PDF file."),
            exit_code: 3,
        },
        DiffPdfError::LockedDocument(path) => Diagnosis {
            severity: Severity::Fatal,
            hint: format!("Remove the password protection from '{path}' and try again."),
            exit_code: 3,
        },
        DiffPdfError::InvalidPageRange { .. } => Diagnosis {
            severity: Severity::Fatal,
            hint: "Page ranges look like 1-20, 1,5,9 or 1-3,5,7-9 (pages start at 1).".into(),
            exit_code: 2,
        },
        DiffPdfError::InvalidConfiguration(_) => Diagnosis {
            severity: Severity::Fatal,
            hint: "Run with --help to see the valid options.".into(),
            exit_code: 2,
        },
        DiffPdfError::UnreadablePage { .. } => Diagnosis {
            severity: Severity::Recoverable,
            hint: "The page was skipped; the rest of the document was still compared.".into(),
            exit_code: 4,
        },
        DiffPdfError::OutputWrite { .. } => Diagnosis {
            severity: Severity::Recoverable,
            hint: "Check that the output directory exists and is writable.".into(),
            exit_code: 4,
        },
        DiffPdfError::BackendUnavailable(_) => Diagnosis {
            severity: Severity::Fatal,
            hint: "Rebuild with `--features pdfium` and make the PDFium library available."
                .into(),
            exit_code: 3,
        },
        DiffPdfError::Cancelled => Diagnosis {
            severity: Severity::Fatal,
            hint: "The comparison was stopped before it finished.".into(),
            exit_code: 130,
        },
        DiffPdfError::PdfError(_)
        | DiffPdfError::Render(_)
        | DiffPdfError::ImageError(_)
        | DiffPdfError::Io(_)
        | DiffPdfError::Serialization(_) => Diagnosis {
            severity: Severity::Fatal,
            hint: "This is unexpected; rerun with --verbose for details.".into(),
            exit_code: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_page_is_recoverable() {
        let err = DiffPdfError::UnreadablePage {
            document: "a.pdf".into(),
            page: 4,
        };
        assert_eq!(diagnose(&err).severity, Severity::Recoverable);
    }

    #[test]
    fn configuration_errors_are_fatal_usage_errors() {
        let err = DiffPdfError::InvalidConfiguration("both outputs".into());
        let diagnosis = diagnose(&err);
        assert_eq!(diagnosis.severity, Severity::Fatal);
        assert_eq!(diagnosis.exit_code, 2);
    }
}

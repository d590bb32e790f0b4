// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for DiffPDF.

use thiserror::Error;

/// Top-level error type for all DiffPDF operations.
#[derive(Debug, Error)]
pub enum DiffPdfError {
    // -- Document errors --
    #[error("cannot load '{0}'")]
    InvalidDocument(String),

    #[error("cannot read a locked PDF ('{0}')")]
    LockedDocument(String),

    #[error("failed to understand page range '{expression}': {reason}")]
    InvalidPageRange { expression: String, reason: String },

    #[error("failed to read page {page} from '{document}'")]
    UnreadablePage { document: String, page: usize },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("no document backend available: {0}")]
    BackendUnavailable(String),

    // -- Pipeline errors --
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("comparison cancelled")]
    Cancelled,

    // -- Output --
    #[error("failed to write '{path}': {reason}")]
    OutputWrite { path: String, reason: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DiffPdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_error_names_the_expression() {
        let err = DiffPdfError::InvalidPageRange {
            expression: "3-2".into(),
            reason: "descending range".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to understand page range '3-2': descending range"
        );
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DiffPdfError = io_err.into();
        assert!(matches!(err, DiffPdfError::Io(_)));
    }
}

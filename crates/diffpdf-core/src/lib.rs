// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DiffPDF — Core types, configuration and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod severity;
pub mod types;

pub use config::{DiffConfig, DiffConfigBuilder};
pub use error::{DiffPdfError, Result};
pub use types::*;

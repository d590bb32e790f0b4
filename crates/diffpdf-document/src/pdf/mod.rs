// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — probing input documents and writing image-per-page output.

pub mod probe;
pub mod writer;

pub use probe::PdfProbe;
pub use writer::PdfWriter;

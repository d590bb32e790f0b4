// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output module — page composition, file naming, and PDF / PNG sinks.

pub mod composer;
pub mod naming;
pub mod sink;

pub use composer::compose_page;
pub use naming::{numbered_image_path, separate_path};
pub use sink::{PageSink, WriteFailure, WriteReport, open_sink};

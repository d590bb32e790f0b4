// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render module — painting highlight regions and compositing renderings.

pub mod composite;
pub mod highlight;

pub use composite::composite;
pub use highlight::{HighlightStyle, paint_highlights};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diff module — page-pair classification, text and visual difference
// location, and merging of scattered differences into highlight regions.

pub mod classify;
pub mod merge;
pub mod text;
pub mod visual;

pub use classify::classify;
pub use merge::{MergePolicy, merge_rects};
pub use text::text_highlights;
pub use visual::visual_highlights;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text module — tokenizing page text and aligning token sequences.

pub mod matcher;
pub mod tokenizer;

pub use matcher::{OpKind, Opcode, SequenceMatcher, invert_ranges, matched_ranges, unmatched_indices};
pub use tokenizer::{TokenKind, boxes_within, tokenize};

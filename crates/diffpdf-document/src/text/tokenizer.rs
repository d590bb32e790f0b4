// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text tokenizer — turn a page's positioned text boxes into an ordered
// sequence of character or word tokens in reading order.

use diffpdf_core::{RectF, TextBox, Token};
use tracing::debug;

/// Boxes whose baselines are within this many points share a line.
pub const LINE_TOLERANCE_Y: f32 = 10.0;

/// Unit of text comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Characters,
    Words,
}

/// Keep only the boxes lying entirely inside `region` (all boxes when `None`).
pub fn boxes_within(boxes: Vec<TextBox>, region: Option<RectF>) -> Vec<TextBox> {
    match region {
        Some(region) => boxes
            .into_iter()
            .filter(|text_box| region.contains(&text_box.rect))
            .collect(),
        None => boxes,
    }
}

/// Order boxes line-major: group by baseline within [`LINE_TOLERANCE_Y`],
/// lines top to bottom, boxes left to right within a line.
pub fn reading_order(boxes: &[TextBox]) -> Vec<&TextBox> {
    let mut by_baseline: Vec<&TextBox> = boxes.iter().collect();
    by_baseline.sort_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()));

    let mut lines: Vec<Vec<&TextBox>> = Vec::new();
    let mut anchor = f32::NEG_INFINITY;
    for text_box in by_baseline {
        let baseline = text_box.rect.bottom();
        match lines.last_mut() {
            Some(line) if (baseline - anchor).abs() <= LINE_TOLERANCE_Y => line.push(text_box),
            _ => {
                anchor = baseline;
                lines.push(vec![text_box]);
            }
        }
    }

    lines
        .into_iter()
        .flat_map(|mut line| {
            line.sort_by(|a, b| a.rect.left().total_cmp(&b.rect.left()));
            line
        })
        .collect()
}

/// Split text boxes into tokens in reading order.
///
/// A box's width is shared evenly between its characters; a character token
/// takes one share and a word token takes one share per character. Whitespace
/// never becomes a token.
pub fn tokenize(boxes: &[TextBox], kind: TokenKind) -> Vec<Token> {
    let mut tokens = Vec::new();
    for text_box in reading_order(boxes) {
        let chars: Vec<char> = text_box.text.chars().collect();
        if chars.is_empty() {
            continue;
        }
        let share = text_box.rect.width / chars.len() as f32;
        let span_rect = |start: usize, len: usize| {
            RectF::new(
                text_box.rect.x + share * start as f32,
                text_box.rect.y,
                share * len as f32,
                text_box.rect.height,
            )
        };

        match kind {
            TokenKind::Characters => {
                for (index, ch) in chars.iter().enumerate() {
                    if !ch.is_whitespace() {
                        tokens.push(Token {
                            rect: span_rect(index, 1),
                            text: ch.to_string(),
                        });
                    }
                }
            }
            TokenKind::Words => {
                let mut start = None;
                for index in 0..=chars.len() {
                    let in_word = index < chars.len() && !chars[index].is_whitespace();
                    match (in_word, start) {
                        (true, None) => start = Some(index),
                        (false, Some(begin)) => {
                            tokens.push(Token {
                                rect: span_rect(begin, index - begin),
                                text: chars[begin..index].iter().collect(),
                            });
                            start = None;
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    tokens
}

/// Log every token of one side at debug level.
pub fn log_tokens(side: usize, tokens: &[Token], y_first: bool) {
    for (index, token) in tokens.iter().enumerate() {
        let rect = &token.rect;
        if y_first {
            debug!(
                side,
                index,
                text = %token.text,
                y = rect.y,
                x = rect.x,
                "token"
            );
        } else {
            debug!(
                side,
                index,
                text = %token.text,
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                "token"
            );
        }
    }
}

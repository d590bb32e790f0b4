// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text diff engine — align the token sequences of two pages and turn the
// unmatched tokens of each side into device-pixel highlight regions.

use diffpdf_core::error::Result;
use diffpdf_core::{ComparisonMode, DebugTexts, DiffConfig, POINTS_PER_INCH, RectF, Token};
use tracing::{debug, instrument};

use super::merge::{MergePolicy, merge_rects};
use crate::backend::SourcePage;
use crate::text::tokenizer::{self, TokenKind};
use crate::text::{boxes_within, tokenize, unmatched_indices};

/// Tokens of one page for the configured granularity, restricted to the
/// margin region. The region comes from `region_page` so both sides of a pair
/// share the left page's margins.
pub fn page_tokens(
    page: &dyn SourcePage,
    region_page: &dyn SourcePage,
    config: &DiffConfig,
    side: usize,
) -> Result<Vec<Token>> {
    let region = config.margins.map(|m| m.point_rect(region_page.size()));
    let boxes = boxes_within(page.text_boxes()?, region);
    let kind = match config.mode {
        ComparisonMode::Characters => TokenKind::Characters,
        _ => TokenKind::Words,
    };
    let tokens = tokenize(&boxes, kind);
    match config.debug {
        DebugTexts::Off => {}
        DebugTexts::Texts => tokenizer::log_tokens(side, &tokens, false),
        DebugTexts::TextsAndYx => tokenizer::log_tokens(side, &tokens, true),
    }
    Ok(tokens)
}

/// Highlight regions for both sides, in pixels at `dpi`.
#[instrument(skip_all, fields(left_tokens = left.len(), right_tokens = right.len(), dpi))]
pub fn text_highlights(
    left: &[Token],
    right: &[Token],
    dpi: f32,
    config: &DiffConfig,
) -> (Vec<RectF>, Vec<RectF>) {
    let texts_left: Vec<&str> = left.iter().map(|t| t.text.as_str()).collect();
    let texts_right: Vec<&str> = right.iter().map(|t| t.text.as_str()).collect();
    let (unmatched_left, unmatched_right) = unmatched_indices(&texts_left, &texts_right);
    debug!(
        unmatched_left = unmatched_left.len(),
        unmatched_right = unmatched_right.len(),
        "Token alignment complete"
    );

    let policy = if config.combine_highlight {
        MergePolicy::Within(config.overlap as f32)
    } else {
        MergePolicy::Never
    };
    let scale = dpi / POINTS_PER_INCH;
    rayon::join(
        || side_regions(left, &unmatched_left, scale, policy),
        || side_regions(right, &unmatched_right, scale, policy),
    )
}

fn side_regions(tokens: &[Token], unmatched: &[usize], scale: f32, policy: MergePolicy) -> Vec<RectF> {
    merge_rects(
        unmatched.iter().map(|&index| tokens[index].rect.scaled(scale)),
        policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryPage;

    fn token(x: f32, text: &str) -> Token {
        Token {
            rect: RectF::new(x, 10.0, 20.0, 10.0),
            text: text.to_string(),
        }
    }

    fn sentence(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| token(i as f32 * 25.0, w))
            .collect()
    }

    #[test]
    fn changed_word_is_highlighted_on_both_sides_scaled() {
        let config = DiffConfig::default();
        let left = sentence(&["the", "quick", "fox"]);
        let right = sentence(&["the", "slow", "fox"]);
        let (l, r) = text_highlights(&left, &right, 144.0, &config);
        assert_eq!(l, vec![RectF::new(50.0, 20.0, 40.0, 20.0)]);
        assert_eq!(r, l);
    }

    #[test]
    fn identical_tokens_give_no_regions() {
        let config = DiffConfig::default();
        let tokens = sentence(&["a", "b"]);
        let (l, r) = text_highlights(&tokens, &tokens, 72.0, &config);
        assert!(l.is_empty() && r.is_empty());
    }

    #[test]
    fn combining_merges_neighbouring_words() {
        let left = sentence(&["one", "two", "three", "four"]);
        let right = sentence(&["one", "zwei", "drei", "four"]);
        let separate = DiffConfig::default();
        let combined = DiffConfig {
            combine_highlight: true,
            overlap: 5,
            ..DiffConfig::default()
        };
        assert_eq!(text_highlights(&left, &right, 72.0, &separate).0.len(), 2);
        let (merged, _) = text_highlights(&left, &right, 72.0, &combined);
        assert_eq!(merged, vec![RectF::new(25.0, 10.0, 45.0, 10.0)]);
    }

    #[test]
    fn all_tokens_unmatched_when_one_side_is_empty() {
        let config = DiffConfig::default();
        let left = sentence(&["only", "left"]);
        let (l, r) = text_highlights(&left, &[], 72.0, &config);
        assert_eq!(l.len(), 2);
        assert!(r.is_empty());
    }

    #[test]
    fn character_mode_tokenizes_per_glyph() {
        let page = MemoryPage::new(100.0, 100.0).with_text(RectF::new(0.0, 0.0, 30.0, 10.0), "abc");
        let config = DiffConfig {
            mode: ComparisonMode::Characters,
            ..DiffConfig::default()
        };
        assert_eq!(page_tokens(&page, &page, &config, 1).unwrap().len(), 3);
        let words = DiffConfig::default();
        assert_eq!(page_tokens(&page, &page, &words, 1).unwrap().len(), 1);
    }
}

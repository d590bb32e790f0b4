// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection — parse 1-based page-range expressions into 0-based page
// indices and pair the two documents' selections positionally.

use diffpdf_core::error::{DiffPdfError, Result};
use tracing::debug;

/// Parse a page-range expression such as `1-3,5,7-9` against a document of
/// `page_count` pages.
///
/// Whitespace is ignored. An empty expression selects every page in order.
/// Duplicates and the written order are preserved. Ranges are clamped at the
/// end of the document, but a non-numeric token, a descending range or a
/// single page outside the document rejects the whole expression.
pub fn parse_page_range(expression: &str, page_count: usize) -> Result<Vec<usize>> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok((0..page_count).collect());
    }

    let invalid = |reason: String| DiffPdfError::InvalidPageRange {
        expression: expression.to_string(),
        reason,
    };
    // Only ASCII digits form a page number; `usize::from_str` would also take a sign.
    let parse_page = |text: &str| -> Result<usize> {
        let digits = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
        match text.parse::<usize>() {
            Ok(page) if digits && page >= 1 => Ok(page),
            _ => Err(invalid(format!("'{text}' is not a page number"))),
        }
    };

    let mut pages = Vec::new();
    for item in compact.split(',') {
        match item.split_once('-') {
            Some((first, last)) => {
                let first = parse_page(first)?;
                let last = parse_page(last)?;
                if last < first {
                    return Err(invalid(format!("range {first}-{last} is descending")));
                }
                pages.extend((first..=last.min(page_count)).map(|page| page - 1));
            }
            None => {
                let page = parse_page(item)?;
                if page > page_count {
                    return Err(invalid(format!(
                        "page {page} is beyond the last page ({page_count})"
                    )));
                }
                pages.push(page - 1);
            }
        }
    }

    debug!(expression, selected = pages.len(), "Page range parsed");
    Ok(pages)
}

/// Pair the two selections first-with-first until either runs out. Trailing
/// pages of the longer selection are dropped.
pub fn pair_pages(left: &[usize], right: &[usize]) -> Vec<(usize, usize)> {
    left.iter().copied().zip(right.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_ranges_and_pages() {
        assert_eq!(parse_page_range("1-3,5", 10).unwrap(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn empty_expression_selects_all_pages() {
        assert_eq!(
            parse_page_range("", 10).unwrap(),
            (0..10).collect::<Vec<_>>()
        );
        assert_eq!(parse_page_range("  ", 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn single_page_out_of_bounds_rejects_everything() {
        assert!(matches!(
            parse_page_range("11", 10),
            Err(DiffPdfError::InvalidPageRange { .. })
        ));
        assert!(parse_page_range("1,2,11", 10).is_err());
    }

    #[test]
    fn descending_range_rejects_everything() {
        assert!(parse_page_range("3-2", 10).is_err());
    }

    #[test]
    fn malformed_tokens_reject_everything() {
        for bad in ["a", "1,,2", "0", "-3", "3-", "1-x", "2,"] {
            assert!(parse_page_range(bad, 10).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn signs_are_not_part_of_page_numbers() {
        for bad in ["+2", "1-+3", "+1-2", "1,+2"] {
            assert!(
                matches!(
                    parse_page_range(bad, 3),
                    Err(DiffPdfError::InvalidPageRange { .. })
                ),
                "{bad} should be rejected"
            );
        }
        assert!(parse_page_range("1-2-3", 3).is_err());
    }

    #[test]
    fn ranges_clamp_at_page_count() {
        assert_eq!(parse_page_range("8-20", 10).unwrap(), vec![7, 8, 9]);
        assert_eq!(parse_page_range("12-14", 10).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        assert_eq!(
            parse_page_range(" 5, 1 - 2 ,5", 10).unwrap(),
            vec![4, 0, 1, 4]
        );
    }

    #[test]
    fn pairing_stops_at_shorter_selection() {
        assert_eq!(pair_pages(&[0, 1, 2], &[4, 5]), vec![(0, 4), (1, 5)]);
        assert!(pair_pages(&[], &[1]).is_empty());
    }
}

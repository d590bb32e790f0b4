// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Highlight merging — fold an ordered stream of difference rectangles into
// highlight regions with a single running accumulator.

use diffpdf_core::RectF;

/// When a new rectangle joins the running one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergePolicy {
    /// Every rectangle is its own region.
    Never,
    /// Merge when the new rectangle, grown by this many pixels on every side,
    /// touches the running rectangle.
    Within(f32),
}

impl MergePolicy {
    fn merges(&self, running: &RectF, next: &RectF) -> bool {
        match self {
            MergePolicy::Never => false,
            MergePolicy::Within(tolerance) => next.expanded(*tolerance).touches(running),
        }
    }
}

/// State of the running merge rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Running {
    Empty,
    Holding(RectF),
}

/// Merge `rects` in order. The running rectangle grows while new rectangles
/// can be merged and is flushed into the output as soon as one cannot.
pub fn merge_rects<I>(rects: I, policy: MergePolicy) -> Vec<RectF>
where
    I: IntoIterator<Item = RectF>,
{
    let (mut regions, running) =
        rects
            .into_iter()
            .fold((Vec::new(), Running::Empty), |(mut regions, running), rect| {
                match running {
                    Running::Empty => (regions, Running::Holding(rect)),
                    Running::Holding(current) if policy.merges(&current, &rect) => {
                        (regions, Running::Holding(current.united(&rect)))
                    }
                    Running::Holding(current) => {
                        regions.push(current);
                        (regions, Running::Holding(rect))
                    }
                }
            });
    if let Running::Holding(last) = running {
        regions.push(last);
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: f32 = 5.0;

    fn tile(x: f32, y: f32) -> RectF {
        RectF::new(x, y, SQUARE, SQUARE)
    }

    #[test]
    fn adjacent_tiles_merge_with_one_pixel_tolerance() {
        let merged = merge_rects([tile(0.0, 0.0), tile(SQUARE, 0.0)], MergePolicy::Within(1.0));
        assert_eq!(merged, vec![RectF::new(0.0, 0.0, 2.0 * SQUARE, SQUARE)]);
    }

    #[test]
    fn distant_tiles_stay_separate() {
        let merged = merge_rects(
            [tile(0.0, 0.0), tile(10.0 * SQUARE, 0.0)],
            MergePolicy::Within(1.0),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn word_gap_within_overlap_merges() {
        let first = RectF::new(0.0, 0.0, 40.0, 12.0);
        let near = RectF::new(45.0, 0.0, 40.0, 12.0);
        let far = RectF::new(45.5, 0.0, 40.0, 12.0);
        assert_eq!(merge_rects([first, near], MergePolicy::Within(5.0)).len(), 1);
        assert_eq!(merge_rects([first, far], MergePolicy::Within(5.0)).len(), 2);
    }

    #[test]
    fn never_policy_keeps_every_rect() {
        let merged = merge_rects([tile(0.0, 0.0), tile(0.0, 0.0)], MergePolicy::Never);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_regions() {
        assert!(merge_rects(Vec::new(), MergePolicy::Within(1.0)).is_empty());
    }

    #[test]
    fn single_rect_is_flushed_at_the_end() {
        assert_eq!(
            merge_rects([tile(3.0, 4.0)], MergePolicy::Never),
            vec![tile(3.0, 4.0)]
        );
    }
}

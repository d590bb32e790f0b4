// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sequence matcher — longest-matching-block alignment of two token sequences.
//
// The matcher finds the longest block common to both sequences, then recurses
// on the sub-problems to its left and right. Candidate positions are looked up
// through an index from each symbol of the second sequence to the positions it
// occupies, so only positions that can actually match are visited. Ties are
// broken towards the earliest, longest block, which makes the alignment a pure
// function of its inputs.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// Kind of an aligned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One aligned segment: `a[range_a]` corresponds to `b[range_b]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub kind: OpKind,
    pub range_a: Range<usize>,
    pub range_b: Range<usize>,
}

/// A common block `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Aligns two sequences of comparable items.
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions in `b` of each distinct item, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block common to `a[alo..ahi]` and `b[blo..bhi]`, preferring the
    /// earliest start in `a`, then in `b`. Size 0 when nothing matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let mut best = Match {
            a: alo,
            b: blo,
            size: 0,
        };
        // Length of the match ending at (i - 1, j), keyed by j.
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best.size {
                        best = Match {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next_j2len;
        }
        best
    }

    /// Non-overlapping common blocks in ascending order, adjacent blocks
    /// collapsed, terminated by a zero-size sentinel at `(len a, len b)`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let found = self.find_longest_match(alo, ahi, blo, bhi);
            if found.size == 0 {
                continue;
            }
            if alo < found.a && blo < found.b {
                queue.push((alo, found.a, blo, found.b));
            }
            if found.a + found.size < ahi && found.b + found.size < bhi {
                queue.push((found.a + found.size, ahi, found.b + found.size, bhi));
            }
            blocks.push(found);
        }
        blocks.sort_by_key(|m| (m.a, m.b));

        let mut collapsed: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match collapsed.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed.push(Match {
            a: la,
            b: lb,
            size: 0,
        });
        collapsed
    }

    /// Opcodes whose ranges exactly cover `0..len a` and `0..len b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut opcodes = Vec::new();

        for block in self.matching_blocks() {
            let kind = match (i < block.a, j < block.b) {
                (true, true) => Some(OpKind::Replace),
                (true, false) => Some(OpKind::Delete),
                (false, true) => Some(OpKind::Insert),
                (false, false) => None,
            };
            if let Some(kind) = kind {
                opcodes.push(Opcode {
                    kind,
                    range_a: i..block.a,
                    range_b: j..block.b,
                });
            }
            i = block.a + block.size;
            j = block.b + block.size;
            if block.size > 0 {
                opcodes.push(Opcode {
                    kind: OpKind::Equal,
                    range_a: block.a..i,
                    range_b: block.b..j,
                });
            }
        }
        opcodes
    }
}

/// The `Equal` ranges of each side.
pub fn matched_ranges(opcodes: &[Opcode]) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    opcodes
        .iter()
        .filter(|op| op.kind == OpKind::Equal)
        .map(|op| (op.range_a.clone(), op.range_b.clone()))
        .unzip()
}

/// Indices of `0..count` not covered by any of `matched`. Works for
/// `count == 0` and for an empty `matched`.
pub fn invert_ranges(matched: &[Range<usize>], count: usize) -> Vec<usize> {
    let mut covered = vec![false; count];
    for range in matched {
        for index in range.start.min(count)..range.end.min(count) {
            covered[index] = true;
        }
    }
    covered
        .iter()
        .enumerate()
        .filter(|(_, is_covered)| !**is_covered)
        .map(|(index, _)| index)
        .collect()
}

/// Unmatched token indices of each side of an alignment.
pub fn unmatched_indices<T: Eq + Hash>(a: &[T], b: &[T]) -> (Vec<usize>, Vec<usize>) {
    let opcodes = SequenceMatcher::new(a, b).opcodes();
    let (matched_a, matched_b) = matched_ranges(&opcodes);
    (
        invert_ranges(&matched_a, a.len()),
        invert_ranges(&matched_b, b.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn identical_sequences_yield_one_equal_opcode() {
        let a = words("the quick brown fox");
        let opcodes = SequenceMatcher::new(&a, &a).opcodes();
        assert_eq!(
            opcodes,
            vec![Opcode {
                kind: OpKind::Equal,
                range_a: 0..4,
                range_b: 0..4,
            }]
        );
    }

    #[test]
    fn replacement_in_the_middle() {
        let a = words("the quick brown fox");
        let b = words("the slow brown fox");
        let kinds: Vec<OpKind> = SequenceMatcher::new(&a, &b)
            .opcodes()
            .into_iter()
            .map(|op| op.kind)
            .collect();
        assert_eq!(kinds, vec![OpKind::Equal, OpKind::Replace, OpKind::Equal]);
        assert_eq!(unmatched_indices(&a, &b), (vec![1], vec![1]));
    }

    #[test]
    fn insert_and_delete_at_ends() {
        let a = words("b c");
        let b = words("a b c d");
        let opcodes = SequenceMatcher::new(&a, &b).opcodes();
        assert_eq!(opcodes[0].kind, OpKind::Insert);
        assert_eq!(opcodes.last().map(|op| op.kind), Some(OpKind::Insert));
        assert_eq!(unmatched_indices(&a, &b), (vec![], vec![0, 3]));
    }

    #[test]
    fn longest_match_prefers_earliest() {
        let a = ["x", "y", "x", "y"];
        let b = ["x", "y"];
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 4, 0, 2);
        assert_eq!(m, Match { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn empty_sides_are_fully_unmatched() {
        let empty: Vec<&str> = Vec::new();
        let b = words("one two");
        assert_eq!(unmatched_indices(&empty, &b), (vec![], vec![0, 1]));
        assert_eq!(unmatched_indices(&b, &empty), (vec![0, 1], vec![]));
        assert!(SequenceMatcher::new(&empty, &empty).opcodes().is_empty());
    }

    #[test]
    fn invert_handles_zero_count() {
        assert!(invert_ranges(&[], 0).is_empty());
        assert_eq!(invert_ranges(&[1..3], 5), vec![0, 3, 4]);
    }

    proptest! {
        #[test]
        fn opcodes_partition_both_sequences(
            a in proptest::collection::vec(0u8..4, 0..40),
            b in proptest::collection::vec(0u8..4, 0..40),
        ) {
            let opcodes = SequenceMatcher::new(&a, &b).opcodes();
            let (mut next_a, mut next_b) = (0, 0);
            for op in &opcodes {
                prop_assert_eq!(op.range_a.start, next_a);
                prop_assert_eq!(op.range_b.start, next_b);
                next_a = op.range_a.end;
                next_b = op.range_b.end;
                if op.kind == OpKind::Equal {
                    prop_assert_eq!(&a[op.range_a.clone()], &b[op.range_b.clone()]);
                }
            }
            prop_assert_eq!(next_a, a.len());
            prop_assert_eq!(next_b, b.len());
        }

        #[test]
        fn matched_and_unmatched_partition_indices(
            a in proptest::collection::vec(0u8..5, 0..30),
            b in proptest::collection::vec(0u8..5, 0..30),
        ) {
            let opcodes = SequenceMatcher::new(&a, &b).opcodes();
            let (matched_a, _) = matched_ranges(&opcodes);
            let unmatched = invert_ranges(&matched_a, a.len());
            let mut all: Vec<usize> = matched_a.iter().flat_map(|r| r.clone()).collect();
            prop_assert!(all.iter().all(|i| !unmatched.contains(i)));
            all.extend(unmatched);
            all.sort_unstable();
            prop_assert_eq!(all, (0..a.len()).collect::<Vec<_>>());
        }

        #[test]
        fn matching_a_sequence_against_itself_is_one_equal(
            a in proptest::collection::vec(0u8..6, 1..40),
        ) {
            let opcodes = SequenceMatcher::new(&a, &a).opcodes();
            prop_assert_eq!(opcodes.len(), 1);
            prop_assert_eq!(opcodes[0].kind, OpKind::Equal);
            prop_assert_eq!(opcodes[0].range_a.clone(), 0..a.len());
        }
    }
}

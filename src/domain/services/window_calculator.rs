//! Circular index arithmetic for carousels.

use crate::domain::entities::{PreloadWindow, WindowShape};

/// Wraps any index into `[0, len)`. Returns 0 for empty collections.
#[must_use]
pub const fn wrap_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index % len }
}

/// Index after `index`, wrapping from the last item to the first.
#[must_use]
pub const fn next_index(index: usize, len: usize) -> usize {
    wrap_index(index + 1, len)
}

/// Index before `index`, wrapping from the first item to the last.
#[must_use]
pub const fn previous_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (wrap_index(index, len) + len - 1) % len
    }
}

/// Computes which indices to preload around `index`.
///
/// The high set is the cursor plus `shape.high_ahead` items after it. The low
/// set is `shape.behind` items before the cursor followed by `lookahead`
/// items after the high range. Indices wrap at both ends and each index
/// appears at most once across both sets. Every range is capped at `len`, so
/// the work done is bounded by the collection size, not by the shape.
#[must_use]
pub fn compute_window(len: usize, index: usize, lookahead: usize, shape: WindowShape) -> PreloadWindow {
    if len == 0 {
        return PreloadWindow::default();
    }

    let index = wrap_index(index, len);
    let mut seen = vec![false; len];
    let mut take = |i: usize, out: &mut Vec<usize>| {
        if !seen[i] {
            seen[i] = true;
            out.push(i);
        }
    };

    let mut high = Vec::new();
    for offset in 0..=shape.high_ahead.min(len - 1) {
        take(wrap_index(index + offset, len), &mut high);
    }

    let mut low = Vec::new();
    for back in 1..=shape.behind.min(len) {
        take((index + len - back % len) % len, &mut low);
    }
    let high_end = index + shape.high_ahead % len;
    for offset in 1..=lookahead.min(len) {
        take(wrap_index(high_end + offset, len), &mut low);
    }

    PreloadWindow { high, low }
}

/// Indices of `count` consecutive items starting at `start`.
///
/// Never yields more than `len` indices, so a window wider than the
/// collection shows each item once instead of repeating.
#[must_use]
pub fn display_indices(len: usize, start: usize, count: usize) -> Vec<usize> {
    (0..count.min(len))
        .map(|offset| wrap_index(start + offset, len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 4, 1 ; "first_to_second")]
    #[test_case(3, 4, 0 ; "last_wraps_to_first")]
    #[test_case(0, 1, 0 ; "single_item")]
    #[test_case(0, 0, 0 ; "empty")]
    fn test_next_index(index: usize, len: usize, expected: usize) {
        assert_eq!(next_index(index, len), expected);
    }

    #[test_case(0, 4, 3 ; "first_wraps_to_last")]
    #[test_case(2, 4, 1 ; "middle")]
    #[test_case(0, 1, 0 ; "single_item")]
    #[test_case(0, 0, 0 ; "empty")]
    fn test_previous_index(index: usize, len: usize, expected: usize) {
        assert_eq!(previous_index(index, len), expected);
    }

    #[test]
    fn test_window_at_start() {
        let window = compute_window(4, 0, 2, WindowShape::default());
        assert_eq!(window.high, vec![0, 1, 2]);
        assert_eq!(window.low, vec![3]);
    }

    #[test]
    fn test_window_in_middle_of_large_collection() {
        let window = compute_window(10, 5, 3, WindowShape::default());
        assert_eq!(window.high, vec![5, 6, 7]);
        assert_eq!(window.low, vec![4, 8, 9, 0]);
    }

    #[test]
    fn test_window_boundaries_stay_in_range() {
        for len in 1..8 {
            for lookahead in 0..6 {
                for index in [0, len - 1] {
                    let window = compute_window(len, index, lookahead, WindowShape::default());
                    assert!(window.iter().all(|i| i < len), "len={len} index={index}");
                    assert!(window.high.contains(&index));
                }
            }
        }
    }

    #[test]
    fn test_window_sets_are_disjoint_and_unique() {
        let shape = WindowShape {
            high_ahead: 3,
            behind: 4,
        };
        let window = compute_window(5, 4, 6, shape);
        let mut all: Vec<_> = window.iter().collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(total, 5);
    }

    #[test]
    fn test_window_out_of_range_index_wraps() {
        let window = compute_window(3, 7, 0, WindowShape::default());
        assert_eq!(window.high, vec![1, 2, 0]);
        assert!(window.low.is_empty());
    }

    #[test]
    fn test_window_ranges_capped_at_len() {
        let window = compute_window(4, 0, usize::MAX, WindowShape::default());
        assert_eq!(window.high, vec![0, 1, 2]);
        assert_eq!(window.low, vec![3]);

        let shape = WindowShape {
            high_ahead: usize::MAX,
            behind: usize::MAX,
        };
        let window = compute_window(4, 3, usize::MAX, shape);
        assert_eq!(window.high, vec![3, 0, 1, 2]);
        assert!(window.low.is_empty());
    }

    #[test]
    fn test_window_empty_collection() {
        assert!(compute_window(0, 0, 3, WindowShape::default()).is_empty());
    }

    #[test]
    fn test_display_indices_wrap() {
        assert_eq!(display_indices(5, 3, 3), vec![3, 4, 0]);
    }

    #[test]
    fn test_display_indices_never_repeat() {
        assert_eq!(display_indices(2, 1, 3), vec![1, 0]);
        assert!(display_indices(0, 0, 3).is_empty());
    }
}

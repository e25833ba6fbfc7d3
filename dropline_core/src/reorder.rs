// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving one list item to a new index.

use alloc::vec::Vec;

/// Returns a copy of `list` with the item at `start_index` moved to `finish_index`.
///
/// Out of range indices leave the list unchanged.
#[must_use]
pub fn reorder<T: Clone>(list: &[T], start_index: usize, finish_index: usize) -> Vec<T> {
    let mut result = list.to_vec();
    reorder_in_place(&mut result, start_index, finish_index);
    result
}

/// Moves the item at `start_index` to `finish_index` in place.
///
/// Returns `false` (and does nothing) when either index is out of range.
pub fn reorder_in_place<T>(list: &mut [T], start_index: usize, finish_index: usize) -> bool {
    if start_index >= list.len() || finish_index >= list.len() {
        return false;
    }
    if start_index < finish_index {
        list[start_index..=finish_index].rotate_left(1);
    } else {
        list[finish_index..=start_index].rotate_right(1);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_items_both_ways() {
        let list = ['a', 'b', 'c', 'd'];
        assert_eq!(reorder(&list, 0, 2), ['b', 'c', 'a', 'd']);
        assert_eq!(reorder(&list, 3, 1), ['a', 'd', 'b', 'c']);
        assert_eq!(reorder(&list, 1, 1), list);
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut list = [1, 2, 3];
        assert!(!reorder_in_place(&mut list, 0, 3));
        assert_eq!(list, [1, 2, 3]);
    }
}

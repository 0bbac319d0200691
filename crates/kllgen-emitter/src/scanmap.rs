//! Per-layer scan code → trigger list maps.

use std::collections::{BTreeMap, BTreeSet};

/// Trigger lists of one layer keyed by effective (post-interconnect) scan code.
///
/// Lists hold distinct trigger macro indices in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanMap {
    lists: BTreeMap<u32, BTreeSet<usize>>,
}

impl ScanMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scan_code: u32, trigger: usize) {
        self.lists.entry(scan_code).or_default().insert(trigger);
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Lowest scan code with a list.
    pub fn first(&self) -> Option<u32> {
        self.lists.keys().next().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.lists.keys().next_back().copied()
    }

    pub fn get(&self, scan_code: u32) -> impl Iterator<Item = usize> + '_ {
        self.lists.get(&scan_code).into_iter().flatten().copied()
    }

    /// Every `(scan code, triggers)` pair in scan code order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BTreeSet<usize>)> {
        self.lists.iter().map(|(s, t)| (*s, t))
    }

    /// Dense lists for `start..=end`; scan codes without triggers get an
    /// empty list.
    pub fn dense(&self, start: u32, end: u32) -> Vec<Vec<usize>> {
        (start..=end).map(|s| self.get(s).collect()).collect()
    }

    /// Dense lists over the redefined span of a partial layer, with the
    /// span's first scan code. An empty layer yields one empty list at 0.
    pub fn span(&self) -> (u32, Vec<Vec<usize>>) {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => (first, self.dense(first, last)),
            _ => (0, vec![Vec::new()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lists_sorted_and_distinct() {
        let mut map = ScanMap::new();
        map.insert(5, 3);
        map.insert(5, 1);
        map.insert(5, 3);
        assert_eq!(map.get(5).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_dense_fills_gaps() {
        let mut map = ScanMap::new();
        map.insert(2, 0);
        assert_eq!(map.dense(0, 2), vec![vec![], vec![], vec![0]]);
    }

    #[test]
    fn test_empty_partial_span() {
        assert_eq!(ScanMap::new().span(), (0, vec![Vec::<usize>::new()]));
    }

    #[test]
    fn test_partial_span_is_relative() {
        let mut map = ScanMap::new();
        map.insert(7, 2);
        map.insert(9, 4);
        let (first, lists) = map.span();
        assert_eq!(first, 7);
        assert_eq!(lists, vec![vec![2], vec![], vec![4]]);
    }

    proptest! {
        #[test]
        fn prop_length_prefix_matches_distinct_triggers(
            entries in prop::collection::vec((0u32..16, 0usize..8), 0..64)
        ) {
            let mut map = ScanMap::new();
            for &(scan, trigger) in &entries {
                map.insert(scan, trigger);
            }
            for (list, scan) in map.dense(0, 15).into_iter().zip(0u32..) {
                let distinct: BTreeSet<usize> = entries
                    .iter()
                    .filter(|(s, _)| *s == scan)
                    .map(|(_, t)| *t)
                    .collect();
                prop_assert_eq!(list.len(), distinct.len());
                prop_assert!(list.windows(2).all(|w| matches!(w, [a, b] if a < b)));
            }
        }
    }
}

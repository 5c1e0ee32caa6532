//! Selection map
//!
//! Persistent map from node id to [`SelectionStatus`]. Cloning is O(1)
//! (structural sharing), so every recomputation starts from a cheap copy of
//! the previous map and the previous value stays valid for readers.

use crate::status::SelectionStatus;
use tagtree_model::NodeId;

/// Node id to status; absent ids read as unchecked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionMap {
    entries: im::HashMap<NodeId, SelectionStatus>,
}

impl SelectionMap {
    /// Empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `id`, unchecked when absent
    #[inline]
    #[must_use]
    pub fn status(&self, id: &str) -> SelectionStatus {
        self.get(id).unwrap_or_default()
    }

    /// Materialized entry for `id`, if any
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SelectionStatus> {
        self.entries.get(id).copied()
    }

    /// Return a copy with one entry set
    #[inline]
    #[must_use]
    pub fn with(mut self, id: impl Into<NodeId>, status: SelectionStatus) -> Self {
        self.entries.insert(id.into(), status);
        self
    }

    pub(crate) fn set(&mut self, id: &NodeId, status: SelectionStatus) {
        self.entries.insert(id.clone(), status);
    }

    /// Number of materialized entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are materialized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over materialized entries (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, SelectionStatus)> + '_ {
        self.entries.iter().map(|(id, status)| (id, *status))
    }

    /// Ids whose entry is `status`, sorted
    #[must_use]
    pub fn ids_with(&self, status: SelectionStatus) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl<K: Into<NodeId>> FromIterator<(K, SelectionStatus)> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = (K, SelectionStatus)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reads_unchecked() {
        let map = SelectionMap::new();
        assert_eq!(map.status("x"), SelectionStatus::Unchecked);
        assert_eq!(map.get("x"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn with_does_not_touch_original() {
        let base = SelectionMap::new().with("a", SelectionStatus::Checked);
        let next = base.clone().with("b", SelectionStatus::Indeterminate);

        assert_eq!(base.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.status("a"), SelectionStatus::Checked);
    }

    #[test]
    fn ids_with_is_sorted() {
        let map: SelectionMap = [
            ("c", SelectionStatus::Checked),
            ("a", SelectionStatus::Checked),
            ("b", SelectionStatus::Unchecked),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            map.ids_with(SelectionStatus::Checked),
            vec![NodeId::from("a"), NodeId::from("c")]
        );
    }
}

//! Selection set for batch operations.

use std::collections::HashSet;

/// Ids marked for a batch action.
///
/// Selection is independent of the current filter: an entity hidden by the
/// search query stays selected until it is deselected or removed from the
/// collection.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    /// Add the id if absent, remove it if present. Returns whether the id is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in a deterministic order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every id that no longer exists in the collection.
    pub fn prune(&mut self, existing: &HashSet<&str>) {
        self.ids.retain(|id| existing.contains(id.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut set = SelectionSet::default();
        assert!(set.toggle("a"));
        assert!(set.contains("a"));
        assert!(!set.toggle("a"));
        assert!(!set.contains("a"));
    }

    #[test]
    fn test_prune_drops_absent_ids() {
        let mut set = SelectionSet::default();
        set.toggle("a");
        set.toggle("b");
        set.toggle("c");

        let existing: HashSet<&str> = ["a", "c"].into_iter().collect();
        set.prune(&existing);

        assert_eq!(set.ids(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut set = SelectionSet::default();
        set.toggle("a");
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}

//! Pure filter and sort over the in-memory collection.
//!
//! The projection is a function of (items, query, order) only: it never
//! mutates the collection and is cheap enough to recompute on every
//! keystroke.

use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Normalize a free-text query for matching.
/// Returns `None` for a blank query, which matches everything.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match over the entity's configured fields.
fn matches<E: Resource>(entity: &E, needle: &str) -> bool {
    entity
        .search_text()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Derive the displayed sequence: filter by `query`, then stable-sort by the
/// entity's sort key. `Descending` reverses the comparator, which keeps the
/// sort stable for entities comparing equal.
pub fn project<'a, E: Resource>(items: &'a [E], query: &str, order: SortOrder) -> Vec<&'a E> {
    let mut view: Vec<&E> = match normalize_query(query) {
        Some(needle) => items.iter().filter(|e| matches(*e, &needle)).collect(),
        None => items.iter().collect(),
    };

    view.sort_by(|a, b| {
        let ord = a.sort_key().compare(&b.sort_key());
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Booking;

    fn booking(id: &str, name: &str, email: &str, date: &str) -> Booking {
        Booking {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let items = vec![
            booking("1", "Ann", "ann@x.com", "2025-03-01"),
            booking("2", "Bo", "bo@x.com", "2025-01-01"),
        ];
        assert_eq!(project(&items, "   ", SortOrder::Ascending).len(), 2);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let items = vec![
            booking("1", "Ann", "ann@x.com", "2025-03-01"),
            booking("2", "Bo", "bo@x.com", "2025-01-01"),
        ];
        let view = project(&items, "an", SortOrder::Ascending);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "1");
    }

    #[test]
    fn test_every_match_comes_from_the_input() {
        let items = vec![
            booking("1", "Ann", "ann@x.com", "2025-03-01"),
            booking("2", "Bo", "bo@x.com", "2025-01-01"),
            booking("3", "Cleo", "cleo@x.com", "2025-02-01"),
        ];
        let view = project(&items, "x.com", SortOrder::Ascending);
        assert_eq!(view.len(), 3);
        for e in view {
            assert!(items.iter().any(|i| i.id == e.id));
        }
    }

    #[test]
    fn test_sort_ascending_by_date() {
        let items = vec![
            booking("1", "Ann", "a@x.com", "2025-03-01"),
            booking("2", "Bo", "b@x.com", "2025-01-01"),
            booking("3", "Cleo", "c@x.com", "2025-02-01"),
        ];
        let view = project(&items, "", SortOrder::Ascending);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);
    }

    #[test]
    fn test_sort_descending_reverses() {
        let items = vec![
            booking("1", "Ann", "a@x.com", "2025-03-01"),
            booking("2", "Bo", "b@x.com", "2025-01-01"),
        ];
        let view = project(&items, "", SortOrder::Descending);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_equal_keys_keep_arrival_order() {
        let items = vec![
            booking("1", "Ann", "a@x.com", "2025-01-01"),
            booking("2", "Bo", "b@x.com", "2025-01-01"),
            booking("3", "Cleo", "c@x.com", "2025-01-01"),
        ];
        let view = project(&items, "", SortOrder::Ascending);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_unparseable_date_sorts_last() {
        let items = vec![
            booking("1", "Ann", "a@x.com", "not-a-date"),
            booking("2", "Bo", "b@x.com", "2025-06-01"),
        ];
        let view = project(&items, "", SortOrder::Ascending);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }
}

//! The `Resource` trait: what an entity kind must expose to the controller.
//!
//! Each dashboard supplies configuration, not logic: the collection path
//! segment, the fields the free-text filter searches, the sort key, and the
//! local validation run before a create/update is attempted.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Serialize;
use time::Date;

/// Comparable key used by the sorted projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue<'a> {
    /// Lexicographic comparison.
    Text(&'a str),
    /// Parsed calendar date; `None` when the stored value failed to parse.
    /// Unparseable dates order after every parseable one.
    Date(Option<Date>),
}

impl SortValue<'_> {
    pub fn compare(&self, other: &SortValue<'_>) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            // A single entity kind only ever produces one variant.
            (SortValue::Text(_), SortValue::Date(_)) => Ordering::Less,
            (SortValue::Date(_), SortValue::Text(_)) => Ordering::Greater,
        }
    }
}

/// One record in a remote collection.
pub trait Resource: Clone + Default + Serialize + DeserializeOwned {
    /// Path segment of the remote collection, e.g. `"booking"`.
    const COLLECTION: &'static str;

    /// Whether the console offers create/edit for this kind. Public-form
    /// submissions like contact messages are read and delete only.
    const EDITABLE: bool = true;

    /// Server-assigned identifier, empty until the entity has been created.
    fn id(&self) -> &str;

    /// Field values matched by the free-text filter (OR across fields).
    fn search_text(&self) -> Vec<&str>;

    /// Key the sorted projection orders by.
    fn sort_key(&self) -> SortValue<'_>;

    /// One-line rendering for list output.
    fn summary(&self) -> String;

    /// Check required fields before a create/update is attempted.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_text_compare() {
        assert_eq!(
            SortValue::Text("alpha").compare(&SortValue::Text("beta")),
            Ordering::Less
        );
        assert_eq!(
            SortValue::Text("same").compare(&SortValue::Text("same")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_unparseable_date_sorts_last() {
        let parsed = SortValue::Date(Some(date!(2025 - 01 - 15)));
        let broken = SortValue::Date(None);
        assert_eq!(parsed.compare(&broken), Ordering::Less);
        assert_eq!(broken.compare(&parsed), Ordering::Greater);
        assert_eq!(broken.compare(&SortValue::Date(None)), Ordering::Equal);
    }
}

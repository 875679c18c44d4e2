//! Sort-order data model.
//!
//! These types are serialized with camelCase field names so an embedding
//! application can persist a user's sort order across sessions and hand it
//! back at construction.

use serde::{Deserialize, Serialize};

/// Direction applied to one column's comparisons. "No sort" is represented
/// by the column having no entry at all, never by an explicit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// One column's contribution to a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSortOrder {
    /// Column key. May reference a column that no longer exists, in which
    /// case the entry is skipped during sorting.
    pub column: String,
    pub direction: Direction,
}

impl FieldSortOrder {
    pub fn new(column: impl Into<String>, direction: Direction) -> FieldSortOrder {
        FieldSortOrder {
            column: column.into(),
            direction,
        }
    }
}

/// Ordered multi-column sort: ties resolve by trying entries left to right.
/// An empty order means unordered (original array order is preserved, since
/// sorting is stable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortOrder(Vec<FieldSortOrder>);

impl SortOrder {
    pub fn new() -> SortOrder {
        SortOrder(Vec::new())
    }

    /// Single-column order.
    pub fn single(column: impl Into<String>, direction: Direction) -> SortOrder {
        SortOrder(vec![FieldSortOrder::new(column, direction)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> &[FieldSortOrder] {
        &self.0
    }

    /// Current direction for a column, or `None` when the column is unsorted.
    pub fn direction_of(&self, column: &str) -> Option<Direction> {
        self.0
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.direction)
    }

    /// Append an entry at the tail (lowest tie-break priority).
    pub fn push(&mut self, entry: FieldSortOrder) {
        self.0.push(entry);
    }

    /// Drop a column's entry, keeping the relative order of the rest.
    pub fn remove(&mut self, column: &str) {
        self.0.retain(|entry| entry.column != column);
    }
}

impl From<Vec<FieldSortOrder>> for SortOrder {
    fn from(entries: Vec<FieldSortOrder>) -> SortOrder {
        SortOrder(entries)
    }
}

impl FromIterator<FieldSortOrder> for SortOrder {
    fn from_iter<T: IntoIterator<Item = FieldSortOrder>>(iter: T) -> SortOrder {
        SortOrder(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of() {
        let order = SortOrder::from(vec![
            FieldSortOrder::new("a", Direction::Ascending),
            FieldSortOrder::new("b", Direction::Descending),
        ]);
        assert_eq!(order.direction_of("a"), Some(Direction::Ascending));
        assert_eq!(order.direction_of("b"), Some(Direction::Descending));
        assert_eq!(order.direction_of("c"), None);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut order = SortOrder::from(vec![
            FieldSortOrder::new("a", Direction::Ascending),
            FieldSortOrder::new("b", Direction::Descending),
            FieldSortOrder::new("c", Direction::Ascending),
        ]);
        order.remove("b");
        let keys: Vec<&str> = order.entries().iter().map(|e| e.column.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_serde_round_trip_is_camel_case() {
        let order = SortOrder::single("name", Direction::Descending);
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"[{"column":"name","direction":"descending"}]"#);
        let back: SortOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}

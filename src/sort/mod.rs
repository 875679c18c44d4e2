//! Sort engine: the per-column order cycle and the stable multi-key sort.
//!
//! `next_sort_order` is pure and never mutates its input; callers may be
//! holding a reference to the previous order for persistence.

pub mod compare;

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::{find_column, ColumnDescriptor, Direction, FieldSortOrder, SortOrder};

pub use compare::{compare_base, compare_values, resolve_value};

/// Advance one column's order state on a header interaction.
///
/// The cycle is `none → ascending → descending`, then back to `none` when a
/// default order exists to fall back to, else straight to `ascending` so the
/// grid never lands on "no sort" with nothing to replace it.
pub fn advance(current: Option<Direction>, has_default: bool) -> Option<Direction> {
    match current {
        None => Some(Direction::Ascending),
        Some(Direction::Ascending) => Some(Direction::Descending),
        Some(Direction::Descending) => {
            if has_default {
                None
            } else {
                Some(Direction::Ascending)
            }
        }
    }
}

/// Produce the order that results from clicking a column header.
///
/// Without an additive modifier the click replaces any multi-column order
/// with this column alone. With a modifier held, this column's entry moves to
/// the tail with its advanced state (lowest tie-break priority); other
/// columns keep their relative order. An advanced state of "none" omits the
/// entry entirely.
pub fn next_sort_order(
    current: &SortOrder,
    column_key: &str,
    has_default: bool,
    additive: bool,
) -> SortOrder {
    let previous = current.direction_of(column_key);
    let mut next = if additive {
        let mut order = current.clone();
        order.remove(column_key);
        order
    } else {
        SortOrder::new()
    };
    if let Some(direction) = advance(previous, has_default) {
        next.push(FieldSortOrder::new(column_key, direction));
    }
    next
}

/// Compare two rows under a multi-column order: first nonzero comparison
/// wins, negated for descending entries and again for reversed columns.
/// Entries naming unknown columns are skipped; stale persisted orders are a
/// soft inconsistency, not an error.
pub fn compare_rows(
    a: &Value,
    b: &Value,
    columns: &[ColumnDescriptor],
    order: &SortOrder,
) -> Ordering {
    for entry in order.entries() {
        let Some(column) = find_column(columns, &entry.column) else {
            continue;
        };
        let value_a = resolve_value(a, column, true);
        let value_b = resolve_value(b, column, true);
        let mut result = compare_values(&value_a, &value_b);
        if entry.direction == Direction::Descending {
            result = result.reverse();
        }
        if column.reverse {
            result = result.reverse();
        }
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

/// Stably sort rows into a new array. The effective order is `order` when
/// non-empty, else `default_order`, else none (original order preserved).
pub fn sort_rows(
    rows: &[Value],
    columns: &[ColumnDescriptor],
    order: &SortOrder,
    default_order: Option<&SortOrder>,
) -> Vec<Value> {
    let effective = if !order.is_empty() {
        order
    } else {
        match default_order {
            Some(default) if !default.is_empty() => default,
            _ => return rows.to_vec(),
        }
    };
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_rows(a, b, columns, effective));
    sorted
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
    use crate::types::ColumnDescriptor;
    use serde_json::json;
    use test_case::test_case;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::from_property("name", "Name", 120.0),
            ColumnDescriptor::from_property("age", "Age", 60.0),
        ]
    }

    fn names(rows: &[Value]) -> Vec<&str> {
        rows.iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str))
            .collect()
    }

    #[test_case(None, true => Some(Direction::Ascending))]
    #[test_case(Some(Direction::Ascending), true => Some(Direction::Descending))]
    #[test_case(Some(Direction::Descending), true => None ; "returns to default view")]
    #[test_case(Some(Direction::Descending), false => Some(Direction::Ascending) ; "never lands on no sort without a default")]
    fn advance_cycle(current: Option<Direction>, has_default: bool) -> Option<Direction> {
        advance(current, has_default)
    }

    #[test]
    fn test_full_cycle_with_default() {
        let mut order = SortOrder::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            order = next_sort_order(&order, "name", true, false);
            seen.push(order.direction_of("name"));
        }
        assert_eq!(
            seen,
            vec![
                Some(Direction::Ascending),
                Some(Direction::Descending),
                None,
                Some(Direction::Ascending),
            ]
        );
    }

    #[test]
    fn test_cycle_without_default_never_reaches_none() {
        let mut order = SortOrder::new();
        let mut seen = Vec::new();
        for _ in 0..5 {
            order = next_sort_order(&order, "name", false, false);
            seen.push(order.direction_of("name"));
        }
        assert!(seen.iter().all(Option::is_some));
        assert_eq!(seen[2], Some(Direction::Ascending));
        assert_eq!(seen[3], Some(Direction::Descending));
    }

    #[test]
    fn test_plain_click_replaces_multi_column_order() {
        let current = SortOrder::single("colA", Direction::Ascending);
        let next = next_sort_order(&current, "colB", false, false);
        assert_eq!(next, SortOrder::single("colB", Direction::Ascending));
    }

    #[test]
    fn test_modified_click_appends() {
        let current = SortOrder::single("colA", Direction::Ascending);
        let next = next_sort_order(&current, "colB", false, true);
        assert_eq!(
            next,
            SortOrder::from(vec![
                FieldSortOrder::new("colA", Direction::Ascending),
                FieldSortOrder::new("colB", Direction::Ascending),
            ])
        );
    }

    #[test]
    fn test_modified_click_on_sorted_column_demotes_it() {
        let current = SortOrder::from(vec![
            FieldSortOrder::new("colA", Direction::Ascending),
            FieldSortOrder::new("colB", Direction::Ascending),
        ]);
        let next = next_sort_order(&current, "colA", false, true);
        assert_eq!(
            next,
            SortOrder::from(vec![
                FieldSortOrder::new("colB", Direction::Ascending),
                FieldSortOrder::new("colA", Direction::Descending),
            ])
        );
    }

    #[test]
    fn test_next_sort_order_does_not_mutate_input() {
        let current = SortOrder::single("colA", Direction::Ascending);
        let _ = next_sort_order(&current, "colA", false, false);
        assert_eq!(current, SortOrder::single("colA", Direction::Ascending));
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = vec![
            json!({"name": "a", "age": 1}),
            json!({"name": "b", "age": 1}),
            json!({"name": "c", "age": 2}),
        ];
        let order = SortOrder::single("age", Direction::Ascending);
        let sorted = sort_rows(&rows, &columns(), &order, None);
        assert_eq!(names(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descending_and_tie_break_chain() {
        let rows = vec![
            json!({"name": "carol", "age": 30}),
            json!({"name": "alice", "age": 41}),
            json!({"name": "bob", "age": 30}),
        ];
        let order = SortOrder::from(vec![
            FieldSortOrder::new("age", Direction::Descending),
            FieldSortOrder::new("name", Direction::Ascending),
        ]);
        let sorted = sort_rows(&rows, &columns(), &order, None);
        assert_eq!(names(&sorted), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_reverse_flag_flips_direction() {
        let rows = vec![json!({"age": 1}), json!({"age": 2})];
        let reversed = vec![ColumnDescriptor::from_property("age", "Age", 60.0).reversed()];
        let order = SortOrder::single("age", Direction::Ascending);
        let sorted = sort_rows(&rows, &reversed, &order, None);
        let ages: Vec<i64> = sorted
            .iter()
            .filter_map(|r| r.get("age").and_then(Value::as_i64))
            .collect();
        assert_eq!(ages, vec![2, 1]);
    }

    #[test]
    fn test_unknown_column_entries_are_skipped() {
        let rows = vec![
            json!({"name": "b", "age": 2}),
            json!({"name": "a", "age": 1}),
        ];
        let order = SortOrder::from(vec![
            FieldSortOrder::new("removed", Direction::Ascending),
            FieldSortOrder::new("name", Direction::Ascending),
        ]);
        let sorted = sort_rows(&rows, &columns(), &order, None);
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_order_falls_back_to_default() {
        let rows = vec![json!({"name": "b"}), json!({"name": "a"})];
        let default = SortOrder::single("name", Direction::Ascending);
        let sorted = sort_rows(&rows, &columns(), &SortOrder::new(), Some(&default));
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_no_order_preserves_original_order() {
        let rows = vec![json!({"name": "b"}), json!({"name": "a"})];
        let sorted = sort_rows(&rows, &columns(), &SortOrder::new(), None);
        assert_eq!(names(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_reapplying_an_order_is_deterministic() {
        let rows = vec![
            json!({"name": "carol", "age": 30}),
            json!({"name": "alice", "age": 41}),
            json!({"name": "bob", "age": 30}),
        ];
        let order = SortOrder::from(vec![FieldSortOrder::new("age", Direction::Ascending)]);
        let once = sort_rows(&rows, &columns(), &order, None);
        let json = serde_json::to_string(&order).unwrap();
        let restored: SortOrder = serde_json::from_str(&json).unwrap();
        let twice = sort_rows(&rows, &columns(), &restored, None);
        assert_eq!(once, twice);
    }
}

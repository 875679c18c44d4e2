//! End-to-end sorting tests: comparator, engine, and persistence round trip.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::{json, Value};
use vgrid::{
    next_sort_order, sort_rows, Accessor, CellValue, ColumnDescriptor, Direction, FieldSortOrder,
    SortOrder,
};

fn people() -> Vec<Value> {
    vec![
        json!({"id": "1", "name": "Émile", "dept": "ops", "age": 54}),
        json!({"id": "2", "name": "alice", "dept": "eng", "age": 30}),
        json!({"id": "3", "name": "Bob", "dept": "eng", "age": 30}),
        json!({"id": "4", "name": "emile", "dept": "ops", "age": 41}),
    ]
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::from_property("name", "Name", 150.0),
        ColumnDescriptor::from_property("dept", "Department", 100.0),
        ColumnDescriptor::from_property("age", "Age", 60.0),
    ]
}

fn names(rows: &[Value]) -> Vec<&str> {
    rows.iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .collect()
}

#[test]
fn test_locale_aware_single_column_sort() {
    let order = SortOrder::single("name", Direction::Ascending);
    let sorted = sort_rows(&people(), &columns(), &order, None);
    // base sensitivity: "Émile" and "emile" tie, stable sort keeps input order
    assert_eq!(names(&sorted), vec!["alice", "Bob", "Émile", "emile"]);
}

#[test]
fn test_multi_key_sort_with_tie_break() {
    let order = SortOrder::from(vec![
        FieldSortOrder::new("dept", Direction::Ascending),
        FieldSortOrder::new("age", Direction::Descending),
    ]);
    let sorted = sort_rows(&people(), &columns(), &order, None);
    assert_eq!(names(&sorted), vec!["alice", "Bob", "Émile", "emile"]);

    let order = SortOrder::from(vec![
        FieldSortOrder::new("dept", Direction::Descending),
        FieldSortOrder::new("age", Direction::Ascending),
    ]);
    let sorted = sort_rows(&people(), &columns(), &order, None);
    assert_eq!(names(&sorted), vec!["emile", "Émile", "alice", "Bob"]);
}

#[test]
fn test_distinct_sort_accessor_orders_differently_from_display() {
    // display shows a label, ordering uses a hidden weight
    let rows = vec![
        json!({"id": "a", "label": "low", "weight": 1}),
        json!({"id": "b", "label": "high", "weight": 3}),
        json!({"id": "c", "label": "mid", "weight": 2}),
    ];
    let column = ColumnDescriptor::from_property("label", "Priority", 100.0)
        .with_sort_accessor(Accessor::property("weight"));
    let order = SortOrder::single("label", Direction::Ascending);
    let sorted = sort_rows(&rows, &[column], &order, None);
    let labels: Vec<&str> = sorted
        .iter()
        .filter_map(|r| r.get("label").and_then(Value::as_str))
        .collect();
    assert_eq!(labels, vec!["low", "mid", "high"]);
}

#[test]
fn test_missing_values_sort_before_content() {
    let rows = vec![
        json!({"id": "a", "name": "z"}),
        json!({"id": "b"}),
        json!({"id": "c", "name": "a"}),
    ];
    let order = SortOrder::single("name", Direction::Ascending);
    let sorted = sort_rows(&rows, &columns(), &order, None);
    let ids: Vec<&str> = sorted
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn test_computed_accessor_participates_in_sorting() {
    let rows = vec![
        json!({"id": "a", "first": "Ada", "last": "Byron"}),
        json!({"id": "b", "first": "Alan", "last": "Aster"}),
    ];
    let column = ColumnDescriptor::new(
        "full",
        "Full name",
        200.0,
        Accessor::computed(|r| {
            let last = r.get("last").and_then(Value::as_str).unwrap_or("");
            let first = r.get("first").and_then(Value::as_str).unwrap_or("");
            CellValue::Text(format!("{last}, {first}"))
        }),
    );
    let order = SortOrder::single("full", Direction::Ascending);
    let sorted = sort_rows(&rows, &[column], &order, None);
    let ids: Vec<&str> = sorted
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_engine_round_trip_through_persistence() {
    // build an order by simulated clicks, persist it, re-apply it
    let mut order = SortOrder::new();
    order = next_sort_order(&order, "dept", false, false);
    order = next_sort_order(&order, "age", false, true);
    order = next_sort_order(&order, "age", false, true);

    let applied = sort_rows(&people(), &columns(), &order, None);

    let json = serde_json::to_string(&order).unwrap();
    let restored: SortOrder = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, order);

    let reapplied = sort_rows(&people(), &columns(), &restored, None);
    assert_eq!(applied, reapplied);
}

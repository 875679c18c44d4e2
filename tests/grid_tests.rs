//! Grid lifecycle tests: construction, scrolling, hover, selection,
//! header-click sorting, interception hooks, and teardown.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::{sample_columns, sample_rows, RecordingSurface};
use serde_json::{json, Value};
use vgrid::{
    Direction, Grid, GridError, GridOptions, Intercept, KeyRule, ScrollOffset, SortOrder,
};

fn options(rows: Vec<Value>) -> GridOptions<RecordingSurface> {
    GridOptions::new(
        rows,
        sample_columns(),
        KeyRule::property("id"),
        RecordingSurface::new(20.0, 400.0, 200.0),
    )
    .scroll_throttle(Duration::ZERO)
}

#[test]
fn test_construction_materializes_first_window() {
    let grid = Grid::new(options(sample_rows(100))).unwrap();
    let surface = grid.surface();
    assert_eq!(surface.render_count(), 1);
    assert_eq!(surface.last_window_indices(), (0..10).collect::<Vec<_>>());
    assert_eq!(surface.content_size, Some((300.0, 2000.0)));
}

#[test]
fn test_construction_with_fewer_rows_than_window() {
    let grid = Grid::new(options(sample_rows(3))).unwrap();
    assert_eq!(grid.surface().last_window_indices(), vec![0, 1, 2]);
}

#[test]
fn test_construction_restores_initial_scroll() {
    let opts = options(sample_rows(100)).initial_scroll(ScrollOffset { top: 100.0, left: 0.0 });
    let grid = Grid::new(opts).unwrap();
    assert_eq!(grid.viewport().first_visible_row, 5);
    assert_eq!(grid.surface().last_window_indices()[0], 5);
}

#[test]
fn test_construction_applies_initial_sort() {
    let opts =
        options(sample_rows(100)).initial_sort(SortOrder::single("score", Direction::Ascending));
    let grid = Grid::new(opts).unwrap();
    let scores: Vec<f64> = grid
        .rows()
        .iter()
        .filter_map(|r| r.get("score").and_then(Value::as_f64))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(grid.sort_order().len(), 1);
}

#[test]
fn test_duplicate_row_keys_are_rejected() {
    let rows = vec![json!({"id": "a"}), json!({"id": "a"})];
    let result = Grid::new(options(rows));
    assert!(matches!(result, Err(GridError::DuplicateRowKey(k)) if k == "a"));
}

#[test]
fn test_missing_row_key_is_rejected() {
    let rows = vec![json!({"id": "a"}), json!({"name": "no key"})];
    let result = Grid::new(options(rows));
    assert!(matches!(result, Err(GridError::MissingRowKey(1))));
}

#[test]
fn test_non_positive_row_height_is_a_config_error() {
    let opts = GridOptions::new(
        sample_rows(5),
        sample_columns(),
        KeyRule::property("id"),
        RecordingSurface::new(0.0, 400.0, 200.0),
    );
    assert!(matches!(Grid::new(opts), Err(GridError::Config(_))));
}

#[test]
fn test_scroll_rerenders_when_window_shifts() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_scroll(45.0, 0.0);
    assert_eq!(grid.viewport().first_visible_row, 3);
    assert_eq!(grid.surface().last_window_indices()[0], 3);
}

#[test]
fn test_sub_row_scroll_within_same_window_does_not_rerender() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_scroll(21.0, 0.0);
    let renders = grid.surface().render_count();
    // still ceil(30/20) = 2, same window
    grid.handle_scroll(30.0, 0.0);
    assert_eq!(grid.surface().render_count(), renders);
}

#[test]
fn test_scroll_notification_fires_only_when_first_index_changes() {
    let fired: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let opts = options(sample_rows(100)).on_scroll(move |offset| sink.borrow_mut().push(offset.top));
    let mut grid = Grid::new(opts).unwrap();

    grid.handle_scroll(21.0, 0.0); // first 0 -> 2
    grid.handle_scroll(30.0, 0.0); // first stays 2
    grid.handle_scroll(41.0, 0.0); // first 2 -> 3
    assert_eq!(*fired.borrow(), vec![21.0, 41.0]);
}

fn throttled_options(rows: Vec<Value>) -> GridOptions<RecordingSurface> {
    GridOptions::new(
        rows,
        sample_columns(),
        KeyRule::property("id"),
        RecordingSurface::new(20.0, 400.0, 200.0),
    )
    .scroll_throttle(Duration::from_secs(60))
}

#[test]
fn test_throttled_scroll_records_offset_and_settles_on_flush() {
    let mut grid = Grid::new(throttled_options(sample_rows(100))).unwrap();

    grid.handle_scroll(40.0, 0.0); // first event always runs
    grid.handle_scroll(400.0, 0.0); // inside the interval: recorded, deferred
    assert_eq!(grid.viewport().first_visible_row, 2);
    assert_eq!(grid.scroll_offset().top, 400.0);

    grid.flush_scroll();
    assert_eq!(grid.viewport().first_visible_row, 20);
    assert_eq!(grid.surface().last_window_indices()[0], 20);

    // nothing pending: a second flush does not rerender
    let renders = grid.surface().render_count();
    grid.flush_scroll();
    assert_eq!(grid.surface().render_count(), renders);
}

#[test]
fn test_click_after_throttled_scroll_hits_settled_row() {
    let mut grid = Grid::new(throttled_options(sample_rows(100))).unwrap();

    grid.handle_scroll(40.0, 0.0);
    grid.handle_scroll(400.0, 0.0); // deferred by the throttle

    // the handler catches up before hit testing, so the click lands on the
    // row visually under the pointer at the settled position
    grid.handle_click(10.0, 5.0);
    assert_eq!(grid.selected_row(), Some("r20"));
}

#[test]
fn test_pointer_move_after_throttled_scroll_hovers_settled_row() {
    let mut grid = Grid::new(throttled_options(sample_rows(100))).unwrap();

    grid.handle_scroll(40.0, 0.0);
    grid.handle_scroll(400.0, 0.0);

    grid.handle_pointer_move(10.0, 5.0);
    assert_eq!(grid.hot_row(), Some("r20"));
    assert_eq!(grid.surface().last_window_indices()[0], 20);
}

#[test]
fn test_resize_recomputes_window() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.surface_mut().client_height = 100.0;
    grid.handle_resize();
    assert_eq!(grid.viewport().visible_row_count, 5);
    assert_eq!(grid.surface().last_window_indices().len(), 5);
}

#[test]
fn test_pointer_move_sets_hover() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_pointer_move(10.0, 25.0);
    assert_eq!(grid.hot_row(), Some("r1"));
    assert_eq!(grid.surface().hot.as_deref(), Some("r1"));
}

#[test]
fn test_hover_follows_scroll_with_stored_pointer() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_pointer_move(10.0, 25.0);
    assert_eq!(grid.hot_row(), Some("r1"));
    // pointer stays put; the rows underneath it move
    grid.handle_scroll(40.0, 0.0);
    assert_eq!(grid.hot_row(), Some("r3"));
}

#[test]
fn test_pointer_leave_clears_hover_but_not_selection() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_click(10.0, 25.0);
    grid.handle_pointer_move(10.0, 45.0);
    grid.handle_pointer_leave();
    assert_eq!(grid.hot_row(), None);
    assert_eq!(grid.surface().hot, None);
    assert_eq!(grid.selected_row(), Some("r1"));
}

#[test]
fn test_click_selects_row() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_click(10.0, 25.0);
    assert_eq!(grid.selected_row(), Some("r1"));
    assert_eq!(grid.surface().selected.as_deref(), Some("r1"));
}

#[test]
fn test_click_on_empty_space_changes_nothing() {
    let mut grid = Grid::new(options(sample_rows(2))).unwrap();
    grid.handle_click(10.0, 150.0); // below the last row
    assert_eq!(grid.selected_row(), None);
}

#[test]
fn test_click_in_scrollbar_guard_band_changes_nothing() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_click(395.0, 25.0);
    assert_eq!(grid.selected_row(), None);
}

#[test]
fn test_row_click_hook_can_deny_selection() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let opts = options(sample_rows(100)).on_row_click(move |row| {
        let id = row.get("id").and_then(Value::as_str).unwrap_or("").to_string();
        sink.borrow_mut().push(id);
        Intercept::Deny
    });
    let mut grid = Grid::new(opts).unwrap();
    grid.handle_click(10.0, 25.0);
    assert_eq!(*seen.borrow(), vec!["r1".to_string()]);
    assert_eq!(grid.selected_row(), None);
}

#[test]
fn test_header_click_sorts_and_rerenders() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    let renders = grid.surface().render_count();
    grid.handle_header_click("score", false, false).unwrap();
    assert_eq!(
        grid.sort_order().direction_of("score"),
        Some(Direction::Ascending)
    );
    let scores: Vec<f64> = grid
        .rows()
        .iter()
        .filter_map(|r| r.get("score").and_then(Value::as_f64))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    assert!(grid.surface().render_count() > renders);
}

#[test]
fn test_header_click_on_unknown_column_is_an_error() {
    let mut grid = Grid::new(options(sample_rows(10))).unwrap();
    let result = grid.handle_header_click("nope", false, false);
    assert!(matches!(result, Err(GridError::UnknownColumn(k)) if k == "nope"));
}

#[test]
fn test_modified_clicks_build_multi_column_order() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.handle_header_click("name", false, false).unwrap();
    grid.handle_header_click("score", true, false).unwrap();
    let keys: Vec<&str> = grid
        .sort_order()
        .entries()
        .iter()
        .map(|e| e.column.as_str())
        .collect();
    assert_eq!(keys, vec!["name", "score"]);

    // re-clicking a sorted column with the modifier demotes it to the tail
    grid.handle_header_click("name", false, true).unwrap();
    let entries = grid.sort_order().entries();
    assert_eq!(entries[0].column, "score");
    assert_eq!(entries[1].column, "name");
    assert_eq!(entries[1].direction, Direction::Descending);
}

#[test]
fn test_cycle_returns_to_default_order() {
    let opts =
        options(sample_rows(100)).default_sort(SortOrder::single("name", Direction::Ascending));
    let mut grid = Grid::new(opts).unwrap();
    for _ in 0..3 {
        grid.handle_header_click("score", false, false).unwrap();
    }
    // none -> ascending -> descending -> none, falling back to the default
    assert!(grid.sort_order().is_empty());
    let names: Vec<&str> = grid
        .rows()
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .collect();
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_sort_hook_deny_records_order_without_resorting() {
    let opts = options(sample_rows(100)).on_sort(|_| Intercept::Deny);
    let mut grid = Grid::new(opts).unwrap();
    let before: Vec<Value> = grid.rows().to_vec();
    grid.handle_header_click("score", false, false).unwrap();
    assert_eq!(
        grid.sort_order().direction_of("score"),
        Some(Direction::Ascending)
    );
    assert_eq!(grid.rows(), before.as_slice());
}

#[test]
fn test_replace_rows_keeps_selection_when_key_survives() {
    let mut grid = Grid::new(options(sample_rows(10))).unwrap();
    grid.handle_click(10.0, 25.0);
    assert_eq!(grid.selected_row(), Some("r1"));

    let mut rows = sample_rows(10);
    rows.reverse();
    grid.replace_rows(rows).unwrap();
    assert_eq!(grid.selected_row(), Some("r1"));
    assert_eq!(grid.surface().last_window_keys()[0], "r9");
}

#[test]
fn test_replace_rows_clears_selection_when_key_is_gone() {
    let mut grid = Grid::new(options(sample_rows(10))).unwrap();
    grid.handle_click(10.0, 25.0);
    grid.replace_rows(sample_rows(1)).unwrap();
    assert_eq!(grid.selected_row(), None);
    assert_eq!(grid.surface().selected, None);
}

#[test]
fn test_scroll_to_row() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    let offset = grid.scroll_to_row("r50").unwrap();
    assert_eq!(offset.top, 1000.0);
    assert_eq!(grid.viewport().first_visible_row, 50);
    assert_eq!(grid.scroll_to_row("missing"), None);
}

#[test]
fn test_scroll_to_row_clamps_to_content_end() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    let offset = grid.scroll_to_row("r99").unwrap();
    // 2000 content - 200 client
    assert_eq!(offset.top, 1800.0);
}

#[test]
fn test_destroy_is_idempotent_and_detaches() {
    let mut grid = Grid::new(options(sample_rows(100))).unwrap();
    grid.destroy();
    assert!(grid.is_destroyed());
    assert!(grid.surface().cleared);
    assert_eq!(grid.surface().render_count(), 0);

    // handlers are no-ops after teardown
    grid.handle_scroll(100.0, 0.0);
    grid.handle_pointer_move(10.0, 10.0);
    assert_eq!(grid.surface().render_count(), 0);
    assert_eq!(grid.hot_row(), None);

    grid.destroy(); // second call is fine
}

//! The grid instance: owns viewport, interaction, and sort state for one
//! scrollable table and drives a display surface through the
//! materialization boundary.
//!
//! Everything here is single-threaded and synchronous: handlers run to
//! completion on each scroll/resize/pointer/click notification, and all
//! mutable state lives on the instance (no module-level state).

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GridError, Result};
use crate::interact::{row_index_at_point, InteractionState};
use crate::layout::{ViewportInput, ViewportState};
use crate::sort::{next_sort_order, sort_rows};
use crate::types::{
    find_column, total_width, validate_columns, ColumnDescriptor, KeyRule, RowKey, SortOrder,
};

/// Minimum interval between scroll-driven geometry recomputations. A
/// throttle, not a debounce: recomputation still runs at a steady rate
/// during continuous scrolling.
pub const DEFAULT_SCROLL_THROTTLE: Duration = Duration::from_millis(16);

/// Decision returned by an interception hook. `Deny` suppresses the grid's
/// own default handling and hands full responsibility to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    Allow,
    Deny,
}

/// Scroll offset reported by the scroll notification and accepted back via
/// `GridOptions::initial_scroll` for restoration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOffset {
    pub top: f32,
    pub left: f32,
}

/// One materialized row handed to the surface.
#[derive(Debug)]
pub struct WindowRow<'a> {
    /// Index into the (sorted) row array.
    pub index: usize,
    pub key: &'a str,
    pub row: &'a Value,
    /// Top edge of the row's rectangle, relative to the viewport.
    pub top: f32,
}

/// Materialization boundary. The grid core never constructs or styles
/// concrete display nodes; a surface does, and reports the measurements the
/// geometry engine needs.
pub trait Surface {
    /// Pixel height of a single row. Measured once at construction (the
    /// classic implementation renders a throwaway probe row); must be
    /// positive.
    fn row_height(&self) -> f32;
    /// Container inner width in pixels.
    fn client_width(&self) -> f32;
    /// Container inner height in pixels.
    fn client_height(&self) -> f32;
    /// Replace the materialized window.
    fn render_window(&mut self, window: &[WindowRow<'_>], viewport: &ViewportState);
    /// Content extents backing the scrollbars.
    fn set_content_size(&mut self, width: f32, height: f32);
    /// Move hover styling to the given row (or clear it).
    fn set_hot_row(&mut self, key: Option<&str>);
    /// Move selection styling to the given row (or clear it).
    fn set_selected_row(&mut self, key: Option<&str>);
    /// Remove everything the surface materialized.
    fn clear(&mut self);
}

/// Hook invoked with the clicked row before the grid mutates selection.
pub type RowClickHook = Box<dyn FnMut(&Value) -> Intercept>;
/// Hook invoked with the proposed order before the grid re-sorts in place.
pub type SortHook = Box<dyn FnMut(&SortOrder) -> Intercept>;
/// Notification fired when the first visible row index changes.
pub type ScrollHook = Box<dyn FnMut(ScrollOffset)>;

/// Construction input for a [`Grid`].
pub struct GridOptions<S: Surface> {
    pub rows: Vec<Value>,
    pub columns: Vec<ColumnDescriptor>,
    pub key_rule: KeyRule,
    pub surface: S,
    /// Sort order in effect at construction (e.g. restored from persistence).
    pub initial_sort: Option<SortOrder>,
    /// Fallback ordering when no explicit order is in effect. Its presence
    /// changes the per-column cycle's terminal transition.
    pub default_sort: Option<SortOrder>,
    /// Scroll offset to restore, as previously reported by the scroll hook.
    pub initial_scroll: Option<ScrollOffset>,
    pub scroll_throttle: Duration,
    pub on_row_click: Option<RowClickHook>,
    pub on_sort: Option<SortHook>,
    pub on_scroll: Option<ScrollHook>,
}

impl<S: Surface> GridOptions<S> {
    pub fn new(
        rows: Vec<Value>,
        columns: Vec<ColumnDescriptor>,
        key_rule: KeyRule,
        surface: S,
    ) -> GridOptions<S> {
        GridOptions {
            rows,
            columns,
            key_rule,
            surface,
            initial_sort: None,
            default_sort: None,
            initial_scroll: None,
            scroll_throttle: DEFAULT_SCROLL_THROTTLE,
            on_row_click: None,
            on_sort: None,
            on_scroll: None,
        }
    }

    pub fn initial_sort(mut self, order: SortOrder) -> Self {
        self.initial_sort = Some(order);
        self
    }

    pub fn default_sort(mut self, order: SortOrder) -> Self {
        self.default_sort = Some(order);
        self
    }

    pub fn initial_scroll(mut self, offset: ScrollOffset) -> Self {
        self.initial_scroll = Some(offset);
        self
    }

    pub fn scroll_throttle(mut self, interval: Duration) -> Self {
        self.scroll_throttle = interval;
        self
    }

    pub fn on_row_click(mut self, hook: impl FnMut(&Value) -> Intercept + 'static) -> Self {
        self.on_row_click = Some(Box::new(hook));
        self
    }

    pub fn on_sort(mut self, hook: impl FnMut(&SortOrder) -> Intercept + 'static) -> Self {
        self.on_sort = Some(Box::new(hook));
        self
    }

    pub fn on_scroll(mut self, hook: impl FnMut(ScrollOffset) + 'static) -> Self {
        self.on_scroll = Some(Box::new(hook));
        self
    }
}

/// A virtual-scrolling grid over an opaque row set.
pub struct Grid<S: Surface> {
    surface: S,
    rows: Vec<Value>,
    /// Row keys, parallel to `rows`. Unique for the life of the row set
    /// (duplicates are rejected at construction and on `replace_rows`).
    keys: Vec<RowKey>,
    columns: Vec<ColumnDescriptor>,
    key_rule: KeyRule,
    sort_order: SortOrder,
    default_sort: Option<SortOrder>,
    viewport: ViewportState,
    interaction: InteractionState,
    scroll: ScrollOffset,
    row_height: f32,
    total_column_width: f32,
    scroll_throttle: Duration,
    last_scroll_tick: Option<Instant>,
    /// Set when a scroll offset was recorded while the throttle was closed
    /// and the viewport has not caught up with it yet.
    scroll_pending: bool,
    on_row_click: Option<RowClickHook>,
    on_sort: Option<SortHook>,
    on_scroll: Option<ScrollHook>,
    destroyed: bool,
}

impl<S: Surface> Grid<S> {
    /// Build a grid: validates columns and row keys, applies the initial (or
    /// default) sort, restores the initial scroll offset, and materializes
    /// the first window.
    pub fn new(options: GridOptions<S>) -> Result<Grid<S>> {
        validate_columns(&options.columns)?;

        let row_height = options.surface.row_height();
        if !(row_height > 0.0) {
            return Err(GridError::Config(format!(
                "measured row height must be positive, got {row_height}"
            )));
        }

        validate_keys(&options.rows, &options.key_rule)?;

        let sort_order = options.initial_sort.unwrap_or_default();
        let rows = sort_rows(
            &options.rows,
            &options.columns,
            &sort_order,
            options.default_sort.as_ref(),
        );
        let keys = extract_keys(&rows, &options.key_rule);
        let scroll = options.initial_scroll.unwrap_or_default();
        let total_column_width = total_width(&options.columns);

        let viewport = ViewportState::compute(&ViewportInput {
            scroll_top: scroll.top,
            scroll_left: scroll.left,
            client_height: options.surface.client_height(),
            row_height,
            row_count: rows.len(),
            total_column_width,
        });

        let mut grid = Grid {
            surface: options.surface,
            rows,
            keys,
            columns: options.columns,
            key_rule: options.key_rule,
            sort_order,
            default_sort: options.default_sort,
            viewport,
            interaction: InteractionState::default(),
            scroll,
            row_height,
            total_column_width,
            scroll_throttle: options.scroll_throttle,
            last_scroll_tick: None,
            scroll_pending: false,
            on_row_click: options.on_row_click,
            on_sort: options.on_sort,
            on_scroll: options.on_scroll,
            destroyed: false,
        };

        grid.surface
            .set_content_size(total_column_width, viewport.total_content_height);
        grid.render_window();
        log::debug!(
            "grid constructed: {} rows, {} columns, window {:?}",
            grid.rows.len(),
            grid.columns.len(),
            grid.viewport.materialized_range()
        );
        Ok(grid)
    }

    /// Scroll notification from the container. Recomputation is throttled
    /// to a fixed minimum interval, but the offset itself is always
    /// recorded: an event landing inside the interval (typically the last
    /// one of a gesture) is materialized by the next handler invocation or
    /// an explicit [`Grid::flush_scroll`].
    pub fn handle_scroll(&mut self, scroll_top: f32, scroll_left: f32) {
        if self.destroyed {
            return;
        }
        self.scroll = ScrollOffset {
            top: scroll_top,
            left: scroll_left,
        };
        if let Some(last) = self.last_scroll_tick {
            if last.elapsed() < self.scroll_throttle {
                self.scroll_pending = true;
                return;
            }
        }
        self.last_scroll_tick = Some(Instant::now());
        self.recompute_geometry();
        // The pointer did not move, but what is under it did.
        self.refresh_hover();
    }

    /// Materialize a scroll offset recorded while the throttle was closed.
    /// Embedders drive this once scrolling settles (a short timer after the
    /// final scroll event); the pointer and click handlers also catch up on
    /// entry, so hit testing never lags the recorded position.
    pub fn flush_scroll(&mut self) {
        if self.destroyed || !self.scroll_pending {
            return;
        }
        self.last_scroll_tick = Some(Instant::now());
        self.recompute_geometry();
        self.refresh_hover();
    }

    /// Container size may have changed (delivered by an external resize
    /// observer, which does its own batching; no throttle here).
    pub fn handle_resize(&mut self) {
        if self.destroyed {
            return;
        }
        self.recompute_geometry();
        self.refresh_hover();
    }

    /// Pointer moved to viewport-relative coordinates.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) {
        if self.destroyed {
            return;
        }
        self.catch_up_scroll();
        self.interaction.pointer = Some((x, y));
        self.refresh_hover();
    }

    /// Pointer left the grid. Hover clears; selection stays.
    pub fn handle_pointer_leave(&mut self) {
        if self.destroyed {
            return;
        }
        self.interaction.clear_pointer();
        self.surface.set_hot_row(None);
    }

    /// Click at viewport-relative coordinates. A click on empty space does
    /// nothing; a click on a row consults the interception hook and, unless
    /// denied, moves selection to that row.
    pub fn handle_click(&mut self, x: f32, y: f32) {
        if self.destroyed {
            return;
        }
        self.catch_up_scroll();
        let Some(index) = row_index_at_point(x, y, &self.viewport, self.surface.client_width())
        else {
            return;
        };
        let Some(row) = self.rows.get(index) else {
            return;
        };
        if let Some(hook) = self.on_row_click.as_mut() {
            if hook(row) == Intercept::Deny {
                // Selection semantics for this click belong to the caller.
                return;
            }
        }
        let Some(key) = self.keys.get(index) else {
            return;
        };
        if self.interaction.selected.as_deref() != Some(key.as_str()) {
            self.interaction.selected = Some(key.clone());
            self.surface
                .set_selected_row(self.interaction.selected.as_deref());
        }
    }

    /// Column header interaction with additive-intent modifier flags.
    ///
    /// An unknown column key is a wiring defect and reported as an error
    /// rather than silently ignored. The proposed order goes through the
    /// sort interception hook; a denial records the order without re-sorting
    /// (the caller re-sorts externally and calls [`Grid::replace_rows`]).
    pub fn handle_header_click(&mut self, column_key: &str, ctrl: bool, shift: bool) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if find_column(&self.columns, column_key).is_none() {
            return Err(GridError::UnknownColumn(column_key.to_string()));
        }
        self.catch_up_scroll();
        let has_default = self.default_sort.as_ref().is_some_and(|o| !o.is_empty());
        let next = next_sort_order(&self.sort_order, column_key, has_default, ctrl || shift);
        log::trace!("header click on '{column_key}': next order {next:?}");
        if let Some(hook) = self.on_sort.as_mut() {
            if hook(&next) == Intercept::Deny {
                self.sort_order = next;
                return Ok(());
            }
        }
        self.sort_order = next;
        self.resort_rows();
        Ok(())
    }

    /// Swap in an externally updated (e.g. asynchronously sorted) row set.
    /// Selection survives when its key is still present; scroll position is
    /// kept and the window recomputed against the new data.
    pub fn replace_rows(&mut self, rows: Vec<Value>) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        validate_keys(&rows, &self.key_rule)?;
        self.keys = extract_keys(&rows, &self.key_rule);
        self.rows = rows;
        if let Some(selected) = self.interaction.selected.clone() {
            if !self.keys.contains(&selected) {
                self.interaction.selected = None;
                self.surface.set_selected_row(None);
            }
        }
        self.recompute_geometry();
        self.render_window();
        self.refresh_hover();
        Ok(())
    }

    /// Scroll so the given row's rectangle starts at the top of the window.
    /// Returns the resulting offset, or `None` when no row has that key.
    pub fn scroll_to_row(&mut self, key: &str) -> Option<ScrollOffset> {
        if self.destroyed {
            return None;
        }
        let index = self.keys.iter().position(|k| k == key)?;
        let max_top = (self.viewport.total_content_height - self.viewport.client_height).max(0.0);
        let top = (index as f32 * self.row_height).min(max_top);
        self.scroll = ScrollOffset {
            top,
            left: self.scroll.left,
        };
        self.recompute_geometry();
        self.refresh_hover();
        Some(self.scroll)
    }

    /// Tear the grid down: clears the surface and releases rows and hooks.
    /// Idempotent; every handler is a no-op afterwards.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.surface.clear();
        self.rows.clear();
        self.keys.clear();
        self.interaction = InteractionState::default();
        self.on_row_click = None;
        self.on_sort = None;
        self.on_scroll = None;
        log::debug!("grid destroyed");
    }

    // --- accessors -------------------------------------------------------

    pub fn sort_order(&self) -> &SortOrder {
        &self.sort_order
    }

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn selected_row(&self) -> Option<&str> {
        self.interaction.selected.as_deref()
    }

    pub fn hot_row(&self) -> Option<&str> {
        self.interaction.hot.as_deref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Key of the materialized row under a viewport-relative point.
    pub fn row_key_at_point(&self, x: f32, y: f32) -> Option<RowKey> {
        let index = row_index_at_point(x, y, &self.viewport, self.surface.client_width())?;
        self.keys.get(index).cloned()
    }

    // --- internals -------------------------------------------------------

    fn viewport_input(&self) -> ViewportInput {
        ViewportInput {
            scroll_top: self.scroll.top,
            scroll_left: self.scroll.left,
            client_height: self.surface.client_height(),
            row_height: self.row_height,
            row_count: self.rows.len(),
            total_column_width: self.total_column_width,
        }
    }

    /// Re-derive the window as a whole and re-materialize if it structurally
    /// changed. The scroll notification fires only when the first visible
    /// row index moved, not on every pixel of scroll.
    fn recompute_geometry(&mut self) {
        self.scroll_pending = false;
        let next = ViewportState::compute(&self.viewport_input());
        if next.has_changed(&self.viewport) {
            let first_changed = next.first_visible_row != self.viewport.first_visible_row;
            self.viewport = next;
            self.surface
                .set_content_size(next.total_column_width, next.total_content_height);
            self.render_window();
            if first_changed {
                if let Some(hook) = self.on_scroll.as_mut() {
                    hook(self.scroll);
                }
            }
        } else {
            // Keep raw scroll fields current for hit testing even when the
            // window itself is unchanged.
            self.viewport = next;
        }
    }

    fn render_window(&mut self) {
        let viewport = self.viewport;
        let keys = &self.keys;
        let rows = &self.rows;
        let window: Vec<WindowRow<'_>> = viewport
            .materialized_range()
            .filter_map(|index| {
                Some(WindowRow {
                    index,
                    key: keys.get(index)?.as_str(),
                    row: rows.get(index)?,
                    top: viewport.row_top(index),
                })
            })
            .collect();
        self.surface.render_window(&window, &viewport);
    }

    /// Bring the viewport in line with a scroll offset the throttle deferred.
    fn catch_up_scroll(&mut self) {
        if self.scroll_pending {
            self.recompute_geometry();
        }
    }

    fn refresh_hover(&mut self) {
        let hot = self
            .interaction
            .pointer
            .and_then(|(x, y)| self.row_key_at_point(x, y));
        if hot != self.interaction.hot {
            self.interaction.hot = hot;
            self.surface.set_hot_row(self.interaction.hot.as_deref());
        }
    }

    fn resort_rows(&mut self) {
        self.rows = sort_rows(
            &self.rows,
            &self.columns,
            &self.sort_order,
            self.default_sort.as_ref(),
        );
        self.keys = extract_keys(&self.rows, &self.key_rule);
        self.render_window();
        self.refresh_hover();
    }
}

/// Reject the row set when any row has no key or two rows share one.
/// Duplicate keys are a hard error by policy; the grid never guesses which
/// of two rows a key refers to.
fn validate_keys(rows: &[Value], rule: &KeyRule) -> Result<()> {
    let mut seen: HashSet<RowKey> = HashSet::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let key = rule
            .resolve(row)
            .ok_or(GridError::MissingRowKey(index))?;
        if seen.contains(&key) {
            return Err(GridError::DuplicateRowKey(key));
        }
        seen.insert(key);
    }
    Ok(())
}

/// Extract keys for a row set already validated by `validate_keys`.
fn extract_keys(rows: &[Value], rule: &KeyRule) -> Vec<RowKey> {
    rows.iter()
        .map(|row| rule.resolve(row).unwrap_or_default())
        .collect()
}

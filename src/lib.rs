//! vgrid - headless virtual-scrolling data grid
//!
//! Renders a scrollable table of opaque rows with a bounded number of
//! display elements, independent of total row count:
//! - Viewport geometry: minimal gap-free window of row indices, exact
//!   re-layout detection
//! - Interactive multi-column sorting with a cycling per-column state
//!   machine and locale-aware, stable multi-key comparison
//! - Pointer interaction: hover and selection via rectangle hit testing
//!
//! The display surface is a collaborator behind the [`Surface`] trait; the
//! core owns geometry, sorting, and interaction state only.
//!
//! # Usage
//!
//! ```no_run
//! use vgrid::{ColumnDescriptor, Grid, GridOptions, KeyRule};
//! use serde_json::json;
//! # struct MySurface;
//! # impl vgrid::Surface for MySurface {
//! #     fn row_height(&self) -> f32 { 20.0 }
//! #     fn client_width(&self) -> f32 { 400.0 }
//! #     fn client_height(&self) -> f32 { 300.0 }
//! #     fn render_window(&mut self, _: &[vgrid::WindowRow<'_>], _: &vgrid::ViewportState) {}
//! #     fn set_content_size(&mut self, _: f32, _: f32) {}
//! #     fn set_hot_row(&mut self, _: Option<&str>) {}
//! #     fn set_selected_row(&mut self, _: Option<&str>) {}
//! #     fn clear(&mut self) {}
//! # }
//!
//! let rows = vec![json!({"id": "r1", "name": "Ada"})];
//! let columns = vec![ColumnDescriptor::from_property("name", "Name", 120.0)];
//! let options = GridOptions::new(rows, columns, KeyRule::property("id"), MySurface);
//! let mut grid = Grid::new(options).unwrap();
//! grid.handle_scroll(40.0, 0.0);
//! grid.destroy();
//! ```

pub mod error;
pub mod grid;
pub mod interact;
pub mod layout;
pub mod sort;
pub mod types;

pub use error::{GridError, Result};
pub use grid::{
    Grid, GridOptions, Intercept, RowClickHook, ScrollHook, ScrollOffset, SortHook, Surface,
    WindowRow, DEFAULT_SCROLL_THROTTLE,
};
pub use interact::{row_index_at_point, InteractionState, SCROLLBAR_GUARD_PX};
pub use layout::{ViewportInput, ViewportState};
pub use sort::{advance, compare_base, compare_values, next_sort_order, resolve_value, sort_rows};
pub use types::{
    Accessor, CellValue, ColumnDescriptor, Direction, FieldSortOrder, KeyRule, RowKey, SortOrder,
};

/// Get the library version
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

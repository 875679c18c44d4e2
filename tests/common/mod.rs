//! Common test utilities: a recording display surface and row fixtures.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::{json, Value};
use vgrid::{ColumnDescriptor, Surface, ViewportState, WindowRow};

/// Surface that records everything the grid asks of it.
pub struct RecordingSurface {
    pub row_height: f32,
    pub client_width: f32,
    pub client_height: f32,
    /// One entry per `render_window` call: the (index, key) pairs handed over.
    pub windows: Vec<Vec<(usize, String)>>,
    pub content_size: Option<(f32, f32)>,
    pub hot: Option<String>,
    pub selected: Option<String>,
    pub cleared: bool,
}

impl RecordingSurface {
    pub fn new(row_height: f32, client_width: f32, client_height: f32) -> RecordingSurface {
        RecordingSurface {
            row_height,
            client_width,
            client_height,
            windows: Vec::new(),
            content_size: None,
            hot: None,
            selected: None,
            cleared: false,
        }
    }

    /// Keys of the most recently rendered window.
    pub fn last_window_keys(&self) -> Vec<String> {
        self.windows
            .last()
            .map(|w| w.iter().map(|(_, k)| k.clone()).collect())
            .unwrap_or_default()
    }

    /// Indices of the most recently rendered window.
    pub fn last_window_indices(&self) -> Vec<usize> {
        self.windows
            .last()
            .map(|w| w.iter().map(|(i, _)| *i).collect())
            .unwrap_or_default()
    }

    pub fn render_count(&self) -> usize {
        self.windows.len()
    }
}

impl Surface for RecordingSurface {
    fn row_height(&self) -> f32 {
        self.row_height
    }

    fn client_width(&self) -> f32 {
        self.client_width
    }

    fn client_height(&self) -> f32 {
        self.client_height
    }

    fn render_window(&mut self, window: &[WindowRow<'_>], _viewport: &ViewportState) {
        self.windows.push(
            window
                .iter()
                .map(|row| (row.index, row.key.to_string()))
                .collect(),
        );
    }

    fn set_content_size(&mut self, width: f32, height: f32) {
        self.content_size = Some((width, height));
    }

    fn set_hot_row(&mut self, key: Option<&str>) {
        self.hot = key.map(str::to_string);
    }

    fn set_selected_row(&mut self, key: Option<&str>) {
        self.selected = key.map(str::to_string);
    }

    fn clear(&mut self) {
        self.cleared = true;
        self.windows.clear();
    }
}

/// `count` rows keyed "r0".."rN" with a name and a numeric score.
pub fn sample_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": format!("r{i}"),
                "name": format!("row {i:04}"),
                "score": ((i * 37) % 101) as f64,
            })
        })
        .collect()
}

pub fn sample_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::from_property("name", "Name", 200.0),
        ColumnDescriptor::from_property("score", "Score", 100.0),
    ]
}

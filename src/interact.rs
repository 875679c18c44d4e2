//! Pointer interaction: hit testing, hover, selection state.
//!
//! Hit testing is a spatial query over the window's known per-row rectangle
//! arithmetic (`index * row_height - scroll_top`); it never needs a live
//! display surface and never matches data outside the materialized window.

use crate::layout::ViewportState;
use crate::types::RowKey;

/// Fixed-width guard band at the viewport's trailing edge where a native
/// vertical scrollbar typically overlays the content. Pointer hits inside the
/// band resolve to no row. Heuristic; see DESIGN.md.
pub const SCROLLBAR_GUARD_PX: f32 = 17.0;

/// Last known pointer position plus hover and selection state.
///
/// Hover (`hot`) is recomputed on every pointer move and every scroll, and
/// cleared on pointer leave. Selection persists across scrolls and re-renders
/// and only changes on clicks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    /// Viewport-relative pointer coordinates, absent after pointer leave.
    pub pointer: Option<(f32, f32)>,
    /// Row currently under the pointer.
    pub hot: Option<RowKey>,
    /// Row selected by the last accepted click.
    pub selected: Option<RowKey>,
}

impl InteractionState {
    /// Pointer left the grid: coordinates and hover are gone, selection stays.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
        self.hot = None;
    }
}

/// Index of the materialized row whose allocated rectangle contains the
/// viewport-relative point, or `None` for empty space, the scrollbar guard
/// band, or anything outside the current window. Absence here is routine,
/// never an error.
pub fn row_index_at_point(
    x: f32,
    y: f32,
    viewport: &ViewportState,
    client_width: f32,
) -> Option<usize> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    if x >= (client_width - SCROLLBAR_GUARD_PX).max(0.0) {
        return None;
    }
    // Past the right edge of the columns there is no row to hit.
    if x + viewport.scroll_left >= viewport.total_column_width {
        return None;
    }
    let index = viewport.row_index_at_content_y(y + viewport.scroll_top)?;
    viewport.materialized_range().contains(&index).then_some(index)
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
    use crate::layout::{ViewportInput, ViewportState};

    fn viewport(scroll_top: f32) -> ViewportState {
        ViewportState::compute(&ViewportInput {
            scroll_top,
            scroll_left: 0.0,
            client_height: 200.0,
            row_height: 20.0,
            row_count: 50,
            total_column_width: 300.0,
        })
    }

    #[test]
    fn test_point_resolves_windowed_row() {
        let vp = viewport(0.0);
        assert_eq!(row_index_at_point(10.0, 5.0, &vp, 400.0), Some(0));
        assert_eq!(row_index_at_point(10.0, 45.0, &vp, 400.0), Some(2));
    }

    #[test]
    fn test_scroll_shifts_the_mapping() {
        let vp = viewport(40.0);
        // same pixel, different row after scrolling two rows down
        assert_eq!(row_index_at_point(10.0, 5.0, &vp, 400.0), Some(2));
    }

    #[test]
    fn test_guard_band_suppresses_hits() {
        let vp = viewport(0.0);
        assert_eq!(row_index_at_point(399.0, 5.0, &vp, 400.0), None);
        assert_eq!(
            row_index_at_point(400.0 - SCROLLBAR_GUARD_PX, 5.0, &vp, 400.0),
            None
        );
        assert!(row_index_at_point(400.0 - SCROLLBAR_GUARD_PX - 0.1, 5.0, &vp, 400.0).is_some());
    }

    #[test]
    fn test_point_beyond_columns_is_empty_space() {
        let vp = viewport(0.0);
        // columns end at x=300, client is wider
        assert_eq!(row_index_at_point(310.0, 5.0, &vp, 500.0), None);
    }

    #[test]
    fn test_point_below_last_row_is_empty_space() {
        let vp = ViewportState::compute(&ViewportInput {
            scroll_top: 0.0,
            scroll_left: 0.0,
            client_height: 200.0,
            row_height: 20.0,
            row_count: 3,
            total_column_width: 300.0,
        });
        assert_eq!(row_index_at_point(10.0, 100.0, &vp, 400.0), None);
    }

    #[test]
    fn test_negative_coordinates_never_hit() {
        let vp = viewport(0.0);
        assert_eq!(row_index_at_point(-1.0, 5.0, &vp, 400.0), None);
        assert_eq!(row_index_at_point(5.0, -1.0, &vp, 400.0), None);
    }

    #[test]
    fn test_partially_scrolled_out_row_is_not_hit() {
        // scroll_top=10 means row 0 is clipped and no longer materialized;
        // the strip it still covers resolves to nothing
        let vp = viewport(10.0);
        assert_eq!(vp.first_visible_row, 1);
        assert_eq!(row_index_at_point(10.0, 5.0, &vp, 400.0), None);
    }

    #[test]
    fn test_clear_pointer_keeps_selection() {
        let mut state = InteractionState {
            pointer: Some((10.0, 10.0)),
            hot: Some("r1".to_string()),
            selected: Some("r2".to_string()),
        };
        state.clear_pointer();
        assert_eq!(state.pointer, None);
        assert_eq!(state.hot, None);
        assert_eq!(state.selected, Some("r2".to_string()));
    }
}

//! Viewport window geometry.
//!
//! Maps a scroll position and container size onto the minimal, gap-free
//! window of row indices to materialize. `compute` is a pure function of its
//! inputs; deciding when to re-materialize is `has_changed`, which is
//! idempotent and side-effect free. All side effects (re-rendering, scroll
//! notifications) live in the grid instance that calls these per tick.

use std::ops::Range;

/// The five authoritative geometry inputs plus the pre-summed column width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportInput {
    /// Vertical scroll offset in pixels.
    pub scroll_top: f32,
    /// Horizontal scroll offset in pixels.
    pub scroll_left: f32,
    /// Container inner height in pixels.
    pub client_height: f32,
    /// Fixed per-row height in pixels, measured once at construction.
    pub row_height: f32,
    /// Total number of data rows.
    pub row_count: usize,
    /// Sum of column widths in pixels.
    pub total_column_width: f32,
}

/// Derived window state. Never authoritative: every field is recomputed as a
/// whole from a `ViewportInput` on each geometry change; there are no partial
/// incremental window shifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scroll_top: f32,
    pub scroll_left: f32,
    pub client_height: f32,
    pub row_height: f32,
    pub row_count: usize,
    /// Rows that fit the container, rounded up. A phantom row beyond the data
    /// is harmless; a gap at the bottom is not.
    pub visible_row_count: usize,
    /// First windowed index, rounded up: a row scrolled past its own top edge
    /// is already out of view.
    pub first_visible_row: usize,
    /// `first_visible_row + visible_row_count - 1` (saturating when the
    /// container height is zero).
    pub last_visible_row: usize,
    pub total_column_width: f32,
    /// `row_count * row_height`.
    pub total_content_height: f32,
}

impl ViewportState {
    /// Compute the window for a set of inputs. Pure; holds no hidden state.
    pub fn compute(input: &ViewportInput) -> ViewportState {
        let row_height = input.row_height.max(f32::EPSILON);
        let visible_row_count = (input.client_height.max(0.0) / row_height).ceil() as usize;
        let first_visible_row = (input.scroll_top.max(0.0) / row_height).ceil() as usize;
        let last_visible_row = first_visible_row + visible_row_count.saturating_sub(1);

        ViewportState {
            scroll_top: input.scroll_top,
            scroll_left: input.scroll_left,
            client_height: input.client_height,
            row_height: input.row_height,
            row_count: input.row_count,
            visible_row_count,
            first_visible_row,
            last_visible_row,
            total_column_width: input.total_column_width,
            total_content_height: input.row_count as f32 * input.row_height,
        }
    }

    /// True when re-materialization is structurally necessary. Compares the
    /// six derived fields only, so sub-row-height scroll increments do not
    /// trigger re-renders or notification storms.
    pub fn has_changed(&self, prev: &ViewportState) -> bool {
        self.client_height != prev.client_height
            || self.visible_row_count != prev.visible_row_count
            || self.first_visible_row != prev.first_visible_row
            || self.last_visible_row != prev.last_visible_row
            || self.total_column_width != prev.total_column_width
            || self.total_content_height != prev.total_content_height
    }

    /// The window clamped to the data: phantom indices past the last row are
    /// never materialized.
    pub fn materialized_range(&self) -> Range<usize> {
        if self.visible_row_count == 0 {
            return 0..0;
        }
        let start = self.first_visible_row.min(self.row_count);
        let end = self.last_visible_row.saturating_add(1).min(self.row_count);
        start..end.max(start)
    }

    /// Top edge of a row's allocated rectangle, relative to the viewport.
    pub fn row_top(&self, index: usize) -> f32 {
        index as f32 * self.row_height - self.scroll_top
    }

    /// Index of the row whose rectangle spans a content-space y coordinate.
    /// Ignores the window; callers intersect with `materialized_range`.
    pub fn row_index_at_content_y(&self, content_y: f32) -> Option<usize> {
        if content_y < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let index = (content_y / self.row_height).floor() as usize;
        (index < self.row_count).then_some(index)
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
    use test_case::test_case;

    fn input(scroll_top: f32, client_height: f32, row_height: f32, row_count: usize) -> ViewportInput {
        ViewportInput {
            scroll_top,
            scroll_left: 0.0,
            client_height,
            row_height,
            row_count,
            total_column_width: 300.0,
        }
    }

    #[test_case(0.0, 200.0, 20.0 => 10 ; "exact fit")]
    #[test_case(0.0, 205.0, 20.0 => 11 ; "partial row rounds up")]
    #[test_case(0.0, 1.0, 20.0 => 1 ; "tiny container still shows a row")]
    #[test_case(0.0, 0.0, 20.0 => 0 ; "zero height shows nothing")]
    fn visible_row_count(scroll_top: f32, client_height: f32, row_height: f32) -> usize {
        ViewportState::compute(&input(scroll_top, client_height, row_height, 100)).visible_row_count
    }

    #[test_case(0.0 => 0)]
    #[test_case(1.0 => 1 ; "hides the first row as soon as it is clipped")]
    #[test_case(20.0 => 1)]
    #[test_case(21.0 => 2)]
    fn first_visible_row_rounds_up(scroll_top: f32) -> usize {
        ViewportState::compute(&input(scroll_top, 200.0, 20.0, 100)).first_visible_row
    }

    #[test]
    fn test_window_invariant() {
        let state = ViewportState::compute(&input(45.0, 130.0, 20.0, 100));
        assert_eq!(
            state.last_visible_row - state.first_visible_row + 1,
            state.visible_row_count
        );
    }

    #[test]
    fn test_total_extents() {
        let state = ViewportState::compute(&input(0.0, 200.0, 20.0, 50));
        assert_eq!(state.total_content_height, 1000.0);
        assert_eq!(state.total_column_width, 300.0);
    }

    #[test]
    fn test_has_changed_is_idempotent() {
        let a = ViewportState::compute(&input(40.0, 200.0, 20.0, 100));
        let b = ViewportState::compute(&input(40.0, 200.0, 20.0, 100));
        assert!(!b.has_changed(&a));
    }

    #[test]
    fn test_sub_row_scroll_is_not_a_structural_change() {
        let a = ViewportState::compute(&input(20.0, 200.0, 20.0, 100));
        let b = ViewportState::compute(&input(25.0, 200.0, 20.0, 100));
        // first visible row is ceil(25/20) = 2 vs ceil(20/20) = 1
        assert!(b.has_changed(&a));

        let c = ViewportState::compute(&input(20.5, 200.0, 20.0, 100));
        let d = ViewportState::compute(&input(30.0, 200.0, 20.0, 100));
        // both land on first=2, same window
        assert!(!d.has_changed(&c));
    }

    #[test]
    fn test_materialized_range_clamps_to_data() {
        // 10 rows of data, window asks for rows 8..=17
        let state = ViewportState::compute(&input(160.0, 200.0, 20.0, 10));
        assert_eq!(state.first_visible_row, 8);
        assert_eq!(state.materialized_range(), 8..10);
    }

    #[test]
    fn test_materialized_range_empty_when_scrolled_past_data() {
        let state = ViewportState::compute(&input(400.0, 200.0, 20.0, 10));
        assert!(state.materialized_range().is_empty());
    }

    #[test]
    fn test_row_top_is_viewport_relative() {
        let state = ViewportState::compute(&input(50.0, 200.0, 20.0, 100));
        assert_eq!(state.row_top(3), 10.0);
        assert_eq!(state.row_top(0), -50.0);
    }

    #[test]
    fn test_row_index_at_content_y() {
        let state = ViewportState::compute(&input(0.0, 200.0, 20.0, 10));
        assert_eq!(state.row_index_at_content_y(0.0), Some(0));
        assert_eq!(state.row_index_at_content_y(19.9), Some(0));
        assert_eq!(state.row_index_at_content_y(20.0), Some(1));
        assert_eq!(state.row_index_at_content_y(199.9), Some(9));
        assert_eq!(state.row_index_at_content_y(200.0), None);
        assert_eq!(state.row_index_at_content_y(-1.0), None);
    }
}

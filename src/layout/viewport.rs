//! Viewport state management for scrolling.
//!
//! Scroll offsets only apply to the scrollable part of each axis: frozen rows
//! and columns render at their natural position, and scrollable item `i` is
//! drawn at `pos(i) - scroll`.

use super::axis::RowColCollection;
use crate::types::{AxisItem, CellRange};

/// Viewport state - the visible client area of the control
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll offset of the scrollable columns
    pub scroll_x: f32,
    /// Vertical scroll offset of the scrollable rows
    pub scroll_y: f32,
    /// Client width in pixels (headers included, scrollbars excluded)
    pub width: f32,
    /// Client height in pixels (headers and footers included)
    pub height: f32,
    /// Page x of the control's bounding box
    pub left: f32,
    /// Page y of the control's bounding box
    pub top: f32,
    /// Extra top offset of the column headers when they stick to the page
    pub sticky_offset: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
            left: 0.0,
            top: 0.0,
            sticky_offset: 0.0,
        }
    }

    /// Visible scrollable item range (inclusive) along one axis.
    ///
    /// `extent` is the client size available to the axis (headers excluded).
    /// Returns `(-1, -1)` when the axis has no scrollable items.
    pub fn visible_range<T: AxisItem>(
        coll: &RowColCollection<T>,
        scroll: f32,
        extent: f32,
    ) -> (i32, i32) {
        let len = coll.len();
        if coll.frozen() >= len {
            return (-1, -1);
        }
        let frozen = crate::types::to_coord(coll.frozen());
        let frozen_size = coll.frozen_size();
        let scrollable_extent = (extent - frozen_size).max(0.0);

        let start = coll.get_item_at(frozen_size + scroll).max(frozen);
        let end = coll
            .get_item_at(frozen_size + scroll + scrollable_extent)
            .max(start);
        (start, end)
    }

    /// Visible scrollable cell window for the given data rows/columns.
    pub fn visible_cells<R: AxisItem, C: AxisItem>(
        &self,
        rows: &RowColCollection<R>,
        cols: &RowColCollection<C>,
        cells_width: f32,
        cells_height: f32,
    ) -> CellRange {
        let (top, bottom) = Self::visible_range(rows, self.scroll_y, cells_height);
        let (left, right) = Self::visible_range(cols, self.scroll_x, cells_width);
        CellRange::new(top, left, bottom, right)
    }

    /// Largest scroll offset along an axis that still shows content.
    pub fn max_scroll<T: AxisItem>(coll: &RowColCollection<T>, extent: f32) -> f32 {
        let frozen_size = coll.frozen_size();
        let scrollable_size = coll.total_size() - frozen_size;
        let scrollable_extent = (extent - frozen_size).max(0.0);
        (scrollable_size - scrollable_extent).max(0.0)
    }

    /// Clamp scroll position to the valid range.
    pub fn clamp_scroll<R: AxisItem, C: AxisItem>(
        &mut self,
        rows: &RowColCollection<R>,
        cols: &RowColCollection<C>,
        cells_width: f32,
        cells_height: f32,
    ) {
        let max_x = Self::max_scroll(cols, cells_width);
        let max_y = Self::max_scroll(rows, cells_height);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Scroll offset that brings item `index` fully into view, or `None` if
    /// it is frozen, hidden, out of range or already visible.
    pub fn scroll_to_show<T: AxisItem>(
        coll: &RowColCollection<T>,
        index: usize,
        scroll: f32,
        extent: f32,
    ) -> Option<f32> {
        if index >= coll.len() || coll.is_frozen(index) || coll.render_size(index) <= 0.0 {
            return None;
        }
        let frozen_size = coll.frozen_size();
        let view = (extent - frozen_size).max(0.0);
        let start = coll.pos(index) - frozen_size;
        let end = start + coll.render_size(index);

        if start < scroll {
            Some(start)
        } else if end > scroll + view {
            // items taller than the view align to their start
            Some((end - view).min(start))
        } else {
            None
        }
    }

    /// Resize the client area
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Move the control's page origin
    pub fn set_origin(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    /// True if every geometric field is finite and the client size non-negative
    pub fn is_well_formed(&self) -> bool {
        [
            self.scroll_x,
            self.scroll_y,
            self.width,
            self.height,
            self.left,
            self.top,
            self.sticky_offset,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
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
    use crate::layout::Rows;
    use crate::types::Row;

    fn rows(n: usize, frozen: usize) -> Rows {
        let mut coll = Rows::from_items((0..n).map(|_| Row::new()).collect(), 20.0);
        coll.set_frozen(frozen);
        coll
    }

    #[test]
    fn test_viewport_initial_scroll_zero() {
        let viewport = Viewport::new();
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 0.0);
        assert!(viewport.is_well_formed());
    }

    #[test]
    fn test_visible_range_at_scroll_zero() {
        let coll = rows(100, 0);
        assert_eq!(Viewport::visible_range(&coll, 0.0, 200.0), (0, 10));
    }

    #[test]
    fn test_visible_range_scrolled() {
        let coll = rows(100, 0);
        assert_eq!(Viewport::visible_range(&coll, 400.0, 200.0), (20, 30));
    }

    #[test]
    fn test_visible_range_with_frozen() {
        let coll = rows(100, 3);
        // 60px frozen, 140px scrollable window starting right after the band
        assert_eq!(Viewport::visible_range(&coll, 0.0, 200.0), (3, 10));
        assert_eq!(Viewport::visible_range(&coll, 100.0, 200.0), (8, 15));
    }

    #[test]
    fn test_visible_range_all_frozen() {
        let coll = rows(3, 3);
        assert_eq!(Viewport::visible_range(&coll, 0.0, 200.0), (-1, -1));
    }

    #[test]
    fn test_max_scroll() {
        assert_eq!(Viewport::max_scroll(&rows(100, 0), 200.0), 1800.0);
        assert_eq!(Viewport::max_scroll(&rows(100, 5), 200.0), 1800.0);
        assert_eq!(Viewport::max_scroll(&rows(5, 0), 200.0), 0.0);
    }

    #[test]
    fn test_clamp_scroll() {
        let r = rows(100, 0);
        let c = rows(10, 0);
        let mut viewport = Viewport::new();
        viewport.scroll_x = 500.0;
        viewport.scroll_y = -50.0;
        viewport.clamp_scroll(&r, &c, 100.0, 200.0);
        assert_eq!(viewport.scroll_x, 100.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn test_scroll_to_show() {
        let coll = rows(100, 2);
        // row 50 starts 960px into the scrollable area
        assert_eq!(Viewport::scroll_to_show(&coll, 50, 0.0, 200.0), Some(820.0));
        assert_eq!(Viewport::scroll_to_show(&coll, 5, 200.0, 200.0), Some(60.0));
        assert_eq!(Viewport::scroll_to_show(&coll, 5, 0.0, 200.0), None);
        assert_eq!(Viewport::scroll_to_show(&coll, 1, 500.0, 200.0), None);
        assert_eq!(Viewport::scroll_to_show(&coll, 500, 0.0, 200.0), None);
    }

    #[test]
    fn test_malformed_viewport() {
        let mut viewport = Viewport::new();
        viewport.width = f32::NAN;
        assert!(!viewport.is_well_formed());
        viewport.width = -1.0;
        assert!(!viewport.is_well_formed());
    }
}

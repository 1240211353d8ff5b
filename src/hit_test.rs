//! Pointer hit testing.
//!
//! Maps a page coordinate to the panel, row and column under it, plus which
//! cell edges are close enough to start a resize.

use bitflags::bitflags;
use log::trace;

use crate::error::{GridError, Result};
use crate::layout::{Grid, RowColCollection};
use crate::types::{to_index, AxisItem, CellRange, CellType};

/// Distance from a cell edge that counts as "on the edge" for a mouse
pub const MOUSE_EDGE_SIZE: f32 = 5.0;

/// Distance from a cell edge that counts as "on the edge" for touch input
pub const TOUCH_EDGE_SIZE: f32 = 30.0;

bitflags! {
    /// Cell edges near the hit point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HitEdges: u8 {
        const LEFT   = 1;
        const TOP    = 2;
        const RIGHT  = 4;
        const BOTTOM = 8;
    }
}

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input device that produced the point; touch gets a wider edge band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

impl PointerKind {
    pub fn edge_size(self) -> f32 {
        match self {
            Self::Mouse => MOUSE_EDGE_SIZE,
            Self::Touch => TOUCH_EDGE_SIZE,
        }
    }
}

/// What to hit test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitSource {
    /// The whole control; the panel is found from the point
    #[default]
    Grid,
    /// A specific panel, skipping panel classification
    Panel(CellType),
}

/// Outcome of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestResult {
    /// Panel under the point, `None` if nothing was hit
    pub panel: Option<CellType>,
    pub row: i32,
    pub col: i32,
    /// The point in control coordinates (before right-to-left mirroring)
    pub point: Point,
    pub edges: HitEdges,
}

impl HitTestResult {
    fn miss(point: Point) -> Self {
        Self {
            panel: None,
            row: -1,
            col: -1,
            point,
            edges: HitEdges::empty(),
        }
    }

    /// True if a cell of some panel was hit
    pub fn is_hit(&self) -> bool {
        self.panel.is_some()
    }

    pub fn range(&self) -> CellRange {
        CellRange::cell(self.row, self.col)
    }

    pub fn edge_left(&self) -> bool {
        self.edges.contains(HitEdges::LEFT)
    }

    pub fn edge_top(&self) -> bool {
        self.edges.contains(HitEdges::TOP)
    }

    pub fn edge_right(&self) -> bool {
        self.edges.contains(HitEdges::RIGHT)
    }

    pub fn edge_bottom(&self) -> bool {
        self.edges.contains(HitEdges::BOTTOM)
    }
}

/// Resolves page coordinates against a grid's current layout.
#[derive(Debug, Clone, Copy)]
pub struct HitTester<'a> {
    grid: &'a Grid,
    pointer: PointerKind,
}

impl<'a> HitTester<'a> {
    /// # Errors
    /// Returns [`GridError::InvalidArgument`] if the grid's viewport geometry
    /// is non-finite or negative.
    pub fn new(grid: &'a Grid) -> Result<Self> {
        if !grid.viewport.is_well_formed() {
            return Err(GridError::invalid(format!(
                "viewport geometry is not usable for hit testing: {:?}",
                grid.viewport
            )));
        }
        Ok(Self {
            grid,
            pointer: PointerKind::Mouse,
        })
    }

    #[must_use]
    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }

    /// Hit test a page point against the whole control.
    pub fn hit_test(&self, page_x: f32, page_y: f32) -> Result<HitTestResult> {
        self.locate(HitSource::Grid, Point::new(page_x, page_y))
    }

    /// Hit test a page point.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidArgument`] if the point is not finite.
    pub fn locate(&self, source: HitSource, page: Point) -> Result<HitTestResult> {
        if !page.x.is_finite() || !page.y.is_finite() {
            return Err(GridError::invalid(format!(
                "hit test point must be finite, got ({}, {})",
                page.x, page.y
            )));
        }

        let grid = self.grid;
        let vp = &grid.viewport;
        let local = Point::new((page.x - vp.left).max(0.0), (page.y - vp.top).max(0.0));
        let x = if grid.options.right_to_left {
            vp.width - local.x
        } else {
            local.x
        };
        let y = local.y;

        let panel = match source {
            HitSource::Panel(cell_type) => Some(cell_type),
            HitSource::Grid => self.classify(x, y),
        };
        let Some(cell_type) = panel else {
            trace!("hit test ({}, {}) outside all panels", page.x, page.y);
            return Ok(HitTestResult::miss(local));
        };

        let cells = grid.panel(cell_type);
        let rows = cells.rows();
        let cols = cells.columns();
        let px = self.panel_x(cell_type, x);
        let py = self.panel_y(cell_type, y);

        let row = index_at(rows, py);
        let col = index_at(cols, px);
        let (Some(r), Some(c)) = (to_index(row), to_index(col)) else {
            trace!("hit test ({}, {}) past the end of {cell_type:?}", page.x, page.y);
            return Ok(HitTestResult::miss(local));
        };

        let sz = self.pointer.edge_size();
        let mut edges = HitEdges::empty();
        let (col_start, col_size) = (cols.pos(c), cols.render_size(c));
        if px - col_start <= sz {
            edges |= HitEdges::LEFT;
        }
        if col_start + col_size - px <= sz {
            edges |= HitEdges::RIGHT;
        }
        let (row_start, row_size) = (rows.pos(r), rows.render_size(r));
        if py - row_start <= sz {
            edges |= HitEdges::TOP;
        }
        if row_start + row_size - py <= sz {
            edges |= HitEdges::BOTTOM;
        }

        trace!("hit test ({}, {}) -> {cell_type:?} r{row} c{col} {edges:?}", page.x, page.y);
        Ok(HitTestResult {
            panel: Some(cell_type),
            row,
            col,
            point: local,
            edges,
        })
    }

    /// Panel containing a control-local point.
    fn classify(&self, x: f32, y: f32) -> Option<CellType> {
        let grid = self.grid;
        let vp = &grid.viewport;
        if x < 0.0 || x > vp.width || y > vp.height {
            return None;
        }

        let header_w = grid.header_width();
        let header_h = grid.header_height() + grid.sticky_offset();
        let footer_h = grid.footer_height();
        let left_band = x < header_w;

        let panel = if y < header_h {
            if left_band {
                CellType::TopLeft
            } else {
                CellType::ColumnHeader
            }
        } else if footer_h > 0.0 && y >= grid.footer_top() {
            if left_band {
                CellType::BottomLeft
            } else {
                CellType::ColumnFooter
            }
        } else if left_band {
            CellType::RowHeader
        } else {
            CellType::Cell
        };
        Some(panel)
    }

    /// Horizontal position inside the panel's column collection.
    fn panel_x(&self, cell_type: CellType, x: f32) -> f32 {
        let grid = self.grid;
        if !cell_type.uses_data_columns() {
            return x;
        }
        let px = x - grid.header_width();
        if px >= grid.columns.frozen_size() {
            px + grid.viewport.scroll_x
        } else {
            px
        }
    }

    /// Vertical position inside the panel's row collection.
    fn panel_y(&self, cell_type: CellType, y: f32) -> f32 {
        let grid = self.grid;
        match cell_type {
            CellType::Cell | CellType::RowHeader => {
                let py = y - grid.header_height();
                if py >= grid.rows.frozen_size() {
                    py + grid.viewport.scroll_y
                } else {
                    py
                }
            }
            CellType::ColumnHeader | CellType::TopLeft => y - grid.sticky_offset(),
            CellType::ColumnFooter | CellType::BottomLeft => y - grid.footer_top(),
        }
    }
}

/// Item at `pos`, or -1 when `pos` lies outside the collection.
fn index_at<T: AxisItem>(coll: &RowColCollection<T>, pos: f32) -> i32 {
    if pos < 0.0 || pos > coll.total_size() {
        return -1;
    }
    coll.get_item_at(pos)
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
    use crate::config::GridOptions;
    use crate::types::Row;

    /// 40px row headers, 20px column header, 50x20 cells, 240x220 client.
    fn grid(rows: usize, cols: usize) -> Grid {
        let options = GridOptions {
            default_row_size: 20.0,
            default_column_size: 50.0,
            row_header_width: 40.0,
            column_header_height: 20.0,
            ..GridOptions::default()
        };
        let mut grid = Grid::with_size(options, rows, cols);
        grid.viewport.resize(240.0, 220.0);
        grid
    }

    fn hit(grid: &Grid, x: f32, y: f32) -> HitTestResult {
        HitTester::new(grid).unwrap().hit_test(x, y).unwrap()
    }

    #[test]
    fn test_cell_hit() {
        let g = grid(100, 20);
        let r = hit(&g, 40.0 + 75.0, 20.0 + 50.0);
        assert_eq!(r.panel, Some(CellType::Cell));
        assert_eq!((r.row, r.col), (2, 1));
        assert_eq!(r.point, Point::new(115.0, 70.0));
        assert!(r.edges.is_empty());
    }

    #[test]
    fn test_header_panels() {
        let g = grid(100, 20);
        assert_eq!(hit(&g, 10.0, 10.0).panel, Some(CellType::TopLeft));
        let header = hit(&g, 140.0, 10.0);
        assert_eq!(header.panel, Some(CellType::ColumnHeader));
        assert_eq!((header.row, header.col), (0, 2));
        let row_header = hit(&g, 10.0, 70.0);
        assert_eq!(row_header.panel, Some(CellType::RowHeader));
        assert_eq!((row_header.row, row_header.col), (2, 0));
    }

    #[test]
    fn test_footer_panels() {
        let mut g = grid(100, 20);
        g.column_footer_rows.push(Row::new());
        let footer = hit(&g, 140.0, 210.0);
        assert_eq!(footer.panel, Some(CellType::ColumnFooter));
        assert_eq!((footer.row, footer.col), (0, 2));
        assert_eq!(hit(&g, 10.0, 210.0).panel, Some(CellType::BottomLeft));
    }

    #[test]
    fn test_scroll_applies_past_frozen_band() {
        let mut g = grid(100, 20);
        g.rows.set_frozen(2);
        g.columns.set_frozen(1);
        g.viewport.scroll_y = 200.0;
        g.viewport.scroll_x = 100.0;

        let frozen = hit(&g, 40.0 + 10.0, 20.0 + 10.0);
        assert_eq!((frozen.row, frozen.col), (0, 0));

        let scrolled = hit(&g, 40.0 + 60.0, 20.0 + 50.0);
        assert_eq!((scrolled.row, scrolled.col), (12, 3));
    }

    #[test]
    fn test_outside_client_area() {
        let g = grid(100, 20);
        let r = hit(&g, 500.0, 10.0);
        assert_eq!(r.panel, None);
        assert_eq!((r.row, r.col), (-1, -1));
    }

    #[test]
    fn test_past_last_row_clears_both_coordinates() {
        let g = grid(3, 20);
        let r = hit(&g, 100.0, 20.0 + 70.0);
        assert!(!r.is_hit());
        assert_eq!((r.row, r.col), (-1, -1));
    }

    #[test]
    fn test_negative_points_clamp_to_origin() {
        let mut g = grid(10, 5);
        g.viewport.set_origin(100.0, 100.0);
        let r = hit(&g, 0.0, 0.0);
        assert_eq!(r.point, Point::new(0.0, 0.0));
        assert_eq!(r.panel, Some(CellType::TopLeft));
    }

    #[test]
    fn test_right_to_left_mirrors_x() {
        let mut g = grid(10, 5);
        g.options.right_to_left = true;
        // the row headers sit on the right edge
        assert_eq!(hit(&g, 230.0, 50.0).panel, Some(CellType::RowHeader));
        let r = hit(&g, 190.0, 50.0);
        assert_eq!(r.panel, Some(CellType::Cell));
        assert_eq!(r.col, 0);
        assert_eq!(r.point.x, 190.0);
    }

    #[test]
    fn test_sticky_header_offset() {
        let mut g = grid(10, 5);
        g.options.sticky_headers = true;
        g.viewport.sticky_offset = 30.0;
        assert_eq!(hit(&g, 100.0, 45.0).panel, Some(CellType::ColumnHeader));
        assert_eq!(hit(&g, 100.0, 55.0).panel, Some(CellType::Cell));

        g.options.sticky_headers = false;
        assert_eq!(hit(&g, 100.0, 45.0).panel, Some(CellType::Cell));
    }

    #[test]
    fn test_explicit_panel() {
        let g = grid(10, 5);
        let tester = HitTester::new(&g).unwrap();
        let r = tester
            .locate(HitSource::Panel(CellType::ColumnHeader), Point::new(100.0, 5.0))
            .unwrap();
        assert_eq!(r.panel, Some(CellType::ColumnHeader));
        assert_eq!((r.row, r.col), (0, 1));
    }

    #[test]
    fn test_mouse_edges() {
        let g = grid(10, 5);
        // column 1 spans 50..100 inside the panel, row 0 spans 0..20
        let r = hit(&g, 40.0 + 97.0, 20.0 + 2.0);
        assert!(r.edge_right());
        assert!(r.edge_top());
        assert!(!r.edge_left());
        assert!(!r.edge_bottom());
        assert_eq!(r.edges.bits(), 2 | 4);
    }

    #[test]
    fn test_touch_widens_edges() {
        let g = grid(10, 5);
        let mouse = hit(&g, 40.0 + 120.0, 20.0 + 10.0);
        assert!(!mouse.edge_left());
        let touch = HitTester::new(&g)
            .unwrap()
            .with_pointer(PointerKind::Touch)
            .hit_test(40.0 + 120.0, 20.0 + 10.0)
            .unwrap();
        assert!(touch.edge_left());
        assert!(touch.edge_right());
    }

    #[test]
    fn test_invalid_arguments() {
        let mut g = grid(10, 5);
        let tester = HitTester::new(&g).unwrap();
        assert!(matches!(
            tester.hit_test(f32::NAN, 0.0),
            Err(GridError::InvalidArgument(_))
        ));

        g.viewport.height = f32::INFINITY;
        assert!(matches!(HitTester::new(&g), Err(GridError::InvalidArgument(_))));
    }
}

//! The grid model: every row/column collection, the viewport, and the
//! collaborators the core reads cell content from.

use std::borrow::Cow;

use super::axis::{Columns, Rows};
use super::viewport::Viewport;
use crate::config::GridOptions;
use crate::merge::{MergeManager, MergeResolver};
use crate::types::{CellRange, CellType, Column, Row};

/// Read-only access to cell content, used to decide which cells merge.
pub trait CellDataSource {
    /// Value shown in a cell, or `None` if it is empty.
    ///
    /// With `formatted` set the value is the display text the renderer paints.
    fn cell_data(
        &self,
        cell_type: CellType,
        row: usize,
        col: usize,
        formatted: bool,
    ) -> Option<Cow<'_, str>>;
}

/// What a bound data view allows, resolved once when it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCapabilities {
    pub supports_add: bool,
    pub supports_remove: bool,
}

/// An external data view with a current-item cursor.
pub trait CursorView {
    /// Move the cursor to item `position` (`None` clears it).
    /// Returns false if the view refused.
    fn move_current_to_position(&mut self, position: Option<usize>) -> bool;

    fn capabilities(&self) -> ViewCapabilities {
        ViewCapabilities::default()
    }
}

/// In-memory cell text, addressed by panel.
///
/// Data cells come from `cells`; column headers show the column binding and
/// row headers show 1-based row numbers unless overridden.
#[derive(Debug, Clone, Default)]
pub struct TableSource {
    cells: Vec<Vec<Option<String>>>,
    column_headers: Vec<String>,
}

impl TableSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows of text; empty strings count as empty cells.
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let value: String = value.into();
                        (!value.is_empty()).then_some(value)
                    })
                    .collect()
            })
            .collect();
        Self {
            cells,
            column_headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_column_headers<S: Into<String>>(
        mut self,
        headers: impl IntoIterator<Item = S>,
    ) -> Self {
        self.column_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Set one data cell, growing the table as needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        if let Some(cells) = self.cells.get_mut(row) {
            if cells.len() <= col {
                cells.resize(col + 1, None);
            }
            if let Some(cell) = cells.get_mut(col) {
                let value = value.into();
                *cell = if value.is_empty() { None } else { Some(value) };
            }
        }
    }
}

impl CellDataSource for TableSource {
    fn cell_data(
        &self,
        cell_type: CellType,
        row: usize,
        col: usize,
        _formatted: bool,
    ) -> Option<Cow<'_, str>> {
        match cell_type {
            CellType::Cell => self
                .cells
                .get(row)
                .and_then(|r| r.get(col))
                .and_then(|c| c.as_deref())
                .map(Cow::Borrowed),
            CellType::ColumnHeader => self
                .column_headers
                .get(col)
                .map(|s| Cow::Borrowed(s.as_str())),
            CellType::RowHeader => Some(Cow::Owned((row + 1).to_string())),
            CellType::TopLeft | CellType::ColumnFooter | CellType::BottomLeft => None,
        }
    }
}

/// A spreadsheet-style grid: data rows and columns plus header and footer
/// bands, laid out in six panels.
pub struct Grid {
    pub options: GridOptions,
    /// Data rows, shared by the cells and row-header panels
    pub rows: Rows,
    /// Data columns, shared by the cells, column-header and footer panels
    pub columns: Columns,
    pub column_header_rows: Rows,
    pub row_header_columns: Columns,
    pub column_footer_rows: Rows,
    pub viewport: Viewport,
    data: Box<dyn CellDataSource>,
    view: Option<Box<dyn CursorView>>,
    view_caps: ViewCapabilities,
    merge_manager: Box<dyn MergeManager>,
    needs_render: bool,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns.len())
            .field("viewport", &self.viewport)
            .field("bound_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Create an empty grid with one header row and one header column.
    pub fn new(options: GridOptions) -> Self {
        let mut column_header_rows = Rows::new(options.column_header_height);
        column_header_rows.push(Row::new());
        let mut row_header_columns = Columns::new(options.row_header_width);
        row_header_columns.push(Column::default());

        Self {
            rows: Rows::new(options.default_row_size),
            columns: Columns::new(options.default_column_size),
            column_header_rows,
            row_header_columns,
            column_footer_rows: Rows::new(options.default_row_size),
            viewport: Viewport::new(),
            data: Box::new(TableSource::new()),
            view: None,
            view_caps: ViewCapabilities::default(),
            merge_manager: Box::new(MergeResolver::new()),
            needs_render: true,
            options,
        }
    }

    /// Create a `rows` x `cols` grid of plain rows and columns.
    pub fn with_size(options: GridOptions, rows: usize, cols: usize) -> Self {
        let mut grid = Self::new(options);
        grid.rows = Rows::from_items(
            (0..rows).map(Row::bound).collect(),
            grid.options.default_row_size,
        );
        grid.columns = Columns::from_items(
            (0..cols).map(|c| Column::new(format!("col{c}"))).collect(),
            grid.options.default_column_size,
        );
        grid
    }

    pub fn set_data_source(&mut self, data: impl CellDataSource + 'static) {
        self.data = Box::new(data);
        self.invalidate();
    }

    /// Bind an external cursor-tracking view; its capabilities are read now.
    pub fn bind_view(&mut self, view: impl CursorView + 'static) {
        self.view_caps = view.capabilities();
        self.view = Some(Box::new(view));
    }

    pub fn unbind_view(&mut self) {
        self.view = None;
        self.view_caps = ViewCapabilities::default();
    }

    pub fn view_capabilities(&self) -> ViewCapabilities {
        self.view_caps
    }

    pub fn set_merge_manager(&mut self, manager: impl MergeManager + 'static) {
        self.merge_manager = Box::new(manager);
        self.invalidate();
    }

    /// A panel of this grid
    pub fn panel(&self, cell_type: CellType) -> GridPanel<'_> {
        GridPanel {
            grid: self,
            cell_type,
        }
    }

    pub fn cells(&self) -> GridPanel<'_> {
        self.panel(CellType::Cell)
    }

    /// Merged range containing a cell, or `None` for an unmerged cell.
    pub fn merged_range(
        &self,
        cell_type: CellType,
        row: usize,
        col: usize,
        clip: bool,
    ) -> Option<CellRange> {
        self.merge_manager
            .merged_range(&self.panel(cell_type), row, col, clip)
    }

    /// Width of the row-header band
    pub fn header_width(&self) -> f32 {
        self.row_header_columns.total_size()
    }

    /// Height of the column-header band
    pub fn header_height(&self) -> f32 {
        self.column_header_rows.total_size()
    }

    pub fn footer_height(&self) -> f32 {
        self.column_footer_rows.total_size()
    }

    /// Client y where the footer band starts
    pub fn footer_top(&self) -> f32 {
        (self.viewport.height - self.footer_height()).max(0.0)
    }

    /// Sticky offset applied to the column headers (0 unless sticky headers are on)
    pub fn sticky_offset(&self) -> f32 {
        if self.options.sticky_headers {
            self.viewport.sticky_offset.max(0.0)
        } else {
            0.0
        }
    }

    /// Client width available to data cells
    pub fn cells_width(&self) -> f32 {
        (self.viewport.width - self.header_width()).max(0.0)
    }

    /// Client height available to data cells
    pub fn cells_height(&self) -> f32 {
        (self.viewport.height - self.header_height() - self.footer_height()).max(0.0)
    }

    /// Visible scrollable window of the cells panel
    pub fn view_range(&self) -> CellRange {
        self.viewport.visible_cells(
            &self.rows,
            &self.columns,
            self.cells_width(),
            self.cells_height(),
        )
    }

    /// Scroll so the given data cell is fully visible. Negative indices
    /// leave that axis alone. Returns true if the scroll position changed.
    pub fn scroll_into_view(&mut self, row: i32, col: i32) -> bool {
        let before = (self.viewport.scroll_x, self.viewport.scroll_y);
        if let Some(r) = crate::types::to_index(row) {
            if let Some(y) = Viewport::scroll_to_show(
                &self.rows,
                r,
                self.viewport.scroll_y,
                self.cells_height(),
            ) {
                self.viewport.scroll_y = y;
            }
        }
        if let Some(c) = crate::types::to_index(col) {
            if let Some(x) = Viewport::scroll_to_show(
                &self.columns,
                c,
                self.viewport.scroll_x,
                self.cells_width(),
            ) {
                self.viewport.scroll_x = x;
            }
        }
        let (w, h) = (self.cells_width(), self.cells_height());
        self.viewport.clamp_scroll(&self.rows, &self.columns, w, h);

        let changed = before != (self.viewport.scroll_x, self.viewport.scroll_y);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Move the bound view's cursor to the item behind data row `row`.
    pub(crate) fn sync_view_cursor(&mut self, row: i32) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let position = crate::types::to_index(row)
            .and_then(|r| self.rows.get(r))
            .filter(|r| !r.is_synthetic())
            .and_then(|r| r.data_index);
        if !view.move_current_to_position(position) {
            log::debug!("bound view refused cursor move to {position:?}");
        }
    }

    /// Request a repaint
    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Clear and return the repaint request
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }
}

/// One of the six panels of a grid: a row collection, a column collection
/// and the cell type they are rendered as.
#[derive(Clone, Copy)]
pub struct GridPanel<'a> {
    grid: &'a Grid,
    cell_type: CellType,
}

impl<'a> GridPanel<'a> {
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn rows(&self) -> &'a Rows {
        match self.cell_type {
            CellType::Cell | CellType::RowHeader => &self.grid.rows,
            CellType::ColumnHeader | CellType::TopLeft => &self.grid.column_header_rows,
            CellType::ColumnFooter | CellType::BottomLeft => &self.grid.column_footer_rows,
        }
    }

    pub fn columns(&self) -> &'a Columns {
        match self.cell_type {
            CellType::Cell | CellType::ColumnHeader | CellType::ColumnFooter => {
                &self.grid.columns
            }
            CellType::RowHeader | CellType::TopLeft | CellType::BottomLeft => {
                &self.grid.row_header_columns
            }
        }
    }

    pub fn cell_data(&self, row: usize, col: usize, formatted: bool) -> Option<Cow<'a, str>> {
        self.grid.data.cell_data(self.cell_type, row, col, formatted)
    }

    /// Rows and columns of this panel currently on screen.
    ///
    /// Axes shared with the cells panel report its visible scrollable window;
    /// header and footer axes are always fully visible.
    pub fn view_range(&self) -> CellRange {
        let window = self.grid.view_range();
        let (top, bottom) = if self.cell_type.uses_data_rows() {
            (window.row, window.row2)
        } else {
            (0, crate::types::last_coord(self.rows().len()))
        };
        let (left, right) = if self.cell_type.uses_data_columns() {
            (window.col, window.col2)
        } else {
            (0, crate::types::last_coord(self.columns().len()))
        };
        CellRange::new(top, left, bottom, right)
    }
}

impl std::fmt::Debug for GridPanel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridPanel")
            .field("cell_type", &self.cell_type)
            .field("rows", &self.rows().len())
            .field("columns", &self.columns().len())
            .finish()
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
    use std::cell::RefCell;
    use std::rc::Rc;

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

    #[test]
    fn test_panel_axes() {
        let g = grid(10, 5);
        assert_eq!(g.cells().rows().len(), 10);
        assert_eq!(g.cells().columns().len(), 5);
        assert_eq!(g.panel(CellType::ColumnHeader).rows().len(), 1);
        assert_eq!(g.panel(CellType::ColumnHeader).columns().len(), 5);
        assert_eq!(g.panel(CellType::RowHeader).columns().len(), 1);
        assert_eq!(g.panel(CellType::TopLeft).rows().len(), 1);
        assert_eq!(g.panel(CellType::ColumnFooter).rows().len(), 0);
    }

    #[test]
    fn test_band_sizes() {
        let g = grid(10, 5);
        assert_eq!(g.header_width(), 40.0);
        assert_eq!(g.header_height(), 20.0);
        assert_eq!(g.cells_width(), 200.0);
        assert_eq!(g.cells_height(), 200.0);
        assert_eq!(g.footer_top(), 220.0);
    }

    #[test]
    fn test_range_render_size() {
        let mut g = grid(10, 5);
        g.columns.edit(2, |c| c.visible = false);
        g.rows.edit(1, |r| r.size = Some(45.0));

        let rng = CellRange::new(3, 3, 0, 1);
        assert_eq!(rng.render_size(&g.cells()), (100.0, 105.0));
        assert_eq!(
            CellRange::cell(0, 0).render_size(&g.panel(CellType::RowHeader)),
            (40.0, 20.0)
        );
        assert_eq!(CellRange::invalid().render_size(&g.cells()), (0.0, 0.0));
    }

    #[test]
    fn test_view_range() {
        let mut g = grid(100, 20);
        assert_eq!(g.view_range(), CellRange::new(0, 0, 10, 4));
        g.viewport.scroll_y = 200.0;
        g.viewport.scroll_x = 100.0;
        assert_eq!(g.view_range(), CellRange::new(10, 2, 20, 6));

        let headers = g.panel(CellType::ColumnHeader).view_range();
        assert_eq!(headers, CellRange::new(0, 2, 0, 6));
        let row_headers = g.panel(CellType::RowHeader).view_range();
        assert_eq!(row_headers, CellRange::new(10, 0, 20, 0));
    }

    #[test]
    fn test_scroll_into_view() {
        let mut g = grid(100, 20);
        g.take_needs_render();
        assert!(g.scroll_into_view(50, 10));
        assert_eq!(g.viewport.scroll_y, 820.0);
        assert_eq!(g.viewport.scroll_x, 350.0);
        assert!(g.needs_render());
        assert!(!g.scroll_into_view(50, 10));
        assert!(!g.scroll_into_view(-1, -1));
    }

    #[test]
    fn test_table_source() {
        let mut src = TableSource::from_rows([["a", ""], ["b", "c"]]).with_column_headers(["X", "Y"]);
        src.set(3, 1, "z");
        assert_eq!(src.cell_data(CellType::Cell, 0, 0, true).as_deref(), Some("a"));
        assert_eq!(src.cell_data(CellType::Cell, 0, 1, true), None);
        assert_eq!(src.cell_data(CellType::Cell, 3, 1, true).as_deref(), Some("z"));
        assert_eq!(src.cell_data(CellType::Cell, 9, 9, true), None);
        assert_eq!(src.cell_data(CellType::ColumnHeader, 0, 1, true).as_deref(), Some("Y"));
        assert_eq!(src.cell_data(CellType::RowHeader, 4, 0, true).as_deref(), Some("5"));
    }

    struct Recorder {
        moves: Rc<RefCell<Vec<Option<usize>>>>,
    }

    impl CursorView for Recorder {
        fn move_current_to_position(&mut self, position: Option<usize>) -> bool {
            self.moves.borrow_mut().push(position);
            true
        }

        fn capabilities(&self) -> ViewCapabilities {
            ViewCapabilities {
                supports_add: true,
                supports_remove: false,
            }
        }
    }

    #[test]
    fn test_bound_view_cursor() {
        let mut g = grid(5, 2);
        g.rows.insert(0, Row::group(0, Some(0)));
        let moves = Rc::new(RefCell::new(Vec::new()));
        g.bind_view(Recorder {
            moves: Rc::clone(&moves),
        });
        assert!(g.view_capabilities().supports_add);

        g.sync_view_cursor(3);
        g.sync_view_cursor(0);
        g.sync_view_cursor(-1);
        assert_eq!(*moves.borrow(), vec![Some(2), None, None]);

        g.unbind_view();
        assert_eq!(g.view_capabilities(), ViewCapabilities::default());
    }
}

//! Common test utilities and assertion helpers.
//!
//! Builds grids with uniform geometry so that pixel positions in the tests
//! are easy to compute by hand: 40px row headers, a 20px column header row,
//! 50x20 cells and a 240x220 client area (200x200 of cells).
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridcore::{
    AllowMerging, CellRange, Grid, GridOptions, SelectionEngine, SelectionMode, TableSource,
};

pub const HEADER_WIDTH: f32 = 40.0;
pub const HEADER_HEIGHT: f32 = 20.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const COL_WIDTH: f32 = 50.0;

// ============================================================================
// Grid Builder
// ============================================================================

/// Fluent builder for test grids.
pub struct GridBuilder {
    rows: usize,
    cols: usize,
    options: GridOptions,
    frozen_rows: usize,
    frozen_cols: usize,
    cells: Vec<(usize, usize, String)>,
    merge_rows: Vec<usize>,
    merge_cols: Vec<usize>,
    distinct: bool,
}

impl GridBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            options: GridOptions {
                default_row_size: ROW_HEIGHT,
                default_column_size: COL_WIDTH,
                row_header_width: HEADER_WIDTH,
                column_header_height: HEADER_HEIGHT,
                ..GridOptions::default()
            },
            frozen_rows: 0,
            frozen_cols: 0,
            cells: Vec::new(),
            merge_rows: Vec::new(),
            merge_cols: Vec::new(),
            distinct: true,
        }
    }

    pub fn merging(mut self, allow: AllowMerging) -> Self {
        self.options.allow_merging = allow;
        self
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.options.selection_mode = mode;
        self
    }

    pub fn frozen(mut self, rows: usize, cols: usize) -> Self {
        self.frozen_rows = rows;
        self.frozen_cols = cols;
        self
    }

    /// Leave cells empty instead of filling them with distinct text.
    pub fn empty(mut self) -> Self {
        self.distinct = false;
        self
    }

    pub fn cell(mut self, row: usize, col: usize, value: &str) -> Self {
        self.cells.push((row, col, value.to_string()));
        self
    }

    pub fn merge_row(mut self, row: usize) -> Self {
        self.merge_rows.push(row);
        self
    }

    pub fn merge_col(mut self, col: usize) -> Self {
        self.merge_cols.push(col);
        self
    }

    pub fn build(self) -> Grid {
        let mut grid = Grid::with_size(self.options, self.rows, self.cols);
        grid.viewport.resize(240.0, 220.0);
        grid.rows.set_frozen(self.frozen_rows);
        grid.columns.set_frozen(self.frozen_cols);
        for &r in &self.merge_rows {
            grid.rows.edit(r, |row| row.allow_merging = true);
        }
        for &c in &self.merge_cols {
            grid.columns.edit(c, |col| col.allow_merging = true);
        }

        let mut table = if self.distinct {
            let cols = self.cols;
            TableSource::from_rows(
                (0..self.rows).map(|r| (0..cols).map(move |c| format!("r{r}c{c}")).collect::<Vec<_>>()),
            )
        } else {
            TableSource::new()
        };
        for (r, c, value) in self.cells {
            table.set(r, c, value);
        }
        grid.set_data_source(table);
        grid
    }

    /// Build the grid together with a selection engine in the configured mode.
    pub fn build_with_selection(self) -> (Grid, SelectionEngine) {
        let grid = self.build();
        let engine = SelectionEngine::from_options(&grid.options);
        (grid, engine)
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Client point at the center of a data cell (no scroll, no frozen band).
pub fn cell_center(row: usize, col: usize) -> (f32, f32) {
    (
        HEADER_WIDTH + (col as f32 + 0.5) * COL_WIDTH,
        HEADER_HEIGHT + (row as f32 + 0.5) * ROW_HEIGHT,
    )
}

/// Assert that every cell in `range` resolves to exactly `range`.
pub fn assert_merge_closed(grid: &Grid, range: CellRange) {
    let top = usize::try_from(range.top_row()).unwrap();
    let bottom = usize::try_from(range.bottom_row()).unwrap();
    let left = usize::try_from(range.left_col()).unwrap();
    let right = usize::try_from(range.right_col()).unwrap();
    for r in top..=bottom {
        for c in left..=right {
            assert_eq!(
                grid.merged_range(gridcore::CellType::Cell, r, c, true),
                Some(range),
                "cell ({r}, {c}) resolved to a different range"
            );
        }
    }
}

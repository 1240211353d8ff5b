//! Merge resolution tests
//!
//! Cells merge when neighbors show the same text and the grid, the panel and
//! the row (horizontal) or column (vertical) all allow it. Every test grid
//! starts with distinct text in each cell, so only the cells a test sets up
//! can merge.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_merge_closed, GridBuilder};
use gridcore::{
    Aggregate, AllowMerging, CellRange, CellType, Column, Columns, GridPanel, MergeManager,
    MergeResolver, Row,
};

// ============================================================================
// BASIC MERGES
// ============================================================================

#[test]
fn test_row_of_equal_cells_merges() {
    let grid = GridBuilder::new(10, 5)
        .merging(AllowMerging::Cells)
        .merge_row(5)
        .cell(5, 1, "Q1")
        .cell(5, 2, "Q1")
        .cell(5, 3, "Q1")
        .build();

    let merged = grid.merged_range(CellType::Cell, 5, 2, true);
    assert_eq!(merged, Some(CellRange::new(5, 1, 5, 3)));
    assert_merge_closed(&grid, CellRange::new(5, 1, 5, 3));
}

#[test]
fn test_column_of_equal_cells_merges() {
    let grid = GridBuilder::new(10, 5)
        .merging(AllowMerging::All)
        .merge_col(0)
        .cell(3, 0, "North")
        .cell(4, 0, "North")
        .cell(5, 0, "North")
        .cell(6, 0, "North")
        .build();

    assert_merge_closed(&grid, CellRange::new(3, 0, 6, 0));
    assert_eq!(grid.merged_range(CellType::Cell, 7, 0, true), None);
}

#[test]
fn test_merge_requires_row_permission() {
    let grid = GridBuilder::new(10, 5)
        .merging(AllowMerging::Cells)
        .cell(5, 1, "Q1")
        .cell(5, 2, "Q1")
        .build();

    assert_eq!(grid.merged_range(CellType::Cell, 5, 1, true), None);
}

#[test]
fn test_merge_requires_grid_permission() {
    let grid = GridBuilder::new(10, 5)
        .merging(AllowMerging::None)
        .merge_row(5)
        .cell(5, 1, "Q1")
        .cell(5, 2, "Q1")
        .build();

    assert_eq!(grid.merged_range(CellType::Cell, 5, 1, true), None);
}

#[test]
fn test_row_headers_merge_only_when_allowed() {
    let mut grid = GridBuilder::new(6, 3)
        .merging(AllowMerging::Cells)
        .build();
    grid.row_header_columns.edit(0, |c| c.allow_merging = true);
    // row headers show row numbers, so give two rows the same number
    grid.set_data_source(SameRowHeader);

    assert_eq!(grid.merged_range(CellType::RowHeader, 1, 0, true), None);
    grid.options.allow_merging = AllowMerging::RowHeaders;
    assert_eq!(
        grid.merged_range(CellType::RowHeader, 1, 0, true),
        Some(CellRange::new(0, 0, 5, 0))
    );
}

struct SameRowHeader;

impl gridcore::CellDataSource for SameRowHeader {
    fn cell_data(
        &self,
        cell_type: CellType,
        _row: usize,
        _col: usize,
        _formatted: bool,
    ) -> Option<std::borrow::Cow<'_, str>> {
        (cell_type == CellType::RowHeader).then(|| "group".into())
    }
}

// ============================================================================
// FROZEN BOUNDARIES AND CLIPPING
// ============================================================================

#[test]
fn test_merge_never_crosses_frozen_columns() {
    let grid = GridBuilder::new(10, 5)
        .merging(AllowMerging::Cells)
        .frozen(0, 2)
        .merge_row(1)
        .cell(1, 0, "x")
        .cell(1, 1, "x")
        .cell(1, 2, "x")
        .cell(1, 3, "x")
        .build();

    assert_merge_closed(&grid, CellRange::new(1, 0, 1, 1));
    assert_merge_closed(&grid, CellRange::new(1, 2, 1, 3));
}

#[test]
fn test_clipped_merge_follows_scroll() {
    let mut grid = GridBuilder::new(100, 3)
        .merging(AllowMerging::Cells)
        .merge_col(0)
        .empty()
        .build();

    assert_eq!(
        grid.merged_range(CellType::Cell, 5, 0, true),
        Some(CellRange::new(0, 0, 10, 0))
    );

    grid.viewport.scroll_y = 400.0;
    assert_eq!(
        grid.merged_range(CellType::Cell, 25, 0, true),
        Some(CellRange::new(20, 0, 30, 0))
    );
    assert_eq!(
        grid.merged_range(CellType::Cell, 25, 0, false),
        Some(CellRange::new(0, 0, 99, 0))
    );
}

// ============================================================================
// GROUP ROWS AND SYNTHETIC ROWS
// ============================================================================

#[test]
fn test_group_caption_spans_to_first_aggregate() {
    let mut grid = GridBuilder::new(4, 0).build();
    grid.columns = Columns::from_items(
        vec![
            Column::new("region"),
            Column::new("city"),
            Column::new("store"),
            Column::new("sales").with_aggregate(Aggregate::Sum),
        ],
        50.0,
    );
    grid.rows.insert(0, Row::group(0, Some(0)));

    assert_merge_closed(&grid, CellRange::new(0, 0, 0, 2));
    assert_eq!(grid.merged_range(CellType::Cell, 0, 3, true), None);
}

#[test]
fn test_new_row_template_is_never_merged() {
    let mut grid = GridBuilder::new(4, 3)
        .merging(AllowMerging::All)
        .merge_col(1)
        .empty()
        .build();
    grid.rows.push(Row::new_row_template());

    assert_eq!(grid.merged_range(CellType::Cell, 4, 1, true), None);
    let above = grid.merged_range(CellType::Cell, 3, 1, true).unwrap();
    assert_eq!(above, CellRange::new(0, 1, 3, 1));
}

// ============================================================================
// SEAM ARBITRATION
// ============================================================================

/// A cell that could grow both ways: (2,2) equals (2,3) to its right and
/// (3,2) below. The horizontal pair keeps the seam.
#[test]
fn test_contested_seam_goes_to_horizontal_merge() {
    let grid = GridBuilder::new(8, 5)
        .merging(AllowMerging::Cells)
        .merge_row(2)
        .merge_col(2)
        .cell(2, 2, "A")
        .cell(2, 3, "A")
        .cell(3, 2, "A")
        .build();

    assert_merge_closed(&grid, CellRange::new(2, 2, 2, 3));
    assert_eq!(grid.merged_range(CellType::Cell, 3, 2, true), None);
}

/// A vertical run keeps merging past a row whose horizontal neighbors differ.
#[test]
fn test_uncontested_vertical_merge_with_mergeable_rows() {
    let grid = GridBuilder::new(8, 5)
        .merging(AllowMerging::Cells)
        .merge_row(2)
        .merge_row(3)
        .merge_col(2)
        .cell(2, 2, "A")
        .cell(3, 2, "A")
        .build();

    assert_merge_closed(&grid, CellRange::new(2, 2, 3, 2));
}

// ============================================================================
// PLUGGABLE MERGE MANAGER
// ============================================================================

/// Merges every data cell of the first two rows into one block.
struct BannerMerge;

impl MergeManager for BannerMerge {
    fn merged_range(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> Option<CellRange> {
        if panel.cell_type() == CellType::Cell && row < 2 {
            let last = i32::try_from(panel.columns().len()).unwrap() - 1;
            return Some(CellRange::new(0, 0, 1, last));
        }
        MergeResolver::new().resolve(panel, row, col, clip)
    }
}

#[test]
fn test_custom_merge_manager() {
    let mut grid = GridBuilder::new(6, 4).build();
    grid.set_merge_manager(BannerMerge);

    assert_merge_closed(&grid, CellRange::new(0, 0, 1, 3));
    assert_eq!(grid.merged_range(CellType::Cell, 2, 0, true), None);
}

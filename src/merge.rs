//! Dynamic cell merging.
//!
//! Adjacent cells with the same display text render as one block when the
//! grid, the panel and the row or column all allow it. Merges are computed on
//! demand per visible cell and never stored.

use crate::layout::GridPanel;
use crate::types::{to_coord, to_index, Aggregate, CellRange};

/// Decides which cells render as one merged block.
pub trait MergeManager {
    /// Range the cell at (`row`, `col`) of `panel` is merged into, or `None`
    /// if it renders as a single cell.
    ///
    /// With `clip` set, scrollable data axes are only scanned within the
    /// visible window.
    fn merged_range(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> Option<CellRange>;
}

/// Merges by content: equal neighbors within the same frozen band merge,
/// group header rows span their caption across non-aggregate columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeResolver;

impl MergeResolver {
    pub fn new() -> Self {
        Self
    }

    /// See [`MergeManager::merged_range`].
    pub fn resolve(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> Option<CellRange> {
        let rows = panel.rows();
        let cols = panel.columns();
        let row_item = rows.get(row)?;
        let col_item = cols.get(col)?;

        // editors in the new-row template must stay addressable per cell
        if row_item.is_new_row_template() {
            return None;
        }

        if row_item.is_bound_group() {
            return Self::group_range(panel, row, col);
        }

        if !panel.grid().options.allow_merging.allows(panel.cell_type()) {
            return None;
        }

        if col_item.allow_merging {
            let rng = self.vertical_range(panel, row, col, clip);
            if !rng.is_single_cell() {
                return Some(rng);
            }
        }

        if row_item.allow_merging {
            let rng = self.horizontal_range(panel, row, col, clip);
            if !rng.is_single_cell() {
                return Some(rng);
            }
        }

        None
    }

    /// Group captions span every adjacent column without an aggregate,
    /// stopping at the frozen column boundary.
    fn group_range(panel: &GridPanel<'_>, row: usize, col: usize) -> Option<CellRange> {
        let cols = panel.columns();
        let no_aggregate =
            |c: usize| cols.get(c).is_some_and(|column| column.aggregate == Aggregate::None);

        let mut left = col;
        let mut right = col;
        if no_aggregate(col) {
            while left > 0 && no_aggregate(left - 1) && left != cols.frozen() {
                left -= 1;
            }
            while right + 1 < cols.len() && no_aggregate(right + 1) && right + 1 != cols.frozen() {
                right += 1;
            }
        }
        while left < col && !cols.get(left).is_some_and(|c| c.visible) {
            left += 1;
        }

        let rng = CellRange::new(to_coord(row), to_coord(left), to_coord(row), to_coord(right));
        (!rng.is_single_cell()).then_some(rng)
    }

    fn vertical_range(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> CellRange {
        let rows = panel.rows();
        let (lo, hi) = if rows.is_frozen(row) {
            (0, rows.frozen().min(rows.len()).saturating_sub(1))
        } else if clip && panel.cell_type().uses_data_rows() {
            let window = panel.view_range();
            (
                to_index(window.top_row()).unwrap_or(0),
                to_index(window.bottom_row()).unwrap_or(rows.len().saturating_sub(1)),
            )
        } else {
            (0, rows.len().saturating_sub(1))
        };

        let mut top = row;
        while top > lo && self.merge_cell(panel, top - 1, col, row, col) {
            top -= 1;
        }
        let mut bottom = row;
        while bottom < hi && self.merge_cell(panel, row, col, bottom + 1, col) {
            bottom += 1;
        }
        while top < row && !rows.get(top).is_some_and(|r| r.visible) {
            top += 1;
        }

        CellRange::new(to_coord(top), to_coord(col), to_coord(bottom), to_coord(col))
    }

    fn horizontal_range(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> CellRange {
        let cols = panel.columns();
        let (lo, hi) = if cols.is_frozen(col) {
            (0, cols.frozen().min(cols.len()).saturating_sub(1))
        } else if clip && panel.cell_type().uses_data_columns() {
            let window = panel.view_range();
            (
                to_index(window.left_col()).unwrap_or(0),
                to_index(window.right_col()).unwrap_or(cols.len().saturating_sub(1)),
            )
        } else {
            (0, cols.len().saturating_sub(1))
        };

        let mut left = col;
        while left > lo && self.merge_cell(panel, row, left - 1, row, col) {
            left -= 1;
        }
        let mut right = col;
        while right < hi && self.merge_cell(panel, row, col, row, right + 1) {
            right += 1;
        }
        while left < col && !cols.get(left).is_some_and(|c| c.visible) {
            left += 1;
        }

        CellRange::new(to_coord(row), to_coord(left), to_coord(row), to_coord(right))
    }

    /// Whether cell (`r1`, `c1`) may merge with (`r2`, `c2`).
    ///
    /// A vertical pair is refused when either row could merge horizontally
    /// across the same seam, so horizontal merges own contested seams.
    fn merge_cell(&self, panel: &GridPanel<'_>, r1: usize, c1: usize, r2: usize, c2: usize) -> bool {
        let rows = panel.rows();
        let cols = panel.columns();
        let (Some(row1), Some(row2)) = (rows.get(r1), rows.get(r2)) else {
            return false;
        };

        if row1.is_synthetic() || row2.is_synthetic() {
            return false;
        }

        if r1 != r2 && rows.is_frozen(r1) != rows.is_frozen(r2) {
            return false;
        }
        if c1 != c2 && cols.is_frozen(c1) != cols.is_frozen(c2) {
            return false;
        }

        if r1 != r2 {
            if c1 > 0
                && ((row1.allow_merging && self.merge_cell(panel, r1, c1 - 1, r1, c1))
                    || (row2.allow_merging && self.merge_cell(panel, r2, c1 - 1, r2, c1)))
            {
                return false;
            }
            if c2 + 1 < cols.len()
                && ((row1.allow_merging && self.merge_cell(panel, r1, c2, r1, c2 + 1))
                    || (row2.allow_merging && self.merge_cell(panel, r2, c2, r2, c2 + 1)))
            {
                return false;
            }
        }

        panel.cell_data(r1, c1, true) == panel.cell_data(r2, c2, true)
    }
}

impl MergeManager for MergeResolver {
    fn merged_range(
        &self,
        panel: &GridPanel<'_>,
        row: usize,
        col: usize,
        clip: bool,
    ) -> Option<CellRange> {
        self.resolve(panel, row, col, clip)
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
    use crate::config::GridOptions;
    use crate::layout::{Grid, TableSource};
    use crate::types::{AllowMerging, CellType, Column, Row};

    /// Grid whose cells all hold distinct text, showing rows 0-10 and columns 0-3.
    fn grid(rows: usize, cols: usize, merging: AllowMerging) -> (Grid, TableSource) {
        let options = GridOptions {
            allow_merging: merging,
            default_row_size: 20.0,
            default_column_size: 50.0,
            row_header_width: 40.0,
            column_header_height: 20.0,
            ..GridOptions::default()
        };
        let mut grid = Grid::with_size(options, rows, cols);
        grid.viewport.resize(240.0, 220.0);
        let table = TableSource::from_rows(
            (0..rows).map(|r| (0..cols).map(move |c| format!("r{r}c{c}")).collect::<Vec<_>>()),
        );
        (grid, table)
    }

    fn resolve(grid: &Grid, row: usize, col: usize) -> Option<CellRange> {
        MergeResolver::new().resolve(&grid.cells(), row, col, true)
    }

    #[test]
    fn test_horizontal_merge() {
        let (mut grid, mut table) = grid(10, 5, AllowMerging::Cells);
        for c in 1..=3 {
            table.set(5, c, "same");
        }
        grid.rows.edit(5, |r| r.allow_merging = true);
        grid.set_data_source(table);

        let expected = Some(CellRange::new(5, 1, 5, 3));
        assert_eq!(resolve(&grid, 5, 2), expected);
        assert_eq!(resolve(&grid, 5, 1), expected);
        assert_eq!(resolve(&grid, 5, 3), expected);
        assert_eq!(resolve(&grid, 5, 0), None);
        assert_eq!(resolve(&grid, 4, 2), None);
    }

    #[test]
    fn test_vertical_merge() {
        let (mut grid, mut table) = grid(10, 5, AllowMerging::Cells);
        for r in 2..=4 {
            table.set(r, 1, "A");
        }
        grid.columns.edit(1, |c| c.allow_merging = true);
        grid.set_data_source(table);

        assert_eq!(resolve(&grid, 3, 1), Some(CellRange::new(2, 1, 4, 1)));
        assert_eq!(resolve(&grid, 5, 1), None);
    }

    #[test]
    fn test_merging_disabled_for_panel() {
        let (mut grid, mut table) = grid(10, 5, AllowMerging::ColumnHeaders);
        table.set(0, 0, "A");
        table.set(1, 0, "A");
        grid.columns.edit(0, |c| c.allow_merging = true);
        grid.set_data_source(table);
        assert_eq!(resolve(&grid, 0, 0), None);
    }

    #[test]
    fn test_column_headers_merge() {
        let (mut grid, table) = grid(4, 4, AllowMerging::AllHeaders);
        grid.column_header_rows.edit(0, |r| r.allow_merging = true);
        grid.set_data_source(table.with_column_headers(["Name", "Q1", "Q1", "Q2"]));

        let headers = grid.panel(CellType::ColumnHeader);
        let resolver = MergeResolver::new();
        assert_eq!(resolver.resolve(&headers, 0, 1, true), Some(CellRange::new(0, 1, 0, 2)));
        assert_eq!(resolver.resolve(&headers, 0, 3, true), None);
    }

    #[test]
    fn test_new_row_template_never_merges() {
        let (mut grid, _) = grid(3, 3, AllowMerging::All);
        grid.rows.push(Row::new_row_template().with_merging(true));
        grid.rows.edit(2, |r| r.allow_merging = true);
        for c in 0..3 {
            grid.columns.edit(c, |col| col.allow_merging = true);
        }
        // every cell is empty, so only synthetic rows stay unmerged
        grid.set_data_source(TableSource::new());

        assert_eq!(resolve(&grid, 3, 1), None);
        let above = resolve(&grid, 2, 1).unwrap();
        assert!(above.bottom_row() < 3);
    }

    #[test]
    fn test_empty_cells_merge() {
        let (mut grid, _) = grid(4, 2, AllowMerging::Cells);
        grid.columns.edit(0, |c| c.allow_merging = true);
        grid.set_data_source(TableSource::new());
        assert_eq!(resolve(&grid, 1, 0), Some(CellRange::new(0, 0, 3, 0)));
    }

    #[test]
    fn test_group_row_spans_non_aggregate_columns() {
        let (mut grid, table) = grid(3, 0, AllowMerging::None);
        grid.columns = crate::layout::Columns::from_items(
            vec![
                Column::new("a"),
                Column::new("b"),
                Column::new("sum").with_aggregate(Aggregate::Sum),
                Column::new("c"),
                Column::new("d"),
            ],
            50.0,
        );
        grid.rows.insert(0, Row::group(0, Some(0)));
        grid.set_data_source(table);

        assert_eq!(resolve(&grid, 0, 0), Some(CellRange::new(0, 0, 0, 1)));
        assert_eq!(resolve(&grid, 0, 1), Some(CellRange::new(0, 0, 0, 1)));
        assert_eq!(resolve(&grid, 0, 2), None);
        assert_eq!(resolve(&grid, 0, 4), Some(CellRange::new(0, 3, 0, 4)));

        // unbound placeholder group rows take the normal path
        grid.rows.insert(1, Row::group(1, None));
        assert_eq!(resolve(&grid, 1, 0), None);
    }

    #[test]
    fn test_group_row_stops_at_frozen_columns() {
        let (mut grid, table) = grid(3, 4, AllowMerging::None);
        grid.rows.insert(0, Row::group(0, Some(0)));
        grid.columns.set_frozen(1);
        grid.set_data_source(table);

        assert_eq!(resolve(&grid, 0, 0), None);
        assert_eq!(resolve(&grid, 0, 2), Some(CellRange::new(0, 1, 0, 3)));
    }

    #[test]
    fn test_group_row_skips_hidden_anchor_column() {
        let (mut grid, table) = grid(3, 4, AllowMerging::None);
        grid.rows.insert(0, Row::group(0, Some(0)));
        grid.columns.edit(0, |c| c.visible = false);
        grid.set_data_source(table);

        assert_eq!(resolve(&grid, 0, 2), Some(CellRange::new(0, 1, 0, 3)));
    }

    #[test]
    fn test_merge_stops_at_frozen_rows() {
        let (mut grid, _) = grid(6, 2, AllowMerging::Cells);
        grid.rows.set_frozen(2);
        grid.columns.edit(0, |c| c.allow_merging = true);
        grid.set_data_source(TableSource::new());

        assert_eq!(resolve(&grid, 0, 0), Some(CellRange::new(0, 0, 1, 0)));
        assert_eq!(resolve(&grid, 3, 0), Some(CellRange::new(2, 0, 5, 0)));
    }

    #[test]
    fn test_hidden_top_row_is_skipped() {
        let (mut grid, mut table) = grid(6, 2, AllowMerging::Cells);
        for r in 1..=3 {
            table.set(r, 0, "A");
        }
        grid.rows.edit(1, |r| r.visible = false);
        grid.columns.edit(0, |c| c.allow_merging = true);
        grid.set_data_source(table);

        assert_eq!(resolve(&grid, 2, 0), Some(CellRange::new(2, 0, 3, 0)));
        assert_eq!(resolve(&grid, 3, 0), Some(CellRange::new(2, 0, 3, 0)));
    }

    #[test]
    fn test_clip_to_visible_rows() {
        let (mut grid, _) = grid(100, 2, AllowMerging::Cells);
        grid.columns.edit(0, |c| c.allow_merging = true);
        grid.set_data_source(TableSource::new());

        let cells = grid.cells();
        let resolver = MergeResolver::new();
        assert_eq!(resolver.resolve(&cells, 5, 0, true), Some(CellRange::new(0, 0, 10, 0)));
        assert_eq!(resolver.resolve(&cells, 5, 0, false), Some(CellRange::new(0, 0, 99, 0)));
    }

    #[test]
    fn test_horizontal_wins_contested_seam() {
        let (mut grid, mut table) = grid(6, 5, AllowMerging::Cells);
        table.set(2, 2, "A");
        table.set(3, 2, "A");
        table.set(2, 3, "A");
        grid.columns.edit(2, |c| c.allow_merging = true);
        grid.rows.edit(2, |r| r.allow_merging = true);
        grid.set_data_source(table);

        let horizontal = Some(CellRange::new(2, 2, 2, 3));
        assert_eq!(resolve(&grid, 2, 2), horizontal);
        assert_eq!(resolve(&grid, 2, 3), horizontal);
        assert_eq!(resolve(&grid, 3, 2), None);
    }

    #[test]
    fn test_out_of_range_cell() {
        let (grid, _) = grid(3, 3, AllowMerging::All);
        assert_eq!(resolve(&grid, 10, 0), None);
        assert_eq!(resolve(&grid, 0, 10), None);
    }
}

//! Keyboard-style selection movement.

use super::SelectionEngine;
use crate::layout::Grid;
use crate::types::{to_index, CellRange, CellType, SelMove, SelectionMode};

impl SelectionEngine {
    /// Move (or extend) the selection one navigation step per axis.
    ///
    /// `NextCell`/`PrevCell` on the column axis wrap to the next/previous
    /// row. When extending, the opposite corner stays put and `(row, col)`
    /// moves. Returns true if the selection changed.
    pub fn move_selection(
        &mut self,
        grid: &mut Grid,
        row_move: SelMove,
        col_move: SelMove,
        extend: bool,
    ) -> bool {
        if self.mode == SelectionMode::None {
            return false;
        }

        let reference = self.reference_cell(grid, row_move, col_move);
        let row_page = grid.cells_height();
        let col_page = grid.cells_width();
        let rows = &grid.rows;
        let cols = &grid.columns;

        let target = match col_move {
            SelMove::NextCell => {
                let mut row = reference.row;
                let mut col = cols.get_next_cell(reference.col, SelMove::Next, col_page);
                if col == reference.col {
                    row = rows.get_next_cell(row, SelMove::Next, row_page);
                    if row > reference.row {
                        col = cols.get_next_cell(col, SelMove::Home, col_page);
                    }
                }
                CellRange::cell(row, col)
            }
            SelMove::PrevCell => {
                let mut row = reference.row;
                let mut col = cols.get_next_cell(reference.col, SelMove::Prev, col_page);
                if col == reference.col {
                    row = rows.get_next_cell(row, SelMove::Prev, row_page);
                    if row < reference.row {
                        col = cols.get_next_cell(col, SelMove::End, col_page);
                    }
                }
                CellRange::cell(row, col)
            }
            _ => {
                let row = rows.get_next_cell(reference.row, row_move, row_page);
                let col = cols.get_next_cell(reference.col, col_move, col_page);
                if extend {
                    CellRange::new(row, col, self.selection.row2, self.selection.col2)
                } else {
                    CellRange::cell(row, col)
                }
            }
        };

        self.select(grid, target, true)
    }

    /// Cell to step from: the selection anchor, pushed to the far side of a
    /// merged block in the direction of travel.
    fn reference_cell(&self, grid: &Grid, row_move: SelMove, col_move: SelMove) -> CellRange {
        let sel = self.selection;
        let merged = match (to_index(sel.row), to_index(sel.col)) {
            (Some(r), Some(c)) => grid.merged_range(CellType::Cell, r, c, true),
            _ => None,
        };
        let Some(mut rng) = merged.filter(|m| !m.is_single_cell()) else {
            return sel;
        };

        match row_move {
            SelMove::Next | SelMove::NextCell => rng.row = rng.bottom_row(),
            SelMove::None => rng.row = sel.row,
            _ => {}
        }
        match col_move {
            SelMove::Next | SelMove::NextCell => rng.col = rng.right_col(),
            SelMove::None => rng.col = sel.col,
            _ => {}
        }
        rng
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
    use crate::layout::TableSource;
    use crate::types::AllowMerging;

    fn setup(mode: SelectionMode, row: i32, col: i32) -> (Grid, SelectionEngine) {
        let mut grid = Grid::with_size(GridOptions::default(), 10, 5);
        let mut engine = SelectionEngine::new(mode);
        engine.select_cell(&mut grid, row, col);
        (grid, engine)
    }

    #[test]
    fn test_next_row() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 2, 2);
        assert!(engine.move_selection(&mut g, SelMove::Next, SelMove::None, false));
        assert_eq!(engine.selection(), CellRange::cell(3, 2));
    }

    #[test]
    fn test_next_cell_wraps_to_next_row() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 2, 4);
        engine.move_selection(&mut g, SelMove::None, SelMove::NextCell, false);
        assert_eq!(engine.selection(), CellRange::cell(3, 0));
    }

    #[test]
    fn test_prev_cell_wraps_to_previous_row() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 3, 0);
        engine.move_selection(&mut g, SelMove::None, SelMove::PrevCell, false);
        assert_eq!(engine.selection(), CellRange::cell(2, 4));
    }

    #[test]
    fn test_next_cell_stops_at_last_cell() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 9, 4);
        assert!(!engine.move_selection(&mut g, SelMove::None, SelMove::NextCell, false));
        assert_eq!(engine.selection(), CellRange::cell(9, 4));
    }

    #[test]
    fn test_extend_keeps_opposite_corner() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 2, 2);
        engine.move_selection(&mut g, SelMove::Next, SelMove::Next, true);
        engine.move_selection(&mut g, SelMove::Next, SelMove::None, true);
        assert_eq!(engine.selection(), CellRange::new(4, 3, 2, 2));
    }

    #[test]
    fn test_moves_skip_hidden_columns() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange, 0, 1);
        g.columns.edit(2, |c| c.visible = false);
        engine.move_selection(&mut g, SelMove::None, SelMove::Next, false);
        assert_eq!(engine.selection(), CellRange::cell(0, 3));
    }

    #[test]
    fn test_next_steps_over_merged_block() {
        let mut g = Grid::with_size(
            GridOptions {
                allow_merging: AllowMerging::Cells,
                ..GridOptions::default()
            },
            10,
            5,
        );
        let mut table = TableSource::from_rows(
            (0..10).map(|r| (0..5).map(move |c| format!("{r}-{c}")).collect::<Vec<_>>()),
        );
        for r in 2..=4 {
            table.set(r, 1, "block");
        }
        g.columns.edit(1, |c| c.allow_merging = true);
        g.set_data_source(table);

        let mut engine = SelectionEngine::default();
        engine.select_cell(&mut g, 2, 1);
        engine.move_selection(&mut g, SelMove::Next, SelMove::None, false);
        assert_eq!(engine.selection(), CellRange::cell(5, 1));

        engine.select_cell(&mut g, 3, 1);
        engine.move_selection(&mut g, SelMove::Prev, SelMove::None, false);
        assert_eq!(engine.selection(), CellRange::cell(1, 1));
    }

    #[test]
    fn test_mode_none_is_a_no_op() {
        let (mut g, mut engine) = setup(SelectionMode::None, 2, 2);
        assert!(!engine.move_selection(&mut g, SelMove::Next, SelMove::None, false));
        assert_eq!(engine.selection(), CellRange::invalid());
    }

    #[test]
    fn test_row_mode_moves_whole_rows() {
        let (mut g, mut engine) = setup(SelectionMode::Row, 2, 3);
        engine.move_selection(&mut g, SelMove::End, SelMove::None, false);
        assert_eq!(engine.selection(), CellRange::new(9, 0, 9, 4));
    }

    #[test]
    fn test_page_moves_use_cells_height() {
        let mut g = Grid::with_size(GridOptions::default(), 100, 5);
        let mut engine = SelectionEngine::default();
        engine.select_cell(&mut g, 0, 0);
        engine.move_selection(&mut g, SelMove::NextPage, SelMove::None, false);
        // 572px of cells at 28px per row
        assert_eq!(engine.selection(), CellRange::cell(20, 0));
    }
}

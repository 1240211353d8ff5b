//! Selection state and the operations that change it.
//!
//! The engine owns the authoritative selection range. Everything it returns
//! is a copy; the grid's rows only carry the ListBox membership flags.

mod events;
mod keyboard;
mod navigation;

pub use events::{ListenerId, SelectionChangedArgs, SelectionChangingArgs, SelectionEvents};
pub use keyboard::Modifiers;

use log::{debug, trace};

use crate::config::GridOptions;
use crate::layout::Grid;
use crate::types::{last_coord, to_coord, to_index, CellRange, CellType, SelectedState, SelectionMode};

/// Owns the current selection and its mode.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    selection: CellRange,
    mode: SelectionMode,
    events: SelectionEvents,
}

impl SelectionEngine {
    /// Create an engine with no selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            selection: CellRange::invalid(),
            mode,
            events: SelectionEvents::new(),
        }
    }

    pub fn from_options(options: &GridOptions) -> Self {
        Self::new(options.selection_mode)
    }

    /// The current selection
    pub fn selection(&self) -> CellRange {
        self.selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn events_mut(&mut self) -> &mut SelectionEvents {
        &mut self.events
    }

    /// Switch selection modes.
    ///
    /// Entering or leaving ListBox mode rewrites every row's selected flag
    /// from the current rectangle. Switching to None, Cell or Row reshapes
    /// the selection right away.
    pub fn set_mode(&mut self, grid: &mut Grid, mode: SelectionMode) {
        if mode == self.mode {
            return;
        }
        let previous = self.mode;
        if previous == SelectionMode::ListBox || mode == SelectionMode::ListBox {
            let sel = self.selection;
            for (i, flag) in grid.rows.iter_mut_selected() {
                *flag = mode == SelectionMode::ListBox && sel.contains_row(to_coord(i));
            }
        }
        self.mode = mode;
        if matches!(
            mode,
            SelectionMode::None | SelectionMode::Cell | SelectionMode::Row
        ) {
            self.selection = mode.constrain(self.selection, grid.columns.len());
        }
        debug!("selection mode {previous:?} -> {mode:?}");
        grid.invalidate();
    }

    /// Select a range, reshaped to the current mode.
    ///
    /// Returns true if the selection changed. A vetoed change leaves every
    /// bit of state untouched and returns false.
    pub fn select(&mut self, grid: &mut Grid, range: CellRange, scroll_into_view: bool) -> bool {
        let mut rng = self.mode.constrain(range, grid.columns.len());

        let mut changed = rng != self.selection;
        if !changed && self.mode == SelectionMode::ListBox {
            changed = grid
                .rows
                .iter()
                .enumerate()
                .any(|(i, row)| row.is_selected != rng.contains_row(to_coord(i)));
        }
        if !changed {
            if scroll_into_view {
                grid.scroll_into_view(self.selection.row, self.selection.col);
            }
            return false;
        }

        let mut args = SelectionChangingArgs::new(CellType::Cell, rng);
        if !self.events.raise_changing(&mut args) {
            debug!("selection change to {rng} canceled");
            return false;
        }

        if self.mode == SelectionMode::ListBox {
            for (i, flag) in grid.rows.iter_mut_selected() {
                *flag = rng.contains_row(to_coord(i));
            }
        }

        let last_row = last_coord(grid.rows.len());
        if rng.row > last_row || rng.row2 > last_row {
            debug!("selection {rng} clamped to {} rows", grid.rows.len());
            rng.row = rng.row.min(last_row);
            rng.row2 = rng.row2.min(last_row);
        }

        self.selection = rng;
        trace!("selection committed: {rng}");
        grid.invalidate();
        if scroll_into_view {
            grid.scroll_into_view(rng.row, rng.col);
        }
        grid.sync_view_cursor(rng.row);

        self.events.raise_changed(&SelectionChangedArgs {
            panel: CellType::Cell,
            range: rng,
        });
        true
    }

    /// Select a single cell (or the row holding it in row modes).
    pub fn select_cell(&mut self, grid: &mut Grid, row: i32, col: i32) -> bool {
        self.select(grid, CellRange::cell(row, col), true)
    }

    /// Select every cell. Does nothing unless the mode allows ranges.
    pub fn select_all(&mut self, grid: &mut Grid) -> bool {
        if !self.mode.allows_ranges() {
            return false;
        }
        let all = CellRange::new(
            0,
            0,
            last_coord(grid.rows.len()),
            last_coord(grid.columns.len()),
        );
        self.select(grid, all, false)
    }

    /// Flip one row's ListBox membership and move the cursor to it.
    ///
    /// Other rows keep their flags. Only meaningful in ListBox mode;
    /// returns false otherwise, for an unknown row, or when vetoed.
    pub fn toggle_row(&mut self, grid: &mut Grid, row: usize) -> bool {
        if self.mode != SelectionMode::ListBox {
            return false;
        }
        let Some(was_selected) = grid.rows.get(row).map(|r| r.is_selected) else {
            return false;
        };

        let rng = self
            .mode
            .constrain(CellRange::cell(to_coord(row), 0), grid.columns.len());
        let mut args = SelectionChangingArgs::new(CellType::Cell, rng);
        if !self.events.raise_changing(&mut args) {
            debug!("row toggle {row} canceled");
            return false;
        }

        grid.rows.set_selected(row, !was_selected);
        self.selection = rng;
        trace!("row {row} toggled to {}", !was_selected);
        grid.invalidate();
        grid.sync_view_cursor(rng.row);

        self.events.raise_changed(&SelectionChangedArgs {
            panel: CellType::Cell,
            range: rng,
        });
        true
    }

    /// How a cell should be painted.
    pub fn selected_state(
        &self,
        grid: &Grid,
        cell_type: CellType,
        row: usize,
        col: usize,
    ) -> SelectedState {
        let sel = self.selection;
        if self.mode == SelectionMode::None || !sel.is_valid() {
            return SelectedState::None;
        }
        let (r, c) = (to_coord(row), to_coord(col));

        match cell_type {
            CellType::Cell => {
                let merged = grid.merged_range(CellType::Cell, row, col, true);
                let cursor = (sel.row == r && sel.col == c)
                    || merged.is_some_and(|m| m.contains_cell(sel.row, sel.col));
                if cursor {
                    return SelectedState::Cursor;
                }
                let selected = if self.mode == SelectionMode::ListBox {
                    grid.rows.get(row).is_some_and(|r| r.is_selected)
                } else {
                    sel.contains_cell(r, c) || merged.is_some_and(|m| m.intersects(&sel))
                };
                if selected {
                    SelectedState::Selected
                } else {
                    SelectedState::None
                }
            }
            CellType::RowHeader => {
                let selected = if self.mode == SelectionMode::ListBox {
                    grid.rows.get(row).is_some_and(|r| r.is_selected)
                } else {
                    sel.contains_row(r)
                };
                if selected {
                    SelectedState::Selected
                } else {
                    SelectedState::None
                }
            }
            CellType::ColumnHeader | CellType::ColumnFooter => {
                if sel.contains_column(c) {
                    SelectedState::Selected
                } else {
                    SelectedState::None
                }
            }
            CellType::TopLeft | CellType::BottomLeft => SelectedState::None,
        }
    }

    /// Indices of the selected rows, in order.
    pub fn selected_rows(&self, grid: &Grid) -> Vec<usize> {
        if self.mode == SelectionMode::ListBox {
            return grid
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.is_selected)
                .map(|(i, _)| i)
                .collect();
        }
        if self.mode == SelectionMode::None || !self.selection.is_valid() {
            return Vec::new();
        }
        let top = to_index(self.selection.top_row()).unwrap_or(0);
        let bottom = to_index(self.selection.bottom_row()).unwrap_or(0);
        (top..=bottom).filter(|&i| i < grid.rows.len()).collect()
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
        Grid::with_size(GridOptions::default(), rows, cols)
    }

    #[test]
    fn test_select_constrains_to_mode() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::new(SelectionMode::Row);
        assert!(engine.select(&mut g, CellRange::cell(3, 1), true));
        assert_eq!(engine.selection(), CellRange::new(3, 0, 3, 4));
        assert!(!engine.select(&mut g, CellRange::cell(3, 2), true));
    }

    #[test]
    fn test_select_clamps_rows() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        assert!(engine.select(&mut g, CellRange::new(8, 1, 20, 2), false));
        assert_eq!(engine.selection(), CellRange::new(8, 1, 9, 2));
    }

    #[test]
    fn test_canceled_select_keeps_state() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        engine.select_cell(&mut g, 1, 1);
        g.take_needs_render();

        let changed = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&changed);
        engine.events_mut().on_changing(|args| {
            if args.range().row > 5 {
                args.cancel();
            }
        });
        engine
            .events_mut()
            .on_changed(move |args| log.borrow_mut().push(args.range));

        assert!(!engine.select_cell(&mut g, 7, 1));
        assert_eq!(engine.selection(), CellRange::cell(1, 1));
        assert!(!g.needs_render());
        assert!(engine.select_cell(&mut g, 2, 1));
        assert_eq!(*changed.borrow(), vec![CellRange::cell(2, 1)]);
    }

    #[test]
    fn test_mode_switch_reshapes_selection() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        engine.select(&mut g, CellRange::new(2, 1, 4, 3), false);

        engine.set_mode(&mut g, SelectionMode::Row);
        assert_eq!(engine.selection(), CellRange::new(2, 0, 2, 4));
        engine.set_mode(&mut g, SelectionMode::None);
        assert_eq!(engine.selection(), CellRange::invalid());
    }

    #[test]
    fn test_list_box_flags_follow_mode() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        engine.select(&mut g, CellRange::new(2, 0, 4, 0), false);

        engine.set_mode(&mut g, SelectionMode::ListBox);
        assert_eq!(engine.selected_rows(&g), vec![2, 3, 4]);

        engine.set_mode(&mut g, SelectionMode::CellRange);
        assert!(g.rows.iter().all(|r| !r.is_selected));
        assert_eq!(engine.selected_rows(&g), vec![2, 3, 4]);
    }

    #[test]
    fn test_list_box_reselect_counts_as_change() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::new(SelectionMode::ListBox);
        engine.select_cell(&mut g, 3, 0);
        assert!(engine.toggle_row(&mut g, 6));
        assert_eq!(engine.selected_rows(&g), vec![3, 6]);

        // the rectangle already sits on row 6, but row 3 is stale
        assert!(engine.select_cell(&mut g, 6, 0));
        assert_eq!(engine.selected_rows(&g), vec![6]);
    }

    #[test]
    fn test_toggle_row() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::new(SelectionMode::ListBox);
        assert!(engine.toggle_row(&mut g, 1));
        assert!(engine.toggle_row(&mut g, 4));
        assert!(engine.toggle_row(&mut g, 1));
        assert_eq!(engine.selected_rows(&g), vec![4]);
        assert_eq!(engine.selection(), CellRange::new(1, 0, 1, 4));
        assert!(!engine.toggle_row(&mut g, 50));

        engine.set_mode(&mut g, SelectionMode::Row);
        assert!(!engine.toggle_row(&mut g, 2));
    }

    #[test]
    fn test_select_all() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        assert!(engine.select_all(&mut g));
        assert_eq!(engine.selection(), CellRange::new(0, 0, 9, 4));

        let mut single = SelectionEngine::new(SelectionMode::Cell);
        assert!(!single.select_all(&mut g));
    }

    #[test]
    fn test_selected_state() {
        let mut g = grid(10, 5);
        let mut engine = SelectionEngine::default();
        engine.select(&mut g, CellRange::new(2, 1, 3, 2), false);

        assert_eq!(engine.selected_state(&g, CellType::Cell, 2, 1), SelectedState::Cursor);
        assert_eq!(engine.selected_state(&g, CellType::Cell, 3, 2), SelectedState::Selected);
        assert_eq!(engine.selected_state(&g, CellType::Cell, 4, 2), SelectedState::None);
        assert_eq!(engine.selected_state(&g, CellType::RowHeader, 3, 0), SelectedState::Selected);
        assert_eq!(engine.selected_state(&g, CellType::ColumnHeader, 0, 2), SelectedState::Selected);
        assert_eq!(engine.selected_state(&g, CellType::ColumnHeader, 0, 3), SelectedState::None);
        assert_eq!(engine.selected_state(&g, CellType::TopLeft, 0, 0), SelectedState::None);
    }

    #[test]
    fn test_select_scrolls_into_view() {
        let mut g = grid(100, 5);
        let mut engine = SelectionEngine::default();
        engine.select_cell(&mut g, 60, 0);
        assert!(g.viewport.scroll_y > 0.0);
        let cells_h = g.cells_height();
        let top = g.rows.pos(60) - g.viewport.scroll_y;
        assert!(top >= 0.0 && top + 28.0 <= cells_h);
    }
}

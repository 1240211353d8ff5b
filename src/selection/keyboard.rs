//! Key handling for selection navigation.
//!
//! Keys use DOM `KeyboardEvent.key` names ("ArrowDown", "Tab", "a", ...).

use bitflags::bitflags;

use super::SelectionEngine;
use crate::layout::Grid;
use crate::types::{SelMove, SelectionMode};

bitflags! {
    /// Keyboard modifiers held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const ALT     = 0b0010;
        const CONTROL = 0b0100;
        const SUPER   = 0b1000;
    }
}

impl SelectionEngine {
    /// Handle a key press. Returns true if the key was consumed, even when
    /// the selection ended up where it was.
    pub fn handle_key_down(&mut self, grid: &mut Grid, key: &str, mods: Modifiers) -> bool {
        if self.mode == SelectionMode::None {
            return false;
        }

        let ctrl = mods.contains(Modifiers::CONTROL);
        let shift = mods.contains(Modifiers::SHIFT);
        let extend = shift && self.mode.allows_ranges();
        let rtl = grid.options.right_to_left;

        let (row_move, col_move, extend) = match key {
            "ArrowUp" => (step(ctrl, SelMove::Home, SelMove::Prev), SelMove::None, extend),
            "ArrowDown" => (step(ctrl, SelMove::End, SelMove::Next), SelMove::None, extend),
            "ArrowLeft" | "ArrowRight" => {
                let forward = (key == "ArrowRight") != rtl;
                let col_move = if forward {
                    step(ctrl, SelMove::End, SelMove::Next)
                } else {
                    step(ctrl, SelMove::Home, SelMove::Prev)
                };
                (SelMove::None, col_move, extend)
            }
            "PageUp" => (SelMove::PrevPage, SelMove::None, extend),
            "PageDown" => (SelMove::NextPage, SelMove::None, extend),
            "Home" => (step(ctrl, SelMove::Home, SelMove::None), SelMove::Home, extend),
            "End" => (step(ctrl, SelMove::End, SelMove::None), SelMove::End, extend),
            "Tab" => {
                let col_move = if shift {
                    SelMove::PrevCell
                } else {
                    SelMove::NextCell
                };
                (SelMove::None, col_move, false)
            }
            "Enter" => {
                let row_move = if shift { SelMove::Prev } else { SelMove::Next };
                (row_move, SelMove::None, false)
            }
            "a" | "A" if ctrl => {
                if !self.mode.allows_ranges() {
                    return false;
                }
                self.select_all(grid);
                return true;
            }
            _ => return false,
        };

        self.move_selection(grid, row_move, col_move, extend);
        true
    }
}

fn step(ctrl: bool, with_ctrl: SelMove, plain: SelMove) -> SelMove {
    if ctrl {
        with_ctrl
    } else {
        plain
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
    use crate::types::CellRange;
    use test_case::test_case;

    fn setup(mode: SelectionMode) -> (Grid, SelectionEngine) {
        let mut grid = Grid::with_size(GridOptions::default(), 10, 5);
        let mut engine = SelectionEngine::new(mode);
        engine.select_cell(&mut grid, 4, 2);
        (grid, engine)
    }

    #[test_case("ArrowDown", Modifiers::empty(), CellRange::cell(5, 2); "down")]
    #[test_case("ArrowUp", Modifiers::empty(), CellRange::cell(3, 2); "up")]
    #[test_case("ArrowRight", Modifiers::empty(), CellRange::cell(4, 3); "right")]
    #[test_case("ArrowLeft", Modifiers::empty(), CellRange::cell(4, 1); "left")]
    #[test_case("ArrowDown", Modifiers::CONTROL, CellRange::cell(9, 2); "ctrl down")]
    #[test_case("ArrowLeft", Modifiers::CONTROL, CellRange::cell(4, 0); "ctrl left")]
    #[test_case("Home", Modifiers::empty(), CellRange::cell(4, 0); "home")]
    #[test_case("End", Modifiers::CONTROL, CellRange::cell(9, 4); "ctrl end")]
    #[test_case("Tab", Modifiers::empty(), CellRange::cell(4, 3); "tab")]
    #[test_case("Tab", Modifiers::SHIFT, CellRange::cell(4, 1); "shift tab")]
    #[test_case("Enter", Modifiers::empty(), CellRange::cell(5, 2); "enter")]
    #[test_case("Enter", Modifiers::SHIFT, CellRange::cell(3, 2); "shift enter")]
    #[test_case("ArrowDown", Modifiers::SHIFT, CellRange::new(5, 2, 4, 2); "shift down extends")]
    #[test_case("PageDown", Modifiers::empty(), CellRange::cell(9, 2); "page down")]
    fn test_keys(key: &str, mods: Modifiers, expected: CellRange) {
        let (mut g, mut engine) = setup(SelectionMode::CellRange);
        assert!(engine.handle_key_down(&mut g, key, mods));
        assert_eq!(engine.selection(), expected);
    }

    #[test]
    fn test_right_to_left_swaps_arrows() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange);
        g.options.right_to_left = true;
        engine.handle_key_down(&mut g, "ArrowRight", Modifiers::empty());
        assert_eq!(engine.selection(), CellRange::cell(4, 1));
    }

    #[test]
    fn test_shift_does_not_extend_single_cell_mode() {
        let (mut g, mut engine) = setup(SelectionMode::Cell);
        engine.handle_key_down(&mut g, "ArrowDown", Modifiers::SHIFT);
        assert_eq!(engine.selection(), CellRange::cell(5, 2));
    }

    #[test]
    fn test_ctrl_a() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange);
        assert!(engine.handle_key_down(&mut g, "a", Modifiers::CONTROL));
        assert_eq!(engine.selection(), CellRange::new(0, 0, 9, 4));

        let (mut g, mut engine) = setup(SelectionMode::Row);
        assert!(!engine.handle_key_down(&mut g, "a", Modifiers::CONTROL));
    }

    #[test]
    fn test_unhandled_keys() {
        let (mut g, mut engine) = setup(SelectionMode::CellRange);
        assert!(!engine.handle_key_down(&mut g, "x", Modifiers::empty()));
        assert!(!engine.handle_key_down(&mut g, "a", Modifiers::empty()));

        let (mut g, mut engine) = setup(SelectionMode::None);
        assert!(!engine.handle_key_down(&mut g, "ArrowDown", Modifiers::empty()));
    }
}

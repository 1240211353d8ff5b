use serde::{Deserialize, Serialize};

use super::cell_range::CellRange;

/// How the selection is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Nothing can be selected
    None,
    /// A single cell
    Cell,
    /// Any contiguous block of cells (default)
    #[default]
    CellRange,
    /// A single whole row
    Row,
    /// A contiguous block of whole rows
    RowRange,
    /// Any set of whole rows, tracked by each row's selected flag
    ListBox,
}

impl SelectionMode {
    /// Reshape `range` to satisfy this mode for a grid with `column_count` columns.
    ///
    /// Applying the constraint twice gives the same result as applying it once.
    pub fn constrain(self, range: CellRange, column_count: usize) -> CellRange {
        let mut rng = range;
        match self {
            Self::None => rng = CellRange::invalid(),
            Self::Cell => {
                rng.row2 = rng.row;
                rng.col2 = rng.col;
            }
            Self::CellRange => {}
            Self::Row | Self::RowRange | Self::ListBox => {
                if self == Self::Row {
                    rng.row2 = rng.row;
                }
                rng.col = 0;
                rng.col2 = super::cell_range::last_coord(column_count);
            }
        }
        rng
    }

    /// Selections may span more than one row or cell.
    pub fn allows_ranges(self) -> bool {
        matches!(self, Self::CellRange | Self::RowRange | Self::ListBox)
    }
}

/// A navigation step along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelMove {
    /// Stay on the current index
    #[default]
    None,
    Next,
    Prev,
    NextPage,
    PrevPage,
    Home,
    End,
    /// Next cell, wrapping to the start of the next row
    NextCell,
    /// Previous cell, wrapping to the end of the previous row
    PrevCell,
}

/// Selection state of an individual cell, as painted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectedState {
    #[default]
    None,
    Selected,
    /// The cell holding the selection anchor
    Cursor,
}

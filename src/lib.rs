//! gridcore - spatial and addressing core for spreadsheet-style grids
//!
//! Turns a logical grid of rows and columns (frozen, hidden, grouped or
//! merged) into:
//! - Cell ranges with derived geometry and A1 notation
//! - Merged blocks of equal-looking neighbor cells
//! - Panel, row, column and resize-edge hits for pointer coordinates
//! - A selection that moves and extends under six selection modes
//!
//! # Usage
//!
//! ```
//! use gridcore::{CellRange, Grid, GridOptions, HitTester, SelMove, SelectionEngine};
//!
//! let mut grid = Grid::with_size(GridOptions::default(), 10, 5);
//! let mut selection = SelectionEngine::from_options(&grid.options);
//!
//! selection.select(&mut grid, CellRange::cell(2, 2), true);
//! selection.move_selection(&mut grid, SelMove::Next, SelMove::None, false);
//! assert_eq!(selection.selection(), CellRange::cell(3, 2));
//!
//! let hit = HitTester::new(&grid)?.hit_test(160.0, 40.0)?;
//! assert_eq!((hit.row, hit.col), (0, 1));
//! # Ok::<(), gridcore::GridError>(())
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod hit_test;
pub mod layout;
pub mod merge;
pub mod selection;
pub mod types;

pub use config::GridOptions;
pub use error::{GridError, Result};
pub use hit_test::{HitEdges, HitSource, HitTestResult, HitTester, Point, PointerKind};
pub use layout::{
    CellDataSource, Columns, CursorView, Grid, GridPanel, Rows, TableSource, ViewCapabilities,
    Viewport,
};
pub use merge::{MergeManager, MergeResolver};
pub use selection::{Modifiers, SelectionEngine};
pub use types::*;

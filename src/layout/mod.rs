//! Layout engine for grid geometry and viewport management.
//!
//! This module handles:
//! - Pre-computing row/column positions from their sizes
//! - Managing viewport state (scroll position, visible window)
//! - Binary search for efficient item lookup at panel coordinates
//! - The grid model and its six panels

mod axis;
mod grid;
mod viewport;

pub use axis::{Columns, RowColCollection, Rows, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use grid::{CellDataSource, CursorView, Grid, GridPanel, TableSource, ViewCapabilities};
pub use viewport::Viewport;

//! Value types shared by the layout, merge, hit-test and selection modules.

mod cell_range;
mod cell_type;
mod row_col;
mod selection;

pub use cell_range::*;
pub use cell_type::*;
pub use row_col::*;
pub use selection::*;

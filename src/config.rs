//! Grid-wide options.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
use crate::types::{AllowMerging, SelectionMode};

/// Options applied to a whole grid, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Initial mode of a selection engine built from these options
    pub selection_mode: SelectionMode,
    /// Which panels may merge cells with equal content
    pub allow_merging: AllowMerging,
    pub right_to_left: bool,
    /// Honor the viewport's sticky header offset
    pub sticky_headers: bool,
    pub default_row_size: f32,
    pub default_column_size: f32,
    pub row_header_width: f32,
    pub column_header_height: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            allow_merging: AllowMerging::default(),
            right_to_left: false,
            sticky_headers: false,
            default_row_size: DEFAULT_ROW_HEIGHT,
            default_column_size: DEFAULT_COL_WIDTH,
            row_header_width: 50.0,
            column_header_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

impl GridOptions {
    /// Parse options from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`crate::GridError::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

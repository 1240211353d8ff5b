use serde::{Deserialize, Serialize};

/// The six fixed panels of a grid control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    /// Scrollable data cells.
    Cell,
    ColumnHeader,
    RowHeader,
    /// Corner above the row headers.
    TopLeft,
    ColumnFooter,
    /// Corner below the row headers, beside the column footers.
    BottomLeft,
}

impl CellType {
    /// Panels that use the grid's data rows.
    pub fn uses_data_rows(self) -> bool {
        matches!(self, Self::Cell | Self::RowHeader)
    }

    /// Panels that use the grid's data columns.
    pub fn uses_data_columns(self) -> bool {
        matches!(self, Self::Cell | Self::ColumnHeader | Self::ColumnFooter)
    }
}

/// Which panels may merge adjacent cells with equal content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllowMerging {
    #[default]
    None,
    Cells,
    ColumnHeaders,
    RowHeaders,
    AllHeaders,
    All,
}

impl AllowMerging {
    fn cells(self) -> bool {
        matches!(self, Self::Cells | Self::All)
    }

    fn column_headers(self) -> bool {
        matches!(self, Self::ColumnHeaders | Self::AllHeaders | Self::All)
    }

    fn row_headers(self) -> bool {
        matches!(self, Self::RowHeaders | Self::AllHeaders | Self::All)
    }

    /// True if cells of `cell_type` panels may be merged under this setting.
    pub fn allows(self, cell_type: CellType) -> bool {
        match cell_type {
            CellType::Cell | CellType::ColumnFooter => self.cells(),
            CellType::ColumnHeader | CellType::TopLeft => self.column_headers(),
            CellType::RowHeader | CellType::BottomLeft => self.row_headers(),
        }
    }
}

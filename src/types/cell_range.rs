use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{format_cell_ref, parse_cell_range};
use crate::error::{GridError, Result};
use crate::layout::GridPanel;

/// A rectangular block of cells.
///
/// `(row, col)` is the anchor corner and `(row2, col2)` the opposite corner.
/// The corners are not ordered: `row` may be greater than `row2`. A range
/// with any coordinate below zero means "no range" (see [`CellRange::is_valid`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub row: i32,
    pub col: i32,
    pub row2: i32,
    pub col2: i32,
}

impl Default for CellRange {
    fn default() -> Self {
        Self::invalid()
    }
}

impl CellRange {
    /// Create a range from both corners.
    pub const fn new(row: i32, col: i32, row2: i32, col2: i32) -> Self {
        Self {
            row,
            col,
            row2,
            col2,
        }
    }

    /// Create a single-cell range.
    pub const fn cell(row: i32, col: i32) -> Self {
        Self::new(row, col, row, col)
    }

    /// The "no selection" range, `(-1, -1, -1, -1)`.
    pub const fn invalid() -> Self {
        Self::new(-1, -1, -1, -1)
    }

    /// Build a range from loosely typed coordinates.
    ///
    /// Every coordinate must be a finite whole number that fits an `i32`;
    /// anything else is an [`GridError::InvalidArgument`].
    pub fn from_f64(row: f64, col: f64, row2: f64, col2: f64) -> Result<Self> {
        Ok(Self::new(
            coerce_index("row", row)?,
            coerce_index("col", col)?,
            coerce_index("row2", row2)?,
            coerce_index("col2", col2)?,
        ))
    }

    /// Reinitialize all four coordinates.
    pub fn set_range(&mut self, row: i32, col: i32, row2: i32, col2: i32) {
        self.row = row;
        self.col = col;
        self.row2 = row2;
        self.col2 = col2;
    }

    /// Reinitialize as a single cell.
    pub fn set_cell(&mut self, row: i32, col: i32) {
        self.set_range(row, col, row, col);
    }

    /// Number of rows covered, saturating at `i32::MAX`.
    pub fn row_span(&self) -> i32 {
        span(self.row, self.row2)
    }

    /// Number of columns covered, saturating at `i32::MAX`.
    pub fn column_span(&self) -> i32 {
        span(self.col, self.col2)
    }

    pub fn top_row(&self) -> i32 {
        self.row.min(self.row2)
    }

    pub fn bottom_row(&self) -> i32 {
        self.row.max(self.row2)
    }

    pub fn left_col(&self) -> i32 {
        self.col.min(self.col2)
    }

    pub fn right_col(&self) -> i32 {
        self.col.max(self.col2)
    }

    /// Same rectangle with the anchor moved to the top-left corner.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.top_row(),
            self.left_col(),
            self.bottom_row(),
            self.right_col(),
        )
    }

    /// True if all four coordinates are non-negative.
    pub fn is_valid(&self) -> bool {
        self.row > -1 && self.col > -1 && self.row2 > -1 && self.col2 > -1
    }

    pub fn is_single_cell(&self) -> bool {
        self.row == self.row2 && self.col == self.col2
    }

    /// True if `other` lies entirely inside this range (edges inclusive).
    pub fn contains(&self, other: &CellRange) -> bool {
        other.top_row() >= self.top_row()
            && other.bottom_row() <= self.bottom_row()
            && other.left_col() >= self.left_col()
            && other.right_col() <= self.right_col()
    }

    /// True if the cell at `(row, col)` lies inside this range.
    pub fn contains_cell(&self, row: i32, col: i32) -> bool {
        self.contains_row(row) && self.contains_column(col)
    }

    pub fn contains_row(&self, row: i32) -> bool {
        row >= self.top_row() && row <= self.bottom_row()
    }

    pub fn contains_column(&self, col: i32) -> bool {
        col >= self.left_col() && col <= self.right_col()
    }

    /// True if the two ranges share at least one cell.
    ///
    /// Intervals are closed, so ranges touching on an edge row/column intersect.
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.intersects_row(other) && self.intersects_column(other)
    }

    /// True if the row intervals overlap.
    pub fn intersects_row(&self, other: &CellRange) -> bool {
        !(self.bottom_row() < other.top_row() || self.top_row() > other.bottom_row())
    }

    /// True if the column intervals overlap.
    pub fn intersects_column(&self, other: &CellRange) -> bool {
        !(self.right_col() < other.left_col() || self.left_col() > other.right_col())
    }

    /// Same rectangle regardless of which corner is the anchor.
    pub fn same_area(&self, other: &CellRange) -> bool {
        self.normalized() == other.normalized()
    }

    /// Total `(width, height)` of the range in `panel`, in pixels.
    ///
    /// Hidden rows and columns contribute nothing; an invalid range is `(0, 0)`.
    pub fn render_size(&self, panel: &GridPanel<'_>) -> (f32, f32) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        let rows = panel.rows();
        let cols = panel.columns();
        let height = (self.top_row()..=self.bottom_row())
            .filter_map(to_index)
            .map(|r| rows.render_size(r))
            .sum();
        let width = (self.left_col()..=self.right_col())
            .filter_map(to_index)
            .map(|c| cols.render_size(c))
            .sum();
        (width, height)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let corners = (
            u32::try_from(self.row),
            u32::try_from(self.col),
            u32::try_from(self.row2),
            u32::try_from(self.col2),
        );
        let (Ok(row), Ok(col), Ok(row2), Ok(col2)) = corners else {
            return f.write_str("#N/A");
        };
        if self.is_single_cell() {
            f.write_str(&format_cell_ref(row, col))
        } else {
            write!(
                f,
                "{}:{}",
                format_cell_ref(row, col),
                format_cell_ref(row2, col2)
            )
        }
    }
}

impl FromStr for CellRange {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let (row, col, row2, col2) =
            parse_cell_range(s).ok_or_else(|| GridError::CellRef(s.to_string()))?;
        let coord = |v: u32| i32::try_from(v).map_err(|_| GridError::CellRef(s.to_string()));
        Ok(Self::new(coord(row)?, coord(col)?, coord(row2)?, coord(col2)?))
    }
}

fn span(a: i32, b: i32) -> i32 {
    i32::try_from(a.abs_diff(b))
        .unwrap_or(i32::MAX)
        .saturating_add(1)
}

/// Convert a range coordinate to a collection index; negative means "none".
pub(crate) fn to_index(i: i32) -> Option<usize> {
    usize::try_from(i).ok()
}

/// Convert a collection index to a range coordinate.
pub(crate) fn to_coord(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}

/// Last valid coordinate for a collection of `len` items (`-1` when empty).
pub(crate) fn last_coord(len: usize) -> i32 {
    to_coord(len) - 1
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn coerce_index(name: &str, value: f64) -> Result<i32> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(GridError::invalid(format!(
            "{name} must be an integer, got {value}"
        )));
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(GridError::invalid(format!("{name} is out of range: {value}")));
    }
    Ok(value as i32)
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
    use test_case::test_case;

    #[test]
    fn test_default_is_invalid() {
        let rng = CellRange::default();
        assert_eq!(rng, CellRange::new(-1, -1, -1, -1));
        assert!(!rng.is_valid());
    }

    #[test]
    fn test_spans_ignore_corner_order() {
        let rng = CellRange::new(5, 4, 2, 1);
        assert_eq!(rng.row_span(), 4);
        assert_eq!(rng.column_span(), 4);
        assert_eq!(rng.top_row(), 2);
        assert_eq!(rng.bottom_row(), 5);
        assert_eq!(rng.left_col(), 1);
        assert_eq!(rng.right_col(), 4);
        assert_eq!(rng.normalized(), CellRange::new(2, 1, 5, 4));
    }

    #[test]
    fn test_spans_saturate_at_extremes() {
        assert_eq!(CellRange::new(i32::MIN, 0, i32::MAX, 0).row_span(), i32::MAX);
        assert_eq!(CellRange::new(0, i32::MAX, 0, i32::MIN).column_span(), i32::MAX);
        assert_eq!(CellRange::new(0, 0, i32::MAX - 1, 0).row_span(), i32::MAX);
        assert_eq!(CellRange::invalid().row_span(), 1);
    }

    #[test]
    fn test_set_range() {
        let mut rng = CellRange::cell(1, 1);
        rng.set_range(3, 4, 0, 0);
        assert_eq!(rng, CellRange::new(3, 4, 0, 0));
        rng.set_cell(7, 2);
        assert!(rng.is_single_cell());
        assert_eq!(rng.row2, 7);
    }

    #[test_case(0.0, 1.0, 2.0, 3.0, true; "whole numbers")]
    #[test_case(-1.0, -1.0, -1.0, -1.0, true; "invalid sentinel")]
    #[test_case(0.5, 1.0, 2.0, 3.0, false; "fractional row")]
    #[test_case(0.0, f64::NAN, 2.0, 3.0, false; "nan column")]
    #[test_case(0.0, 1.0, f64::INFINITY, 3.0, false; "infinite row2")]
    #[test_case(0.0, 1.0, 2.0, 1e12, false; "too large")]
    fn test_from_f64(row: f64, col: f64, row2: f64, col2: f64, ok: bool) {
        let result = CellRange::from_f64(row, col, row2, col2);
        assert_eq!(result.is_ok(), ok, "{result:?}");
        if let Err(err) = result {
            assert!(matches!(err, GridError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_validity() {
        assert!(CellRange::cell(0, 0).is_valid());
        assert!(!CellRange::new(0, 0, -1, 3).is_valid());
        assert!(!CellRange::new(2, -1, 2, 3).is_valid());
    }

    #[test]
    fn test_contains() {
        let outer = CellRange::new(4, 4, 1, 1);
        assert!(outer.contains(&CellRange::new(2, 2, 3, 3)));
        assert!(outer.contains(&outer));
        assert!(outer.contains(&CellRange::cell(1, 4)));
        assert!(!outer.contains(&CellRange::new(0, 2, 2, 2)));
        assert!(outer.contains_cell(4, 1));
        assert!(!outer.contains_cell(5, 1));
        assert!(outer.contains_row(3));
        assert!(!outer.contains_column(0));
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = CellRange::new(0, 0, 2, 2);
        let b = CellRange::new(2, 2, 4, 4);
        let c = CellRange::new(3, 0, 4, 1);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.intersects_column(&c));
        assert!(!a.intersects_row(&c));
    }

    #[test]
    fn test_same_area() {
        let a = CellRange::new(1, 1, 3, 3);
        let b = CellRange::new(3, 3, 1, 1);
        assert_ne!(a, b);
        assert!(a.same_area(&b));
        assert!(a.contains(&b) && b.contains(&a));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellRange::cell(0, 0).to_string(), "A1");
        assert_eq!(CellRange::new(2, 1, 6, 3).to_string(), "B3:D7");
        assert_eq!(CellRange::invalid().to_string(), "#N/A");
    }

    #[test]
    fn test_from_str() {
        let rng: CellRange = "B3:D7".parse().unwrap();
        assert_eq!(rng, CellRange::new(2, 1, 6, 3));
        let rng: CellRange = "$C$4".parse().unwrap();
        assert_eq!(rng, CellRange::cell(3, 2));
        let err = "nope".parse::<CellRange>().unwrap_err();
        assert!(matches!(err, GridError::CellRef(_)));
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_string(&CellRange::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"row":1,"col":2,"row2":3,"col2":4}"#);
        let back: CellRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellRange::new(1, 2, 3, 4));
        assert!(serde_json::from_str::<CellRange>(r#"{"row":1.5,"col":2,"row2":3,"col2":4}"#).is_err());
    }

    #[test]
    fn test_index_helpers() {
        assert_eq!(to_index(-1), None);
        assert_eq!(to_index(3), Some(3));
        assert_eq!(to_coord(5), 5);
        assert_eq!(last_coord(0), -1);
        assert_eq!(last_coord(10), 9);
    }
}

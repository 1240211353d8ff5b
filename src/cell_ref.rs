//! Utilities for A1-style cell references ("B3", "$B$3", "B3:D7").
//!
//! Rows and columns are 0-indexed on the Rust side and 1-based / lettered in
//! the text form.

/// Parse a cell reference like "A1" into `(row, col)`, both 0-indexed.
///
/// Column letters must precede row digits; `$` anchors are ignored.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Parse "A1:B10" or "A1" into `(row, col, row2, col2)`.
///
/// The corners are kept in the order written, so "B10:A1" anchors at B10.
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (row, col) = parse_cell_ref(start)?;
        let (row2, col2) = parse_cell_ref(end)?;
        Some((row, col, row2, col2))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some((row, col, row, col))
    }
}

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        // n % 26 < 26, always a valid ASCII offset
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// Format a 0-based `(row, col)` pair as "A1".
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

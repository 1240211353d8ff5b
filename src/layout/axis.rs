//! Row and column collections with pre-computed positions.
//!
//! Positions are cumulative render sizes, rebuilt after every structural
//! change so that position lookups stay O(log n) on the hot path.

use crate::types::{to_coord, to_index, AxisItem, Column, Row, SelMove};

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 28.0;

/// An ordered run of rows or columns.
///
/// The first `frozen` items stay pinned while the grid scrolls.
#[derive(Debug, Clone)]
pub struct RowColCollection<T> {
    items: Vec<T>,
    frozen: usize,
    default_size: f32,
    /// `positions[i]` = start of item i; one trailing entry holds the total size
    positions: Vec<f32>,
}

/// The rows of a panel
pub type Rows = RowColCollection<Row>;

/// The columns of a panel
pub type Columns = RowColCollection<Column>;

impl<T: AxisItem> RowColCollection<T> {
    pub fn new(default_size: f32) -> Self {
        Self::from_items(Vec::new(), default_size)
    }

    pub fn from_items(items: Vec<T>, default_size: f32) -> Self {
        let mut coll = Self {
            items,
            frozen: 0,
            default_size,
            positions: Vec::new(),
        };
        coll.update();
        coll
    }

    /// Recompute cumulative positions
    fn update(&mut self) {
        self.positions.clear();
        self.positions.reserve(self.items.len() + 1);
        let mut pos: f32 = 0.0;
        for item in &self.items {
            self.positions.push(pos);
            pos += Self::item_size(item, self.default_size);
        }
        self.positions.push(pos); // Final edge
    }

    fn item_size(item: &T, default_size: f32) -> f32 {
        if item.visible() {
            item.size().unwrap_or(default_size).max(0.0)
        } else {
            0.0
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.update();
    }

    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.update();
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.update();
        Some(item)
    }

    /// Drop every item from `len` on.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
        self.update();
    }

    /// Modify one item and refresh positions. Returns false if out of range.
    pub fn edit(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        f(item);
        self.update();
        true
    }

    pub fn default_size(&self) -> f32 {
        self.default_size
    }

    pub fn set_default_size(&mut self, size: f32) {
        self.default_size = size;
        self.update();
    }

    /// Number of leading items pinned during scrolling
    pub fn frozen(&self) -> usize {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: usize) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self, index: usize) -> bool {
        index < self.frozen
    }

    /// Start position of an item (the total size past the end)
    pub fn pos(&self, index: usize) -> f32 {
        self.positions
            .get(index.min(self.items.len()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Rendered size of an item (0 for hidden or out-of-range items)
    pub fn render_size(&self, index: usize) -> f32 {
        match (self.positions.get(index), self.positions.get(index + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Total size of all items
    pub fn total_size(&self) -> f32 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Total size of the frozen items
    pub fn frozen_size(&self) -> f32 {
        self.pos(self.frozen)
    }

    /// Visible item at a position along the axis.
    ///
    /// Positions before the start map to the first visible item and positions
    /// at or past the end map to the last one. Hidden items are never
    /// returned. Returns -1 when no item is visible.
    pub fn get_item_at(&self, position: f32) -> i32 {
        let len = self.items.len();
        let starts = self.positions.get(..len).unwrap_or(&[]);
        let position = position.max(0.0);
        let count = starts.partition_point(|&start| start <= position);
        self.first_visible((0..count.min(len)).rev()).unwrap_or(-1)
    }

    /// Index reached by moving from `index` with `mv`, skipping hidden items.
    ///
    /// Page moves travel `page_size` pixels. If no item qualifies the original
    /// index is returned. `SelMove::NextCell`/`PrevCell` behave like
    /// `Next`/`Prev` here; wrapping is done by the caller.
    pub fn get_next_cell(&self, index: i32, mv: SelMove, page_size: f32) -> i32 {
        let len = self.items.len();
        match mv {
            SelMove::Next | SelMove::NextCell => {
                let from = to_index(index).map_or(0, |i| i + 1);
                self.first_visible(from..len).unwrap_or(index)
            }
            SelMove::Prev | SelMove::PrevCell => {
                let Some(from) = to_index(index) else {
                    return index;
                };
                self.first_visible((0..from.min(len)).rev())
                    .unwrap_or(index)
            }
            SelMove::Home => self.first_visible(0..len).unwrap_or(index),
            SelMove::End => self.first_visible((0..len).rev()).unwrap_or(index),
            SelMove::NextPage => {
                let Some(i) = to_index(index).filter(|&i| i < len) else {
                    return self.get_next_cell(index, SelMove::Home, page_size);
                };
                let target = self.get_item_at(self.pos(i) + page_size);
                self.nearest_visible(target, SelMove::Prev)
                    .filter(|&t| t >= index)
                    .unwrap_or_else(|| self.get_next_cell(index, SelMove::End, page_size))
            }
            SelMove::PrevPage => {
                let Some(i) = to_index(index).filter(|&i| i < len) else {
                    return self.get_next_cell(index, SelMove::Home, page_size);
                };
                let target = self.get_item_at(self.pos(i) - page_size);
                self.nearest_visible(target, SelMove::Next)
                    .filter(|&t| t <= index)
                    .unwrap_or_else(|| self.get_next_cell(index, SelMove::Home, page_size))
            }
            SelMove::None => index,
        }
    }

    fn is_shown(&self, index: usize) -> bool {
        self.render_size(index) > 0.0
    }

    fn first_visible(&self, mut range: impl Iterator<Item = usize>) -> Option<i32> {
        range.find(|&i| self.is_shown(i)).map(to_coord)
    }

    /// `target` itself if shown, else the closest shown item in `fallback` direction.
    fn nearest_visible(&self, target: i32, fallback: SelMove) -> Option<i32> {
        let t = to_index(target)?;
        if self.is_shown(t) {
            return Some(target);
        }
        let len = self.items.len();
        match fallback {
            SelMove::Prev => self
                .first_visible((0..t).rev())
                .or_else(|| self.first_visible(t..len)),
            _ => self
                .first_visible(t..len)
                .or_else(|| self.first_visible((0..t).rev())),
        }
    }
}

impl Rows {
    /// Set a row's ListBox flag without touching positions.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> bool {
        match self.items.get_mut(index) {
            Some(row) => {
                row.is_selected = selected;
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter_mut_selected(&mut self) -> impl Iterator<Item = (usize, &mut bool)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, row)| (i, &mut row.is_selected))
    }
}

impl Default for Rows {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::new(DEFAULT_COL_WIDTH)
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
    use test_case::test_case;

    fn rows(n: usize) -> Rows {
        Rows::from_items((0..n).map(|_| Row::new()).collect(), 20.0)
    }

    #[test]
    fn test_positions() {
        let mut coll = rows(5);
        coll.edit(1, |r| r.size = Some(50.0));
        coll.edit(3, |r| r.visible = false);

        assert_eq!(coll.pos(0), 0.0);
        assert_eq!(coll.pos(1), 20.0);
        assert_eq!(coll.pos(2), 70.0);
        assert_eq!(coll.render_size(3), 0.0);
        assert_eq!(coll.pos(4), 90.0);
        assert_eq!(coll.total_size(), 110.0);
        assert_eq!(coll.render_size(99), 0.0);
        assert_eq!(coll.pos(99), 110.0);
    }

    #[test]
    fn test_frozen_size() {
        let mut coll = rows(5);
        assert_eq!(coll.frozen_size(), 0.0);
        coll.set_frozen(2);
        assert!(coll.is_frozen(1));
        assert!(!coll.is_frozen(2));
        assert_eq!(coll.frozen_size(), 40.0);
        coll.set_frozen(10);
        assert_eq!(coll.frozen_size(), 100.0);
    }

    #[test_case(-5.0, 0; "before start")]
    #[test_case(0.0, 0; "start")]
    #[test_case(19.9, 0; "inside first")]
    #[test_case(20.0, 1; "boundary belongs to next")]
    #[test_case(55.0, 2; "middle")]
    #[test_case(100.0, 4; "past end")]
    fn test_get_item_at(pos: f32, expected: i32) {
        assert_eq!(rows(5).get_item_at(pos), expected);
    }

    #[test]
    fn test_get_item_at_skips_hidden() {
        let mut coll = rows(5);
        coll.edit(2, |r| r.visible = false);
        // rows 2 and 3 both start at 40; the visible one wins
        assert_eq!(coll.get_item_at(40.0), 3);
        assert_eq!(Rows::default().get_item_at(10.0), -1);
    }

    #[test]
    fn test_get_item_at_hidden_ends() {
        let mut coll = rows(5);
        coll.edit(0, |r| r.visible = false);
        coll.edit(4, |r| r.visible = false);

        assert_eq!(coll.get_item_at(-5.0), 1);
        assert_eq!(coll.get_item_at(0.0), 1);
        assert_eq!(coll.get_item_at(coll.total_size()), 3);
        assert_eq!(coll.get_item_at(500.0), 3);

        for i in 0..5 {
            coll.edit(i, |r| r.visible = false);
        }
        assert_eq!(coll.get_item_at(0.0), -1);
        assert_eq!(coll.get_item_at(30.0), -1);
    }

    #[test]
    fn test_next_prev_skip_hidden() {
        let mut coll = rows(6);
        coll.edit(2, |r| r.visible = false);
        coll.edit(5, |r| r.visible = false);

        assert_eq!(coll.get_next_cell(1, SelMove::Next, 0.0), 3);
        assert_eq!(coll.get_next_cell(3, SelMove::Prev, 0.0), 1);
        assert_eq!(coll.get_next_cell(4, SelMove::Next, 0.0), 4);
        assert_eq!(coll.get_next_cell(0, SelMove::Prev, 0.0), 0);
        assert_eq!(coll.get_next_cell(3, SelMove::End, 0.0), 4);
        assert_eq!(coll.get_next_cell(3, SelMove::Home, 0.0), 0);
        assert_eq!(coll.get_next_cell(-1, SelMove::Next, 0.0), 0);
        assert_eq!(coll.get_next_cell(2, SelMove::None, 0.0), 2);
    }

    #[test]
    fn test_page_moves() {
        let coll = rows(100);
        assert_eq!(coll.get_next_cell(0, SelMove::NextPage, 200.0), 10);
        assert_eq!(coll.get_next_cell(10, SelMove::PrevPage, 200.0), 0);
        assert_eq!(coll.get_next_cell(95, SelMove::NextPage, 200.0), 99);
        assert_eq!(coll.get_next_cell(5, SelMove::PrevPage, 200.0), 0);
    }

    #[test]
    fn test_page_move_lands_on_visible() {
        let mut coll = rows(30);
        coll.edit(10, |r| r.visible = false);
        // 0 + 200px lands on hidden row 10's start, which resolves to row 11
        assert_eq!(coll.get_next_cell(0, SelMove::NextPage, 200.0), 11);
    }

    #[test]
    fn test_structural_changes_refresh_positions() {
        let mut coll = rows(3);
        coll.push(Row::new().with_size(10.0));
        assert_eq!(coll.total_size(), 70.0);
        coll.insert(0, Row::new().with_size(5.0));
        assert_eq!(coll.pos(1), 5.0);
        assert!(coll.remove(0).is_some());
        assert!(coll.remove(99).is_none());
        coll.truncate(1);
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.total_size(), 20.0);
    }

    #[test]
    fn test_selected_flag() {
        let mut coll = rows(3);
        assert!(coll.set_selected(1, true));
        assert!(coll.get(1).unwrap().is_selected);
        assert!(!coll.set_selected(9, true));
    }
}

use serde::{Deserialize, Serialize};

/// What a row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    /// A regular row bound to a data item (or to nothing).
    #[default]
    Data,
    /// A group header row at the given outline level.
    Group { level: u32 },
    /// The synthetic row used to start adding a new record.
    NewRowTemplate,
}

/// Aggregate shown by a column in group header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregate {
    #[default]
    None,
    Sum,
    Cnt,
    Avg,
    Max,
    Min,
    First,
    Last,
}

/// Properties shared by rows and columns, used by the axis collections.
pub trait AxisItem {
    /// Explicit size in pixels, or `None` for the collection default.
    fn size(&self) -> Option<f32>;
    fn visible(&self) -> bool;
}

/// A grid row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    pub visible: bool,
    pub allow_merging: bool,
    pub kind: RowKind,
    /// Index of the bound item in the data view (group index for group rows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_index: Option<usize>,
    /// ListBox membership flag, owned by the selection engine.
    #[serde(skip_serializing, skip_deserializing, default)]
    pub is_selected: bool,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            size: None,
            visible: true,
            allow_merging: false,
            kind: RowKind::Data,
            data_index: None,
            is_selected: false,
        }
    }
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// A data row bound to item `index` of the data view.
    pub fn bound(index: usize) -> Self {
        Self {
            data_index: Some(index),
            ..Self::default()
        }
    }

    /// A group header row. `group` is the group it represents, if any.
    pub fn group(level: u32, group: Option<usize>) -> Self {
        Self {
            kind: RowKind::Group { level },
            data_index: group,
            ..Self::default()
        }
    }

    pub fn new_row_template() -> Self {
        Self {
            kind: RowKind::NewRowTemplate,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_merging(mut self, allow: bool) -> Self {
        self.allow_merging = allow;
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, RowKind::Group { .. })
    }

    /// Group row that actually represents a group (not a placeholder).
    pub fn is_bound_group(&self) -> bool {
        self.is_group() && self.data_index.is_some()
    }

    pub fn is_new_row_template(&self) -> bool {
        self.kind == RowKind::NewRowTemplate
    }

    /// Group rows and the new-row template never take part in cell merges.
    pub fn is_synthetic(&self) -> bool {
        self.kind != RowKind::Data
    }
}

impl AxisItem for Row {
    fn size(&self) -> Option<f32> {
        self.size
    }

    fn visible(&self) -> bool {
        self.visible
    }
}

/// A grid column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    /// Name of the bound field.
    pub binding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    pub visible: bool,
    pub allow_merging: bool,
    pub aggregate: Aggregate,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            binding: String::new(),
            size: None,
            visible: true,
            allow_merging: false,
            aggregate: Aggregate::None,
        }
    }
}

impl Column {
    pub fn new(binding: impl Into<String>) -> Self {
        Self {
            binding: binding.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_merging(mut self, allow: bool) -> Self {
        self.allow_merging = allow;
        self
    }

    #[must_use]
    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }
}

impl AxisItem for Column {
    fn size(&self) -> Option<f32> {
        self.size
    }

    fn visible(&self) -> bool {
        self.visible
    }
}

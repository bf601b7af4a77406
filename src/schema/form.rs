//! Grouped (tabbed) form layout
//!
//! Projects a nested schema into tab levels, one level per tab group nesting depth.
//! Tabbed UIs unmount inactive panels, so the layout also carries the fully flattened
//! field list to be mounted hidden; it keeps every field registered for validation no
//! matter which tab is active.

use super::flatten::flatten;
use crate::models::{ColumnSchema, TabPlacement, ValueType};
use serde::Serialize;
use serde_json::Value;

/// One tab of a tab level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabItem {
    pub key: String,
    pub label: String,
    /// Direct leaves of the group, rendered as one embedded form
    pub fields: Vec<ColumnSchema>,
    /// Child groups, rendered as the next tab level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<TabSet>,
}

/// A tab strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSet {
    pub placement: TabPlacement,
    pub items: Vec<TabItem>,
}

/// Renderable layout of a grouped form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormLayout {
    /// Flattened instance mounted hidden for field registration
    pub hidden: Vec<ColumnSchema>,
    /// Top-level leaves outside any group
    pub fields: Vec<ColumnSchema>,
    pub tabs: TabSet,
}

impl FormLayout {
    /// Build the layout for `columns` against the current form values.
    pub fn build(columns: &[ColumnSchema], record: &Value) -> Self {
        let (groups, fields): (Vec<_>, Vec<_>) = columns
            .iter()
            .cloned()
            .partition(|c| c.value_type == ValueType::TabGroup);

        Self {
            hidden: flatten(columns, record),
            fields,
            tabs: tab_set(&groups, record, TabPlacement::Top),
        }
    }

    /// Number of nested tab levels, the top strip included.
    pub fn depth(&self) -> usize {
        fn depth_of(set: &TabSet) -> usize {
            if set.items.is_empty() {
                return 0;
            }
            1 + set
                .items
                .iter()
                .filter_map(|item| item.nested.as_ref())
                .map(depth_of)
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.tabs)
    }
}

fn tab_set(groups: &[ColumnSchema], record: &Value, placement: TabPlacement) -> TabSet {
    let items = groups
        .iter()
        .map(|group| {
            let children = group.children(record);
            let (nested_groups, fields): (Vec<_>, Vec<_>) = children
                .iter()
                .cloned()
                .partition(|c| c.value_type == ValueType::TabGroup);

            let nested = (!nested_groups.is_empty())
                .then(|| tab_set(&nested_groups, record, placement.alternate()));

            TabItem {
                key: group
                    .group
                    .as_ref()
                    .map(|g| g.id.clone())
                    .or_else(|| group.data_index_id())
                    .unwrap_or_default(),
                label: group
                    .group
                    .as_ref()
                    .map(|g| g.title.clone())
                    .unwrap_or_else(|| "-".to_string()),
                fields,
                nested,
            }
        })
        .collect();

    TabSet { placement, items }
}

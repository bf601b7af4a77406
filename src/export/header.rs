//! Spreadsheet header generation
//!
//! Turns a column schema tree into a header matrix plus the ordered list of columns
//! each spreadsheet column maps to. `None` cells continue the nearest preceding label
//! and become merge ranges when the header is written.

use crate::models::{ColumnSchema, ValueType};
use serde::Serialize;
use serde_json::{Value, json};

/// Label of a tab group without a title.
pub const UNTITLED_GROUP: &str = "-";

/// Header matrix and column mappings of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderInfo {
    /// Header rows, all of the same width
    pub headers: Vec<Vec<Option<String>>>,
    /// Bound column for each spreadsheet column, in column order
    pub mappings: Vec<ColumnSchema>,
}

impl HeaderInfo {
    /// Number of header rows preceding the data rows.
    pub fn row_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of spreadsheet columns.
    pub fn width(&self) -> usize {
        self.headers.first().map_or(0, Vec::len)
    }
}

/// Build the header of `columns`.
///
/// Leaves take one row-0 cell. Tab groups put their title over the span of their children
/// and stack the children's header rows beneath it. AI triggers, asset fields and repeating
/// sub-forms have no spreadsheet column.
pub fn build_header(columns: &[ColumnSchema]) -> HeaderInfo {
    let empty = json!({});
    build_with(columns, &empty)
}

fn build_with(columns: &[ColumnSchema], context: &Value) -> HeaderInfo {
    let mut headers: Vec<Vec<Option<String>>> = vec![Vec::new()];
    let mut mappings = Vec::new();

    for column in columns {
        match column.value_type {
            ValueType::TabGroup => {
                let children = column.children(context);
                let inner = build_with(&children, context);
                let width = inner.width();
                if width == 0 {
                    continue;
                }

                let start = headers[0].len();
                for (i, child_row) in inner.headers.into_iter().enumerate() {
                    if headers.len() <= i + 1 {
                        headers.push(Vec::new());
                    }
                    let row = &mut headers[i + 1];
                    row.resize(start, None);
                    row.extend(child_row);
                }

                let label = column
                    .group
                    .as_ref()
                    .map(|g| g.title.clone())
                    .unwrap_or_else(|| UNTITLED_GROUP.to_string());
                headers[0].push(Some(label));
                headers[0].extend(std::iter::repeat_n(None, width - 1));

                mappings.extend(inner.mappings);
            }
            ValueType::Ai | ValueType::Assets | ValueType::FormList => {}
            ValueType::Text
            | ValueType::Textarea
            | ValueType::Digit
            | ValueType::Money
            | ValueType::Switch
            | ValueType::Date
            | ValueType::DateTime
            | ValueType::DateTimeRange
            | ValueType::Select
            | ValueType::Option
            | ValueType::ValidDateRange
            | ValueType::Department
            | ValueType::Employee => {
                headers[0].push(Some(column.title_or_default().to_string()));
                mappings.push(column.clone());
            }
        }
    }

    let width = headers[0].len();
    for row in headers.iter_mut() {
        row.resize(width, None);
    }

    HeaderInfo { headers, mappings }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(title: &str) -> ColumnSchema {
        ColumnSchema::leaf(title, title, ValueType::Text)
    }

    fn cells(row: &[&str]) -> Vec<Option<String>> {
        row.iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect()
    }

    #[test]
    fn test_flat_leaves() {
        let info = build_header(&[leaf("姓名"), leaf("工号")]);
        assert_eq!(info.headers, vec![cells(&["姓名", "工号"])]);
        assert_eq!(info.mappings.len(), 2);
    }

    #[test]
    fn test_group_spans_children() {
        let info = build_header(&[ColumnSchema::group("g", "证件", vec![leaf("a"), leaf("b")])]);
        assert_eq!(info.headers, vec![cells(&["证件", ""]), cells(&["a", "b"])]);
    }

    #[test]
    fn test_mixed_leaves_and_nested_groups() {
        let columns = vec![
            leaf("x"),
            ColumnSchema::group(
                "outer",
                "外",
                vec![
                    leaf("a"),
                    ColumnSchema::group("inner", "内", vec![leaf("b"), leaf("c")]),
                ],
            ),
            leaf("y"),
        ];
        let info = build_header(&columns);
        assert_eq!(
            info.headers,
            vec![
                cells(&["x", "外", "", "", "y"]),
                cells(&["", "a", "内", "", ""]),
                cells(&["", "", "b", "c", ""]),
            ]
        );
        let ids: Vec<_> = info.mappings.iter().filter_map(ColumnSchema::data_index_id).collect();
        assert_eq!(ids, vec!["x", "a", "b", "c", "y"]);
    }

    #[test]
    fn test_inner_rows_stay_under_their_group() {
        // The shallow group precedes the deep one; deep rows must not shift left.
        let columns = vec![
            ColumnSchema::group("g1", "G1", vec![leaf("a")]),
            ColumnSchema::group(
                "g2",
                "G2",
                vec![ColumnSchema::group("g3", "G3", vec![leaf("b")])],
            ),
        ];
        let info = build_header(&columns);
        assert_eq!(
            info.headers,
            vec![cells(&["G1", "G2"]), cells(&["a", "G3"]), cells(&["", "b"])]
        );
    }

    #[test]
    fn test_excluded_types_and_empty_groups() {
        let columns = vec![
            ColumnSchema::leaf("AI", "ai", ValueType::Ai),
            ColumnSchema::leaf("附件", "files", ValueType::Assets),
            ColumnSchema::leaf("驾驶记录", "records", ValueType::FormList),
            ColumnSchema::group("empty", "空", vec![]),
            leaf("name"),
        ];
        let info = build_header(&columns);
        assert_eq!(info.headers, vec![cells(&["name"])]);
        assert_eq!(info.mappings.len(), 1);
    }

    #[test]
    fn test_untitled_group_label() {
        let mut group = ColumnSchema::group("g", "ignored", vec![leaf("a")]);
        group.group = None;
        let info = build_header(&[group]);
        assert_eq!(info.headers[0], cells(&["-"]));
    }
}

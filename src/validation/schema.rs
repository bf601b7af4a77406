//! Column schema validation
//!
//! Catches configuration mistakes before a schema reaches a form or a spreadsheet:
//! misconfigured AI fields, malformed tab groups, selects without options, and
//! duplicate or untitled columns.

use crate::ai::AiFieldConfig;
use crate::models::{ColumnSchema, ValueType};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;

/// Severity of a schema issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One finding of schema validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaIssue {
    pub severity: IssueSeverity,
    /// Titles from the root to the offending column, joined by ` / `
    pub location: String,
    pub message: String,
}

/// Result of schema validation.
#[derive(Debug, Default, Serialize)]
#[must_use = "validation results should be checked for errors"]
pub struct SchemaValidationResult {
    pub errors: Vec<SchemaIssue>,
    pub warnings: Vec<SchemaIssue>,
}

impl SchemaValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, severity: IssueSeverity, location: &[String], message: impl Into<String>) {
        let issue = SchemaIssue {
            severity,
            location: location.join(" / "),
            message: message.into(),
        };
        match severity {
            IssueSeverity::Error => self.errors.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
        }
    }
}

/// Check a schema tree. Computed children and enums are evaluated against an empty record.
pub fn validate_columns(columns: &[ColumnSchema]) -> SchemaValidationResult {
    let mut result = SchemaValidationResult::default();
    let mut seen = HashSet::new();
    let context = json!({});
    walk(columns, &context, &mut Vec::new(), &mut seen, &mut result);
    result
}

fn walk(
    columns: &[ColumnSchema],
    context: &Value,
    location: &mut Vec<String>,
    seen: &mut HashSet<String>,
    result: &mut SchemaValidationResult,
) {
    for (index, column) in columns.iter().enumerate() {
        let name = column
            .title
            .clone()
            .or_else(|| column.group.as_ref().map(|g| g.title.clone()))
            .or_else(|| column.data_index_id())
            .unwrap_or_else(|| format!("#{}", index + 1));
        location.push(name);

        match column.value_type {
            ValueType::TabGroup => {
                if column.group.is_none() {
                    result.push(IssueSeverity::Error, location, "Tab group has no group id/title");
                }
                if column.columns.is_none() {
                    result.push(IssueSeverity::Error, location, "Tab group has no columns");
                }
            }
            ValueType::Ai => {
                if let Err(e) = AiFieldConfig::from_column(column) {
                    result.push(IssueSeverity::Error, location, e.to_string());
                }
            }
            ValueType::Select if column.value_enum.is_none() => {
                result.push(IssueSeverity::Error, location, "Select column has no valueEnum");
            }
            _ => {}
        }

        if column.has_children() {
            walk(&column.children(context), context, location, seen, result);
        } else {
            if let Some(id) = column.data_index_id()
                && !seen.insert(id.clone())
            {
                result.push(
                    IssueSeverity::Warning,
                    location,
                    format!("Duplicate dataIndex '{}', only the first column is used", id),
                );
            }
            if column.value_type.is_spreadsheet_cell() && column.title.is_none() {
                result.push(IssueSeverity::Warning, location, "Column has no title");
            }
        }

        location.pop();
    }
}

//! Bidirectional value codec
//!
//! Converts record values to their human/spreadsheet text form (`to_external`) and
//! back (`to_internal`), one rule per value type. Conversion is sparse: absent or null
//! values are skipped, and a value that cannot be converted drops only its own field.

use super::dates::{format_date, format_date_time, parse_day};
use crate::backend::{BackendResult, DepartmentSource};
use crate::models::record::{get_path, is_absent, set_path, stringify};
use crate::models::{
    ColumnSchema, DepartmentDirectory, LONG_TERM_LABEL, LONG_TERM_SENTINEL, ValueType,
};
use crate::schema::flatten;
use serde_json::{Map, Value};
use tracing::debug;

/// Codec bound to a department collaborator.
///
/// The department snapshot is fetched once per conversion call, and only when the
/// flattened schema contains a `department` leaf. A failed fetch fails the call; callers
/// that tolerate missing departments fall back to [`encode_record`] / [`decode_record`].
pub struct ColumnCodec<'a> {
    departments: &'a dyn DepartmentSource,
}

impl<'a> ColumnCodec<'a> {
    pub fn new(departments: &'a dyn DepartmentSource) -> Self {
        Self { departments }
    }

    /// Convert a record to its external (export / parameter) form.
    pub async fn to_external(
        &self,
        columns: &[ColumnSchema],
        record: &Value,
    ) -> BackendResult<Value> {
        let leaves = flatten(columns, record);
        let directory = self.directory_for(&leaves).await?;
        Ok(encode_leaves(&leaves, record, &directory))
    }

    /// Convert an external (imported) row back to form values.
    pub async fn to_internal(
        &self,
        columns: &[ColumnSchema],
        external: &Value,
    ) -> BackendResult<Value> {
        let leaves = flatten(columns, external);
        let directory = self.directory_for(&leaves).await?;
        Ok(decode_leaves(&leaves, external, &directory))
    }

    async fn directory_for(&self, leaves: &[ColumnSchema]) -> BackendResult<DepartmentDirectory> {
        if !leaves
            .iter()
            .any(|c| c.value_type == ValueType::Department)
        {
            return Ok(DepartmentDirectory::default());
        }

        let departments = self.departments.fetch_departments().await?;
        debug!("Fetched {} departments for conversion", departments.len());
        Ok(DepartmentDirectory::new(departments))
    }
}

/// Synchronous `to_external` against an already fetched department snapshot.
pub fn encode_record(
    columns: &[ColumnSchema],
    record: &Value,
    directory: &DepartmentDirectory,
) -> Value {
    encode_leaves(&flatten(columns, record), record, directory)
}

/// Synchronous `to_internal` against an already fetched department snapshot.
pub fn decode_record(
    columns: &[ColumnSchema],
    external: &Value,
    directory: &DepartmentDirectory,
) -> Value {
    decode_leaves(&flatten(columns, external), external, directory)
}

fn encode_leaves(leaves: &[ColumnSchema], record: &Value, directory: &DepartmentDirectory) -> Value {
    convert_leaves(leaves, record, |column, value| {
        encode_value(column, value, record, directory)
    })
}

fn decode_leaves(leaves: &[ColumnSchema], external: &Value, directory: &DepartmentDirectory) -> Value {
    convert_leaves(leaves, external, |column, value| {
        decode_value(column, value, external, directory)
    })
}

fn convert_leaves<F>(leaves: &[ColumnSchema], source: &Value, mut convert: F) -> Value
where
    F: FnMut(&ColumnSchema, &Value) -> Option<Value>,
{
    let mut result = Value::Object(Map::new());

    for column in leaves {
        let Some(data_index) = column.data_index.as_ref().filter(|i| !i.is_empty()) else {
            continue;
        };
        let path = data_index.segments();
        let value = get_path(source, &path);
        if is_absent(value) {
            continue;
        }
        let Some(value) = value else { continue };

        if let Some(converted) = convert(column, value) {
            set_path(&mut result, &path, converted);
        }
    }

    result
}

/// External form of one field value; `None` omits the field.
pub fn encode_value(
    column: &ColumnSchema,
    value: &Value,
    record: &Value,
    directory: &DepartmentDirectory,
) -> Option<Value> {
    match column.value_type {
        ValueType::ValidDateRange => Some(Value::String(encode_date_range(value))),
        ValueType::Date => parse_day(value)
            .ok()
            .map(|dt| Value::String(format_date(&dt))),
        ValueType::DateTime => parse_day(value)
            .ok()
            .map(|dt| Value::String(format_date_time(&dt))),
        ValueType::Select => column
            .value_enum
            .as_ref()?
            .label_of(record, &stringify(value))
            .map(Value::String),
        ValueType::Department => directory.label_for(&stringify(value)).map(Value::String),
        ValueType::Text
        | ValueType::Textarea
        | ValueType::Digit
        | ValueType::Money
        | ValueType::Switch
        | ValueType::DateTimeRange
        | ValueType::Option
        | ValueType::Employee
        | ValueType::Assets
        | ValueType::Ai
        | ValueType::FormList
        | ValueType::TabGroup => Some(Value::String(stringify(value))),
    }
}

/// Internal form of one external field value; `None` leaves the field unset.
pub fn decode_value(
    column: &ColumnSchema,
    value: &Value,
    external: &Value,
    directory: &DepartmentDirectory,
) -> Option<Value> {
    match column.value_type {
        ValueType::ValidDateRange => Some(Value::Array(
            decode_date_range(value)
                .into_iter()
                .map(Value::String)
                .collect(),
        )),
        // Unparseable dates keep the typed text so the user can correct it in the form
        ValueType::Date => Some(
            parse_day(value)
                .map(|dt| Value::String(format_date(&dt)))
                .unwrap_or_else(|_| value.clone()),
        ),
        ValueType::DateTime => Some(
            parse_day(value)
                .map(|dt| Value::String(format_date_time(&dt)))
                .unwrap_or_else(|_| value.clone()),
        ),
        ValueType::Select => match &column.value_enum {
            Some(value_enum) => value_enum
                .key_of(external, &stringify(value))
                .map(Value::String),
            None => Some(value.clone()),
        },
        ValueType::Department => directory.resolve(&stringify(value)).map(Value::String),
        ValueType::Text
        | ValueType::Textarea
        | ValueType::Digit
        | ValueType::Money
        | ValueType::Switch
        | ValueType::DateTimeRange
        | ValueType::Option
        | ValueType::Employee
        | ValueType::Assets
        | ValueType::Ai
        | ValueType::FormList
        | ValueType::TabGroup => Some(Value::String(stringify(value))),
    }
}

fn is_long_term(text: &str) -> bool {
    text == LONG_TERM_SENTINEL || text == LONG_TERM_LABEL
}

fn format_endpoint(value: &Value) -> Option<String> {
    parse_day(value).ok().map(|dt| format_date(&dt))
}

/// `"<start>"`, `"<start> ~ 长期"` or `"<start> ~ <end>"`.
///
/// Unparseable starts render empty, an unparseable end falls back to the start alone.
pub fn encode_date_range(value: &Value) -> String {
    let Value::Array(parts) = value else {
        return String::new();
    };

    match parts.as_slice() {
        [start] => format_endpoint(start).unwrap_or_default(),
        [start, end] => {
            let start = format_endpoint(start).unwrap_or_default();
            let end_text = stringify(end);
            let end_text = end_text.trim();
            if is_long_term(end_text) {
                format!("{} ~ {}", start, LONG_TERM_LABEL)
            } else {
                match format_endpoint(&Value::String(end_text.to_string())) {
                    Some(end) => format!("{} ~ {}", start, end),
                    None => start,
                }
            }
        }
        _ => String::new(),
    }
}

/// Parse `"A ~ B"` / `"A ~ 长期"` back into endpoints, dropping unparseable segments.
pub fn decode_date_range(value: &Value) -> Vec<String> {
    let parts: Vec<String> = match value {
        Value::Array(items) => items.iter().map(|v| stringify(v).trim().to_string()).collect(),
        other => stringify(other)
            .split('~')
            .map(|s| s.trim().to_string())
            .collect(),
    };

    let mut endpoints = Vec::with_capacity(2);
    if let Some(start) = parts.first()
        && let Some(start) = format_endpoint(&Value::String(start.clone()))
    {
        endpoints.push(start);
    }
    if let Some(end) = parts.get(1) {
        if is_long_term(end) {
            endpoints.push(LONG_TERM_SENTINEL.to_string());
        } else if let Some(end) = format_endpoint(&Value::String(end.clone())) {
            endpoints.push(end);
        }
    }
    endpoints
}

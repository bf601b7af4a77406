//! Workbook writers
//!
//! - Import templates: the header matrix of a schema with its merge ranges
//! - Parameter listings: `id` / `name` pairs of every exportable field, used when
//!   designing server-side export templates

use super::ExportError;
use super::header::build_header;
use super::merge::compute_merges;
use crate::models::ColumnSchema;
use crate::schema::flatten;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub const DEFAULT_IMPORT_SHEET: &str = "import";
pub const DEFAULT_KV_SHEET: &str = "info";

/// Timestamp format used in generated file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// One row of the parameter listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    /// Normalized data index (path segments joined by `.`)
    pub id: String,
    pub name: String,
}

/// Write the import template of `columns` and return the workbook bytes.
pub fn write_import_template(
    columns: &[ColumnSchema],
    sheet_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let header = build_header(columns);
    let merges = compute_merges(&header.headers);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    for (r, row) in header.headers.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if let Some(text) = cell {
                worksheet.write_string_with_format(r as u32, c as u16, text, &format)?;
            }
        }
    }

    for merge in &merges {
        let text = header.headers[merge.start.row][merge.start.col]
            .as_deref()
            .unwrap_or_default();
        worksheet.merge_range(
            merge.start.row as u32,
            merge.start.col as u16,
            merge.end.row as u32,
            merge.end.col as u16,
            text,
            &format,
        )?;
    }

    info!(
        "Wrote import template with {} columns, {} header rows, {} merges",
        header.width(),
        header.row_count(),
        merges.len()
    );
    Ok(workbook.save_to_buffer()?)
}

/// Parameter listing: every bound, non-marker leaf as `{id, name}`.
pub fn column_kv_map(columns: &[ColumnSchema]) -> Vec<KvEntry> {
    flatten(columns, &json!({}))
        .into_iter()
        .filter(|column| !column.value_type.as_str().starts_with('#'))
        .filter_map(|column| {
            let id = column.data_index_id()?;
            Some(KvEntry {
                id,
                name: column.title.unwrap_or_default(),
            })
        })
        .collect()
}

/// Write a parameter listing with an `id`, `name` header row.
pub fn write_kv_sheet(entries: &[KvEntry], sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    worksheet.write_string(0, 0, "id")?;
    worksheet.write_string(0, 1, "name")?;
    for (i, entry) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &entry.id)?;
        worksheet.write_string(row, 1, &entry.name)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// `"<title> - 导入模板<timestamp>.xlsx"`, or without the title prefix.
pub fn import_template_file_name(title: Option<&str>, now: &NaiveDateTime) -> String {
    let prefix = title
        .filter(|t| !t.is_empty())
        .map(|t| format!("{} - ", t))
        .unwrap_or_default();
    format!("{}导入模板{}.xlsx", prefix, now.format(FILE_TIMESTAMP_FORMAT))
}

/// `"导出参数<timestamp>.xlsx"`
pub fn kv_file_name(now: &NaiveDateTime) -> String {
    format!("导出参数{}.xlsx", now.format(FILE_TIMESTAMP_FORMAT))
}

//! Import orchestration
//!
//! Maps spreadsheet rows onto the schema's header mappings, decodes them with the codec
//! and hands the decoded rows to the caller's sink. Import is two-phase so the caller can
//! preview the decoded rows before applying them.

use super::ImportError;
use super::xlsx::{CellGrid, read_first_sheet};
use crate::backend::{DepartmentSource, ImportCounts, ImportSink};
use crate::convert::{ColumnCodec, decode_record};
use crate::export::header::{HeaderInfo, build_header};
use crate::models::{ColumnSchema, DepartmentDirectory};
use crate::models::record::set_path;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Decoded rows awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPlan {
    pub header: HeaderInfo,
    pub rows: Vec<Value>,
}

impl ImportPlan {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Spreadsheet importer for one schema.
pub struct SpreadsheetImporter<'a> {
    columns: &'a [ColumnSchema],
}

impl<'a> SpreadsheetImporter<'a> {
    pub fn new(columns: &'a [ColumnSchema]) -> Self {
        Self { columns }
    }

    /// Header the uploaded sheet is expected to start with.
    pub fn header(&self) -> HeaderInfo {
        build_header(self.columns)
    }

    /// Read and decode the first sheet of a workbook.
    pub async fn prepare(
        &self,
        bytes: &[u8],
        departments: &dyn DepartmentSource,
    ) -> Result<ImportPlan, ImportError> {
        let grid = read_first_sheet(bytes)?;
        self.prepare_grid(&grid, departments).await
    }

    /// Decode an already read cell grid.
    ///
    /// Header rows are skipped, blank rows are ignored and cells beyond the mapped columns
    /// are dropped. When the department tree cannot be fetched the row is still decoded,
    /// with its department fields left unset.
    pub async fn prepare_grid(
        &self,
        grid: &CellGrid,
        departments: &dyn DepartmentSource,
    ) -> Result<ImportPlan, ImportError> {
        let header = self.header();
        if grid.len() < header.row_count() {
            return Err(ImportError::EmptyData);
        }

        let codec = ColumnCodec::new(departments);
        let mut rows = Vec::new();

        for (index, row) in grid.iter().enumerate().skip(header.row_count()) {
            if row.iter().all(Option::is_none) {
                debug!("Skipping blank row {}", index + 1);
                continue;
            }

            let mut external = Value::Object(Map::new());
            for (column, cell) in header.mappings.iter().zip(row) {
                let (Some(data_index), Some(cell)) = (column.data_index.as_ref(), cell) else {
                    continue;
                };
                if data_index.is_empty() {
                    continue;
                }
                set_path(&mut external, &data_index.segments(), cell.clone());
            }

            let decoded = match codec.to_internal(&header.mappings, &external).await {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!(
                        "Row {}: departments unavailable, department fields stay unset: {}",
                        index + 1,
                        e
                    );
                    decode_record(&header.mappings, &external, &DepartmentDirectory::default())
                }
            };
            rows.push(decoded);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyData);
        }

        info!("Decoded {} rows for import", rows.len());
        Ok(ImportPlan { header, rows })
    }
}

/// Hand the decoded rows to the sink and report its counts unchanged.
pub async fn apply(plan: ImportPlan, sink: &dyn ImportSink) -> Result<ImportCounts, ImportError> {
    let total = plan.rows.len();
    let counts = sink.import_rows(plan.rows).await?;
    info!(
        "Imported {} of {} rows ({} failed)",
        counts.success, total, counts.failure
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticDepartments;
    use crate::models::ValueType;
    use serde_json::json;

    fn columns() -> Vec<ColumnSchema> {
        vec![
            ColumnSchema::leaf("姓名", "name", ValueType::Text),
            ColumnSchema::leaf("入职日期", "joinedAt", ValueType::Date),
        ]
    }

    fn cell(v: Value) -> Option<Value> {
        Some(v)
    }

    #[tokio::test]
    async fn test_blank_rows_and_extra_cells() {
        let columns = columns();
        let grid = vec![
            vec![cell(json!("姓名")), cell(json!("入职日期"))],
            vec![None, None],
            vec![cell(json!("张三")), cell(json!("2024/3/1")), cell(json!("ignored"))],
        ];

        let plan = SpreadsheetImporter::new(&columns)
            .prepare_grid(&grid, &StaticDepartments::default())
            .await
            .unwrap();
        assert_eq!(plan.rows, vec![json!({"name": "张三", "joinedAt": "2024-03-01"})]);
    }

    #[tokio::test]
    async fn test_empty_data() {
        let columns = columns();
        let departments = StaticDepartments::default();
        let importer = SpreadsheetImporter::new(&columns);

        assert!(matches!(
            importer.prepare_grid(&vec![], &departments).await,
            Err(ImportError::EmptyData)
        ));
        let header_only = vec![vec![cell(json!("姓名")), cell(json!("入职日期"))]];
        assert!(matches!(
            importer.prepare_grid(&header_only, &departments).await,
            Err(ImportError::EmptyData)
        ));
    }
}

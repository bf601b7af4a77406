//! Export functionality
//!
//! - Spreadsheet header matrix and merge ranges
//! - Import template and parameter listing workbooks
//! - Template-rendered record export

pub mod header;
pub mod merge;
pub mod orchestrator;
pub mod xlsx;

use crate::backend::BackendError;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No export template available for {0}")]
    NoTemplates(String),
    #[error("Export cancelled")]
    Cancelled,
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}

// Re-export for convenience
pub use header::{HeaderInfo, build_header};
pub use merge::{CellRef, MergeRange, compute_merges};
pub use orchestrator::{ExportJob, ExportProgress, TemplateChoice, choose_template};
pub use xlsx::{
    DEFAULT_IMPORT_SHEET, DEFAULT_KV_SHEET, KvEntry, column_kv_map, import_template_file_name,
    kv_file_name, write_import_template, write_kv_sheet,
};

//! Import functionality
//!
//! - Reading uploaded workbooks
//! - Mapping sheet rows onto schema columns and decoding them

pub mod orchestrator;
pub mod xlsx;

use crate::backend::BackendError;

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No sheet found in workbook")]
    NoSheet,
    #[error("Import data is empty")]
    EmptyData,
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Spreadsheet(err.to_string())
    }
}

pub use orchestrator::{ImportPlan, SpreadsheetImporter, apply};
pub use xlsx::{CellGrid, cell_value, read_first_sheet};

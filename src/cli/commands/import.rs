//! Import command implementation

use super::{load_departments, load_schema, print_json};
use crate::backend::StaticDepartments;
use crate::cli::error::CliError;
use crate::import::SpreadsheetImporter;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the import command
#[derive(Debug, Clone)]
pub struct ImportArgs {
    pub schema: PathBuf,
    pub input: PathBuf,
    /// JSON department list used to resolve department labels
    pub departments: Option<PathBuf>,
}

/// Decode an uploaded workbook against a schema and print the rows
pub async fn handle_import(args: &ImportArgs) -> Result<Vec<Value>, CliError> {
    let columns = load_schema(&args.schema)?;
    let departments = match &args.departments {
        Some(path) => load_departments(path)?,
        None => StaticDepartments::default(),
    };

    if !args.input.exists() {
        return Err(CliError::FileNotFound(args.input.clone()));
    }
    let bytes = std::fs::read(&args.input)
        .map_err(|e| CliError::FileReadError(args.input.clone(), e.to_string()))?;

    let plan = SpreadsheetImporter::new(&columns)
        .prepare(&bytes, &departments)
        .await?;

    print_json(&plan.rows)?;
    Ok(plan.rows)
}

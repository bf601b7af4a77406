//! Schema document loading
//!
//! Column schemas are declared per page or document type and loaded once. Documents
//! are YAML or JSON arrays of columns; YAML is a superset of JSON, so both go through
//! `serde_yaml` unless the file extension says `.json`.

use crate::models::ColumnSchema;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Parse a schema document.
pub fn load_columns_from_str(content: &str) -> Result<Vec<ColumnSchema>> {
    serde_yaml::from_str(content).context("Failed to parse column schema document")
}

/// Load a schema document from disk.
pub fn load_columns_from_file(path: &Path) -> Result<Vec<ColumnSchema>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;

    let columns: Vec<ColumnSchema> = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON schema {}", path.display()))?
    } else {
        load_columns_from_str(&content)
            .with_context(|| format!("Failed to parse schema {}", path.display()))?
    };

    info!("Loaded {} columns from {}", columns.len(), path.display());
    Ok(columns)
}

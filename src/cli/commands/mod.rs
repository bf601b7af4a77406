//! CLI command implementations

pub mod export;
pub mod header;
pub mod import;
pub mod template;
pub mod validate;

use crate::backend::StaticDepartments;
use crate::cli::error::CliError;
use crate::models::{ColumnSchema, DepartmentInfo};
use crate::schema::load_columns_from_file;
use serde::Serialize;
use std::path::Path;

/// Load a column schema document
pub fn load_schema(path: &Path) -> Result<Vec<ColumnSchema>, CliError> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    load_columns_from_file(path).map_err(|e| CliError::SchemaError(format!("{:#}", e)))
}

/// Load a department snapshot from a JSON file
pub fn load_departments(path: &Path) -> Result<StaticDepartments, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    let departments: Vec<DepartmentInfo> = serde_json::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("Invalid departments file {}: {}", path.display(), e))
    })?;
    Ok(StaticDepartments(departments))
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Write command output to file
pub fn write_output(output_path: &Path, content: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.to_path_buf(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.to_path_buf(), e.to_string()))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_check_file_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        assert!(check_file_overwrite(&path, false).is_ok());

        write_output(&path, b"data").unwrap();
        assert!(check_file_overwrite(&path, false).is_err());
        assert!(check_file_overwrite(&path, true).is_ok());
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/out.xlsx");
        write_output(&path, b"data").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_load_missing_schema() {
        assert!(matches!(
            load_schema(Path::new("/nonexistent/schema.yaml")),
            Err(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_departments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("departments.json");
        std::fs::write(&path, r#"[{"id": "d1", "name": "安全部"}]"#).unwrap();
        let departments = load_departments(&path).unwrap();
        assert_eq!(departments.0.len(), 1);
        assert!(departments.0[0].positions.is_empty());
    }
}

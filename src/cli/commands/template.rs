//! Import template and parameter listing commands

use super::{check_file_overwrite, load_schema, write_output};
use crate::cli::error::CliError;
use crate::export::{
    column_kv_map, import_template_file_name, kv_file_name, write_import_template, write_kv_sheet,
};
use chrono::Local;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the template command
#[derive(Debug, Clone)]
pub struct TemplateArgs {
    pub schema: PathBuf,
    /// Defaults to `<title> - 导入模板<timestamp>.xlsx` in the current directory
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub sheet_name: String,
    pub force: bool,
}

/// Arguments for the params command
#[derive(Debug, Clone)]
pub struct ParamsArgs {
    pub schema: PathBuf,
    pub output: Option<PathBuf>,
    pub sheet_name: String,
    pub force: bool,
}

/// Write an empty import template for a schema
pub fn handle_template(args: &TemplateArgs) -> Result<PathBuf, CliError> {
    let columns = load_schema(&args.schema)?;
    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(import_template_file_name(
            args.title.as_deref(),
            &Local::now().naive_local(),
        ))
    });
    check_file_overwrite(&output, args.force)?;

    let bytes = write_import_template(&columns, &args.sheet_name)?;
    write_output(&output, &bytes)?;

    info!("Wrote import template to {}", output.display());
    println!("{}", output.display());
    Ok(output)
}

/// Write the id/name listing of a schema's leaf columns
pub fn handle_params(args: &ParamsArgs) -> Result<PathBuf, CliError> {
    let columns = load_schema(&args.schema)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(kv_file_name(&Local::now().naive_local())));
    check_file_overwrite(&output, args.force)?;

    let entries = column_kv_map(&columns);
    let bytes = write_kv_sheet(&entries, &args.sheet_name)?;
    write_output(&output, &bytes)?;

    info!("Wrote {} parameters to {}", entries.len(), output.display());
    println!("{}", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCHEMA: &str = r#"
- title: 车牌号
  dataIndex: plate
  valueType: text
- title: 登记日期
  dataIndex: registeredAt
  valueType: date
"#;

    #[test]
    fn test_template_and_params_written() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("vehicle.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();

        let template = handle_template(&TemplateArgs {
            schema: schema.clone(),
            output: Some(dir.path().join("template.xlsx")),
            title: None,
            sheet_name: "import".into(),
            force: false,
        })
        .unwrap();
        assert!(std::fs::metadata(&template).unwrap().len() > 0);

        let params = handle_params(&ParamsArgs {
            schema,
            output: Some(dir.path().join("params.xlsx")),
            sheet_name: "info".into(),
            force: false,
        })
        .unwrap();
        assert!(std::fs::metadata(&params).unwrap().len() > 0);
    }

    #[test]
    fn test_template_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("vehicle.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let output = dir.path().join("template.xlsx");
        std::fs::write(&output, b"existing").unwrap();

        let result = handle_template(&TemplateArgs {
            schema,
            output: Some(output),
            title: Some("车辆".into()),
            sheet_name: "import".into(),
            force: false,
        });
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}

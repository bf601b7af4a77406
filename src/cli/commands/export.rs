//! Export command implementation

use super::{check_file_overwrite, load_departments, load_schema, print_json, write_output};
use crate::backend::{ApiBackend, BackendResult, DepartmentSource, RecordSource};
use crate::cli::error::CliError;
use crate::config::SdkConfig;
use crate::export::{ExportJob, ExportProgress, TemplateChoice, choose_template};
use crate::models::TemplateIdentifier;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub schema: PathBuf,
    /// JSON array of records
    pub records: PathBuf,
    /// JSON object merged under every record
    pub context: Option<PathBuf>,
    pub departments: Option<PathBuf>,
    /// Template id to render with
    pub template: Option<String>,
    /// Document type whose templates are looked up
    pub identifier: Option<TemplateIdentifier>,
    /// Defaults to the file name returned by the renderer
    pub output: Option<PathBuf>,
    pub force: bool,
    pub cancel: CancellationToken,
}

impl ExportArgs {
    fn renders(&self) -> bool {
        self.template.is_some() || self.identifier.is_some()
    }
}

/// Records read from a local JSON file, keyed by their position.
struct FileRecords {
    records: Vec<Value>,
    context: Option<Value>,
}

#[async_trait]
impl RecordSource for FileRecords {
    async fn fetch_all_ids(&self) -> BackendResult<Vec<String>> {
        Ok((0..self.records.len()).map(|i| i.to_string()).collect())
    }

    async fn fetch(&self, key: &str) -> BackendResult<Option<Value>> {
        Ok(key
            .parse::<usize>()
            .ok()
            .and_then(|i| self.records.get(i))
            .filter(|record| !record.is_null())
            .cloned())
    }

    async fn extra_context(&self) -> BackendResult<Option<Value>> {
        Ok(self.context.clone())
    }
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

fn load_records(args: &ExportArgs) -> Result<FileRecords, CliError> {
    let records = match read_json(&args.records)? {
        Value::Array(records) => records,
        _ => {
            return Err(CliError::InvalidArgument(format!(
                "{} must contain a JSON array of records",
                args.records.display()
            )));
        }
    };
    let context = args.context.as_deref().map(read_json).transpose()?;
    Ok(FileRecords { records, context })
}

/// Resolve the template to render with.
async fn resolve_template(
    args: &ExportArgs,
    config: &SdkConfig,
    backend: &ApiBackend,
) -> Result<String, CliError> {
    if let Some(id) = &args.template {
        return Ok(id.clone());
    }
    let Some(identifier) = &args.identifier else {
        return Err(CliError::InvalidArgument(
            "Either --template or --identifier is required".to_string(),
        ));
    };

    match choose_template(backend, identifier).await? {
        TemplateChoice::Single(template) => {
            info!("Using template {} ({})", template.name, template.id);
            Ok(template.id)
        }
        TemplateChoice::Multiple(templates) => {
            let listing = templates
                .iter()
                .map(|t| format!("  {} ({})", t.id, t.name))
                .collect::<Vec<_>>()
                .join("\n");
            Err(CliError::InvalidArgument(format!(
                "Several templates are available for {}, pick one with --template:\n{}",
                config.export.template_label(identifier),
                listing
            )))
        }
    }
}

/// Convert records to their external form; render them through the API when a template
/// is requested, otherwise print the rows.
pub async fn handle_export(args: &ExportArgs, config: &SdkConfig) -> Result<(), CliError> {
    let columns = load_schema(&args.schema)?;
    let source = load_records(args)?;
    let local_departments = match &args.departments {
        Some(path) => Some(load_departments(path)?),
        None => None,
    };

    let job = ExportJob::new(&columns, Vec::new())
        .with_cancellation(args.cancel.clone())
        .on_progress(|progress| match progress {
            ExportProgress::Fetching { done, total } => {
                debug!("Converting record {}/{}", done + 1, total)
            }
            ExportProgress::Rendering => info!("Rendering export file"),
            _ => {}
        });

    if !args.renders() {
        let departments = local_departments.unwrap_or_default();
        let rows = job.collect_rows(&source, &departments).await?;
        return print_json(&rows);
    }

    let backend = ApiBackend::from_config(&config.api)?;
    let template_id = resolve_template(args, config, &backend).await?;
    let departments: &dyn DepartmentSource = match &local_departments {
        Some(departments) => departments,
        None => &backend,
    };

    let file = job.run(&source, departments, &backend, &template_id).await?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file.file_name));
    check_file_overwrite(&output, args.force)?;
    write_output(&output, &file.bytes)?;

    println!("{}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_records() {
        let source = FileRecords {
            records: vec![json!({"a": 1}), Value::Null, json!({"a": 3})],
            context: Some(json!({"org": "x"})),
        };
        assert_eq!(source.fetch_all_ids().await.unwrap(), vec!["0", "1", "2"]);
        assert_eq!(source.fetch("2").await.unwrap(), Some(json!({"a": 3})));
        assert_eq!(source.fetch("1").await.unwrap(), None);
        assert_eq!(source.fetch("9").await.unwrap(), None);
        assert_eq!(
            source.extra_context().await.unwrap(),
            Some(json!({"org": "x"}))
        );
    }

    #[tokio::test]
    async fn test_export_without_template_prints_rows() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(
            &schema,
            "- title: 名称\n  dataIndex: name\n  valueType: text\n",
        )
        .unwrap();
        let records = dir.path().join("records.json");
        std::fs::write(&records, r#"[{"name": "a"}]"#).unwrap();

        let args = ExportArgs {
            schema,
            records,
            context: None,
            departments: None,
            template: None,
            identifier: None,
            output: None,
            force: false,
            cancel: CancellationToken::new(),
        };
        assert!(handle_export(&args, &SdkConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_records_must_be_array() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records.json");
        std::fs::write(&records, r#"{"name": "a"}"#).unwrap();

        let args = ExportArgs {
            schema: dir.path().join("schema.yaml"),
            records,
            context: None,
            departments: None,
            template: None,
            identifier: None,
            output: None,
            force: false,
            cancel: CancellationToken::new(),
        };
        assert!(matches!(
            load_records(&args),
            Err(CliError::InvalidArgument(_))
        ));
    }
}

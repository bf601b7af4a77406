//! Export orchestration
//!
//! Fetches records one key at a time, converts them to their external form and submits
//! the whole batch to a template renderer. The batch is all-or-nothing: any fetch error
//! or a cancellation aborts before rendering, so no partial file is ever produced.

use super::ExportError;
use crate::backend::{
    DepartmentSource, RecordSource, RenderedFile, TemplateInfo, TemplateRenderer,
};
use crate::convert::ColumnCodec;
use crate::models::record::merge_shallow;
use crate::models::{ColumnSchema, TemplateIdentifier};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Progress of a running export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportProgress {
    /// Loading the shared context and the key list
    Preparing,
    /// About to fetch record `done + 1` of `total`
    Fetching { done: usize, total: usize },
    /// Waiting for the renderer
    Rendering,
    Finished { rows: usize },
}

/// Outcome of a template lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChoice {
    /// Exactly one template, used directly
    Single(TemplateInfo),
    /// Several templates; the caller picks one
    Multiple(Vec<TemplateInfo>),
}

/// Look up the templates of `identifier`.
pub async fn choose_template(
    renderer: &dyn TemplateRenderer,
    identifier: &TemplateIdentifier,
) -> Result<TemplateChoice, ExportError> {
    let mut templates = renderer.list_templates(identifier).await?;
    match templates.len() {
        0 => Err(ExportError::NoTemplates(identifier.to_string())),
        1 => Ok(TemplateChoice::Single(templates.remove(0))),
        _ => Ok(TemplateChoice::Multiple(templates)),
    }
}

type ProgressFn<'a> = Box<dyn Fn(ExportProgress) + Send + Sync + 'a>;

/// One export run.
pub struct ExportJob<'a> {
    columns: &'a [ColumnSchema],
    keys: Vec<String>,
    cancel: CancellationToken,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> ExportJob<'a> {
    /// Export `keys`; an empty list exports every record of the source.
    pub fn new(columns: &'a [ColumnSchema], keys: Vec<String>) -> Self {
        Self {
            columns,
            keys,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(ExportProgress) + Send + Sync + 'a,
    {
        self.progress = Some(Box::new(f));
        self
    }

    /// Token that aborts this job when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn report(&self, progress: ExportProgress) {
        if let Some(f) = &self.progress {
            f(progress);
        }
    }

    fn check_cancelled(&self) -> Result<(), ExportError> {
        if self.cancel.is_cancelled() {
            info!("Export cancelled");
            return Err(ExportError::Cancelled);
        }
        Ok(())
    }

    /// Fetch and convert every record without rendering.
    pub async fn collect_rows(
        &self,
        source: &dyn RecordSource,
        departments: &dyn DepartmentSource,
    ) -> Result<Vec<Value>, ExportError> {
        self.report(ExportProgress::Preparing);
        let extra = source.extra_context().await?;

        let keys = if self.keys.is_empty() {
            source.fetch_all_ids().await?
        } else {
            self.keys.clone()
        };

        let codec = ColumnCodec::new(departments);
        let total = keys.len();
        let mut rows = Vec::with_capacity(total);

        for (done, key) in keys.iter().enumerate() {
            self.check_cancelled()?;
            self.report(ExportProgress::Fetching { done, total });

            let Some(record) = source.fetch(key).await? else {
                debug!("Record {} not found, skipped", key);
                continue;
            };
            let record = merge_shallow(extra.as_ref(), record);
            rows.push(codec.to_external(self.columns, &record).await?);
        }

        Ok(rows)
    }

    /// Collect every row and render them with `template_id`.
    pub async fn run(
        &self,
        source: &dyn RecordSource,
        departments: &dyn DepartmentSource,
        renderer: &dyn TemplateRenderer,
        template_id: &str,
    ) -> Result<RenderedFile, ExportError> {
        let rows = self.collect_rows(source, departments).await?;

        self.check_cancelled()?;
        self.report(ExportProgress::Rendering);
        let file = renderer.render(template_id, &rows).await?;

        info!(
            "Exported {} rows with template {} to {}",
            rows.len(),
            template_id,
            file.file_name
        );
        self.report(ExportProgress::Finished { rows: rows.len() });
        Ok(file)
    }
}

//! Backend collaborator abstraction
//!
//! The transformation engine never talks to the REST service directly. Orchestrators and
//! the codec are handed implementations of the traits below:
//! - `DepartmentSource`: organization structure snapshot
//! - `RecordSource`: per-key record fetches for export
//! - `TemplateRenderer`: server-side export templates
//! - `ImportSink`: bulk import of decoded rows
//! - `AiExtractor`: AI-assisted field extraction
//!
//! An HTTP implementation is available behind the `api-backend` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ai::AiFormRequest;
use crate::models::{DepartmentInfo, TemplateIdentifier};

#[cfg(feature = "api-backend")]
pub mod api;

#[cfg(feature = "api-backend")]
pub use self::api::{ApiBackend, ApiResult};

/// Error type for collaborator operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Request could not be sent or the response could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success envelope
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for collaborator operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Export template offered by the rendering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
}

/// File produced by a template render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Outcome counts reported by an import sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    pub success: usize,
    pub failure: usize,
}

/// Source of the organization structure used by `department` columns.
#[async_trait]
pub trait DepartmentSource: Send + Sync {
    /// Fetch the flat department list
    async fn fetch_departments(&self) -> BackendResult<Vec<DepartmentInfo>>;
}

/// Source of records for export.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All record keys, used when the export is started without a selection
    async fn fetch_all_ids(&self) -> BackendResult<Vec<String>>;

    /// Fetch one record; `None` when the record no longer exists
    async fn fetch(&self, key: &str) -> BackendResult<Option<Value>>;

    /// Shared context merged under every exported record
    async fn extra_context(&self) -> BackendResult<Option<Value>> {
        Ok(None)
    }
}

/// Server-side template rendering.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    /// Templates registered for a document type
    async fn list_templates(
        &self,
        identifier: &TemplateIdentifier,
    ) -> BackendResult<Vec<TemplateInfo>>;

    /// Render external rows into a downloadable file
    async fn render(&self, template_id: &str, rows: &[Value]) -> BackendResult<RenderedFile>;
}

/// Destination of decoded import rows.
#[async_trait]
pub trait ImportSink: Send + Sync {
    async fn import_rows(&self, rows: Vec<Value>) -> BackendResult<ImportCounts>;
}

/// AI-assisted form extraction.
#[async_trait]
pub trait AiExtractor: Send + Sync {
    /// Extract field values from the referenced assets
    async fn extract(&self, request: &AiFormRequest) -> BackendResult<Map<String, Value>>;
}

/// Fixed department snapshot, for offline conversion and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDepartments(pub Vec<DepartmentInfo>);

#[async_trait]
impl DepartmentSource for StaticDepartments {
    async fn fetch_departments(&self) -> BackendResult<Vec<DepartmentInfo>> {
        Ok(self.0.clone())
    }
}

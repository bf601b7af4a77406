//! Compliance Forms SDK - column-schema driven form and spreadsheet engine
//!
//! Provides unified interfaces for:
//! - Column schema model and schema document loading
//! - Schema flattening and grouped form layout
//! - Bidirectional value conversion between form and wire/spreadsheet values
//! - Spreadsheet header generation, merge ranges, import templates
//! - Import and export orchestration against backend collaborators
//! - AI-assisted form filling
//! - Schema and identifier validation

pub mod ai;
pub mod backend;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod schema;
pub mod validation;

// Re-export commonly used types
#[cfg(feature = "api-backend")]
pub use backend::ApiBackend;
pub use backend::{
    AiExtractor, BackendError, BackendResult, DepartmentSource, ImportCounts, ImportSink,
    RecordSource, RenderedFile, StaticDepartments, TemplateInfo, TemplateRenderer,
};
pub use config::{ConfigError, SdkConfig};
pub use convert::{ColumnCodec, decode_record, encode_record};
pub use export::{
    ExportError, ExportJob, ExportProgress, HeaderInfo, MergeRange, TemplateChoice, build_header,
    choose_template, compute_merges,
};
pub use import::{ImportError, ImportPlan, SpreadsheetImporter};
pub use schema::{FormLayout, flatten, load_columns_from_file, load_columns_from_str};
pub use validation::{SchemaValidationResult, ValidationError, validate_columns};

// Re-export models
pub use models::enums::*;
pub use models::{
    Children, ColumnSchema, DataIndex, DepartmentDirectory, DepartmentInfo, TabGroup,
    TemplateIdentifier, ValueEnum,
};

// Re-export AI types
pub use ai::{AiError, AiFieldConfig, AiSuggestion};

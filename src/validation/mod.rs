//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifier fields (identity card numbers, unified social credit codes)
//! - Column schema configuration

pub mod input;
pub mod schema;

pub use input::{ValidationError, validate_id_card, validate_unified_social_credit_code};
pub use schema::{IssueSeverity, SchemaIssue, SchemaValidationResult, validate_columns};

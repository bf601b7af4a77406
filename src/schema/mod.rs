//! Schema operations
//!
//! - Flattening grouped schemas into leaf lists
//! - Grouped (tabbed) form layout
//! - Loading schema documents

pub mod flatten;
pub mod form;
pub mod loader;

pub use flatten::flatten;
pub use form::{FormLayout, TabItem, TabSet};
pub use loader::{load_columns_from_file, load_columns_from_str};

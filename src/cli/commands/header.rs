//! Header command implementation

use super::{load_schema, print_json};
use crate::cli::error::CliError;
use crate::export::{MergeRange, build_header, compute_merges};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the header command
#[derive(Debug, Clone)]
pub struct HeaderArgs {
    pub schema: PathBuf,
}

#[derive(Serialize)]
struct HeaderOutput {
    headers: Vec<Vec<Option<String>>>,
    mappings: Vec<String>,
    merges: Vec<MergeRange>,
}

/// Print the spreadsheet header of a schema with its merge ranges
pub fn handle_header(args: &HeaderArgs) -> Result<(), CliError> {
    let columns = load_schema(&args.schema)?;
    let header = build_header(&columns);
    let merges = compute_merges(&header.headers);

    let output = HeaderOutput {
        mappings: header
            .mappings
            .iter()
            .map(|c| c.data_index_id().unwrap_or_default())
            .collect(),
        headers: header.headers,
        merges,
    };
    print_json(&output)
}

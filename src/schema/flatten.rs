//! Schema flattening
//!
//! Collapses grouped schemas into the ordered leaf list used by plain form rendering,
//! parameter listings and the codec.

use crate::models::ColumnSchema;
use serde_json::Value;
use std::collections::HashSet;

/// Expand every group against `context` and return the leaves in pre-order.
///
/// Group nodes are dropped; only leaves survive. Leaves sharing a `dataIndex` keep the
/// first occurrence. Leaves without a `dataIndex` (markers such as AI triggers) are all
/// kept.
pub fn flatten(columns: &[ColumnSchema], context: &Value) -> Vec<ColumnSchema> {
    let mut leaves = Vec::new();
    expand(columns, context, &mut leaves);

    let mut seen = HashSet::new();
    leaves.retain(|column| match column.data_index_id() {
        Some(id) => seen.insert(id),
        None => true,
    });
    leaves
}

fn expand(columns: &[ColumnSchema], context: &Value, out: &mut Vec<ColumnSchema>) {
    for column in columns {
        if column.has_children() {
            expand(&column.children(context), context, out);
        } else {
            out.push(column.clone());
        }
    }
}

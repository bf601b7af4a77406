//! Spreadsheet header, merge and workbook tests

use compliance_forms_sdk::export::{
    CellRef, MergeRange, build_header, column_kv_map, compute_merges, write_import_template,
    write_kv_sheet,
};
use compliance_forms_sdk::import::read_first_sheet;
use compliance_forms_sdk::models::{ColumnSchema, ValueType};
use serde_json::json;

fn cell(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn range(start: (usize, usize), end: (usize, usize)) -> MergeRange {
    MergeRange {
        start: CellRef {
            row: start.0,
            col: start.1,
        },
        end: CellRef {
            row: end.0,
            col: end.1,
        },
    }
}

fn vehicle_columns() -> Vec<ColumnSchema> {
    vec![
        ColumnSchema::leaf("车牌号", "plate", ValueType::Text),
        ColumnSchema::group(
            "licence",
            "行驶证",
            vec![
                ColumnSchema::leaf("证号", "licence.no", ValueType::Text),
                ColumnSchema::leaf("有效期", "licence.validity", ValueType::ValidDateRange),
            ],
        ),
        ColumnSchema::leaf("附件", "files", ValueType::Assets),
    ]
}

#[test]
fn test_block_merge_has_priority() {
    let grid = vec![vec![cell("A"), None], vec![None, None]];
    assert_eq!(compute_merges(&grid), vec![range((0, 0), (1, 1))]);
}

#[test]
fn test_group_spans_its_children() {
    let columns = vec![ColumnSchema::group(
        "g",
        "分组",
        vec![
            ColumnSchema::leaf("甲", "a", ValueType::Text),
            ColumnSchema::leaf("乙", "b", ValueType::Text),
        ],
    )];

    let header = build_header(&columns);
    assert_eq!(
        header.headers,
        vec![vec![cell("分组"), None], vec![cell("甲"), cell("乙")]]
    );
    assert_eq!(header.row_count(), 2);
    assert_eq!(header.width(), 2);
    assert_eq!(compute_merges(&header.headers), vec![range((0, 0), (0, 1))]);
}

#[test]
fn test_leaf_beside_group_merges_down() {
    let header = build_header(&vehicle_columns());
    assert_eq!(
        header.headers,
        vec![
            vec![cell("车牌号"), cell("行驶证"), None],
            vec![None, cell("证号"), cell("有效期")],
        ]
    );

    let mapped: Vec<_> = header
        .mappings
        .iter()
        .filter_map(ColumnSchema::data_index_id)
        .collect();
    assert_eq!(mapped, vec!["plate", "licence.no", "licence.validity"]);

    assert_eq!(
        compute_merges(&header.headers),
        vec![range((0, 0), (1, 0)), range((0, 1), (0, 2))]
    );
}

#[test]
fn test_import_template_is_readable() {
    let bytes = write_import_template(&vehicle_columns(), "import").unwrap();
    let grid = read_first_sheet(&bytes).unwrap();

    assert_eq!(grid.len(), 2);
    assert_eq!(grid[0][0], Some(json!("车牌号")));
    assert_eq!(grid[0][1], Some(json!("行驶证")));
    assert_eq!(grid[1][1], Some(json!("证号")));
    assert_eq!(grid[1][2], Some(json!("有效期")));
}

#[test]
fn test_parameter_listing() {
    let entries = column_kv_map(&vehicle_columns());
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    // Asset fields have no spreadsheet value
    assert_eq!(ids, vec!["plate", "licence.no", "licence.validity"]);

    let bytes = write_kv_sheet(&entries, "info").unwrap();
    let grid = read_first_sheet(&bytes).unwrap();
    assert_eq!(grid[0], vec![Some(json!("id")), Some(json!("name"))]);
    assert_eq!(grid[1], vec![Some(json!("plate")), Some(json!("车牌号"))]);
    assert_eq!(grid.len(), 4);
}

//! Schema flattening, form layout and document loading tests

use compliance_forms_sdk::models::{Children, ColumnSchema, TabPlacement, ValueType};
use compliance_forms_sdk::schema::{FormLayout, flatten, load_columns_from_str};
use serde_json::{Value, json};

fn leaf(title: &str, index: &str) -> ColumnSchema {
    ColumnSchema::leaf(title, index, ValueType::Text)
}

fn ids(columns: &[ColumnSchema]) -> Vec<String> {
    columns.iter().filter_map(ColumnSchema::data_index_id).collect()
}

mod flatten_tests {
    use super::*;

    #[test]
    fn test_flat_list_is_unchanged() {
        let columns = vec![
            leaf("姓名", "name"),
            ColumnSchema::leaf("入职日期", "joinedAt", ValueType::Date),
            leaf("电话", "contact.phone"),
        ];
        let context = json!({"name": "张三"});

        let once = flatten(&columns, &context);
        assert_eq!(once, columns);
        assert_eq!(flatten(&once, &context), once);
    }

    #[test]
    fn test_duplicate_keeps_first_in_preorder() {
        let columns = vec![
            ColumnSchema::group(
                "outer",
                "外层",
                vec![ColumnSchema::group("inner", "内层", vec![leaf("第一个", "dup")])],
            ),
            leaf("第二个", "dup"),
            leaf("其他", "other"),
        ];

        let flat = flatten(&columns, &json!({}));
        assert_eq!(ids(&flat), vec!["dup", "other"]);
        assert_eq!(flat[0].title.as_deref(), Some("第一个"));
    }

    #[test]
    fn test_computed_children_follow_record() {
        let columns = vec![ColumnSchema::group_with(
            "licence",
            "证照",
            Children::computed(|record: &Value| {
                let mut columns = vec![leaf("证照类型", "licenceType")];
                if record.get("licenceType").and_then(Value::as_str) == Some("transport") {
                    columns.push(leaf("经营范围", "businessScope"));
                }
                columns
            }),
        )];

        assert_eq!(ids(&flatten(&columns, &json!({}))), vec!["licenceType"]);
        assert_eq!(
            ids(&flatten(&columns, &json!({"licenceType": "transport"}))),
            vec!["licenceType", "businessScope"]
        );
    }

    #[test]
    fn test_form_list_items_are_not_leaves() {
        let mut list = leaf("培训记录", "trainings");
        list.value_type = ValueType::FormList;
        list.columns = Some(Children::Static(vec![leaf("课程", "course")]));

        assert_eq!(ids(&flatten(&[list], &json!({}))), vec!["trainings"]);
    }
}

mod form_layout_tests {
    use super::*;

    #[test]
    fn test_nested_tabs_alternate_placement() {
        let columns = vec![
            leaf("备注", "remark"),
            ColumnSchema::group(
                "basic",
                "基础信息",
                vec![
                    leaf("车牌号", "plate"),
                    ColumnSchema::group("owner", "车主", vec![leaf("车主姓名", "ownerName")]),
                ],
            ),
        ];

        let layout = FormLayout::build(&columns, &json!({}));
        assert_eq!(ids(&layout.fields), vec!["remark"]);
        assert_eq!(ids(&layout.hidden), vec!["remark", "plate", "ownerName"]);
        assert_eq!(layout.depth(), 2);

        let basic = &layout.tabs.items[0];
        assert_eq!(layout.tabs.placement, TabPlacement::Top);
        assert_eq!(basic.label, "基础信息");
        assert_eq!(ids(&basic.fields), vec!["plate"]);

        let nested = basic.nested.as_ref().unwrap();
        assert_eq!(nested.placement, TabPlacement::Start);
        assert_eq!(nested.items[0].key, "owner");
    }
}

mod loader_tests {
    use super::*;

    #[test]
    fn test_load_grouped_yaml_schema() {
        let columns = load_columns_from_str(
            r#"
- title: 基础信息
  valueType: $tabGroup
  group:
    id: basic
    title: 基础信息
  columns:
    - title: 车牌号
      dataIndex: plate
    - title: 车辆状态
      dataIndex: status
      valueType: select
      valueEnum:
        normal: 正常
        scrapped:
          text: 报废
          status: Error
- title: 有效期
  dataIndex: [licence, validity]
  valueType: validDateRange
  fieldProps:
    placeholder: 请选择
"#,
        )
        .unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].value_type, ValueType::TabGroup);

        let flat = flatten(&columns, &json!({}));
        assert_eq!(ids(&flat), vec!["plate", "status", "licence.validity"]);
        assert_eq!(flat[0].value_type, ValueType::Text);
        assert_eq!(
            flat[1]
                .value_enum
                .as_ref()
                .unwrap()
                .label_of(&json!({}), "scrapped")
                .as_deref(),
            Some("报废")
        );
        assert_eq!(flat[2].field_prop("placeholder"), Some(&json!("请选择")));
    }

    #[test]
    fn test_unknown_value_type_is_rejected() {
        assert!(load_columns_from_str("- title: x\n  dataIndex: x\n  valueType: hologram\n").is_err());
    }
}

//! Validation tests

use compliance_forms_sdk::models::{ColumnSchema, ValueType};
use compliance_forms_sdk::schema::load_columns_from_str;
use compliance_forms_sdk::validation::{
    IssueSeverity, ValidationError, validate_columns, validate_id_card,
    validate_unified_social_credit_code,
};
use serde_json::json;

#[test]
fn test_identifier_fields() {
    assert!(validate_id_card("11010519491231002X").is_ok());
    assert!(matches!(
        validate_id_card("11010519491231002"),
        Err(ValidationError::InvalidLength {
            expected: 18,
            actual: 17,
            ..
        })
    ));
    assert!(validate_unified_social_credit_code("91350100M000100Y43").is_ok());
    assert_eq!(
        validate_unified_social_credit_code("").unwrap_err().to_string(),
        "Unified social credit code cannot be empty"
    );
}

#[test]
fn test_loaded_schema_issues() {
    let columns = load_columns_from_str(
        r##"
- title: 证照
  valueType: $tabGroup
  group:
    id: licence
    title: 证照
  columns:
    - title: 证照扫描件
      dataIndex: licenceFiles
      valueType: "#assets"
    - title: 识别
      valueType: "#ai"
      fieldProps:
        assets: licenceFiles
        columns:
          - title: 证号
            dataIndex: licenceNo
    - title: 证号
      dataIndex: licenceNo
- valueType: $tabGroup
  columns: []
"##,
    )
    .unwrap();

    let result = validate_columns(&columns);
    assert!(!result.is_valid());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].severity, IssueSeverity::Error);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_misconfigured_ai_column() {
    let columns = vec![
        ColumnSchema::leaf("AI识别", "ai", ValueType::Ai)
            .with_prop("fieldProps", json!({"assets": "files"})),
    ];
    let result = validate_columns(&columns);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("数据列字段配置错误"));
}

//! AI-assisted form filling tests

use async_trait::async_trait;
use compliance_forms_sdk::ai::{AiError, AiFieldConfig, AiFormRequest};
use compliance_forms_sdk::backend::{AiExtractor, BackendError, BackendResult};
use compliance_forms_sdk::models::{ColumnSchema, ValueType};
use serde_json::{Map, Value, json};
use std::sync::Mutex;

fn ai_column() -> ColumnSchema {
    ColumnSchema::leaf("AI识别", "ai", ValueType::Ai).with_prop(
        "fieldProps",
        json!({
            "label": "识别行驶证",
            "assets": "licenceFiles",
            "columns": [
                {"title": "车牌号", "dataIndex": "plate"},
                {"title": "车辆类型", "dataIndex": "kind", "valueType": "select",
                 "valueEnum": {"bus": "客车", "truck": "货车"}},
                {"title": "注册日期", "dataIndex": "registeredAt", "valueType": "date"},
            ],
        }),
    )
}

/// Extractor returning a fixed answer and recording requests.
struct FixedExtractor {
    answer: Value,
    requests: Mutex<Vec<AiFormRequest>>,
}

#[async_trait]
impl AiExtractor for FixedExtractor {
    async fn extract(&self, request: &AiFormRequest) -> BackendResult<Map<String, Value>> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(BackendError::Decode("not an object".into())),
        }
    }
}

#[tokio::test]
async fn test_suggestion_is_filtered_and_applied() {
    let config = AiFieldConfig::from_column(&ai_column()).unwrap();
    assert_eq!(config.label, "识别行驶证");

    let extractor = FixedExtractor {
        answer: json!({
            "plate": "闽A12345",
            "kind": "tractor",
            "registeredAt": "",
            "unrequested": "x",
        }),
        requests: Mutex::new(Vec::new()),
    };
    let mut record = json!({"licenceFiles": [{"id": "f1"}], "plate": "old"});

    let suggestion = config
        .request_suggestion(&extractor, &record, "请识别行驶证")
        .await
        .unwrap();

    let requests = extractor.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompts, "请识别行驶证");
    assert_eq!(requests[0].assets, json!([{"id": "f1"}]));
    assert_eq!(requests[0].columns.len(), 3);

    // Unknown enum keys, empty values and unrequested fields are dropped
    assert_eq!(suggestion.fields.len(), 1);
    assert_eq!(suggestion.fields[0].title, "车牌号");

    suggestion.apply_to(&mut record);
    assert_eq!(record["plate"], json!("闽A12345"));
    assert!(record.get("kind").is_none());
}

#[tokio::test]
async fn test_enum_values_display_labels() {
    let config = AiFieldConfig::from_column(&ai_column()).unwrap();
    let extractor = FixedExtractor {
        answer: json!({"kind": "bus"}),
        requests: Mutex::new(Vec::new()),
    };

    let suggestion = config
        .request_suggestion(&extractor, &json!({"licenceFiles": ["f1"]}), "")
        .await
        .unwrap();
    assert_eq!(suggestion.fields[0].display, "客车");
    assert_eq!(suggestion.values.get("kind"), Some(&json!("bus")));
}

#[tokio::test]
async fn test_missing_assets_stop_before_request() {
    let config = AiFieldConfig::from_column(&ai_column()).unwrap();
    let extractor = FixedExtractor {
        answer: json!({}),
        requests: Mutex::new(Vec::new()),
    };

    let result = config
        .request_suggestion(&extractor, &json!({"licenceFiles": []}), "")
        .await;
    // An empty list is still a value; only absent or falsy assets are rejected
    assert!(result.is_ok());

    let result = config.request_suggestion(&extractor, &json!({}), "").await;
    assert!(matches!(result, Err(AiError::MissingAssets(field)) if field == "licenceFiles"));
    assert_eq!(extractor.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let config = AiFieldConfig::from_column(&ai_column()).unwrap();
    let extractor = FixedExtractor {
        answer: Value::Null,
        requests: Mutex::new(Vec::new()),
    };

    let result = config
        .request_suggestion(&extractor, &json!({"licenceFiles": ["f1"]}), "")
        .await;
    assert!(matches!(result, Err(AiError::Backend(BackendError::Decode(_)))));
}

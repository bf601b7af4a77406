//! AI-assisted form filling
//!
//! An `#ai` column carries its configuration in `fieldProps`:
//! - `label`: trigger caption (defaults to `AI填写`)
//! - `assets`: data index of the field holding the uploaded documents
//! - `columns`: the columns the extractor should fill
//!
//! The extractor answers with a flat map keyed by data index. Suggestions are shown to the
//! user for confirmation before being written back into the form values.

use crate::backend::{AiExtractor, BackendError};
use crate::models::record::{get_path, parse_path, set_path, stringify};
use crate::models::{ColumnSchema, DataIndex};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

pub const DEFAULT_AI_LABEL: &str = "AI填写";

/// Error raised by AI-assisted extraction
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The `#ai` column is missing part of its configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The referenced asset field has no value yet
    #[error("No asset selected in field {0}")]
    MissingAssets(String),

    #[error("AI extraction failed: {0}")]
    Backend(#[from] BackendError),
}

/// Body of an extraction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiFormRequest {
    pub prompts: String,
    pub assets: Value,
    pub columns: Vec<ColumnSchema>,
}

/// Parsed configuration of an `#ai` column.
#[derive(Debug, Clone, PartialEq)]
pub struct AiFieldConfig {
    pub label: String,
    pub assets: DataIndex,
    pub columns: Vec<ColumnSchema>,
}

impl AiFieldConfig {
    /// Read the configuration from the column's `fieldProps`.
    pub fn from_column(column: &ColumnSchema) -> Result<Self, AiError> {
        let label = column
            .field_prop("label")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_AI_LABEL)
            .to_string();

        let assets = column
            .field_prop("assets")
            .cloned()
            .and_then(|v| serde_json::from_value::<DataIndex>(v).ok())
            .filter(|index| !index.is_empty())
            .ok_or_else(|| AiError::Configuration("资源字段配置错误".to_string()))?;

        let columns = column
            .field_prop("columns")
            .cloned()
            .and_then(|v| serde_json::from_value::<Vec<ColumnSchema>>(v).ok())
            .ok_or_else(|| AiError::Configuration("数据列字段配置错误".to_string()))?;

        Ok(Self {
            label,
            assets,
            columns,
        })
    }

    /// Build the request from the current form values.
    pub fn build_request(&self, record: &Value, prompts: &str) -> Result<AiFormRequest, AiError> {
        let assets = get_path(record, &self.assets.segments())
            .filter(|v| is_truthy(v))
            .ok_or_else(|| AiError::MissingAssets(self.assets.id()))?;

        Ok(AiFormRequest {
            prompts: prompts.to_string(),
            assets: assets.clone(),
            columns: self.columns.clone(),
        })
    }

    /// Ask the extractor for suggestions for the configured columns.
    pub async fn request_suggestion(
        &self,
        extractor: &dyn AiExtractor,
        record: &Value,
        prompts: &str,
    ) -> Result<AiSuggestion, AiError> {
        let request = self.build_request(record, prompts)?;
        let response = extractor.extract(&request).await?;
        let suggestion = AiSuggestion::from_response(&self.columns, &response);
        info!(
            "AI extraction suggested {} of {} fields",
            suggestion.fields.len(),
            self.columns.len()
        );
        Ok(suggestion)
    }
}

/// One suggested value as presented for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedField {
    pub key: String,
    pub title: String,
    pub display: String,
}

/// Values accepted from an extraction response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiSuggestion {
    pub values: Map<String, Value>,
    pub fields: Vec<SuggestedField>,
}

impl AiSuggestion {
    /// Keep truthy values of configured columns.
    ///
    /// Columns with a `valueEnum` only accept keys that have a label; the label is what
    /// gets displayed.
    pub fn from_response(columns: &[ColumnSchema], response: &Map<String, Value>) -> Self {
        let context = Value::Object(response.clone());
        let mut suggestion = Self::default();

        for column in columns {
            let Some(key) = column.data_index_id() else {
                continue;
            };
            let Some(value) = response.get(&key).filter(|v| is_truthy(v)) else {
                continue;
            };

            let display = match &column.value_enum {
                Some(value_enum) => match value_enum.label_of(&context, &stringify(value)) {
                    Some(label) => label,
                    None => {
                        debug!("Dropping AI value for {} without enum label", key);
                        continue;
                    }
                },
                None => stringify(value),
            };

            suggestion.fields.push(SuggestedField {
                title: column.title.clone().unwrap_or_else(|| key.clone()),
                key: key.clone(),
                display,
            });
            suggestion.values.insert(key, value.clone());
        }

        suggestion
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write the accepted values into the form values.
    pub fn apply_to(&self, record: &mut Value) {
        for (key, value) in &self.values {
            set_path(record, &parse_path(key), value.clone());
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ValueEnum, ValueType};
    use serde_json::json;

    fn ai_column() -> ColumnSchema {
        ColumnSchema::leaf("AI", "ai", ValueType::Ai).with_prop(
            "fieldProps",
            json!({
                "assets": "licenceFiles",
                "columns": [
                    {"title": "姓名", "dataIndex": "name"},
                    {"title": "性别", "dataIndex": "gender", "valueType": "select",
                     "valueEnum": {"male": "男", "female": "女"}}
                ]
            }),
        )
    }

    #[test]
    fn test_config_from_column() {
        let config = AiFieldConfig::from_column(&ai_column()).unwrap();
        assert_eq!(config.label, DEFAULT_AI_LABEL);
        assert_eq!(config.assets.id(), "licenceFiles");
        assert_eq!(config.columns.len(), 2);
    }

    #[test]
    fn test_missing_configuration() {
        let column = ColumnSchema::leaf("AI", "ai", ValueType::Ai)
            .with_prop("fieldProps", json!({"columns": []}));
        assert!(matches!(
            AiFieldConfig::from_column(&column),
            Err(AiError::Configuration(_))
        ));

        let column = ColumnSchema::leaf("AI", "ai", ValueType::Ai)
            .with_prop("fieldProps", json!({"assets": "files"}));
        assert!(matches!(
            AiFieldConfig::from_column(&column),
            Err(AiError::Configuration(_))
        ));
    }

    #[test]
    fn test_request_requires_assets() {
        let config = AiFieldConfig::from_column(&ai_column()).unwrap();
        assert!(matches!(
            config.build_request(&json!({"licenceFiles": ""}), "识别驾驶证"),
            Err(AiError::MissingAssets(_))
        ));

        let request = config
            .build_request(&json!({"licenceFiles": ["oss://a.jpg"]}), "识别驾驶证")
            .unwrap();
        assert_eq!(request.assets, json!(["oss://a.jpg"]));
        assert_eq!(request.prompts, "识别驾驶证");
    }

    #[test]
    fn test_suggestion_filters_values() {
        let columns = vec![
            ColumnSchema::leaf("姓名", "name", ValueType::Text),
            ColumnSchema::leaf("性别", "gender", ValueType::Select)
                .with_value_enum([("male", "男"), ("female", "女")].into_iter().collect::<ValueEnum>()),
            ColumnSchema::leaf("民族", "nation", ValueType::Select)
                .with_value_enum([("han", "汉族")].into_iter().collect::<ValueEnum>()),
            ColumnSchema::leaf("住址", "address", ValueType::Text),
        ];
        let response = json!({"name": "张三", "gender": "male", "nation": "unknown", "address": ""});
        let Value::Object(response) = response else { unreachable!() };

        let suggestion = AiSuggestion::from_response(&columns, &response);
        assert_eq!(suggestion.values.len(), 2);
        assert_eq!(suggestion.fields[1].display, "男");
        assert_eq!(suggestion.fields[1].title, "性别");

        let mut record = json!({"name": "旧名字", "phone": "138"});
        suggestion.apply_to(&mut record);
        assert_eq!(record, json!({"name": "张三", "gender": "male", "phone": "138"}));
    }
}

//! REST implementation of the collaborator traits
//!
//! Talks to the compliance service through `reqwest`. Every JSON response is wrapped in
//! the `{code, msg?, data?, total?}` envelope, where `code == 200` means success.
//! Template rendering answers with a file body instead; a JSON body there is an error.

use super::{
    AiExtractor, BackendError, BackendResult, DepartmentSource, RenderedFile, TemplateInfo,
    TemplateRenderer,
};
use crate::ai::AiFormRequest;
use crate::config::ApiConfig;
use crate::models::{DepartmentInfo, TemplateIdentifier};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Envelope code of a successful call
pub const SUCCESS_CODE: i64 = 200;

/// File name used when the service sends no `Content-Disposition`
pub const DEFAULT_FILE_NAME: &str = "download";

static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=("[^"]*"|'[^']*'|[^;\n]*)"#).expect("filename pattern is valid")
});

static FILENAME_UTF8: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)filename\*=UTF-8''([^;\n]+)").expect("RFC 5987 filename pattern is valid")
});

/// Response envelope of the compliance service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResult<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Payload of a successful envelope.
    pub fn into_data(self) -> BackendResult<T> {
        if !self.is_success() {
            return Err(BackendError::Api {
                code: self.code,
                message: self.msg.unwrap_or_default(),
            });
        }
        self.data
            .ok_or_else(|| BackendError::Decode("Response envelope has no data".to_string()))
    }
}

/// HTTP backend for the compliance service.
#[derive(Debug, Clone)]
pub struct ApiBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ApiBackend {
    /// Create a backend with a cookie-carrying client (the service uses session cookies).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> BackendResult<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> BackendResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!("API调用失败: {}", status)));
        }

        let envelope: ApiResult<T> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        envelope.into_data()
    }
}

#[async_trait]
impl DepartmentSource for ApiBackend {
    async fn fetch_departments(&self) -> BackendResult<Vec<DepartmentInfo>> {
        debug!("GET /common/departments");
        self.send(self.client.get(self.url("/common/departments")))
            .await
    }
}

#[async_trait]
impl TemplateRenderer for ApiBackend {
    async fn list_templates(
        &self,
        identifier: &TemplateIdentifier,
    ) -> BackendResult<Vec<TemplateInfo>> {
        debug!("GET /common/templates for {}", identifier);
        self.send(
            self.client
                .get(self.url("/common/templates"))
                .query(&[("identifier", identifier.as_str())]),
        )
        .await
    }

    async fn render(&self, template_id: &str, rows: &[Value]) -> BackendResult<RenderedFile> {
        let path = format!("/common/templates/{}", urlencoding::encode(template_id));
        debug!("POST {} with {} rows", path, rows.len());

        let response = self
            .client
            .post(self.url(&path))
            .json(&json!({ "list": rows }))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = header_text(&response, CONTENT_TYPE.as_str());
        let disposition = header_text(&response, CONTENT_DISPOSITION.as_str());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"));
        if is_json || !status.is_success() {
            let message = serde_json::from_slice::<ApiResult<Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.msg)
                .unwrap_or_else(|| "模板执行失败".to_string());
            warn!("Template {} failed to render: {}", template_id, message);
            return Err(BackendError::Api {
                code: i64::from(status.as_u16()),
                message,
            });
        }

        Ok(RenderedFile {
            file_name: disposition
                .as_deref()
                .and_then(filename_from_disposition)
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[async_trait]
impl AiExtractor for ApiBackend {
    async fn extract(&self, request: &AiFormRequest) -> BackendResult<Map<String, Value>> {
        debug!("POST /common/ai/form with {} columns", request.columns.len());
        self.send(self.client.post(self.url("/common/ai/form")).json(request))
            .await
    }
}

fn header_text(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// File name announced by a `Content-Disposition` header.
///
/// The RFC 5987 `filename*=UTF-8''…` form wins over a plain `filename=` parameter.
pub fn filename_from_disposition(disposition: &str) -> Option<String> {
    let mut name = FILENAME
        .captures(disposition)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(['"', '\''], "").trim().to_string())
        .filter(|s| !s.is_empty());

    if disposition.contains("filename*=UTF-8")
        && let Some(encoded) = FILENAME_UTF8.captures(disposition).and_then(|caps| caps.get(1))
        && let Ok(decoded) = urlencoding::decode(encoded.as_str().trim())
    {
        name = Some(decoded.into_owned());
    }

    name
}

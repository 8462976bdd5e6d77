//! HTTP client wrapper for the portfolio REST API.
//!
//! Uses reqwest with HTTP Basic auth. Every call is a single one-shot
//! request: no retries, no caching, no deduplication. Non-success responses
//! are normalized into one human-readable message (the JSON error body's
//! `detail` field when the collaborator provides one).

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{header, multipart, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;

/// Default collaborator base, overridable via flag, env, or settings.
pub const DEFAULT_API_BASE: &str = "https://sample-portfolio-btku.onrender.com/api/v1";

/// One part of a multipart body. Files are read from disk at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

/// A request against the collaborator, expressed relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative path, e.g. `projects/` or `projects/3/`.
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn json(method: Method, path: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Json(body),
        }
    }

    pub fn multipart(method: Method, path: impl Into<String>, fields: Vec<MultipartField>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Multipart(fields),
        }
    }
}

/// Transport seam for the admin console. The real implementation is
/// `ApiClient`; tests substitute a recording fake.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Execute a request. `Ok(None)` means success with no content (204).
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>, ApiError>;
}

/// Encode a username/password pair as an HTTP Basic credential.
pub fn basic_token(username: &str, password: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
}

pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    credential: Option<String>,
}

impl ApiClient {
    /// Build a client for `base`. The base is normalized to end with `/` so
    /// relative joins append instead of replacing the last path segment.
    pub fn new(base: &str, credential: Option<String>) -> Result<Self, ApiError> {
        let mut normalized = base.trim_end_matches('/').to_string();
        normalized.push('/');
        let base = Url::parse(&normalized)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base}: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            credential,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    /// Send a request and normalize the response.
    pub async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let url = self.endpoint_url(&request.path)?;
        log::debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(token) = &self.credential {
            builder = builder.header(header::AUTHORIZATION, format!("Basic {token}"));
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields).await?),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(status, &body);
            log::debug!("request rejected: {} {}", status.as_u16(), message);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// GET a resource list and deserialize each record.
    pub async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ApiError> {
        let value = self
            .send(ApiRequest::get(format!("{endpoint}/")))
            .await?
            .unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(value)?)
    }

    /// Probe the credential against the profile endpoint. Any rejection maps
    /// to the login failure message.
    pub async fn login_check(&self) -> Result<(), ApiError> {
        match self.send(ApiRequest::get("profile/")).await {
            Ok(_) => Ok(()),
            Err(ApiError::Rejected { .. }) => Err(ApiError::Unauthorized),
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl Gateway for ApiClient {
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        self.send(request).await
    }
}

async fn build_form(fields: Vec<MultipartField>) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File { name, path } => {
                let bytes = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());
                form.part(name, multipart::Part::bytes(bytes).file_name(file_name))
            }
        };
    }
    Ok(form)
}

/// Normalize an error response into one message: the JSON body's `detail`
/// field, else the whole body serialized, else the status line text.
fn failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
        return value.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()))
}

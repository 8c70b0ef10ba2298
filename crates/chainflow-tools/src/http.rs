//! HTTP client capability.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ToolError;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)] // HTTP methods are conventionally uppercase
pub enum HttpMethod {
    #[default]
    GET,
    POST,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
        }
    }
}

/// Outgoing HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP method (default: GET).
    #[serde(default)]
    pub method: HttpMethod,

    /// URL to request.
    pub url: String,

    /// Request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// JSON body (POST only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Build a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::GET,
            url: url.into(),
            headers: HashMap::new(),
            json: None,
        }
    }

    /// Build a POST request with a JSON body.
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::POST,
            url: url.into(),
            headers: HashMap::new(),
            json: Some(body),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status_code: u16,

    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Fail unless the status is exactly 200.
    pub fn require_ok(&self, url: &str) -> Result<(), ToolError> {
        if self.status_code != 200 {
            return Err(ToolError::HttpStatus {
                url: url.to_string(),
                status: self.status_code,
            });
        }
        Ok(())
    }

    /// Decode the body as UTF-8 JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        let text = std::str::from_utf8(&self.body)
            .map_err(|e| ToolError::Decode(format!("response body is not UTF-8: {}", e)))?;
        Ok(serde_json::from_str(text)?)
    }
}

/// Capability for sending HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the status and raw body.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ToolError>;
}

/// HTTP capability backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ToolError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(ref json) = request.json {
            builder = builder.json(json);
        }

        tracing::debug!(url = %request.url, method = ?request.method, "Sending HTTP request");

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(url = %request.url, status_code, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse { status_code, body })
    }
}

/// GET `url` expecting a 200 response with a JSON body.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    url: &str,
) -> Result<T, ToolError> {
    let request = HttpRequest::get(url).with_header("Accept", "application/json");
    let response = client.send(&request).await?;
    response.require_ok(url)?;
    response.json()
}

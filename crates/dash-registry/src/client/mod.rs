//! HTTP client seam, the reqwest-backed implementation and the retrying wrapper

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;

use dash_core::error::DashError;
use crate::RegistryResult;

mod retry;

pub use retry::{RetryingClient, BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG, MAX_RETRIES};

/// Default request timeout for backend and registry calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Asynchronous GET, the only verb the dashboard plumbing needs.
///
/// The error type only has to render its message: the retrying wrapper
/// classifies failures by comparing that text.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Response: Send;
    type Error: std::fmt::Display + Send;

    async fn get(&self, url: &str) -> Result<Self::Response, Self::Error>;
}

/// A fully read response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> RegistryResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| DashError::JsonParse {
            message: format!("Failed to parse response body: {}", e),
        })
    }

    /// Body as (lossy) UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Authentication configuration for backend access
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
}

/// reqwest-backed [`HttpClient`] with connection pooling
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
}

impl ReqwestClient {
    /// Create new client with connection pooling
    pub fn new() -> RegistryResult<Self> {
        Self::with_config(None, DEFAULT_TIMEOUT)
    }

    /// Create client with authentication
    pub fn with_auth(auth: AuthConfig) -> RegistryResult<Self> {
        Self::with_config(Some(auth), DEFAULT_TIMEOUT)
    }

    /// Create client with custom configuration
    pub fn with_config(auth: Option<AuthConfig>, timeout: Duration) -> RegistryResult<Self> {
        let mut builder = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("dash/", env!("CARGO_PKG_VERSION")));

        if let Some(header) = auth.map(authorization_header).transpose()?.flatten() {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(reqwest::header::AUTHORIZATION, header);
            builder = builder.default_headers(headers);
        }

        let client = builder.build()
            .map_err(|e| DashError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client })
    }
}

/// Build the Authorization header value, bearer token first
fn authorization_header(auth: AuthConfig) -> RegistryResult<Option<reqwest::header::HeaderValue>> {
    let value = if let Some(token) = auth.token {
        format!("Bearer {}", token)
    } else if let (Some(username), Some(password)) = (auth.username, auth.password) {
        use base64::{Engine as _, engine::general_purpose};
        format!("Basic {}", general_purpose::STANDARD.encode(format!("{}:{}", username, password)))
    } else {
        return Ok(None);
    };

    value.parse()
        .map(Some)
        .map_err(|e| DashError::Network {
            message: format!("Invalid authorization header: {}", e),
            source: Some(Box::new(e)),
        })
}

/// Text the server gave for a failed request: the `message` field of a JSON
/// body when there is one, else the raw body, else the status reason.
fn failure_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if !body.is_empty() {
        return String::from_utf8_lossy(body).into_owned();
    }
    status.canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl HttpClient for ReqwestClient {
    type Response = HttpResponse;
    type Error = DashError;

    async fn get(&self, url: &str) -> Result<HttpResponse, DashError> {
        let response = self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DashError::Network {
                message: format!("Failed to GET {}: {}", url, e),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.bytes()
            .await
            .map_err(|e| DashError::Network {
                message: format!("Failed to read response from {}: {}", url, e),
                source: Some(Box::new(e)),
            })?
            .to_vec();

        if !status.is_success() {
            return Err(DashError::Http {
                status: status.as_u16(),
                message: failure_message(status, &body),
            });
        }

        Ok(HttpResponse { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests;

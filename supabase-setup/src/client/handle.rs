//! Blocking Supabase client handle

use super::credentials::redact;
use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Which key a handle authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    /// Anonymous key, subject to row level security
    Anon,
    /// Service role key, bypasses row level security
    Admin,
}

impl ClientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anon => "anon",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body returned by PostgREST and postgres-meta.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    details: Option<String>,
    hint: Option<String>,
    code: Option<String>,
}

impl ApiErrorBody {
    fn summary(self) -> Option<String> {
        let mut summary = self.message.or(self.error)?;
        if let Some(code) = self.code {
            summary = format!("[{}] {}", code, summary);
        }
        if let Some(details) = self.details.filter(|d| !d.is_empty()) {
            summary.push_str(&format!(" ({})", details));
        }
        if let Some(hint) = self.hint.filter(|h| !h.is_empty()) {
            summary.push_str(&format!(" hint: {}", hint));
        }
        Some(summary)
    }
}

fn api_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(ApiErrorBody::summary)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("empty response")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// One authenticated connection to a Supabase project.
///
/// Each handle owns its own HTTP connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    api_key: String,
    role: ClientRole,
}

impl SupabaseClient {
    /// Build a handle. Never fails and performs no I/O.
    ///
    /// `timeout` of `None` lets a request block until the server answers.
    pub fn new(url: &str, api_key: &str, role: ClientRole, timeout: Option<Duration>) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_http(http, url, api_key, role)
    }

    /// Build a handle around an existing HTTP client.
    pub fn with_http(http: Client, url: &str, api_key: &str, role: ClientRole) -> Self {
        Self {
            http,
            base_url: url.to_string(),
            api_key: api_key.to_string(),
            role,
        }
    }

    pub fn role(&self) -> ClientRole {
        self.role
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Absolute URL for a path relative to the project root.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Call a Postgres function through PostgREST (`/rest/v1/rpc/{function}`).
    pub fn rpc(&self, function: &str, params: &Value) -> Result<Value, ClientError> {
        self.request(
            Method::POST,
            &format!("rest/v1/rpc/{}", function),
            Some(params),
        )
    }

    /// Send an arbitrary request to the project and decode the JSON answer.
    ///
    /// Empty bodies decode to `Value::Null`.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(path);
        debug!(role = self.role.as_str(), %method, url = %url, "Supabase request");

        let mut request = self
            .http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        Self::read_response(request.send()?)
    }

    fn read_response(response: Response) -> Result<Value, ClientError> {
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status,
                message: api_message(status, &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("role", &self.role)
            .finish()
    }
}

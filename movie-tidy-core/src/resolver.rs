//! Client for the remote naming service.
//!
//! The service takes an original file name plus a naming template and
//! answers with zero or more canonical names. [`parse_query_response`] holds
//! the response rules so they can be exercised without a network.

use crate::config::{RetryPolicy, ServiceConfig};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Path of the query endpoint, appended to the configured base URL.
pub const QUERY_PATH: &str = "/api/movie/query";

/// Longest slice of a malformed body kept in the error message.
const MAX_BODY_IN_ERROR: usize = 300;

/// Request body for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameQuery {
    #[serde(rename = "name")]
    pub original_name: String,
    #[serde(rename = "custom_name")]
    pub format_template: String,
}

impl NameQuery {
    pub fn new(original_name: impl Into<String>, format_template: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            format_template: format_template.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    pub custom_name: String,
}

/// Successful answer: candidate names in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameQueryResult {
    pub candidates: Vec<CandidateName>,
}

impl NameQueryResult {
    pub fn names(&self) -> Vec<String> {
        self.candidates
            .iter()
            .map(|c| c.custom_name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("request to naming service failed: {0}")]
    Network(String),

    #[error("malformed response from naming service: {0}")]
    MalformedResponse(String),

    /// The service answered with a non-zero `code`; `msg` is shown verbatim.
    #[error("{msg}")]
    Service { code: i64, msg: String },
}

impl ResolveError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Anything that can turn a [`NameQuery`] into candidate names.
pub trait NamingService {
    fn resolve(&self, query: &NameQuery) -> Result<NameQueryResult, ResolveError>;
}

/// Decode a naming service response body.
///
/// A body without a top-level `code` is malformed. A non-zero `code` is a
/// service error carrying `msg`. Otherwise every `data[].custom_name` is a
/// candidate, in order; entries without a name are dropped.
///
/// Field types are coerced rather than enforced: `"1"` is code 1, a numeric
/// `msg` or `custom_name` is used as its JSON text.
pub fn parse_query_response(body: &str) -> Result<NameQueryResult, ResolveError> {
    let malformed = || ResolveError::MalformedResponse(truncate_body(body));

    let response: Value = serde_json::from_str(body).map_err(|_| malformed())?;
    let code = response
        .as_object()
        .and_then(|fields| fields.get("code"))
        .map(coerce_code)
        .ok_or_else(malformed)?;

    if code != 0 {
        return Err(ResolveError::Service {
            code,
            msg: response.get("msg").and_then(coerce_text).unwrap_or_default(),
        });
    }

    let candidates = response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.get("custom_name").and_then(coerce_text))
        .map(|custom_name| CandidateName { custom_name })
        .collect();

    Ok(NameQueryResult { candidates })
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_code(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or_default()
        },
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

/// `None` for null; strings as-is; anything else as its JSON text.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Settings for [`HttpNamingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Base URL, e.g. `https://api.rettrue.com`
    pub endpoint: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl From<&ServiceConfig> for ResolverOptions {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            retry: config.retry,
        }
    }
}

impl ResolverOptions {
    pub fn query_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), QUERY_PATH)
    }
}

/// [`NamingService`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpNamingService {
    client: Client,
    url: String,
    retry: RetryPolicy,
}

impl HttpNamingService {
    pub fn new(options: &ResolverOptions) -> Result<Self> {
        let url = options.query_url();
        reqwest::Url::parse(&url)
            .with_context(|| format!("Invalid naming service endpoint: {}", options.endpoint))?;

        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            retry: options.retry,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn post(&self, query: &NameQuery) -> Result<String, ResolveError> {
        let response = self.client.post(&self.url).json(query).send()?;
        let status = response.status();
        let body = response.text()?;
        tracing::debug!(url = %self.url, %status, bytes = body.len(), "naming service replied");
        Ok(body)
    }
}

impl NamingService for HttpNamingService {
    fn resolve(&self, query: &NameQuery) -> Result<NameQueryResult, ResolveError> {
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            tracing::debug!(file = %query.original_name, attempt, "querying naming service");
            match self.post(query) {
                Ok(body) => return parse_query_response(&body),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = self.retry.backoff_after(attempt);
                    tracing::warn!(
                        file = %query.original_name,
                        attempt,
                        error = %err,
                        retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "naming service request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                },
                Err(err) => return Err(err),
            }
        }
    }
}

//! Google API clients over plain HTTPS (reqwest), authenticated with API keys.
//!
//! Modules:
//! - sheets: Sheets API v4 `values.get` for named ranges
//! - gemini: Generative Language API `generateContent`
//!
//! Both are single request/response round trips: no retry, no pagination,
//! no streaming, no caching.

pub mod gemini;
pub mod sheets;

pub use gemini::{GeminiClient, Generation, TextGenerator};
pub use sheets::{RangeReader, SheetRange, SheetsClient};

use serde::Deserialize;
use url::Url;

use crate::error::HrError;

/// Google's JSON error envelope: `{ "error": { "code": 403, "message": "..." } }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Best-effort message for a non-success response: `error.message` when the
/// body is Google's JSON envelope, otherwise `fallback`.
pub(crate) fn upstream_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Drain a non-success response into `(status, message)`. `fallback` is the
/// message when the body carries none.
pub(crate) async fn read_failure(resp: reqwest::Response, fallback: &str) -> (u16, String) {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    (status, upstream_error_message(&body, fallback))
}

/// `{base}/{segments...}?key={api_key}` with each segment percent-encoded.
pub(crate) fn endpoint_url(base: &str, segments: &[&str], api_key: &str) -> Result<Url, HrError> {
    let mut url = Url::parse(base)
        .map_err(|e| HrError::Configuration(format!("Invalid base URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| HrError::Configuration(format!("Base URL '{}' cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Credential check shared by both clients; runs before any network activity.
pub(crate) fn require<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, HrError> {
    value
        .as_deref()
        .ok_or_else(|| HrError::Configuration(format!("{} is not configured", what)))
}

//! Error types for dashboard data loads and AI analysis
//!
//! Errors are classified by what the user can do about them:
//! - Retryable: transport failures, upstream 429/5xx
//! - NonRetryable: malformed responses, nothing to analyze
//! - RequiresUserAction: missing credentials, rejected keys, private sheets
//!
//! A malformed spreadsheet row is not an error (it is logged and skipped),
//! and a safety-blocked generation is a normal `Generation` outcome.

use thiserror::Error;

/// Error type shared by the spreadsheet client, the data façade and the AI client
#[derive(Debug, Error)]
pub enum HrError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to fetch sheet data ({range}): status {status} - {message}")]
    Fetch {
        range: String,
        status: u16,
        message: String,
    },

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Nothing to analyze: {0}")]
    NothingToAnalyze(String),
}

impl HrError {
    fn upstream_status(&self) -> Option<u16> {
        match self {
            HrError::Fetch { status, .. } | HrError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            HrError::Network(_) => true,
            _ => matches!(self.upstream_status(), Some(429) | Some(500..=599)),
        }
    }

    /// Returns true if the user has to fix credentials or sharing settings
    pub fn requires_user_action(&self) -> bool {
        match self {
            HrError::Configuration(_) => true,
            _ => matches!(self.upstream_status(), Some(400) | Some(401) | Some(403)),
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HrError::Configuration(_) => {
                "Set the spreadsheet id and API keys in the environment or ~/.hrdash/config.json"
            }
            HrError::Fetch { status: 403, .. } | HrError::Fetch { status: 400, .. } => {
                "Check that the spreadsheet is shared with 'anyone with the link' and the API key is valid."
            }
            HrError::Fetch { status: 404, .. } => "Check the spreadsheet id and sheet names.",
            HrError::Fetch { .. } => "Try reloading the view.",
            HrError::Api { status: 429, .. } => "Gemini quota exceeded. Wait a minute and try again.",
            HrError::Api { .. } => "Check the Gemini API key and model name.",
            HrError::Network(_) => "Check your internet connection and try again.",
            HrError::Decode(_) => "The upstream service returned an unexpected payload.",
            HrError::NothingToAnalyze(_) => "Select an item that has text to analyze.",
        }
    }
}

impl From<reqwest::Error> for HrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HrError::Decode(err.to_string())
        } else {
            HrError::Network(err.to_string())
        }
    }
}

/// Serializable error representation for the view layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewError {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&HrError> for ViewError {
    fn from(err: &HrError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ViewError {
            message: format!("Falha ao carregar dados: {}", err),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

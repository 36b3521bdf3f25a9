//! Generative Language API: single-shot `generateContent`.
//!
//! One POST per call. Safety-filtered output is reported as
//! `Generation::SafetyBlocked` rather than an error, so the view can show a
//! specific notice instead of a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{endpoint_url, read_failure, require};
use crate::config::DashboardConfig;
use crate::error::HrError;

pub const SAFETY_BLOCK_NOTICE: &str =
    "A análise foi bloqueada devido às políticas de segurança do Gemini. Tente reformular as notas.";
pub const INCOMPLETE_NOTICE: &str = "A análise não pôde ser concluída. A resposta pode ter sido bloqueada ou o modelo pode estar indisponível no momento.";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const UNKNOWN_ERROR: &str = "Ocorreu um erro desconhecido.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

// ============================================================================
// Public API
// ============================================================================

/// Outcome of a well-formed generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    /// Withheld by the content safety filter.
    SafetyBlocked,
    /// Well-formed response without usable text.
    Incomplete,
}

impl Generation {
    /// Text to show the user: the generated text or a fixed notice.
    pub fn message(&self) -> &str {
        match self {
            Generation::Text(text) => text,
            Generation::SafetyBlocked => SAFETY_BLOCK_NOTICE,
            Generation::Incomplete => INCOMPLETE_NOTICE,
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Anything that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, HrError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<Generation, HrError> {
        let api_key = require(&self.api_key, "Gemini API key")?;
        let method = format!("{}:generateContent", self.model);
        let url = endpoint_url(&self.base_url, &[&method], api_key)?;

        let body = build_request(prompt);
        log::debug!("Calling {} ({} prompt chars)", method, prompt.chars().count());

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                HrError::Network(e.to_string())
            })?;

        if !resp.status().is_success() {
            let (status, message) = read_failure(resp, UNKNOWN_ERROR).await;
            log::error!("Gemini API error {}: {}", status, message);
            return Err(HrError::Api { status, message });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        let generation = interpret(parsed);
        if !matches!(generation, Generation::Text(_)) {
            log::warn!("Gemini returned no usable text: {:?}", generation);
        }
        Ok(generation)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, HrError> {
        self.generate_content(prompt).await
    }
}

fn build_request(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        safety_settings: HARM_CATEGORIES
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: BLOCK_THRESHOLD,
            })
            .collect(),
    }
}

/// Map a parsed response to an outcome. A safety stop wins over any partial
/// text the candidate carries.
fn interpret(response: GenerateContentResponse) -> Generation {
    let prompt_blocked = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
        .is_some();

    let Some(candidate) = response.candidates.into_iter().next() else {
        return if prompt_blocked {
            Generation::SafetyBlocked
        } else {
            Generation::Incomplete
        };
    };

    if prompt_blocked || candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Generation::SafetyBlocked;
    }

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .map(Generation::Text)
        .unwrap_or(Generation::Incomplete)
}

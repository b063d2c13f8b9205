use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use zia_core::{Error, Oracle, OracleResponse, Result};

/// Gemini REST endpoint prefix.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default model for classification and decomposition.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
/// Env var key for the Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Oracle backed by the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiOracle {
    /// HTTP client for API requests.
    client: Client,
    /// Gemini API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl GeminiOracle {
    /// Creates a new `GeminiOracle` with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_GEMINI_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Creates a new `GeminiOracle` from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the `GEMINI_API_KEY` environment variable is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_GEMINI_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_GEMINI_API_KEY.to_owned()))?;
        Self::new(api_key)
    }

    /// Sets the model to use for generation.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Name of the configured model.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request payload sent to `generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// Conversation turns; the oracle only ever sends one.
    contents: Vec<Content>,
}

/// A single conversation turn.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    /// Author role (`user` for requests, `model` for replies).
    #[serde(default)]
    role: String,
    /// Text fragments making up the turn.
    #[serde(default)]
    parts: Vec<Part>,
}

/// A text fragment.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    /// Fragment text.
    #[serde(default)]
    text: String,
}

/// Response payload returned by `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Candidate completions.
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A candidate completion.
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Generated turn, absent when the candidate was blocked.
    content: Option<Content>,
}

/// Joins the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let content = response
        .candidates
        .into_iter()
        .find_map(|candidate| candidate.content)
        .ok_or_else(|| Error::InvalidResponse("Gemini returned no candidates".to_owned()))?;

    let text = content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    Ok(text)
}

#[async_trait]
impl Oracle for GeminiOracle {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<OracleResponse> {
        let url = format!("{GEMINI_API_URL}/{}:generateContent", self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Oracle(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Oracle(format!(
                "Gemini API error {status}: {error_text}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| Error::InvalidResponse(format!("Failed to parse Gemini response: {err}")))?;

        tracing::debug!(model = %self.model, "Gemini response received");

        Ok(OracleResponse::new(extract_text(parsed)?))
    }
}

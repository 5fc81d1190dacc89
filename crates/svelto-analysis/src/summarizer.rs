// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Summarizer — optional, best-effort document summarization through the
// generative-language HTTP API.
//
// The capability exists only when an API key is configured in the
// environment; without one the whole feature is a normal skip, never an
// error, and compression proceeds untouched.

use serde::{Deserialize, Serialize};
use svelto_core::error::SveltoError;
use tracing::{debug, info, instrument, warn};

use svelto_document::pdf::text::extract_leading_text;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default number of leading pages fed into a summary.
pub const MAX_ANALYSIS_PAGES: u32 = 5;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for the summarization service.
///
/// Construct once per process via [`Summarizer::from_env`] and share by
/// reference; the client holds no per-document state.
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Summarizer {
    /// Create a summarizer with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build the capability from the environment, if configured.
    ///
    /// Returns `None` when no key is set — callers treat that as "feature
    /// off" and skip analysis entirely.
    pub fn from_env() -> Option<Self> {
        Self::from_env_named(API_KEY_ENV)
    }

    fn from_env_named(var: &str) -> Option<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(key)),
            _ => {
                debug!(var, "no API key configured, summarization disabled");
                None
            }
        }
    }

    /// Summarize already-extracted document text.
    #[instrument(skip_all, fields(text_len = text.len(), model = %self.model))]
    pub async fn summarize(&self, text: &str) -> Result<String, SveltoError> {
        let prompt = format!(
            "You are a document assistant. The text below was extracted from \
             the beginning of a PDF file. Provide a concise summary of the \
             document's contents and suggest 3 keywords that describe it.\n\n\
             Text content:\n{text}"
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| SveltoError::Analysis(format!("summary request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "summary service rejected the request");
            return Err(SveltoError::Analysis(format!(
                "summary service returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|err| {
            SveltoError::Analysis(format!("malformed summary response: {}", err))
        })?;

        parsed.first_text().ok_or_else(|| {
            SveltoError::Analysis("summary response contained no text".to_string())
        })
    }

    /// Extract the leading text of a PDF and summarize it.
    #[instrument(skip_all, fields(bytes_len = source.len(), max_pages))]
    pub async fn analyze(&self, source: &[u8], max_pages: u32) -> Result<String, SveltoError> {
        let text = extract_leading_text(source, max_pages)?;
        if text.trim().is_empty() {
            return Err(SveltoError::Analysis(
                "document contains no extractable text".to_string(),
            ));
        }

        let summary = self.summarize(&text).await?;
        info!(summary_len = summary.len(), "document analysed");
        Ok(summary)
    }
}

// -- Wire types ---------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GenerateResponse {
    /// First candidate's first text part, if any.
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|part| part.text.clone())
            .filter(|text| !text.is_empty())
    }
}

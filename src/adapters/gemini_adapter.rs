//! Google Gemini text-scoring adapter.
//!
//! Sends the prompt as a single user turn to `generateContent` with
//! temperature 0 and returns the concatenated text parts untouched.

use crate::adapters::http;
use crate::domain::error::ProviderError;
use crate::ports::scoring_port::ScoringPort;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "gemini";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiAdapter {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER.to_string(),
            });
        }
        Ok(Self {
            client: http::build_client(PROVIDER, timeout_secs)?,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn build_request(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig { temperature: 0.0 },
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, ProviderError> {
    let text = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::malformed(PROVIDER, "no text in response"));
    }
    Ok(text)
}

impl ScoringPort for GeminiAdapter {
    fn score(&self, prompt: &str) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt))
            .send()
            .map_err(|e| http::classify(PROVIDER, "", &e))?;
        let resp = http::check_status(PROVIDER, "", resp)?;

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;
        extract_text(body)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AmplifyError, Result};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A single completion request to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// When set, the reply must be JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_output_tokens,
            response_schema: None,
        }
    }

    pub fn structured(
        prompt: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
        schema: Value,
    ) -> Self {
        Self {
            response_schema: Some(schema),
            ..Self::text(prompt, temperature, max_output_tokens)
        }
    }
}

/// Text generation service used by the post generator.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the raw text of the model's reply.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.gemini_api_key.trim().is_empty() {
            return Err(AmplifyError::Config("GEMINI_API_KEY is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AmplifyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.model.clone(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint, e.g. a proxy in front of the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request(request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                response_mime_type: request
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema: request.response_schema.clone(),
            },
        }
    }

    fn extract_text(response: GeminiResponse) -> Result<String> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            AmplifyError::Generation("Gemini returned no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AmplifyError::Generation(format!(
                "Gemini returned an empty reply (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.model)
        );

        debug!(
            "Sending request to {} (structured: {}, prompt: {} chars)",
            url,
            request.response_schema.is_some(),
            request.prompt.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| {
                AmplifyError::Generation(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(AmplifyError::Generation(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response = response.json::<GeminiResponse>().await.map_err(|e| {
            AmplifyError::Generation(format!("Failed to parse Gemini API response: {}", e))
        })?;

        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                "Gemini usage - prompt: {:?} tokens, reply: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Self::extract_text(gemini_response)
    }
}

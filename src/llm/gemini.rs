//! Google Gemini provider over the `generativelanguage` REST API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, ModelInfo, Role,
};
use crate::error::LlmError;

const PROVIDER: &str = "gemini";
const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini text-generation client.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.base_url,
            bare_model_name(&self.model)
        )
    }

    fn models_url(&self) -> String {
        format!("{}/{API_VERSION}/models", self.base_url)
    }

    /// Attach the API key. It travels as a header so it never shows up in URLs or logs.
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header(API_KEY_HEADER, self.api_key.expose_secret())
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LlmError::AuthFailed {
                provider: PROVIDER.into(),
            });
        }
        let body = resp.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Gemini request failed");
        Err(LlmError::RequestFailed {
            provider: PROVIDER.into(),
            reason: format!("HTTP {status}: {}", api_error_message(&body).unwrap_or(body)),
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = GenerateRequest::from(&request);
        debug!(model = %self.model, messages = request.messages.len(), "Sending Gemini request");

        let resp = self
            .authorized(self.client.post(self.generate_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let text = Self::check_status(resp)
            .await?
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        parse_generate_response(&text)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.authorized(self.client.get(self.models_url()));
            if let Some(ref token) = page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let resp = req.send().await.map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;
            let page: ModelsPage = Self::check_status(resp)
                .await?
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    provider: PROVIDER.into(),
                    reason: e.to_string(),
                })?;

            models.extend(page.models.into_iter().map(ModelInfo::from));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

/// Strip the optional `models/` prefix so both spellings are accepted.
fn bare_model_name(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// Pull `error.message` out of a Gemini error body.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"].as_str().map(str::to_string)
}

/// Parse a `generateContent` response body into a completion.
fn parse_generate_response(body: &str) -> Result<CompletionResponse, LlmError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;

    let Some(candidate) = resp.candidates.into_iter().next() else {
        let reason = resp
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {r}"))
            .unwrap_or_else(|| "response contained no candidates".to_string());
        return Err(LlmError::InvalidResponse {
            provider: PROVIDER.into(),
            reason,
        });
    };

    let finish_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => FinishReason::Safety,
        Some(_) => FinishReason::Other,
    };

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if content.is_empty() && finish_reason == FinishReason::Safety {
        return Err(LlmError::InvalidResponse {
            provider: PROVIDER.into(),
            reason: "response blocked by safety filters".into(),
        });
    }

    let usage = resp.usage_metadata.unwrap_or_default();
    Ok(CompletionResponse {
        content,
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
        finish_reason,
    })
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl From<&CompletionRequest> for GenerateRequest {
    fn from(request: &CompletionRequest) -> Self {
        let system: Vec<Part> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| Part::text(&m.content))
            .collect();

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(Content::from)
            .collect();

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        Self {
            contents,
            system_instruction: (!system.is_empty()).then_some(Content {
                role: None,
                parts: system,
            }),
            generation_config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl From<&ChatMessage> for Content {
    fn from(msg: &ChatMessage) -> Self {
        // System messages go to `systemInstruction`, so only user turns reach here.
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(&msg.content)],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsPage {
    #[serde(default)]
    models: Vec<ApiModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<ApiModel> for ModelInfo {
    fn from(m: ApiModel) -> Self {
        Self {
            name: m.name,
            display_name: m.display_name,
            description: m.description,
            supported_methods: m.supported_generation_methods,
        }
    }
}

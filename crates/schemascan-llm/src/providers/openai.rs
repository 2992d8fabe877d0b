//! `OpenAI` API provider implementation.

use super::common::{build_http_client, convert_role_standard, StandardMessage, StandardUsage};
use crate::error::{LlmError, Result};
use crate::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// `OpenAI` API provider.
///
/// Supports GPT models via `OpenAI`'s chat completions API, including the
/// JSON response mode used to constrain compliance verdicts to a single
/// well-formed object.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new `OpenAI` provider with the given API key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_model(api_key, "gpt-4o")
    }

    /// Create a new `OpenAI` provider with a specific model.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            client: build_http_client(Some(60))?,
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Convert internal request to `OpenAI` API format.
    fn to_api_request(&self, request: &CompletionRequest) -> OpenAiRequest {
        let mut messages: Vec<StandardMessage> = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(StandardMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for message in &request.messages {
            messages.push(StandardMessage {
                role: convert_role_standard(message.role),
                content: message.content.clone(),
            });
        }

        OpenAiRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    /// Convert `OpenAI` API response to internal format.
    fn convert_api_response(response: OpenAiResponse) -> Result<CompletionResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError {
                provider: "openai".to_string(),
                message: "no choices in response".to_string(),
            })?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: response.model,
            stop_reason: choice.finish_reason,
            usage: response.usage.map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = self.to_api_request(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if status.as_u16() == 401 {
                return Err(LlmError::AuthenticationFailed {
                    provider: "openai".to_string(),
                    message: error_text,
                });
            }
            return Err(LlmError::ApiError {
                provider: "openai".to_string(),
                status: status.as_u16(),
                message: error_text,
            });
        }

        let api_response: OpenAiResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: "openai".to_string(),
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::convert_api_response(api_response)
    }

    fn provider_id(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<StandardMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<StandardUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: StandardMessage,
    finish_reason: Option<String>,
}

// ABOUTME: OpenAI-compatible chat completions client generating coaching feedback
// ABOUTME: Maps HTTP and payload failures onto AppError so the pipeline can fall back to templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::prompts::{completion_prompt, feedback_prompt, SYSTEM_PROMPT};
use crate::config::LlmConfig;
use crate::constants::llm::{CONNECT_TIMEOUT_SECS, MAX_TOKENS, TEMPERATURE};
use crate::constants::priority;
use crate::errors::{AppError, ErrorCode};
use crate::models::{Exercise, FeedbackKind, FeedbackMessage};
use crate::providers::{FeedbackContext, FeedbackGenerator, FeedbackIntent};

const SERVICE: &str = "LLM";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Feedback generator backed by an OpenAI-compatible endpoint
pub struct OpenAiFeedbackGenerator {
    client: Client,
    config: LlmConfig,
}

impl OpenAiFeedbackGenerator {
    /// Create a generator
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Model requests are sent to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .map(|response| response.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        match status.as_u16() {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("LLM rate limit reached: {detail}"),
            ),
            400 => AppError::invalid_input(format!("LLM rejected the request: {detail}")),
            404 => AppError::not_found(format!("Model or endpoint not found: {detail}")),
            502..=504 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("LLM server is not responding ({status})"),
            ),
            _ => AppError::external_service(SERVICE, format!("API error ({status}): {detail}")),
        }
    }

    /// Send one chat completion and return the trimmed reply
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let response = self
            .add_auth_header(self.client.post(self.api_url()).json(&request))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to LLM: {e}");
                if e.is_timeout() {
                    AppError::timeout(SERVICE, self.config.timeout().as_millis())
                } else if e.is_connect() {
                    AppError::new(
                        ErrorCode::ExternalServiceUnavailable,
                        format!("Cannot connect to LLM at {}", self.config.base_url),
                    )
                } else {
                    AppError::external_service(SERVICE, format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to read response: {e}"))
        })?;
        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().trim_matches('"').to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::external_service(SERVICE, "API returned no content"))?;

        debug!(chars = content.len(), "LLM reply received");
        Ok(content)
    }
}

#[async_trait]
impl FeedbackGenerator for OpenAiFeedbackGenerator {
    async fn generate(&self, context: &FeedbackContext) -> Result<FeedbackMessage, AppError> {
        let text = self.complete(&feedback_prompt(context)).await?;
        let (kind, priority) = match context.intent {
            FeedbackIntent::Encouragement => (FeedbackKind::Encouragement, priority::ENCOURAGEMENT),
            FeedbackIntent::Correction { .. } => (FeedbackKind::Correction, priority::CORRECTION),
        };
        Ok(FeedbackMessage::new(kind, text, priority, true))
    }

    async fn generate_completion_message(
        &self,
        exercise: &Exercise,
        average_score: f64,
    ) -> Result<FeedbackMessage, AppError> {
        let text = self
            .complete(&completion_prompt(exercise, average_score))
            .await?;
        Ok(FeedbackMessage::new(
            FeedbackKind::Completion,
            text,
            priority::ENCOURAGEMENT,
            true,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_response_maps_status() {
        let rate_limited = OpenAiFeedbackGenerator::parse_error_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"slow down"}}"#,
        );
        assert_eq!(rate_limited.code, ErrorCode::ExternalRateLimited);

        let unavailable =
            OpenAiFeedbackGenerator::parse_error_response(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(unavailable.code, ErrorCode::ExternalServiceUnavailable);
    }
}

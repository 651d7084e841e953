// ABOUTME: LLM endpoint configuration loaded from COACH_LLM_* environment variables
// ABOUTME: Targets any OpenAI-compatible chat completions API (Ollama, vLLM, hosted)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::time::Duration;

use super::env_or;
use crate::constants::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};

/// OpenAI-compatible endpoint settings
#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Endpoint root, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token, omitted for local servers
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

// Manual Debug keeps the API key out of logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// Load LLM settings from environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is not an http(s) URL
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            base_url: env::var("COACH_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            model: env::var("COACH_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
            api_key: env::var("COACH_LLM_API_KEY").ok().filter(|key| !key.is_empty()),
            timeout_secs: env_or("COACH_LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the endpoint settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a non-http base URL, an empty model, or a zero timeout
    pub fn validate(&self) -> AppResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "COACH_LLM_BASE_URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::config("COACH_LLM_MODEL must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("COACH_LLM_TIMEOUT_SECS must be positive"));
        }
        Ok(())
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

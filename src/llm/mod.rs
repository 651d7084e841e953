// ABOUTME: LLM-backed feedback generation for coaching messages
// ABOUTME: Prompt construction plus an OpenAI-compatible chat completions client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Feedback Generation
//!
//! [`OpenAiFeedbackGenerator`] implements
//! [`FeedbackGenerator`](crate::providers::FeedbackGenerator) against any
//! server exposing `POST {base_url}/chat/completions`: Ollama, vLLM, or a
//! hosted OpenAI-compatible API.
//!
//! ```rust,no_run
//! use pierre_form_coach::config::LlmConfig;
//! use pierre_form_coach::errors::AppError;
//! use pierre_form_coach::llm::OpenAiFeedbackGenerator;
//!
//! fn build() -> Result<OpenAiFeedbackGenerator, AppError> {
//!     OpenAiFeedbackGenerator::new(LlmConfig::from_env()?)
//! }
//! ```

/// OpenAI-compatible client
pub mod openai_compatible;
/// Prompt templates
pub mod prompts;

pub use openai_compatible::OpenAiFeedbackGenerator;

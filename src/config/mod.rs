// ABOUTME: Configuration module for the coaching pipeline, safety monitor, and LLM client
// ABOUTME: Every setting is read from environment variables with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Pierre form coach
//!
//! - **Coach**: frame stride, feedback throttling, tolerances, and timeouts
//! - **Safety**: thresholds of the default safety monitor
//! - **LLM**: OpenAI-compatible endpoint used for feedback generation

use std::env;
use std::str::FromStr;

/// Pipeline configuration
pub mod coach;
/// LLM endpoint configuration
pub mod llm;
/// Safety monitor thresholds
pub mod safety;

pub use coach::CoachConfig;
pub use llm::LlmConfig;
pub use safety::SafetyConfig;

/// Parse an environment variable, falling back to `default` when unset or malformed
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

// ABOUTME: Coaching pipeline configuration loaded from COACH_* environment variables
// ABOUTME: Controls frame stride, feedback rate limiting, angle tolerance, and stage timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env_or;
use crate::constants::pipeline::{
    DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_DETECT_TIMEOUT_MS, DEFAULT_FEEDBACK_INTERVAL_SECS,
    DEFAULT_FRAME_STRIDE, DEFAULT_MAX_FEEDBACK_CHARS,
};
use crate::constants::posture::DEFAULT_ANGLE_TOLERANCE_DEG;
use crate::errors::{AppError, AppResult};

/// Per-session pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Analyze, feedback, and track run on every Nth exercising frame
    pub frame_stride: u64,
    /// Minimum seconds between feedback generation attempts
    pub feedback_interval_secs: u64,
    /// Tolerance applied around angle requirement bounds
    pub angle_tolerance_deg: f64,
    /// Upper bound on a single pose detection
    pub detect_timeout_ms: u64,
    /// Maximum characters in generated or templated feedback
    pub max_feedback_chars: usize,
    /// Upper bound on completion message generation in `end_session`
    pub completion_timeout_secs: u64,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            frame_stride: DEFAULT_FRAME_STRIDE,
            feedback_interval_secs: DEFAULT_FEEDBACK_INTERVAL_SECS,
            angle_tolerance_deg: DEFAULT_ANGLE_TOLERANCE_DEG,
            detect_timeout_ms: DEFAULT_DETECT_TIMEOUT_MS,
            max_feedback_chars: DEFAULT_MAX_FEEDBACK_CHARS,
            completion_timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
        }
    }
}

impl CoachConfig {
    /// Load pipeline configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resulting values fail validation
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            frame_stride: env_or("COACH_FRAME_STRIDE", DEFAULT_FRAME_STRIDE),
            feedback_interval_secs: env_or(
                "COACH_FEEDBACK_INTERVAL_SECS",
                DEFAULT_FEEDBACK_INTERVAL_SECS,
            ),
            angle_tolerance_deg: env_or("COACH_ANGLE_TOLERANCE_DEG", DEFAULT_ANGLE_TOLERANCE_DEG),
            detect_timeout_ms: env_or("COACH_DETECT_TIMEOUT_MS", DEFAULT_DETECT_TIMEOUT_MS),
            max_feedback_chars: env_or("COACH_MAX_FEEDBACK_CHARS", DEFAULT_MAX_FEEDBACK_CHARS),
            completion_timeout_secs: env_or(
                "COACH_COMPLETION_TIMEOUT_SECS",
                DEFAULT_COMPLETION_TIMEOUT_SECS,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first offending setting
    pub fn validate(&self) -> AppResult<()> {
        if self.frame_stride == 0 {
            return Err(AppError::config("COACH_FRAME_STRIDE must be at least 1"));
        }
        if !self.angle_tolerance_deg.is_finite() || self.angle_tolerance_deg < 0.0 {
            return Err(AppError::config(
                "COACH_ANGLE_TOLERANCE_DEG must be a non-negative number",
            ));
        }
        if self.detect_timeout_ms == 0 {
            return Err(AppError::config("COACH_DETECT_TIMEOUT_MS must be positive"));
        }
        if self.max_feedback_chars < 10 {
            return Err(AppError::config(
                "COACH_MAX_FEEDBACK_CHARS must allow at least 10 characters",
            ));
        }
        Ok(())
    }

    /// Minimum interval between feedback generation attempts
    #[must_use]
    pub const fn feedback_interval(&self) -> Duration {
        Duration::from_secs(self.feedback_interval_secs)
    }

    /// Pose detection timeout
    #[must_use]
    pub const fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }

    /// Completion message timeout
    #[must_use]
    pub const fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }
}

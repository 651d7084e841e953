// ABOUTME: Feedback message models delivered to the user as text and optionally speech
// ABOUTME: Priority is clamped to the 1-5 range on construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::priority::{MAX as MAX_PRIORITY, MIN as MIN_PRIORITY, SAFETY};

/// Type of coaching feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Immediate warning raised by a critical safety alert
    SafetyWarning,
    /// Suggestion to rest raised by a warning alert
    RestPrompt,
    /// Praise for correct form
    Encouragement,
    /// Form correction derived from a deviation
    Correction,
    /// Verbal cue for the current phase
    PhaseCue,
    /// End-of-session message
    Completion,
}

impl FeedbackKind {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SafetyWarning => "safety_warning",
            Self::RestPrompt => "rest_prompt",
            Self::Encouragement => "encouragement",
            Self::Correction => "correction",
            Self::PhaseCue => "phase_cue",
            Self::Completion => "completion",
        }
    }
}

/// A coaching message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Message type
    pub kind: FeedbackKind,
    /// Text shown and spoken to the user
    pub text: String,
    /// Priority in [1, 5], 5 being most urgent
    pub priority: u8,
    /// Whether the message should be spoken aloud
    pub should_speak: bool,
    /// When the message was created
    pub created_at: DateTime<Utc>,
}

impl FeedbackMessage {
    /// Create a message, clamping priority into [1, 5]
    #[must_use]
    pub fn new(kind: FeedbackKind, text: impl Into<String>, priority: u8, should_speak: bool) -> Self {
        Self {
            kind,
            text: text.into(),
            priority: priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            should_speak,
            created_at: Utc::now(),
        }
    }

    /// Whether this message must preempt queued speech
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.priority >= SAFETY
    }
}

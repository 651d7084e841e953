// ABOUTME: Posture analysis results and safety alert models
// ABOUTME: Analysis results are produced fresh each analysis tick and never mutated afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of scoring one pose snapshot against an exercise phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// True when no deviation was found
    pub is_correct: bool,
    /// Form score in [0, 100]
    pub score: f64,
    /// Detected mismatches, index-aligned with `suggestions`
    pub deviations: Vec<String>,
    /// Corrective suggestions, index-aligned with `deviations`
    pub suggestions: Vec<String>,
    /// Measured angles keyed by measurement name (degrees)
    pub angles: BTreeMap<String, f64>,
    /// When the analysis was produced
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// First deviation with its paired suggestion
    #[must_use]
    pub fn first_deviation(&self) -> Option<(&str, &str)> {
        let deviation = self.deviations.first()?;
        let suggestion = self.suggestions.first().map_or("", String::as_str);
        Some((deviation.as_str(), suggestion))
    }

    /// Whether any deviation was found
    #[must_use]
    pub fn has_deviations(&self) -> bool {
        !self.deviations.is_empty()
    }
}

/// Severity of a safety alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Informational
    Info,
    /// The user should slow down or rest
    Warning,
    /// The user should stop the movement now
    Critical,
}

impl AlertLevel {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// What triggered a safety alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Form quality declined over the session
    Fatigue,
    /// Sustained incorrect form
    PoorForm,
    /// Left/right imbalance
    Asymmetry,
    /// Too long without rest
    Overexertion,
}

/// Out-of-band safety signal, independent of form correctness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAlert {
    /// Severity
    pub level: AlertLevel,
    /// Trigger
    pub kind: AlertKind,
    /// What was observed
    pub message: String,
    /// What the user should do
    pub recommendation: String,
}

impl SafetyAlert {
    /// Create an alert
    #[must_use]
    pub fn new(
        level: AlertLevel,
        kind: AlertKind,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Whether this alert is critical
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.level == AlertLevel::Critical
    }
}

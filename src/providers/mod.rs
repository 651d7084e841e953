// ABOUTME: Collaborator traits consumed by the coaching pipeline
// ABOUTME: Pose source, safety monitor, feedback generator, speech synthesizer, exercise repository
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pluggable Collaborators
//!
//! The pipeline never constructs its collaborators. They are handed to
//! [`CoachOrchestrator::new`](crate::session::CoachOrchestrator::new) through
//! [`CoachServices`](crate::session::CoachServices), so a transport layer can
//! swap a real pose model, TTS engine, or LLM for a test double.
//!
//! ## Contracts
//!
//! - [`PoseSource`]: turns a frame into an optional pose snapshot and renders
//!   overlays. Opened lazily through a [`PoseSourceFactory`] and closed
//!   explicitly when the session ends.
//! - [`SafetyMonitor`]: stateful per-session checks over each analysis.
//! - [`FeedbackGenerator`]: async natural-language feedback; may be slow.
//! - [`SpeechSynthesizer`]: text to encoded audio.
//! - [`ExerciseRepository`]: immutable exercise lookup by id.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppResult;
use crate::models::{
    AnalysisResult, Exercise, FeedbackMessage, Frame, OverlayColor, PhaseRequirement,
    PoseSnapshot, SafetyAlert,
};

/// Produces pose estimates for frames of one session
#[async_trait]
pub trait PoseSource: Send {
    /// Estimate the pose in a frame; `Ok(None)` when no body is detected
    async fn detect(&mut self, frame: &Frame) -> AppResult<Option<PoseSnapshot>>;

    /// Render the pose skeleton onto the frame
    fn draw_landmarks(&self, frame: Frame, pose: &PoseSnapshot, color: OverlayColor) -> Frame;

    /// Release model resources
    async fn close(&mut self);
}

/// Opens pose sources on demand
pub trait PoseSourceFactory: Send + Sync {
    /// Acquire a pose source for a new session
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model cannot be loaded
    fn open(&self) -> AppResult<Box<dyn PoseSource>>;
}

/// Outcome of one safety check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheck {
    /// Alerts raised by this check, most severe first
    pub alerts: Vec<SafetyAlert>,
    /// Whether the user should take a rest
    pub should_rest: bool,
}

impl SafetyCheck {
    /// Check with no alerts
    #[must_use]
    pub const fn clear() -> Self {
        Self {
            alerts: Vec::new(),
            should_rest: false,
        }
    }
}

/// Stateful per-session safety checks
pub trait SafetyMonitor: Send {
    /// Reset for a new session
    fn start_session(&mut self);

    /// Inspect the latest pose and its analysis
    fn check(&mut self, pose: &PoseSnapshot, analysis: &AnalysisResult) -> SafetyCheck;

    /// Note that the user took a rest
    fn record_rest(&mut self);

    /// Aggregate statistics merged into the session summary
    fn session_stats(&self) -> Map<String, Value>;
}

/// Which kind of message a generation request should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackIntent {
    /// Positive reinforcement for correct form
    Encouragement,
    /// Correction of a specific deviation
    Correction {
        /// Deviation description
        deviation: String,
        /// Suggested fix
        suggestion: String,
    },
}

/// Everything a generator needs to phrase one message
#[derive(Debug, Clone)]
pub struct FeedbackContext {
    /// Requested message kind
    pub intent: FeedbackIntent,
    /// Exercise being performed
    pub exercise: Arc<Exercise>,
    /// Current phase
    pub phase: PhaseRequirement,
    /// Analysis the message reacts to
    pub analysis: AnalysisResult,
    /// Active safety alerts
    pub alerts: Vec<SafetyAlert>,
    /// Upper bound on message length in characters
    pub max_chars: usize,
}

/// Natural-language feedback generation
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Generate a message for the given context
    async fn generate(&self, context: &FeedbackContext) -> AppResult<FeedbackMessage>;

    /// Generate the closing message of a session
    async fn generate_completion_message(
        &self,
        exercise: &Exercise,
        average_score: f64,
    ) -> AppResult<FeedbackMessage>;
}

/// Text-to-speech
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize encoded audio for `text`
    async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>>;
}

/// Exercise lookup by id
pub trait ExerciseRepository: Send + Sync {
    /// Find an exercise definition
    fn get_exercise(&self, id: &str) -> Option<Exercise>;
}

// ABOUTME: Outward per-tick contract: state snapshot, annotated frame, and feedback payload
// ABOUTME: What a transport layer forwards to the client after each processed frame
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{CoachState, ProgressEvent, SessionState};
use crate::models::{AnalysisResult, FeedbackKind, FeedbackMessage, Frame, PhaseKind, SafetyAlert};

/// Read-only view of the session after a tick or control operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Session identifier
    pub session_id: Uuid,
    /// Lifecycle state
    pub session_state: SessionState,
    /// Exercise being coached
    pub exercise_id: Option<String>,
    /// Fraction of the session completed
    pub progress: f64,
    /// Current phase index
    pub phase_index: usize,
    /// Current phase kind
    pub phase: Option<PhaseKind>,
    /// Current repetition, 1-based
    pub current_rep: u32,
    /// Current set, 1-based
    pub current_set: u32,
    /// Latest analysis
    pub analysis: Option<AnalysisResult>,
    /// Safety monitor recommends a rest
    pub should_rest: bool,
}

impl From<&CoachState> for StateSnapshot {
    fn from(state: &CoachState) -> Self {
        Self {
            session_id: state.session_id,
            session_state: state.session_state,
            exercise_id: state.exercise.as_ref().map(|exercise| exercise.id.clone()),
            progress: state.progress(),
            phase_index: state.phase_index,
            phase: state.current_phase().map(|phase| phase.kind),
            current_rep: state.current_rep,
            current_set: state.current_set,
            analysis: state.analysis.clone(),
            should_rest: state.should_rest,
        }
    }
}

/// Feedback delivered to the client on the tick it was harvested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    /// Message text
    pub text: String,
    /// Message kind
    pub kind: FeedbackKind,
    /// Priority in [1, 5]
    pub priority: u8,
    /// Base64-encoded synthesized audio, when available
    pub audio: Option<String>,
}

impl FeedbackPayload {
    /// Build a payload, base64-encoding any audio
    #[must_use]
    pub fn new(message: &FeedbackMessage, audio: Option<&[u8]>) -> Self {
        Self {
            text: message.text.clone(),
            kind: message.kind,
            priority: message.priority,
            audio: audio.map(|bytes| STANDARD.encode(bytes)),
        }
    }
}

/// Everything produced by one `process_frame` call
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    /// State after the tick
    pub snapshot: StateSnapshot,
    /// Frame with overlay, or the input frame when nothing was drawn
    pub frame: Option<Frame>,
    /// Feedback harvested on this tick
    pub feedback: Option<FeedbackPayload>,
    /// Active safety alerts
    pub alerts: Vec<SafetyAlert>,
    /// Progression step taken on this tick
    pub progress_event: Option<ProgressEvent>,
    /// Session has completed
    pub completed: bool,
}

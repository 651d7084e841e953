// ABOUTME: Mutable per-session coaching state and the phase/rep/set progression algorithm
// ABOUTME: Owned exclusively by the orchestrator and lent to each stage for one tick
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session State
//!
//! `CoachState` is the single record the pipeline stages read and write. Each
//! stage owns a fixed slice of it:
//!
//! | Stage    | Writes                                                          |
//! |----------|-----------------------------------------------------------------|
//! | Detect   | `current_pose`, `pose_history`, `total_frames_analyzed`         |
//! | Analyze  | `analysis`, `safety_alerts`, `should_rest`, `rep_scores`        |
//! | Feedback | `pending_feedback`, `should_speak`, `feedback_history`          |
//! | Track    | `phase_index`, `current_rep`, `current_set`, `phase_start_time` |

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::constants::session::{FEEDBACK_HISTORY_CAPACITY, POSE_HISTORY_CAPACITY};
use crate::models::{
    AnalysisResult, Exercise, FeedbackMessage, PhaseRequirement, PoseSnapshot, SafetyAlert,
};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No exercise selected
    #[default]
    Idle,
    /// Exercise selected, waiting for the user to start
    Preparing,
    /// Frames are analyzed and progression runs
    Exercising,
    /// User paused; frames pass through
    Paused,
    /// User resting; frames pass through
    Resting,
    /// Terminal state
    Completed,
}

impl SessionState {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Exercising => "exercising",
            Self::Paused => "paused",
            Self::Resting => "resting",
            Self::Completed => "completed",
        }
    }
}

/// Result of one progression step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Moved to the next phase of the same repetition
    PhaseAdvanced,
    /// Finished a repetition; back to the first phase
    RepCompleted,
    /// Finished a set; back to the first repetition
    SetCompleted,
    /// Finished the last set; the session is now completed
    SessionCompleted,
    /// Nothing to advance (no exercise, or already completed)
    Halted,
}

/// Mutable coaching state of one session
#[derive(Debug, Clone)]
pub struct CoachState {
    /// Session identifier
    pub session_id: Uuid,
    /// Lifecycle state
    pub session_state: SessionState,
    /// Exercise being coached
    pub exercise: Option<Arc<Exercise>>,
    /// Index into the exercise phases
    pub phase_index: usize,
    /// Current set, 1-based
    pub current_set: u32,
    /// Current repetition within the set, 1-based
    pub current_rep: u32,
    /// When the current phase started; `None` until the next track tick
    pub phase_start_time: Option<Instant>,
    /// When the session was paused or sent to rest
    pub suspended_at: Option<Instant>,
    /// Latest accepted pose
    pub current_pose: Option<PoseSnapshot>,
    /// Recent poses, oldest first
    pub pose_history: VecDeque<PoseSnapshot>,
    /// Latest analysis
    pub analysis: Option<AnalysisResult>,
    /// Alerts from the latest safety check
    pub safety_alerts: Vec<SafetyAlert>,
    /// Latest harvested feedback
    pub pending_feedback: Option<FeedbackMessage>,
    /// Recent feedback, oldest first
    pub feedback_history: VecDeque<FeedbackMessage>,
    /// Every positive analysis score of the session
    pub rep_scores: Vec<f64>,
    /// Frames submitted while a session existed
    pub frames_received: u64,
    /// Frames that produced an accepted pose
    pub total_frames_analyzed: u64,
    /// Paused flag mirrored for clients
    pub is_paused: bool,
    /// Safety monitor recommends a rest
    pub should_rest: bool,
    /// Pending feedback should be spoken
    pub should_speak: bool,
    /// Wall-clock session start
    pub started_at: DateTime<Utc>,
}

impl CoachState {
    /// Fresh idle state for an exercise
    #[must_use]
    pub fn new(exercise: Arc<Exercise>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            session_state: SessionState::Idle,
            exercise: Some(exercise),
            phase_index: 0,
            current_set: 1,
            current_rep: 1,
            phase_start_time: None,
            suspended_at: None,
            current_pose: None,
            pose_history: VecDeque::with_capacity(POSE_HISTORY_CAPACITY),
            analysis: None,
            safety_alerts: Vec::new(),
            pending_feedback: None,
            feedback_history: VecDeque::with_capacity(FEEDBACK_HISTORY_CAPACITY),
            rep_scores: Vec::new(),
            frames_received: 0,
            total_frames_analyzed: 0,
            is_paused: false,
            should_rest: false,
            should_speak: false,
            started_at: Utc::now(),
        }
    }

    /// Phase currently being performed
    #[must_use]
    pub fn current_phase(&self) -> Option<&PhaseRequirement> {
        self.exercise.as_deref()?.phase(self.phase_index)
    }

    /// Whether the pipeline stages should run
    #[must_use]
    pub fn is_exercising(&self) -> bool {
        self.session_state == SessionState::Exercising
    }

    /// Accept a detected pose
    pub fn record_pose(&mut self, pose: PoseSnapshot) {
        if self.pose_history.len() >= POSE_HISTORY_CAPACITY {
            self.pose_history.pop_front();
        }
        self.pose_history.push_back(pose.clone());
        self.current_pose = Some(pose);
        self.total_frames_analyzed += 1;
    }

    /// Accept a harvested feedback message
    pub fn record_feedback(&mut self, message: FeedbackMessage) {
        if self.feedback_history.len() >= FEEDBACK_HISTORY_CAPACITY {
            self.feedback_history.pop_front();
        }
        self.should_speak = message.should_speak;
        self.feedback_history.push_back(message.clone());
        self.pending_feedback = Some(message);
    }

    /// Advance the phase/rep/set progression by one phase
    ///
    /// Past the last phase the repetition advances, past the last repetition
    /// the set advances, and past the last set the session completes. Once
    /// completed, further calls return [`ProgressEvent::Halted`].
    pub fn advance_phase(&mut self) -> ProgressEvent {
        let Some(exercise) = self.exercise.clone() else {
            return ProgressEvent::Halted;
        };
        if self.session_state == SessionState::Completed {
            return ProgressEvent::Halted;
        }

        self.phase_start_time = None;
        self.phase_index += 1;
        if self.phase_index < exercise.phases.len() {
            return ProgressEvent::PhaseAdvanced;
        }

        self.phase_index = 0;
        self.current_rep += 1;
        if self.current_rep <= exercise.repetitions {
            return ProgressEvent::RepCompleted;
        }

        self.current_rep = 1;
        self.current_set += 1;
        if self.current_set <= exercise.sets {
            return ProgressEvent::SetCompleted;
        }

        // Park on the last repetition so snapshots stay within range
        self.current_set = exercise.sets;
        self.current_rep = exercise.repetitions;
        self.session_state = SessionState::Completed;
        ProgressEvent::SessionCompleted
    }

    /// Repetitions finished so far across all sets
    #[must_use]
    pub fn completed_repetitions(&self) -> u32 {
        let Some(exercise) = self.exercise.as_deref() else {
            return 0;
        };
        if self.progression_finished() {
            return exercise.total_repetitions();
        }
        self.current_set.saturating_sub(1) * exercise.repetitions + self.current_rep.saturating_sub(1)
    }

    /// Sets finished so far
    #[must_use]
    pub fn completed_sets(&self) -> u32 {
        match self.exercise.as_deref() {
            Some(exercise) if self.progression_finished() => exercise.sets,
            Some(_) => self.current_set.saturating_sub(1),
            None => 0,
        }
    }

    /// Fraction of the session completed, in [0, 1]
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.exercise.as_deref() {
            Some(exercise) if exercise.total_repetitions() > 0 => {
                f64::from(self.completed_repetitions()) / f64::from(exercise.total_repetitions())
            }
            _ => 0.0,
        }
    }

    /// Mean of the recorded scores, 0 when none were recorded
    #[must_use]
    pub fn average_score(&self) -> f64 {
        if self.rep_scores.is_empty() {
            return 0.0;
        }
        self.rep_scores.iter().sum::<f64>() / self.rep_scores.len() as f64
    }

    /// Stop the phase clock
    pub fn suspend(&mut self, now: Instant) {
        if self.suspended_at.is_none() {
            self.suspended_at = Some(now);
        }
    }

    /// Restart the phase clock, excluding the suspended interval
    pub fn unsuspend(&mut self, now: Instant) {
        if let Some(suspended_at) = self.suspended_at.take() {
            if let Some(start) = self.phase_start_time.as_mut() {
                *start += now.saturating_duration_since(suspended_at);
            }
        }
    }

    fn progression_finished(&self) -> bool {
        self.session_state == SessionState::Completed
    }
}

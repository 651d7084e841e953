// ABOUTME: Coaching session orchestrator driving the per-frame pipeline and the session state machine
// ABOUTME: IDLE -> PREPARING -> EXERCISING <-> PAUSED/RESTING -> COMPLETED
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Coaching Session Orchestrator
//!
//! One orchestrator drives at most one session at a time and expects frames to
//! be submitted sequentially. Per exercising frame:
//!
//! 1. Detect runs on every frame.
//! 2. Analyze, feedback, and track run on every `frame_stride`-th exercising
//!    frame, counted across the whole session.
//! 3. The frame is annotated with the latest pose and returned.
//!
//! Frames received in any other state pass through unchanged.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use super::outcome::{FeedbackPayload, FrameOutcome, StateSnapshot};
use super::state::{CoachState, ProgressEvent, SessionState};
use crate::config::CoachConfig;
use crate::constants::priority;
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, FeedbackKind, FeedbackMessage, Frame};
use crate::providers::{
    ExerciseRepository, FeedbackGenerator, PoseSourceFactory, SafetyMonitor, SpeechSynthesizer,
};
use crate::stages::{
    AnalyzeStage, DetectStage, EnqueueMode, FeedbackSlot, FeedbackStage, SpeechClip, SpeechQueue,
    TrackStage,
};

/// Collaborators handed to a new orchestrator
pub struct CoachServices {
    /// Exercise lookup
    pub exercises: Arc<dyn ExerciseRepository>,
    /// Pose source factory
    pub pose_sources: Arc<dyn PoseSourceFactory>,
    /// Per-session safety monitor
    pub safety: Box<dyn SafetyMonitor>,
    /// Feedback generator; templates only when absent
    pub generator: Option<Arc<dyn FeedbackGenerator>>,
    /// Text-to-speech
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    /// Destination of queued speech; feedback audio is synthesized inline when absent
    pub speech_sink: Option<mpsc::UnboundedSender<SpeechClip>>,
}

impl CoachServices {
    /// Required collaborators only
    #[must_use]
    pub fn new(
        exercises: Arc<dyn ExerciseRepository>,
        pose_sources: Arc<dyn PoseSourceFactory>,
        safety: Box<dyn SafetyMonitor>,
    ) -> Self {
        Self {
            exercises,
            pose_sources,
            safety,
            generator: None,
            synthesizer: None,
            speech_sink: None,
        }
    }

    /// Use a feedback generator
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn FeedbackGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Use a speech synthesizer
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Route spoken feedback through a serial speech queue into `sink`
    #[must_use]
    pub fn with_speech_sink(mut self, sink: mpsc::UnboundedSender<SpeechClip>) -> Self {
        self.speech_sink = Some(sink);
        self
    }
}

struct ActiveSession {
    state: CoachState,
    feedback_slot: FeedbackSlot,
    speech: Option<SpeechQueue>,
    exercising_frames: u64,
    started: Instant,
}

/// Drives one coaching session at a time
pub struct CoachOrchestrator {
    config: CoachConfig,
    exercises: Arc<dyn ExerciseRepository>,
    safety: Box<dyn SafetyMonitor>,
    generator: Option<Arc<dyn FeedbackGenerator>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    speech_sink: Option<mpsc::UnboundedSender<SpeechClip>>,
    detect: DetectStage,
    analyze: AnalyzeStage,
    feedback: FeedbackStage,
    session: Option<ActiveSession>,
}

impl CoachOrchestrator {
    /// Create an orchestrator with no active session
    #[must_use]
    pub fn new(config: CoachConfig, services: CoachServices) -> Self {
        let detect = DetectStage::new(services.pose_sources, config.detect_timeout());
        let analyze = AnalyzeStage::new(config.angle_tolerance_deg);
        let feedback = FeedbackStage::new(
            services.generator.clone(),
            services.synthesizer.clone(),
            config.feedback_interval(),
            config.max_feedback_chars,
        );
        Self {
            config,
            exercises: services.exercises,
            safety: services.safety,
            generator: services.generator,
            synthesizer: services.synthesizer,
            speech_sink: services.speech_sink,
            detect,
            analyze,
            feedback,
            session: None,
        }
    }

    /// Pipeline configuration
    #[must_use]
    pub const fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Whether a session is active
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Current session state, if a session is active
    #[must_use]
    pub fn snapshot(&self) -> Option<StateSnapshot> {
        self.session
            .as_ref()
            .map(|session| StateSnapshot::from(&session.state))
    }

    /// Read-only access to the full session state
    #[must_use]
    pub fn state(&self) -> Option<&CoachState> {
        self.session.as_ref().map(|session| &session.state)
    }

    /// Whether a feedback generation is currently in flight
    #[must_use]
    pub fn feedback_in_flight(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.feedback_slot.is_in_flight())
    }

    /// Start a session for an exercise, ending any active session first
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown exercise id and `InvalidInput`
    /// for an exercise definition that fails validation
    pub async fn start_session(&mut self, exercise_id: &str) -> AppResult<StateSnapshot> {
        let exercise = self
            .exercises
            .get_exercise(exercise_id)
            .ok_or_else(|| AppError::not_found(format!("Exercise '{exercise_id}'")))?;
        exercise.validate()?;

        if let Some(previous) = self.session.as_ref() {
            info!(session.id = %previous.state.session_id, "Ending active session before starting a new one");
            self.end_session().await;
        }

        let mut state = CoachState::new(Arc::new(exercise));
        state.session_state = SessionState::Preparing;
        self.safety.start_session();

        info!(
            session.id = %state.session_id,
            exercise.id = exercise_id,
            "Coaching session started"
        );

        let snapshot = StateSnapshot::from(&state);
        self.session = Some(ActiveSession {
            state,
            feedback_slot: FeedbackSlot::new(),
            speech: None,
            exercising_frames: 0,
            started: Instant::now(),
        });
        Ok(snapshot)
    }

    /// Begin exercising; only valid while preparing
    pub fn start_exercise(&mut self) -> Option<StateSnapshot> {
        let state = &mut self.session.as_mut()?.state;
        if state.session_state == SessionState::Preparing {
            state.session_state = SessionState::Exercising;
            state.phase_start_time = None;
            info!(session.id = %state.session_id, "Exercise started");
        }
        Some(StateSnapshot::from(&*state))
    }

    /// Run one frame through the pipeline
    ///
    /// Returns `None` when no session is active.
    pub async fn process_frame(&mut self, frame: Option<Frame>) -> Option<FrameOutcome> {
        let session = self.session.as_mut()?;
        session.state.frames_received += 1;

        if !session.state.is_exercising() {
            return Some(FrameOutcome {
                snapshot: StateSnapshot::from(&session.state),
                frame,
                feedback: None,
                alerts: session.state.safety_alerts.clone(),
                progress_event: None,
                completed: session.state.session_state == SessionState::Completed,
            });
        }

        self.detect.run(&mut session.state, frame.as_ref()).await;

        session.exercising_frames += 1;
        let mut harvested = None;
        let mut progress_event = None;
        if session.exercising_frames % self.config.frame_stride.max(1) == 0 {
            self.analyze.run(&mut session.state, self.safety.as_mut());
            harvested = self
                .feedback
                .run(&mut session.state, &mut session.feedback_slot)
                .await;
            progress_event = TrackStage::run(&mut session.state, Instant::now());
        }

        let feedback = match harvested {
            Some(message) => Some(
                deliver_feedback(
                    &self.feedback,
                    self.synthesizer.as_ref(),
                    self.speech_sink.as_ref(),
                    session,
                    &message,
                )
                .await,
            ),
            None => None,
        };

        let frame = frame.map(|frame| self.detect.annotate(frame, &session.state));
        let completed = session.state.session_state == SessionState::Completed;
        if progress_event == Some(ProgressEvent::SessionCompleted) {
            FeedbackStage::cancel(&mut session.feedback_slot);
        }

        Some(FrameOutcome {
            snapshot: StateSnapshot::from(&session.state),
            frame,
            feedback,
            alerts: session.state.safety_alerts.clone(),
            progress_event,
            completed,
        })
    }

    /// Pause an exercising session
    pub fn pause(&mut self) -> Option<StateSnapshot> {
        let state = &mut self.session.as_mut()?.state;
        if state.session_state == SessionState::Exercising {
            state.session_state = SessionState::Paused;
            state.is_paused = true;
            state.suspend(Instant::now());
            info!(session.id = %state.session_id, "Session paused");
        }
        Some(StateSnapshot::from(&*state))
    }

    /// Resume a paused session
    pub fn resume(&mut self) -> Option<StateSnapshot> {
        let state = &mut self.session.as_mut()?.state;
        if state.session_state == SessionState::Paused {
            state.session_state = SessionState::Exercising;
            state.is_paused = false;
            state.unsuspend(Instant::now());
            info!(session.id = %state.session_id, "Session resumed");
        }
        Some(StateSnapshot::from(&*state))
    }

    /// Start a rest from an exercising or paused session
    pub fn rest(&mut self) -> Option<StateSnapshot> {
        let state = &mut self.session.as_mut()?.state;
        if matches!(
            state.session_state,
            SessionState::Exercising | SessionState::Paused
        ) {
            state.session_state = SessionState::Resting;
            state.is_paused = false;
            state.should_rest = false;
            state.suspend(Instant::now());
            self.safety.record_rest();
            info!(session.id = %state.session_id, "Rest started");
        }
        Some(StateSnapshot::from(&*state))
    }

    /// Return from a rest to exercising
    pub fn end_rest(&mut self) -> Option<StateSnapshot> {
        let state = &mut self.session.as_mut()?.state;
        if state.session_state == SessionState::Resting {
            state.session_state = SessionState::Exercising;
            state.unsuspend(Instant::now());
            info!(session.id = %state.session_id, "Rest ended");
        }
        Some(StateSnapshot::from(&*state))
    }

    /// End the session and return its summary
    ///
    /// Releases the pose source, cancels feedback generation, and closes the
    /// speech queue. Returns an empty map when no session is active.
    pub async fn end_session(&mut self) -> Map<String, Value> {
        let Some(mut session) = self.session.take() else {
            return Map::new();
        };

        FeedbackStage::cancel(&mut session.feedback_slot);
        if let Some(speech) = session.speech.as_mut() {
            speech.close().await;
        }
        self.detect.release().await;

        let state = &mut session.state;
        let finished = state.session_state == SessionState::Completed;
        let completed_sets = state.completed_sets();
        let completed_repetitions = state.completed_repetitions();
        let progress = state.progress();
        state.session_state = SessionState::Completed;

        let average_score = state.average_score();
        let mut summary = Map::new();
        summary.insert("session_id".into(), json!(state.session_id));
        if let Some(exercise) = state.exercise.clone() {
            let completion = self.completion_message(&exercise, average_score).await;
            summary.insert("exercise_id".into(), json!(exercise.id));
            summary.insert("exercise_name".into(), json!(exercise.name));
            summary.insert("total_repetitions".into(), json!(exercise.total_repetitions()));
            summary.insert("completion_message".into(), json!(completion.text));
        }
        summary.insert("average_score".into(), json!(average_score));
        summary.insert("total_frames_analyzed".into(), json!(state.total_frames_analyzed));
        summary.insert("frames_received".into(), json!(state.frames_received));
        summary.insert("completed_sets".into(), json!(completed_sets));
        summary.insert("completed_repetitions".into(), json!(completed_repetitions));
        summary.insert("progress".into(), json!(progress));
        summary.insert("finished".into(), json!(finished));
        summary.insert("feedback_count".into(), json!(state.feedback_history.len()));
        summary.insert(
            "duration_seconds".into(),
            json!(session.started.elapsed().as_secs_f64()),
        );
        for (key, value) in self.safety.session_stats() {
            summary.entry(key).or_insert(value);
        }

        info!(
            session.id = %state.session_id,
            average_score,
            completed_repetitions,
            finished,
            "Coaching session ended"
        );
        summary
    }

    /// Synthesize audio for the pending feedback on demand
    pub async fn get_speech_audio(&self) -> Option<Vec<u8>> {
        let session = self.session.as_ref()?;
        self.feedback.synthesize_speech(&session.state).await
    }

    async fn completion_message(&self, exercise: &Exercise, average_score: f64) -> FeedbackMessage {
        let fallback = || {
            FeedbackMessage::new(
                FeedbackKind::Completion,
                format!(
                    "Well done! You finished {} with an average form score of {average_score:.0}.",
                    exercise.name
                ),
                priority::ENCOURAGEMENT,
                true,
            )
        };
        let Some(generator) = self.generator.as_ref() else {
            return fallback();
        };

        let limit = self.config.completion_timeout();
        match timeout(limit, generator.generate_completion_message(exercise, average_score)).await {
            Ok(Ok(message)) => message,
            Ok(Err(e)) => {
                warn!(error = %e, "Completion message generation failed, using template");
                fallback()
            }
            Err(_) => {
                warn!(timeout_secs = limit.as_secs(), "Completion message timed out, using template");
                fallback()
            }
        }
    }
}

/// Turn a harvested message into a payload, routing audio through the speech queue when one is configured
async fn deliver_feedback(
    feedback: &FeedbackStage,
    synthesizer: Option<&Arc<dyn SpeechSynthesizer>>,
    speech_sink: Option<&mpsc::UnboundedSender<SpeechClip>>,
    session: &mut ActiveSession,
    message: &FeedbackMessage,
) -> FeedbackPayload {
    if !message.should_speak {
        return FeedbackPayload::new(message, None);
    }

    if let (Some(synthesizer), Some(sink)) = (synthesizer, speech_sink) {
        let queue = session
            .speech
            .get_or_insert_with(|| SpeechQueue::new(Arc::clone(synthesizer), sink.clone()));
        let mode = if message.is_urgent() {
            EnqueueMode::Priority
        } else {
            EnqueueMode::Normal
        };
        queue.enqueue(message.clone(), mode).await;
        debug!(session.id = %session.state.session_id, ?mode, "Feedback queued for speech");
        return FeedbackPayload::new(message, None);
    }

    let audio = feedback.synthesize_speech(&session.state).await;
    FeedbackPayload::new(message, audio.as_deref())
}

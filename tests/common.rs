// ABOUTME: Shared test utilities for coaching pipeline integration tests
// ABOUTME: Pose builders, test exercises, and scripted collaborator doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_form_coach`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use pierre_form_coach::catalog::ExerciseCatalog;
use pierre_form_coach::config::CoachConfig;
use pierre_form_coach::errors::{AppError, AppResult};
use pierre_form_coach::models::{
    AngleRequirement, DifficultyLevel, Exercise, ExerciseCategory, FeedbackKind, FeedbackMessage,
    Frame, FrameAnnotation, Keypoint, Landmark, OverlayColor, PhaseKind, PhaseRequirement,
    PoseSnapshot, Side,
};
use pierre_form_coach::providers::{
    FeedbackContext, FeedbackGenerator, FeedbackIntent, PoseSource, PoseSourceFactory,
    SpeechSynthesizer,
};
use pierre_form_coach::safety::SessionSafetyMonitor;
use pierre_form_coach::session::{CoachOrchestrator, CoachServices};
use tokio::time::sleep;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Pose builders
// ============================================================================

/// Upright, level pose with every one of the 33 landmarks present
///
/// Shoulders at y=0.3, hips at y=0.5, knees at y=0.7, ankles at y=0.9, so the
/// spine is vertical, the pelvis level, and both knees straight (180°).
pub fn upright_pose(frame_id: u64) -> PoseSnapshot {
    let mut pose = PoseSnapshot::new(frame_id);
    for index in 0..33 {
        pose.insert(index, Landmark::new(0.5, 0.1));
    }
    for (side, x) in [(Side::Left, 0.45), (Side::Right, 0.55)] {
        pose.insert(Keypoint::shoulder(side).index(), Landmark::new(x, 0.3));
        pose.insert(Keypoint::elbow(side).index(), Landmark::new(x, 0.4));
        pose.insert(Keypoint::wrist(side).index(), Landmark::new(x, 0.5));
        pose.insert(Keypoint::hip(side).index(), Landmark::new(x, 0.5));
        pose.insert(Keypoint::knee(side).index(), Landmark::new(x, 0.7));
        pose.insert(Keypoint::ankle(side).index(), Landmark::new(x, 0.9));
    }
    pose
}

/// Upright pose with both knees bent to `degrees`, mirrored so the body stays symmetric
pub fn pose_with_left_knee(frame_id: u64, degrees: f64) -> PoseSnapshot {
    let mut pose = upright_pose(frame_id);
    let radians = degrees.to_radians();
    let (dx, dy) = (0.2 * radians.sin(), -0.2 * radians.cos());
    pose.insert(Keypoint::LeftAnkle.index(), Landmark::new(0.45 - dx, 0.7 + dy));
    pose.insert(Keypoint::RightAnkle.index(), Landmark::new(0.55 + dx, 0.7 + dy));
    pose
}

/// Upright pose whose right side sits `offset` lower than the left
pub fn lopsided_pose(frame_id: u64, offset: f64) -> PoseSnapshot {
    let mut pose = upright_pose(frame_id);
    for keypoint in [
        Keypoint::RightShoulder,
        Keypoint::RightHip,
        Keypoint::RightKnee,
        Keypoint::RightAnkle,
    ] {
        if let Some(landmark) = pose.get(keypoint).copied() {
            pose.insert(keypoint.index(), Landmark::new(landmark.x, landmark.y + offset));
        }
    }
    pose
}

/// Pose with only `count` landmarks
pub fn sparse_pose(frame_id: u64, count: usize) -> PoseSnapshot {
    let mut pose = PoseSnapshot::new(frame_id);
    for index in 0..count {
        pose.insert(index, Landmark::new(0.5, 0.5));
    }
    pose
}

// ============================================================================
// Exercises
// ============================================================================

/// Single-phase exercise requiring the left knee between 80° and 100°
pub fn knee_exercise(phase_secs: f64, repetitions: u32, sets: u32) -> Exercise {
    Exercise {
        id: "knee_hold".to_owned(),
        name: "Knee Hold".to_owned(),
        category: ExerciseCategory::Strength,
        description: "Hold the knee at a right angle".to_owned(),
        difficulty: DifficultyLevel::Beginner,
        phases: vec![PhaseRequirement::new(PhaseKind::Hold, phase_secs)
            .require(AngleRequirement::new("left_knee", 80.0, 100.0, 90.0))
            .describe("Hold your knee at ninety degrees")
            .cue("Hold steady")
            .cue("Keep breathing")],
        repetitions,
        sets,
    }
}

/// Catalog containing only the given exercises
pub fn catalog_with(exercises: impl IntoIterator<Item = Exercise>) -> Arc<ExerciseCatalog> {
    let mut catalog = ExerciseCatalog::new();
    for exercise in exercises {
        catalog.insert(exercise).unwrap();
    }
    Arc::new(catalog)
}

// ============================================================================
// Pose source doubles
// ============================================================================

/// Counts pose source lifecycle calls
#[derive(Debug, Default)]
pub struct SourceCounters {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub detections: AtomicUsize,
}

/// Answers every frame with a pose built from the frame id
pub struct ScriptedPoseFactory {
    script: Arc<dyn Fn(u64) -> Option<PoseSnapshot> + Send + Sync>,
    delay: Duration,
    slow_from: u64,
    pub counters: Arc<SourceCounters>,
}

impl ScriptedPoseFactory {
    pub fn new(script: impl Fn(u64) -> Option<PoseSnapshot> + Send + Sync + 'static) -> Self {
        Self {
            script: Arc::new(script),
            delay: Duration::ZERO,
            slow_from: 0,
            counters: Arc::new(SourceCounters::default()),
        }
    }

    /// Always answer with a correct pose (left knee at 90°)
    pub fn correct() -> Self {
        Self::new(|frame_id| Some(pose_with_left_knee(frame_id, 90.0)))
    }

    /// Delay every detection
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay detections of frames with id `frame_id` and later
    pub fn slow_from(mut self, frame_id: u64, delay: Duration) -> Self {
        self.delay = delay;
        self.slow_from = frame_id;
        self
    }
}

impl PoseSourceFactory for ScriptedPoseFactory {
    fn open(&self) -> AppResult<Box<dyn PoseSource>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPoseSource {
            script: Arc::clone(&self.script),
            delay: self.delay,
            slow_from: self.slow_from,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct ScriptedPoseSource {
    script: Arc<dyn Fn(u64) -> Option<PoseSnapshot> + Send + Sync>,
    delay: Duration,
    slow_from: u64,
    counters: Arc<SourceCounters>,
}

#[async_trait]
impl PoseSource for ScriptedPoseSource {
    async fn detect(&mut self, frame: &Frame) -> AppResult<Option<PoseSnapshot>> {
        self.counters.detections.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() && frame.id >= self.slow_from {
            sleep(self.delay).await;
        }
        Ok((self.script)(frame.id))
    }

    fn draw_landmarks(&self, mut frame: Frame, pose: &PoseSnapshot, color: OverlayColor) -> Frame {
        frame.annotation = Some(FrameAnnotation {
            color,
            landmarks_drawn: pose.keypoint_count(),
        });
        frame
    }

    async fn close(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Generator and synthesizer doubles
// ============================================================================

/// Generator answering after a fixed delay, or failing
pub struct MockGenerator {
    delay: Duration,
    fail: bool,
    pub calls: AtomicUsize,
    pub intents: Mutex<Vec<FeedbackIntent>>,
}

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            calls: AtomicUsize::new(0),
            intents: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGenerator for MockGenerator {
    async fn generate(&self, context: &FeedbackContext) -> AppResult<FeedbackMessage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.intents.lock().unwrap().push(context.intent.clone());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::external_service("mock", "generation unavailable"));
        }
        let kind = match context.intent {
            FeedbackIntent::Encouragement => FeedbackKind::Encouragement,
            FeedbackIntent::Correction { .. } => FeedbackKind::Correction,
        };
        Ok(FeedbackMessage::new(kind, "generated feedback", 2, true))
    }

    async fn generate_completion_message(
        &self,
        exercise: &Exercise,
        _average_score: f64,
    ) -> AppResult<FeedbackMessage> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::external_service("mock", "generation unavailable"));
        }
        Ok(FeedbackMessage::new(
            FeedbackKind::Completion,
            format!("generated completion for {}", exercise.name),
            2,
            true,
        ))
    }
}

/// Synthesizer returning the UTF-8 bytes of the text
pub struct EchoSynthesizer {
    delay: Duration,
    fail_on: Option<String>,
    pub calls: AtomicUsize,
}

impl EchoSynthesizer {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_owned()),
            ..Self::new()
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for EchoSynthesizer {
    async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail_on.as_deref() == Some(text) {
            return Err(AppError::external_service("tts", "voice unavailable"));
        }
        Ok(text.as_bytes().to_vec())
    }
}

// ============================================================================
// Orchestrator builders
// ============================================================================

/// Services over a catalog and pose factory with the default safety monitor
pub fn services(
    exercises: Arc<ExerciseCatalog>,
    poses: Arc<dyn PoseSourceFactory>,
) -> CoachServices {
    CoachServices::new(exercises, poses, Box::new(SessionSafetyMonitor::default()))
}

/// Orchestrator over one knee exercise and a correct-pose source
pub fn knee_orchestrator(config: CoachConfig, exercise: Exercise) -> CoachOrchestrator {
    init_test_logging();
    CoachOrchestrator::new(
        config,
        services(catalog_with([exercise]), Arc::new(ScriptedPoseFactory::correct())),
    )
}

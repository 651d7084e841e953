// ABOUTME: Per-frame pipeline stages: detect, analyze, feedback, track, plus the speech queue
// ABOUTME: Each stage reads the session state and writes only its own slice of it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pipeline Stages
//!
//! The orchestrator runs the stages in a fixed order on every exercising
//! frame: detect always, then analyze, feedback, and track on every Nth frame.
//! A stage never fails the tick; faults are logged and leave its slice of the
//! state unchanged.

/// Posture scoring and safety checks
pub mod analyze;
/// Pose detection and overlay rendering
pub mod detect;
/// Rate-limited background feedback generation
pub mod feedback;
/// Serialized speech synthesis queue
pub mod speech;
/// Phase timing and progression
pub mod track;

pub use analyze::AnalyzeStage;
pub use detect::DetectStage;
pub use feedback::{FeedbackSlot, FeedbackStage};
pub use speech::{EnqueueMode, SpeechClip, SpeechQueue};
pub use track::TrackStage;

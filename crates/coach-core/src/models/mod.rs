// ABOUTME: Core data models for the form coach
// ABOUTME: Re-exports pose, exercise, analysis, safety, and feedback types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod analysis;
mod exercise;
mod feedback;
mod pose;

pub use analysis::{AlertKind, AlertLevel, AnalysisResult, SafetyAlert};
pub use exercise::{
    AngleRequirement, DifficultyLevel, Exercise, ExerciseCategory, PhaseKind, PhaseRequirement,
};
pub use feedback::{FeedbackKind, FeedbackMessage};
pub use pose::{Keypoint, Landmark, PoseSnapshot, Side};

// ABOUTME: Exercise definition models: phases, angle requirements, repetitions, and sets
// ABOUTME: Immutable reference data looked up by id and scored against during a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Exercise category, used to select category-specific posture checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    /// Breath-led exercises (diaphragmatic breathing, box breathing)
    #[default]
    Breathing,
    /// Pelvic floor activation and release
    PelvicFloor,
    /// Deep core stability work
    CoreStability,
    /// Static and dynamic stretching
    Stretching,
    /// Strength movements
    Strength,
    /// Standing or seated posture drills
    Posture,
}

impl ExerciseCategory {
    /// Categories whose form depends on a stable, level pelvis
    #[must_use]
    pub const fn concerns_pelvic_stability(&self) -> bool {
        matches!(self, Self::PelvicFloor | Self::CoreStability)
    }

    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breathing => "breathing",
            Self::PelvicFloor => "pelvic_floor",
            Self::CoreStability => "core_stability",
            Self::Stretching => "stretching",
            Self::Strength => "strength",
            Self::Posture => "posture",
        }
    }
}

/// Difficulty level for exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    /// Suitable for beginners with no prior experience
    #[default]
    Beginner,
    /// Requires some practice
    Intermediate,
    /// For experienced practitioners
    Advanced,
}

/// Named sub-step of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Getting into the starting position
    Preparation,
    /// Breathing in
    Inhale,
    /// Breathing out
    Exhale,
    /// Holding a position
    Hold,
    /// Engaging a muscle group
    Contract,
    /// Letting a muscle group go
    Release,
    /// Raising a body segment
    Lift,
    /// Lowering a body segment
    Lower,
    /// Passive recovery inside a repetition
    Rest,
}

impl PhaseKind {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preparation => "preparation",
            Self::Inhale => "inhale",
            Self::Exhale => "exhale",
            Self::Hold => "hold",
            Self::Contract => "contract",
            Self::Release => "release",
            Self::Lift => "lift",
            Self::Lower => "lower",
            Self::Rest => "rest",
        }
    }
}

/// Accepted range for one joint angle during a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRequirement {
    /// Joint name as authored in the exercise definition (e.g. `left_knee`, `spine`)
    pub joint: String,
    /// Minimum accepted angle (degrees)
    pub min_angle: f64,
    /// Maximum accepted angle (degrees)
    pub max_angle: f64,
    /// Ideal angle (degrees)
    pub ideal_angle: f64,
}

impl AngleRequirement {
    /// Create a requirement for the named joint
    #[must_use]
    pub fn new(joint: impl Into<String>, min_angle: f64, max_angle: f64, ideal_angle: f64) -> Self {
        Self {
            joint: joint.into(),
            min_angle,
            max_angle,
            ideal_angle,
        }
    }
}

/// Requirements of one exercise phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRequirement {
    /// Phase kind
    pub kind: PhaseKind,
    /// Time the phase lasts before the coach advances (seconds)
    pub duration_secs: f64,
    /// Joint angle ranges checked while in this phase
    #[serde(default)]
    pub angle_requirements: Vec<AngleRequirement>,
    /// Short description, also used as a fallback cue
    #[serde(default)]
    pub description: String,
    /// Spoken cues cycled through while in this phase
    #[serde(default)]
    pub verbal_cues: Vec<String>,
}

impl PhaseRequirement {
    /// Create a phase of the given kind and duration
    #[must_use]
    pub fn new(kind: PhaseKind, duration_secs: f64) -> Self {
        Self {
            kind,
            duration_secs,
            angle_requirements: Vec::new(),
            description: String::new(),
            verbal_cues: Vec::new(),
        }
    }

    /// Add an angle requirement
    #[must_use]
    pub fn require(mut self, requirement: AngleRequirement) -> Self {
        self.angle_requirements.push(requirement);
        self
    }

    /// Set the description
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a verbal cue
    #[must_use]
    pub fn cue(mut self, cue: impl Into<String>) -> Self {
        self.verbal_cues.push(cue.into());
        self
    }

    /// Phase duration; non-finite or negative durations collapse to zero
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

/// An exercise definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    #[serde(default)]
    pub category: ExerciseCategory,
    /// Detailed description
    #[serde(default)]
    pub description: String,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    /// Ordered phases of one repetition
    pub phases: Vec<PhaseRequirement>,
    /// Repetitions per set
    pub repetitions: u32,
    /// Number of sets
    pub sets: u32,
}

impl Exercise {
    /// Phase at the given index
    #[must_use]
    pub fn phase(&self, index: usize) -> Option<&PhaseRequirement> {
        self.phases.get(index)
    }

    /// Total repetitions across all sets
    #[must_use]
    pub const fn total_repetitions(&self) -> u32 {
        self.repetitions.saturating_mul(self.sets)
    }

    /// Check structural invariants of the definition
    ///
    /// # Errors
    ///
    /// Returns `AppError::invalid_input` if the exercise has no phases, zero
    /// repetitions or sets, a non-positive phase duration, or an inverted angle range.
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise id must not be empty"));
        }
        if self.phases.is_empty() {
            return Err(AppError::invalid_input(format!(
                "Exercise '{}' has no phases",
                self.id
            )));
        }
        if self.repetitions == 0 || self.sets == 0 {
            return Err(AppError::invalid_input(format!(
                "Exercise '{}' needs at least one repetition and one set",
                self.id
            )));
        }
        for (index, phase) in self.phases.iter().enumerate() {
            if !phase.duration_secs.is_finite() || phase.duration_secs <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "Exercise '{}' phase {index} has a non-positive duration",
                    self.id
                )));
            }
            if let Some(requirement) = phase
                .angle_requirements
                .iter()
                .find(|r| r.min_angle > r.max_angle)
            {
                return Err(AppError::invalid_input(format!(
                    "Exercise '{}' phase {index} has min > max for joint '{}'",
                    self.id, requirement.joint
                )));
            }
        }
        Ok(())
    }
}

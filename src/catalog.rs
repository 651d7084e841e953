// ABOUTME: Exercise catalog with built-in floor exercises and YAML-defined additions
// ABOUTME: Implements the exercise repository consumed by the session orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise Catalog
//!
//! YAML files list exercises under a top-level `exercises` key, using the
//! same field names as [`Exercise`]:
//!
//! ```yaml
//! exercises:
//!   - id: wall_sit
//!     name: Wall Sit
//!     category: strength
//!     repetitions: 3
//!     sets: 1
//!     phases:
//!       - kind: hold
//!         duration_secs: 30
//!         angle_requirements:
//!           - { joint: left_knee, min_angle: 80, max_angle: 100, ideal_angle: 90 }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{
    AngleRequirement, DifficultyLevel, Exercise, ExerciseCategory, PhaseKind, PhaseRequirement,
};
use crate::providers::ExerciseRepository;

#[derive(Deserialize)]
struct CatalogFile {
    exercises: Vec<Exercise>,
}

/// In-memory exercise library keyed by id
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: HashMap<String, Exercise>,
}

impl ExerciseCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in exercises
    #[must_use]
    pub fn builtin() -> Self {
        let exercises = [
            diaphragmatic_breathing(),
            pelvic_tilt(),
            glute_bridge(),
            kegel_hold(),
            dead_bug(),
        ];
        Self {
            exercises: exercises
                .into_iter()
                .map(|exercise| (exercise.id.clone(), exercise))
                .collect(),
        }
    }

    /// Parse a YAML catalog document
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for malformed YAML and `InvalidInput` for an
    /// exercise that fails validation or repeats an id
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml).map_err(|e| {
            AppError::new(ErrorCode::InvalidFormat, format!("Invalid exercise catalog: {e}"))
                .with_source(e)
        })?;

        let mut catalog = Self::new();
        for exercise in file.exercises {
            if catalog.exercises.contains_key(&exercise.id) {
                return Err(AppError::invalid_input(format!(
                    "Duplicate exercise id '{}'",
                    exercise.id
                )));
            }
            catalog.insert(exercise)?;
        }
        Ok(catalog)
    }

    /// Load a YAML catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), exercises = catalog.len(), "Exercise catalog loaded");
        Ok(catalog)
    }

    /// Add or replace an exercise
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the exercise fails validation
    pub fn insert(&mut self, exercise: Exercise) -> AppResult<()> {
        exercise.validate()?;
        self.exercises.insert(exercise.id.clone(), exercise);
        Ok(())
    }

    /// Add every exercise of `other`, replacing same-id entries
    pub fn merge(&mut self, other: Self) {
        self.exercises.extend(other.exercises);
    }

    /// Exercise ids, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.exercises.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of exercises
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl ExerciseRepository for ExerciseCatalog {
    fn get_exercise(&self, id: &str) -> Option<Exercise> {
        self.exercises.get(id).cloned()
    }
}

fn lying_setup(seconds: f64) -> PhaseRequirement {
    PhaseRequirement::new(PhaseKind::Preparation, seconds)
        .describe("Lie on your back with your knees bent and feet flat on the floor")
        .cue("Get comfortable on your back")
        .cue("Bend your knees and rest your feet flat")
}

fn diaphragmatic_breathing() -> Exercise {
    let knees_bent = AngleRequirement::new("left_knee", 70.0, 110.0, 90.0);
    Exercise {
        id: "diaphragmatic_breathing".to_owned(),
        name: "Diaphragmatic Breathing".to_owned(),
        category: ExerciseCategory::Breathing,
        description: "Slow belly breathing lying on your back".to_owned(),
        difficulty: DifficultyLevel::Beginner,
        phases: vec![
            PhaseRequirement::new(PhaseKind::Inhale, 4.0)
                .require(knees_bent.clone())
                .describe("Breathe in through your nose, letting your belly rise")
                .cue("Breathe in slowly, belly rising")
                .cue("Fill your belly, keep your chest still"),
            PhaseRequirement::new(PhaseKind::Exhale, 6.0)
                .require(knees_bent)
                .describe("Breathe out through your mouth, letting your belly fall")
                .cue("Breathe out gently, belly falling")
                .cue("Let all the air go, relax your shoulders"),
        ],
        repetitions: 6,
        sets: 1,
    }
}

fn pelvic_tilt() -> Exercise {
    let knees_bent = AngleRequirement::new("left_knee", 70.0, 110.0, 90.0);
    Exercise {
        id: "pelvic_tilt".to_owned(),
        name: "Pelvic Tilt".to_owned(),
        category: ExerciseCategory::PelvicFloor,
        description: "Gentle rocking of the pelvis to mobilize the lower back".to_owned(),
        difficulty: DifficultyLevel::Beginner,
        phases: vec![
            lying_setup(5.0),
            PhaseRequirement::new(PhaseKind::Contract, 3.0)
                .require(knees_bent.clone())
                .describe("Flatten your lower back into the floor by tilting your pelvis")
                .cue("Press your lower back into the floor")
                .cue("Draw your belly button toward your spine"),
            PhaseRequirement::new(PhaseKind::Release, 3.0)
                .require(knees_bent)
                .describe("Return to a neutral spine")
                .cue("Slowly release back to neutral"),
        ],
        repetitions: 10,
        sets: 2,
    }
}

fn glute_bridge() -> Exercise {
    let knees_bent = AngleRequirement::new("left_knee", 70.0, 110.0, 90.0);
    let hips_extended = AngleRequirement::new("left_hip", 160.0, 185.0, 175.0);
    Exercise {
        id: "glute_bridge".to_owned(),
        name: "Glute Bridge".to_owned(),
        category: ExerciseCategory::Strength,
        description: "Lift the hips off the floor into a straight line from knees to shoulders"
            .to_owned(),
        difficulty: DifficultyLevel::Beginner,
        phases: vec![
            lying_setup(5.0),
            PhaseRequirement::new(PhaseKind::Lift, 2.0)
                .require(knees_bent.clone())
                .describe("Squeeze your glutes and lift your hips")
                .cue("Drive through your heels and lift"),
            PhaseRequirement::new(PhaseKind::Hold, 3.0)
                .require(knees_bent.clone())
                .require(hips_extended)
                .describe("Hold a straight line from knees to shoulders")
                .cue("Hold it, squeeze your glutes")
                .cue("Keep your hips level"),
            PhaseRequirement::new(PhaseKind::Lower, 2.0)
                .require(knees_bent)
                .describe("Lower your hips with control")
                .cue("Lower slowly, one vertebra at a time"),
        ],
        repetitions: 10,
        sets: 2,
    }
}

fn kegel_hold() -> Exercise {
    Exercise {
        id: "kegel_hold".to_owned(),
        name: "Kegel Hold".to_owned(),
        category: ExerciseCategory::PelvicFloor,
        description: "Pelvic floor contraction and hold while sitting tall".to_owned(),
        difficulty: DifficultyLevel::Beginner,
        phases: vec![
            PhaseRequirement::new(PhaseKind::Contract, 2.0)
                .describe("Gently lift and squeeze your pelvic floor")
                .cue("Lift your pelvic floor up and in"),
            PhaseRequirement::new(PhaseKind::Hold, 5.0)
                .describe("Hold the contraction while breathing normally")
                .cue("Hold, keep breathing")
                .cue("Keep your glutes and thighs relaxed"),
            PhaseRequirement::new(PhaseKind::Release, 5.0)
                .describe("Fully release and relax")
                .cue("Let go completely"),
        ],
        repetitions: 8,
        sets: 2,
    }
}

fn dead_bug() -> Exercise {
    let tabletop_hip = AngleRequirement::new("left_hip", 80.0, 100.0, 90.0);
    let tabletop_knee = AngleRequirement::new("left_knee", 80.0, 100.0, 90.0);
    Exercise {
        id: "dead_bug".to_owned(),
        name: "Dead Bug".to_owned(),
        category: ExerciseCategory::CoreStability,
        description: "Alternate arm and leg extensions from tabletop with a stable pelvis"
            .to_owned(),
        difficulty: DifficultyLevel::Intermediate,
        phases: vec![
            PhaseRequirement::new(PhaseKind::Preparation, 5.0)
                .require(tabletop_hip.clone())
                .require(tabletop_knee.clone())
                .describe("Lie on your back with arms up and knees over hips in tabletop")
                .cue("Knees over hips, arms to the ceiling"),
            PhaseRequirement::new(PhaseKind::Lower, 3.0)
                .require(AngleRequirement::new("right_hip", 140.0, 180.0, 165.0))
                .describe("Extend the opposite arm and leg toward the floor")
                .cue("Reach long, keep your back flat"),
            PhaseRequirement::new(PhaseKind::Lift, 3.0)
                .require(tabletop_hip)
                .require(tabletop_knee)
                .describe("Return to tabletop")
                .cue("Bring it back to center"),
        ],
        repetitions: 8,
        sets: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_exercises_validate() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.len(), 5);
        for id in catalog.ids() {
            let exercise = catalog.get_exercise(id);
            assert!(exercise.is_some_and(|e| e.validate().is_ok()), "{id} invalid");
        }
    }
}

// ABOUTME: Integration tests for the built-in exercise catalog and YAML loading
// ABOUTME: Covers lookups, validation on insert, malformed documents, and merging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::io::Write;

use common::knee_exercise;
use pierre_form_coach::catalog::ExerciseCatalog;
use pierre_form_coach::errors::ErrorCode;
use pierre_form_coach::models::{ExerciseCategory, PhaseKind};
use pierre_form_coach::providers::ExerciseRepository;

const WALL_SIT: &str = r"
exercises:
  - id: wall_sit
    name: Wall Sit
    category: strength
    repetitions: 3
    sets: 1
    phases:
      - kind: hold
        duration_secs: 30
        description: Slide down the wall until your knees are bent
        verbal_cues: [Keep your back against the wall]
        angle_requirements:
          - { joint: left_knee, min_angle: 80, max_angle: 100, ideal_angle: 90 }
";

#[test]
fn test_builtin_catalog_lookup() {
    let catalog = ExerciseCatalog::builtin();
    assert_eq!(
        catalog.ids(),
        vec![
            "dead_bug",
            "diaphragmatic_breathing",
            "glute_bridge",
            "kegel_hold",
            "pelvic_tilt"
        ]
    );

    let breathing = catalog.get_exercise("diaphragmatic_breathing").unwrap();
    assert_eq!(breathing.category, ExerciseCategory::Breathing);
    assert_eq!(breathing.phases[0].kind, PhaseKind::Inhale);
    assert_eq!(breathing.phases[1].kind, PhaseKind::Exhale);
    assert!(catalog.get_exercise("handstand").is_none());
}

#[test]
fn test_yaml_catalog_parses_defaults() {
    let catalog = ExerciseCatalog::from_yaml_str(WALL_SIT).unwrap();
    let wall_sit = catalog.get_exercise("wall_sit").unwrap();

    assert_eq!(wall_sit.total_repetitions(), 3);
    assert!(wall_sit.description.is_empty());
    assert_eq!(wall_sit.phases[0].verbal_cues.len(), 1);
    assert_eq!(wall_sit.phases[0].angle_requirements[0].joint, "left_knee");
}

#[test]
fn test_malformed_yaml_is_invalid_format() {
    let error = ExerciseCatalog::from_yaml_str("exercises: [ {id: 1").unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidFormat);

    let error = ExerciseCatalog::from_yaml_str("workouts: []").unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidFormat);
}

#[test]
fn test_invalid_exercise_is_rejected() {
    let yaml = WALL_SIT.replace("repetitions: 3", "repetitions: 0");
    let error = ExerciseCatalog::from_yaml_str(&yaml).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let yaml = WALL_SIT.replace("min_angle: 80", "min_angle: 120");
    let error = ExerciseCatalog::from_yaml_str(&yaml).unwrap_err();
    assert!(error.message.contains("left_knee"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let body = WALL_SIT.trim_start().trim_start_matches("exercises:\n");
    let yaml = format!("exercises:\n{body}{body}");
    let error = ExerciseCatalog::from_yaml_str(&yaml).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(error.message.contains("Duplicate"));
}

#[test]
fn test_insert_validates() {
    let mut catalog = ExerciseCatalog::new();
    let mut exercise = knee_exercise(5.0, 1, 1);
    exercise.phases.clear();
    assert!(catalog.insert(exercise).is_err());
    assert!(catalog.is_empty());
}

#[test]
fn test_yaml_file_merges_into_builtin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(WALL_SIT.as_bytes()).unwrap();

    let mut catalog = ExerciseCatalog::builtin();
    catalog.merge(ExerciseCatalog::from_yaml_file(file.path()).unwrap());
    assert_eq!(catalog.len(), 6);
    assert!(catalog.get_exercise("wall_sit").is_some());
}

#[test]
fn test_missing_file_is_storage_error() {
    let error = ExerciseCatalog::from_yaml_file("/nonexistent/catalog.yaml").unwrap_err();
    assert_eq!(error.code, ErrorCode::StorageError);
}

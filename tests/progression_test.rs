// ABOUTME: Integration tests for the phase, repetition, and set progression algorithm
// ABOUTME: Drives CoachState and the track stage directly on a paused tokio clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::knee_exercise;
use pierre_form_coach::models::{PhaseKind, PhaseRequirement};
use pierre_form_coach::session::{CoachState, ProgressEvent, SessionState};
use pierre_form_coach::stages::TrackStage;
use tokio::time::{sleep, Instant};

fn exercising(phases: usize, repetitions: u32, sets: u32) -> CoachState {
    let mut exercise = knee_exercise(1.0, repetitions, sets);
    exercise.phases = (0..phases)
        .map(|_| PhaseRequirement::new(PhaseKind::Hold, 1.0))
        .collect();
    let mut state = CoachState::new(Arc::new(exercise));
    state.session_state = SessionState::Exercising;
    state
}

#[test]
fn test_single_phase_two_reps() {
    let mut state = exercising(1, 2, 1);
    assert!(state.progress().abs() < f64::EPSILON);

    assert_eq!(state.advance_phase(), ProgressEvent::RepCompleted);
    assert_eq!(state.current_rep, 2);
    assert!((state.progress() - 0.5).abs() < f64::EPSILON);

    assert_eq!(state.advance_phase(), ProgressEvent::SessionCompleted);
    assert_eq!(state.session_state, SessionState::Completed);
    assert!((state.progress() - 1.0).abs() < f64::EPSILON);

    assert_eq!(state.advance_phase(), ProgressEvent::Halted);
    assert!((state.progress() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_full_walk_through_phases_reps_and_sets() {
    let mut state = exercising(3, 2, 2);
    let mut events = Vec::new();
    loop {
        let event = state.advance_phase();
        events.push(event);
        if event == ProgressEvent::SessionCompleted {
            break;
        }
        assert!(state.current_rep >= 1 && state.current_rep <= 2);
        assert!(state.current_set >= 1 && state.current_set <= 2);
        assert!(state.phase_index < 3);
    }

    // 3 phases x 2 reps x 2 sets = 12 phase completions
    assert_eq!(events.len(), 12);
    assert_eq!(
        events.iter().filter(|e| **e == ProgressEvent::PhaseAdvanced).count(),
        8
    );
    assert_eq!(
        events.iter().filter(|e| **e == ProgressEvent::RepCompleted).count(),
        2
    );
    assert_eq!(
        events.iter().filter(|e| **e == ProgressEvent::SetCompleted).count(),
        1
    );
    assert_eq!(state.completed_repetitions(), 4);
    assert_eq!(state.completed_sets(), 2);
    assert_eq!(state.current_set, 2);
    assert_eq!(state.current_rep, 2);
}

#[test]
fn test_progress_is_monotonic() {
    let mut state = exercising(2, 3, 2);
    let mut previous = state.progress();
    while state.advance_phase() != ProgressEvent::SessionCompleted {
        let progress = state.progress();
        assert!(progress >= previous);
        assert!((0.0..=1.0).contains(&progress));
        previous = progress;
    }
    assert!((state.progress() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_set_completion_resets_rep() {
    let mut state = exercising(1, 1, 3);
    assert_eq!(state.advance_phase(), ProgressEvent::SetCompleted);
    assert_eq!(state.current_set, 2);
    assert_eq!(state.current_rep, 1);
    assert_eq!(state.completed_sets(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_track_starts_clock_lazily_and_advances_after_duration() {
    let mut state = exercising(2, 1, 1);

    assert_eq!(TrackStage::run(&mut state, Instant::now()), None);
    assert!(state.phase_start_time.is_some());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(TrackStage::run(&mut state, Instant::now()), None);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(
        TrackStage::run(&mut state, Instant::now()),
        Some(ProgressEvent::PhaseAdvanced)
    );
    assert_eq!(state.phase_index, 1);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(
        TrackStage::run(&mut state, Instant::now()),
        Some(ProgressEvent::SessionCompleted)
    );
    assert_eq!(TrackStage::run(&mut state, Instant::now()), None);
}

#[tokio::test(start_paused = true)]
async fn test_track_ignores_non_exercising_states() {
    let mut state = exercising(1, 1, 1);
    state.session_state = SessionState::Paused;
    assert_eq!(TrackStage::run(&mut state, Instant::now()), None);
    assert!(state.phase_start_time.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_suspension_is_excluded_from_phase_time() {
    let mut state = exercising(1, 2, 1);
    TrackStage::run(&mut state, Instant::now());

    sleep(Duration::from_millis(500)).await;
    state.suspend(Instant::now());
    sleep(Duration::from_secs(60)).await;
    state.unsuspend(Instant::now());

    assert_eq!(TrackStage::run(&mut state, Instant::now()), None);
    sleep(Duration::from_millis(600)).await;
    assert_eq!(
        TrackStage::run(&mut state, Instant::now()),
        Some(ProgressEvent::RepCompleted)
    );
}

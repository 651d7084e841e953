// ABOUTME: Integration tests for the concurrent coaching session registry
// ABOUTME: Covers session creation, independent progress, removal, and shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{knee_exercise, knee_orchestrator};
use pierre_form_coach::config::CoachConfig;
use pierre_form_coach::errors::ErrorCode;
use pierre_form_coach::models::Frame;
use pierre_form_coach::session::{SessionRegistry, SessionState};
use uuid::Uuid;

fn registry() -> SessionRegistry {
    let config = CoachConfig {
        frame_stride: 1,
        ..CoachConfig::default()
    };
    SessionRegistry::new(move || knee_orchestrator(config.clone(), knee_exercise(5.0, 2, 1)))
}

#[tokio::test(start_paused = true)]
async fn test_sessions_progress_independently() {
    let registry = registry();
    let first = registry.create("knee_hold").await.unwrap();
    let second = registry.create("knee_hold").await.unwrap();
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(registry.len().await, 2);

    registry
        .get(first.session_id)
        .await
        .unwrap()
        .lock()
        .await
        .start_exercise();

    let exercising = registry
        .process_frame(first.session_id, Some(Frame::empty(1)))
        .await
        .unwrap();
    let preparing = registry
        .process_frame(second.session_id, Some(Frame::empty(1)))
        .await
        .unwrap();

    assert_eq!(exercising.snapshot.session_state, SessionState::Exercising);
    assert!(exercising.snapshot.analysis.is_some());
    assert_eq!(preparing.snapshot.session_state, SessionState::Preparing);
    assert!(preparing.snapshot.analysis.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_session_id() {
    let registry = registry();
    let unknown = Uuid::new_v4();
    assert!(registry.get(unknown).await.is_none());
    assert!(registry
        .process_frame(unknown, Some(Frame::empty(1)))
        .await
        .is_none());
    assert!(registry.remove(unknown).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_create_with_unknown_exercise_registers_nothing() {
    let registry = registry();
    let error = registry.create("handstand").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert!(registry.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_remove_returns_summary() {
    let registry = Arc::new(registry());
    let snapshot = registry.create("knee_hold").await.unwrap();

    let summary = registry.remove(snapshot.session_id).await;
    assert_eq!(summary["session_id"], snapshot.session_id.to_string());
    assert_eq!(summary["exercise_id"], "knee_hold");
    assert!(registry.is_empty().await);
    assert!(registry.remove(snapshot.session_id).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_frames_across_sessions() {
    let registry = Arc::new(registry());
    let mut ids = Vec::new();
    for _ in 0..4 {
        let snapshot = registry.create("knee_hold").await.unwrap();
        registry
            .get(snapshot.session_id)
            .await
            .unwrap()
            .lock()
            .await
            .start_exercise();
        ids.push(snapshot.session_id);
    }

    let mut handles = Vec::new();
    for id in ids.clone() {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            for frame_id in 1..=5 {
                registry.process_frame(id, Some(Frame::empty(frame_id))).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for id in ids {
        let orchestrator = registry.get(id).await.unwrap();
        let orchestrator = orchestrator.lock().await;
        assert_eq!(orchestrator.state().unwrap().frames_received, 5);
    }
    assert_eq!(registry.shutdown().await, 4);
    assert!(registry.session_ids().await.is_empty());
}

// ABOUTME: Integration tests for the recorded pose stream source
// ABOUTME: Covers JSON-lines decoding, per-frame replay, closing, and an end-to-end replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use common::{init_test_logging, pose_with_left_knee};
use pierre_form_coach::catalog::ExerciseCatalog;
use pierre_form_coach::config::CoachConfig;
use pierre_form_coach::errors::ErrorCode;
use pierre_form_coach::models::{Frame, OverlayColor};
use pierre_form_coach::providers::{PoseSource, PoseSourceFactory};
use pierre_form_coach::recording::RecordedPoseFactory;
use pierre_form_coach::safety::SessionSafetyMonitor;
use pierre_form_coach::session::{CoachOrchestrator, CoachServices};
use tokio::time::sleep;

fn recording(frames: u64) -> String {
    let mut jsonl = String::new();
    for frame_id in 0..frames {
        let pose = serde_json::to_string(&pose_with_left_knee(frame_id, 90.0)).unwrap();
        writeln!(jsonl, "{pose}").unwrap();
    }
    jsonl
}

#[test]
fn test_jsonl_decoding_skips_blank_lines() {
    let jsonl = format!("{}\n\nnull\n", recording(2));
    let factory = RecordedPoseFactory::from_jsonl_str(&jsonl).unwrap();
    assert_eq!(factory.len(), 3);
    assert!(!factory.is_empty());
}

#[test]
fn test_bad_line_is_reported() {
    let jsonl = format!("{}{{\"keypoints\": 3}}\n", recording(2));
    let error = RecordedPoseFactory::from_jsonl_str(&jsonl).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidFormat);
    assert!(error.message.contains("line 3"), "{}", error.message);
}

#[tokio::test]
async fn test_replay_answers_by_frame_id() {
    let jsonl = format!("{}null\n", recording(2));
    let factory = RecordedPoseFactory::from_jsonl_str(&jsonl).unwrap();
    let mut source = factory.open().unwrap();

    let frame = Frame::empty(1);
    let pose = source.detect(&frame).await.unwrap().unwrap();
    assert_eq!(pose.frame_id, 1);
    assert_eq!(pose.timestamp, frame.captured_at);

    assert!(source.detect(&Frame::empty(2)).await.unwrap().is_none());
    assert!(source.detect(&Frame::empty(99)).await.unwrap().is_none());

    let drawn = source.draw_landmarks(Frame::empty(1), &pose, OverlayColor::Green);
    let annotation = drawn.annotation.unwrap();
    assert_eq!(annotation.color, OverlayColor::Green);
    assert_eq!(annotation.landmarks_drawn, 33);

    source.close().await;
    let error = source.detect(&Frame::empty(0)).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceUnavailable);
}

#[tokio::test(start_paused = true)]
async fn test_recorded_session_runs_end_to_end() {
    init_test_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(recording(40).as_bytes()).unwrap();

    let services = CoachServices::new(
        Arc::new(ExerciseCatalog::builtin()),
        Arc::new(RecordedPoseFactory::from_file(file.path()).unwrap()),
        Box::new(SessionSafetyMonitor::default()),
    );
    let mut coach = CoachOrchestrator::new(CoachConfig::default(), services);
    coach.start_session("kegel_hold").await.unwrap();
    coach.start_exercise().unwrap();

    let mut feedback = 0;
    for frame_id in 0..40 {
        let outcome = coach.process_frame(Some(Frame::empty(frame_id))).await.unwrap();
        feedback += usize::from(outcome.feedback.is_some());
        sleep(Duration::from_millis(500)).await;
    }
    assert!(feedback > 0);

    let summary = coach.end_session().await;
    assert_eq!(summary["exercise_id"], "kegel_hold");
    assert_eq!(summary["total_frames_analyzed"], 40);
    assert!(summary["completed_repetitions"].as_u64().unwrap() >= 1);
}

// ABOUTME: Integration tests for the default session safety monitor
// ABOUTME: Covers asymmetry levels, fatigue windows, poor-form streaks, overexertion, and stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use common::{lopsided_pose, upright_pose};
use pierre_form_coach::config::SafetyConfig;
use pierre_form_coach::models::{AlertKind, AlertLevel, AnalysisResult};
use pierre_form_coach::providers::SafetyMonitor;
use pierre_form_coach::safety::SessionSafetyMonitor;
use tokio::time::sleep;

fn analysis(score: f64, is_correct: bool) -> AnalysisResult {
    AnalysisResult {
        is_correct,
        score,
        deviations: if is_correct {
            Vec::new()
        } else {
            vec!["off".to_owned()]
        },
        suggestions: if is_correct {
            Vec::new()
        } else {
            vec!["fix".to_owned()]
        },
        angles: BTreeMap::new(),
        timestamp: Utc::now(),
    }
}

fn monitor(config: SafetyConfig) -> SessionSafetyMonitor {
    let mut monitor = SessionSafetyMonitor::new(config);
    monitor.start_session();
    monitor
}

#[tokio::test]
async fn test_symmetric_correct_pose_is_clear() {
    let mut monitor = monitor(SafetyConfig::default());
    let check = monitor.check(&upright_pose(1), &analysis(100.0, true));
    assert!(check.alerts.is_empty());
    assert!(!check.should_rest);
}

#[tokio::test]
async fn test_asymmetry_levels() {
    let mut monitor = monitor(SafetyConfig::default());

    let warning = monitor.check(&lopsided_pose(1, 0.08), &analysis(100.0, true));
    assert_eq!(warning.alerts.len(), 1);
    assert_eq!(warning.alerts[0].kind, AlertKind::Asymmetry);
    assert_eq!(warning.alerts[0].level, AlertLevel::Warning);
    assert!(!warning.should_rest);

    let critical = monitor.check(&lopsided_pose(2, 0.15), &analysis(100.0, true));
    assert_eq!(critical.alerts[0].level, AlertLevel::Critical);
    assert!(critical.should_rest);

    let stats = monitor.session_stats();
    assert_eq!(stats["safety_alerts"]["warning"], 1);
    assert_eq!(stats["safety_alerts"]["critical"], 1);
    assert!((stats["lowest_symmetry"].as_f64().unwrap() - 0.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_fatigue_compares_recent_window_with_baseline() {
    let mut monitor = monitor(SafetyConfig {
        fatigue_window: 3,
        ..SafetyConfig::default()
    });
    let pose = upright_pose(1);

    for _ in 0..3 {
        assert!(monitor.check(&pose, &analysis(100.0, true)).alerts.is_empty());
    }
    assert!(monitor.check(&pose, &analysis(60.0, true)).alerts.is_empty());
    assert!(monitor.check(&pose, &analysis(60.0, true)).alerts.is_empty());

    let check = monitor.check(&pose, &analysis(60.0, true));
    assert_eq!(check.alerts.len(), 1);
    assert_eq!(check.alerts[0].kind, AlertKind::Fatigue);
    assert!(check.should_rest);
    assert_eq!(monitor.session_stats()["peak_fatigue_drop"], 40.0);
}

#[tokio::test]
async fn test_zero_scores_do_not_feed_fatigue() {
    let mut monitor = monitor(SafetyConfig {
        fatigue_window: 2,
        poor_form_streak: 100,
        ..SafetyConfig::default()
    });
    let pose = upright_pose(1);
    monitor.check(&pose, &analysis(100.0, true));
    monitor.check(&pose, &analysis(100.0, true));
    for _ in 0..5 {
        assert!(monitor.check(&pose, &analysis(0.0, false)).alerts.is_empty());
    }
}

#[tokio::test]
async fn test_poor_form_streak_resets_on_correct_form() {
    let mut monitor = monitor(SafetyConfig {
        poor_form_streak: 3,
        ..SafetyConfig::default()
    });
    let pose = upright_pose(1);

    monitor.check(&pose, &analysis(50.0, false));
    monitor.check(&pose, &analysis(50.0, false));
    monitor.check(&pose, &analysis(100.0, true));
    monitor.check(&pose, &analysis(50.0, false));
    assert!(monitor.check(&pose, &analysis(50.0, false)).alerts.is_empty());

    let check = monitor.check(&pose, &analysis(50.0, false));
    assert_eq!(check.alerts[0].kind, AlertKind::PoorForm);
    assert!(!check.should_rest);
}

#[tokio::test(start_paused = true)]
async fn test_overexertion_and_rest_reset() {
    let mut monitor = monitor(SafetyConfig {
        max_continuous_work_secs: 60,
        ..SafetyConfig::default()
    });
    let pose = upright_pose(1);

    assert!(monitor.check(&pose, &analysis(100.0, true)).alerts.is_empty());
    sleep(Duration::from_secs(61)).await;

    let check = monitor.check(&pose, &analysis(100.0, true));
    assert_eq!(check.alerts[0].kind, AlertKind::Overexertion);
    assert!(check.should_rest);

    monitor.record_rest();
    assert!(monitor.check(&pose, &analysis(100.0, true)).alerts.is_empty());
    assert_eq!(monitor.session_stats()["rests_taken"], 1);
}

#[tokio::test]
async fn test_alerts_sorted_most_severe_first() {
    let mut monitor = monitor(SafetyConfig {
        poor_form_streak: 1,
        ..SafetyConfig::default()
    });
    let check = monitor.check(&lopsided_pose(1, 0.15), &analysis(40.0, false));
    assert_eq!(check.alerts.len(), 2);
    assert_eq!(check.alerts[0].level, AlertLevel::Critical);
    assert_eq!(check.alerts[1].kind, AlertKind::PoorForm);
}

#[tokio::test]
async fn test_start_session_resets_stats() {
    let mut monitor = monitor(SafetyConfig::default());
    monitor.check(&lopsided_pose(1, 0.15), &analysis(100.0, true));
    monitor.record_rest();

    monitor.start_session();
    let stats = monitor.session_stats();
    assert_eq!(stats["safety_checks"], 0);
    assert_eq!(stats["rests_taken"], 0);
    assert_eq!(stats["safety_alerts"]["critical"], 0);
    assert!(stats["lowest_symmetry"].is_null());
}

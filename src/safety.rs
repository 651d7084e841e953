// ABOUTME: Default per-session safety monitor for asymmetry, fatigue, poor form, and overexertion
// ABOUTME: Raises alerts and rest recommendations but never stops a session itself
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session Safety Monitor
//!
//! Fatigue compares the mean score of the first window after the last rest
//! (the baseline) with the mean of the most recent window. Continuous work is
//! measured on the tokio clock so paused-time tests can drive it.

use std::collections::VecDeque;

use pierre_coach_intelligence::joint_metrics::body_symmetry;
use serde_json::{json, Map, Value};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::SafetyConfig;
use crate::models::{AlertKind, AlertLevel, AnalysisResult, PoseSnapshot, SafetyAlert};
use crate::providers::{SafetyCheck, SafetyMonitor};

#[derive(Debug, Default)]
struct SafetyStats {
    checks_performed: u64,
    info_alerts: u64,
    warning_alerts: u64,
    critical_alerts: u64,
    rests_taken: u64,
    peak_fatigue_drop: f64,
    lowest_symmetry: Option<f64>,
}

/// Default [`SafetyMonitor`] implementation
#[derive(Debug)]
pub struct SessionSafetyMonitor {
    config: SafetyConfig,
    baseline_scores: Vec<f64>,
    baseline: Option<f64>,
    recent_scores: VecDeque<f64>,
    incorrect_streak: u32,
    work_started: Instant,
    stats: SafetyStats,
}

impl Default for SessionSafetyMonitor {
    fn default() -> Self {
        Self::new(SafetyConfig::default())
    }
}

impl SessionSafetyMonitor {
    /// Create a monitor with the given thresholds
    #[must_use]
    pub fn new(config: SafetyConfig) -> Self {
        Self {
            baseline_scores: Vec::with_capacity(config.fatigue_window),
            recent_scores: VecDeque::with_capacity(config.fatigue_window),
            config,
            baseline: None,
            incorrect_streak: 0,
            work_started: Instant::now(),
            stats: SafetyStats::default(),
        }
    }

    /// Thresholds in use
    #[must_use]
    pub const fn config(&self) -> &SafetyConfig {
        &self.config
    }

    fn reset_effort(&mut self) {
        self.baseline_scores.clear();
        self.baseline = None;
        self.recent_scores.clear();
        self.incorrect_streak = 0;
        self.work_started = Instant::now();
    }

    fn check_asymmetry(&mut self, pose: &PoseSnapshot) -> Option<SafetyAlert> {
        let symmetry = body_symmetry(pose);
        self.stats.lowest_symmetry = Some(
            self.stats
                .lowest_symmetry
                .map_or(symmetry, |lowest| lowest.min(symmetry)),
        );

        let level = if symmetry < self.config.asymmetry_critical {
            AlertLevel::Critical
        } else if symmetry < self.config.asymmetry_warning {
            AlertLevel::Warning
        } else {
            return None;
        };
        Some(SafetyAlert::new(
            level,
            AlertKind::Asymmetry,
            format!("Your body is uneven (symmetry {:.0}%).", symmetry * 100.0),
            "Even out your weight between both sides.",
        ))
    }

    /// Returns the fatigue alert when the recent window has dropped far enough
    fn check_fatigue(&mut self, score: f64) -> Option<SafetyAlert> {
        if score <= 0.0 {
            return None;
        }
        let window = self.config.fatigue_window;

        let Some(baseline) = self.baseline else {
            self.baseline_scores.push(score);
            if self.baseline_scores.len() >= window {
                self.baseline = Some(mean(self.baseline_scores.iter().copied()));
            }
            return None;
        };

        if self.recent_scores.len() >= window {
            self.recent_scores.pop_front();
        }
        self.recent_scores.push_back(score);
        if self.recent_scores.len() < window {
            return None;
        }

        let drop = baseline - mean(self.recent_scores.iter().copied());
        self.stats.peak_fatigue_drop = self.stats.peak_fatigue_drop.max(drop);
        (drop >= self.config.fatigue_drop_points).then(|| {
            SafetyAlert::new(
                AlertLevel::Warning,
                AlertKind::Fatigue,
                format!("Your form score has dropped {drop:.0} points."),
                "Take a short rest before your next repetition.",
            )
        })
    }

    fn check_form_streak(&mut self, analysis: &AnalysisResult) -> Option<SafetyAlert> {
        if analysis.is_correct {
            self.incorrect_streak = 0;
            return None;
        }
        self.incorrect_streak = self.incorrect_streak.saturating_add(1);
        (self.incorrect_streak >= self.config.poor_form_streak).then(|| {
            SafetyAlert::new(
                AlertLevel::Warning,
                AlertKind::PoorForm,
                "Your form has needed correction for a while.",
                "Pause, reset your starting position, and slow down.",
            )
        })
    }

    fn check_overexertion(&self) -> Option<SafetyAlert> {
        let worked = self.work_started.elapsed();
        (worked >= self.config.max_continuous_work()).then(|| {
            SafetyAlert::new(
                AlertLevel::Warning,
                AlertKind::Overexertion,
                format!("You've been working for {} minutes without a break.", worked.as_secs() / 60),
                "Take a rest and have some water.",
            )
        })
    }

    fn count(&mut self, alert: &SafetyAlert) {
        match alert.level {
            AlertLevel::Info => self.stats.info_alerts += 1,
            AlertLevel::Warning => self.stats.warning_alerts += 1,
            AlertLevel::Critical => self.stats.critical_alerts += 1,
        }
    }
}

impl SafetyMonitor for SessionSafetyMonitor {
    fn start_session(&mut self) {
        self.reset_effort();
        self.stats = SafetyStats::default();
        debug!("Safety monitor reset for new session");
    }

    fn check(&mut self, pose: &PoseSnapshot, analysis: &AnalysisResult) -> SafetyCheck {
        self.stats.checks_performed += 1;

        let mut check = SafetyCheck::clear();
        if let Some(alert) = self.check_asymmetry(pose) {
            check.should_rest |= alert.is_critical();
            check.alerts.push(alert);
        }
        if let Some(alert) = self.check_fatigue(analysis.score) {
            check.should_rest = true;
            check.alerts.push(alert);
        }
        if let Some(alert) = self.check_form_streak(analysis) {
            check.alerts.push(alert);
        }
        if let Some(alert) = self.check_overexertion() {
            check.should_rest = true;
            check.alerts.push(alert);
        }

        check.alerts.sort_by(|a, b| b.level.cmp(&a.level));
        for alert in &check.alerts {
            self.count(alert);
        }
        check
    }

    fn record_rest(&mut self) {
        self.stats.rests_taken += 1;
        self.reset_effort();
        info!(rests_taken = self.stats.rests_taken, "Rest recorded");
    }

    fn session_stats(&self) -> Map<String, Value> {
        let mut stats = Map::new();
        stats.insert("safety_checks".into(), json!(self.stats.checks_performed));
        stats.insert(
            "safety_alerts".into(),
            json!({
                "info": self.stats.info_alerts,
                "warning": self.stats.warning_alerts,
                "critical": self.stats.critical_alerts,
            }),
        );
        stats.insert("rests_taken".into(), json!(self.stats.rests_taken));
        stats.insert("peak_fatigue_drop".into(), json!(self.stats.peak_fatigue_drop));
        stats.insert("lowest_symmetry".into(), json!(self.stats.lowest_symmetry));
        stats
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

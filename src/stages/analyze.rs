// ABOUTME: Analyze stage scoring the current pose and running the safety monitor
// ABOUTME: Writes the analysis, safety alerts, rest flag, and positive scores into the state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_coach_intelligence::PostureAnalyzer;
use tracing::debug;

use crate::providers::SafetyMonitor;
use crate::session::CoachState;

/// Analyze stage
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeStage {
    analyzer: PostureAnalyzer,
}

impl AnalyzeStage {
    /// Create a stage with the given angle tolerance
    #[must_use]
    pub fn new(tolerance_degrees: f64) -> Self {
        Self {
            analyzer: PostureAnalyzer::with_tolerance(tolerance_degrees),
        }
    }

    /// Score the current pose; returns whether an analysis was produced
    ///
    /// No-op unless the session is exercising with a pose, an exercise, and a
    /// resolvable phase.
    pub fn run(&self, state: &mut CoachState, safety: &mut dyn SafetyMonitor) -> bool {
        if !state.is_exercising() {
            return false;
        }
        let (Some(pose), Some(exercise)) = (&state.current_pose, &state.exercise) else {
            return false;
        };
        let Some(phase) = exercise.phase(state.phase_index) else {
            return false;
        };

        let analysis = self.analyzer.analyze(pose, exercise, phase);
        let check = safety.check(pose, &analysis);

        debug!(
            session.id = %state.session_id,
            score = analysis.score,
            deviations = analysis.deviations.len(),
            alerts = check.alerts.len(),
            "Pose analyzed"
        );

        if analysis.score > 0.0 {
            state.rep_scores.push(analysis.score);
        }
        state.safety_alerts = check.alerts;
        state.should_rest = check.should_rest;
        state.analysis = Some(analysis);
        true
    }
}

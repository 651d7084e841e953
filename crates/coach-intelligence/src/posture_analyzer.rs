// ABOUTME: Posture analyzer scoring a pose snapshot against an exercise phase
// ABOUTME: Combines per-joint angle requirements with generic spine and pelvis checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Posture Analyzer Module
//!
//! Scoring model: every phase contributes one check per angle requirement plus
//! two generic checks (spine alignment, pelvic tilt). Each deviation removes an
//! equal share of the 100-point score, so the score only depends on the number
//! of deviations and the number of checks.

use chrono::Utc;
use pierre_coach_core::constants::posture::{
    DEFAULT_ANGLE_TOLERANCE_DEG, GENERIC_CHECK_COUNT, MAX_SCORE, PELVIC_TILT_LIMIT_DEG,
    SPINE_ALIGNMENT_LIMIT_DEG,
};
use pierre_coach_core::models::{AnalysisResult, Exercise, PhaseRequirement, PoseSnapshot};
use std::collections::BTreeMap;
use tracing::debug;

use crate::joint_metrics::{is_lying_down, pelvic_tilt, spine_alignment};
use crate::joints::Joint;

/// Accumulates deviations while a pose is being checked
#[derive(Default)]
struct Findings {
    deviations: Vec<String>,
    suggestions: Vec<String>,
    angles: BTreeMap<String, f64>,
}

impl Findings {
    fn flag(&mut self, deviation: String, suggestion: String) {
        self.deviations.push(deviation);
        self.suggestions.push(suggestion);
    }
}

/// Scores poses against exercise phase requirements
#[derive(Debug, Clone, Copy)]
pub struct PostureAnalyzer {
    tolerance_degrees: f64,
}

impl Default for PostureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PostureAnalyzer {
    /// Create an analyzer with the default 15° tolerance
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tolerance_degrees: DEFAULT_ANGLE_TOLERANCE_DEG,
        }
    }

    /// Create an analyzer with a custom tolerance (negative values are treated as 0)
    #[must_use]
    pub fn with_tolerance(tolerance_degrees: f64) -> Self {
        Self {
            tolerance_degrees: tolerance_degrees.max(0.0),
        }
    }

    /// Tolerance applied around requirement bounds
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance_degrees
    }

    /// Score a pose against a phase of an exercise
    #[must_use]
    pub fn analyze(
        &self,
        pose: &PoseSnapshot,
        exercise: &Exercise,
        phase: &PhaseRequirement,
    ) -> AnalysisResult {
        if !pose.is_valid() {
            return Self::insufficient_detection(pose);
        }

        let mut findings = Findings::default();
        self.check_angle_requirements(pose, phase, &mut findings);
        Self::check_spine(pose, &mut findings);
        if exercise.category.concerns_pelvic_stability() {
            Self::check_pelvis(pose, &mut findings);
        } else {
            findings.angles.insert(Joint::Pelvis.key(), pelvic_tilt(pose));
        }

        let total_checks = phase.angle_requirements.len() + GENERIC_CHECK_COUNT;
        let score = Self::score(findings.deviations.len(), total_checks);

        AnalysisResult {
            is_correct: findings.deviations.is_empty(),
            score,
            deviations: findings.deviations,
            suggestions: findings.suggestions,
            angles: findings.angles,
            timestamp: Utc::now(),
        }
    }

    /// Score for a deviation count out of a fixed number of checks, clamped to [0, 100]
    #[must_use]
    pub fn score(deviation_count: usize, total_checks: usize) -> f64 {
        if total_checks == 0 {
            return MAX_SCORE;
        }
        let penalty = deviation_count as f64 * (MAX_SCORE / total_checks as f64);
        (MAX_SCORE - penalty).clamp(0.0, MAX_SCORE)
    }

    fn insufficient_detection(pose: &PoseSnapshot) -> AnalysisResult {
        AnalysisResult {
            is_correct: false,
            score: 0.0,
            deviations: vec![format!(
                "Body not fully detected ({} keypoints visible)",
                pose.keypoint_count()
            )],
            suggestions: vec![
                "Move so your whole body is visible to the camera".to_owned(),
            ],
            angles: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    fn check_angle_requirements(
        &self,
        pose: &PoseSnapshot,
        phase: &PhaseRequirement,
        findings: &mut Findings,
    ) {
        for requirement in &phase.angle_requirements {
            let Some(joint) = Joint::parse(&requirement.joint) else {
                debug!(joint = %requirement.joint, "Skipping unresolvable joint requirement");
                continue;
            };

            let measured = joint.measure(pose);
            findings.angles.insert(joint.key(), measured);

            if measured < requirement.min_angle - self.tolerance_degrees {
                findings.flag(
                    format!(
                        "{joint} angle too small ({measured:.0}° < {:.0}°)",
                        requirement.min_angle
                    ),
                    format!(
                        "Increase your {joint} angle toward {:.0}°",
                        requirement.ideal_angle
                    ),
                );
            } else if measured > requirement.max_angle + self.tolerance_degrees {
                findings.flag(
                    format!(
                        "{joint} angle too large ({measured:.0}° > {:.0}°)",
                        requirement.max_angle
                    ),
                    format!(
                        "Reduce your {joint} angle toward {:.0}°",
                        requirement.ideal_angle
                    ),
                );
            }
        }
    }

    fn check_spine(pose: &PoseSnapshot, findings: &mut Findings) {
        let alignment = spine_alignment(pose);
        findings.angles.insert(Joint::Spine.key(), alignment);

        if !is_lying_down(pose) && alignment > SPINE_ALIGNMENT_LIMIT_DEG {
            findings.flag(
                format!("Spine leaning {alignment:.0}° from vertical"),
                "Lengthen your spine and stack your shoulders over your hips".to_owned(),
            );
        }
    }

    fn check_pelvis(pose: &PoseSnapshot, findings: &mut Findings) {
        let tilt = pelvic_tilt(pose);
        findings.angles.insert(Joint::Pelvis.key(), tilt);

        if tilt.abs() > PELVIC_TILT_LIMIT_DEG {
            let lower = if tilt > 0.0 { "right" } else { "left" };
            findings.flag(
                format!("Pelvis tilted {:.0}°, {lower} hip dropping", tilt.abs()),
                "Level your hips and keep your pelvis steady".to_owned(),
            );
        }
    }
}

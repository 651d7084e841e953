// ABOUTME: Pose geometry and posture analysis algorithms for the form coach
// ABOUTME: Extracted from the main crate so scoring stays pure and independently testable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Intelligence
//!
//! Deterministic, side-effect free algorithms used by the coaching pipeline:
//!
//! - **`joint_metrics`**: joint angles and posture heuristics from landmarks
//! - **`joints`**: closed registry mapping joint identifiers to metric functions
//! - **`posture_analyzer`**: scores a pose against an exercise phase

/// Joint angle and posture heuristic functions
pub mod joint_metrics;

/// Joint identifiers and their measurement registry
pub mod joints;

/// Posture scoring against exercise phase requirements
pub mod posture_analyzer;

pub use joints::Joint;
pub use posture_analyzer::PostureAnalyzer;

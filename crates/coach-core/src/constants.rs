// ABOUTME: Constants for pose detection, posture scoring, and session buffers
// ABOUTME: Grouped by domain so the intelligence and session crates share one source of truth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Values here are fixed properties of the coaching model. Anything an
//! operator may tune lives in the root crate's `config` module instead.

/// Pose detection constants
pub mod detection {
    /// Minimum number of keypoints for a pose snapshot to be considered valid
    pub const MIN_VALID_KEYPOINTS: usize = 17;

    /// Landmarks at or below this visibility are ignored by symmetry checks
    pub const MIN_SYMMETRY_VISIBILITY: f64 = 0.5;
}

/// Posture geometry thresholds
pub mod posture {
    /// Default tolerance applied around angle requirement bounds (degrees)
    pub const DEFAULT_ANGLE_TOLERANCE_DEG: f64 = 15.0;

    /// Spine deviation from vertical that counts as misaligned (degrees)
    pub const SPINE_ALIGNMENT_LIMIT_DEG: f64 = 15.0;

    /// Absolute pelvic tilt that counts as unstable (degrees)
    pub const PELVIC_TILT_LIMIT_DEG: f64 = 20.0;

    /// Vertical shoulder-to-hip distance below which the body is lying down
    pub const LYING_DOWN_THRESHOLD: f64 = 0.15;

    /// Mean vertical offset of a symmetric pair that maps to a symmetry score of 0
    pub const SYMMETRY_OFFSET_SCALE: f64 = 0.2;

    /// Number of generic posture checks added to every phase's requirement count
    pub const GENERIC_CHECK_COUNT: usize = 2;

    /// Maximum analysis score
    pub const MAX_SCORE: f64 = 100.0;
}

/// Session buffer caps and scoring boundaries
pub mod session {
    /// Pose history capacity, oldest evicted first
    pub const POSE_HISTORY_CAPACITY: usize = 30;

    /// Feedback history capacity, oldest evicted first
    pub const FEEDBACK_HISTORY_CAPACITY: usize = 50;

    /// Score at or above which a correct pose earns encouragement
    pub const ENCOURAGEMENT_SCORE: f64 = 80.0;

    /// Score at or above which the overlay renders yellow instead of red
    pub const OVERLAY_WARNING_SCORE: f64 = 60.0;
}

/// Feedback priority levels
pub mod priority {
    /// Lowest priority (ambient phase cues)
    pub const MIN: u8 = 1;
    /// Phase cue priority
    pub const PHASE_CUE: u8 = 2;
    /// Encouragement priority
    pub const ENCOURAGEMENT: u8 = 2;
    /// Form correction priority
    pub const CORRECTION: u8 = 3;
    /// Rest prompt priority (warning alerts)
    pub const REST_PROMPT: u8 = 4;
    /// Safety warning priority (critical alerts)
    pub const SAFETY: u8 = 5;
    /// Highest priority
    pub const MAX: u8 = 5;
}

/// Pipeline configuration defaults
pub mod pipeline {
    /// Run analyze, feedback, and track on every Nth exercising frame
    pub const DEFAULT_FRAME_STRIDE: u64 = 2;
    /// Minimum seconds between feedback generation attempts
    pub const DEFAULT_FEEDBACK_INTERVAL_SECS: u64 = 6;
    /// Upper bound on a single pose detection
    pub const DEFAULT_DETECT_TIMEOUT_MS: u64 = 500;
    /// Maximum characters in a spoken feedback message
    pub const DEFAULT_MAX_FEEDBACK_CHARS: usize = 120;
    /// Upper bound on completion message generation at session end
    pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 3;
}

/// Safety monitor defaults
pub mod safety {
    /// Body symmetry below which a warning is raised
    pub const ASYMMETRY_WARNING: f64 = 0.7;
    /// Body symmetry below which a critical alert is raised
    pub const ASYMMETRY_CRITICAL: f64 = 0.5;
    /// Number of scores per fatigue window
    pub const FATIGUE_WINDOW: usize = 10;
    /// Score drop between baseline and latest window that signals fatigue
    pub const FATIGUE_DROP_POINTS: f64 = 25.0;
    /// Consecutive incorrect analyses before a poor-form warning
    pub const POOR_FORM_STREAK: u32 = 15;
    /// Continuous work before a rest is recommended
    pub const MAX_CONTINUOUS_WORK_SECS: u64 = 20 * 60;
}

/// LLM client defaults
pub mod llm {
    /// OpenAI-compatible endpoint root
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
    /// Model name
    pub const DEFAULT_MODEL: &str = "llama3.2";
    /// Request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Connection timeout
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Sampling temperature for coaching messages
    pub const TEMPERATURE: f32 = 0.7;
    /// Token cap for a single coaching message
    pub const MAX_TOKENS: u32 = 60;
}

/// Service names used in structured logs
pub mod service_names {
    /// Default service name of the form coach
    pub const FORM_COACH: &str = "pierre-form-coach";
}

// ABOUTME: Pose snapshot models produced by pose sources once per video frame
// ABOUTME: Defines landmarks, the 33-point keypoint layout, body sides, and snapshot validity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::detection::MIN_VALID_KEYPOINTS;

/// A single estimated body landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0 = left edge, 1 = right edge)
    pub x: f64,
    /// Vertical position (0 = top edge, 1 = bottom edge)
    pub y: f64,
    /// Relative depth
    #[serde(default)]
    pub z: f64,
    /// Detection confidence in [0, 1]
    #[serde(default = "full_visibility")]
    pub visibility: f64,
}

const fn full_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a fully visible landmark on the image plane
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    /// Create a landmark with explicit depth and visibility (visibility is clamped to [0, 1])
    #[must_use]
    pub fn with_depth(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: visibility.clamp(0.0, 1.0),
        }
    }
}

/// Body side selector for paired joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Subject's left side
    Left,
    /// Subject's right side
    Right,
}

impl Side {
    /// Lowercase label used in measurement keys and messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Keypoints of the 33-landmark body layout used by the coach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keypoint {
    /// Nose
    Nose,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl Keypoint {
    /// Landmark index in the 33-point layout
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Nose => 0,
            Self::LeftShoulder => 11,
            Self::RightShoulder => 12,
            Self::LeftElbow => 13,
            Self::RightElbow => 14,
            Self::LeftWrist => 15,
            Self::RightWrist => 16,
            Self::LeftHip => 23,
            Self::RightHip => 24,
            Self::LeftKnee => 25,
            Self::RightKnee => 26,
            Self::LeftAnkle => 27,
            Self::RightAnkle => 28,
        }
    }

    /// Shoulder keypoint on the given side
    #[must_use]
    pub const fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftShoulder,
            Side::Right => Self::RightShoulder,
        }
    }

    /// Elbow keypoint on the given side
    #[must_use]
    pub const fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftElbow,
            Side::Right => Self::RightElbow,
        }
    }

    /// Wrist keypoint on the given side
    #[must_use]
    pub const fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftWrist,
            Side::Right => Self::RightWrist,
        }
    }

    /// Hip keypoint on the given side
    #[must_use]
    pub const fn hip(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftHip,
            Side::Right => Self::RightHip,
        }
    }

    /// Knee keypoint on the given side
    #[must_use]
    pub const fn knee(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftKnee,
            Side::Right => Self::RightKnee,
        }
    }

    /// Ankle keypoint on the given side
    #[must_use]
    pub const fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftAnkle,
            Side::Right => Self::RightAnkle,
        }
    }
}

/// One frame's estimated body landmark positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Landmarks keyed by their index in the 33-point layout
    pub keypoints: BTreeMap<usize, Landmark>,
    /// Capture time of the source frame
    pub timestamp: DateTime<Utc>,
    /// Sequence number of the source frame
    pub frame_id: u64,
}

impl PoseSnapshot {
    /// Create an empty snapshot for the given frame
    #[must_use]
    pub fn new(frame_id: u64) -> Self {
        Self {
            keypoints: BTreeMap::new(),
            timestamp: Utc::now(),
            frame_id,
        }
    }

    /// Builder-style landmark insertion by keypoint
    #[must_use]
    pub fn with(mut self, keypoint: Keypoint, landmark: Landmark) -> Self {
        self.keypoints.insert(keypoint.index(), landmark);
        self
    }

    /// Insert a landmark by raw index
    pub fn insert(&mut self, index: usize, landmark: Landmark) {
        self.keypoints.insert(index, landmark);
    }

    /// Look up a keypoint's landmark
    #[must_use]
    pub fn get(&self, keypoint: Keypoint) -> Option<&Landmark> {
        self.keypoints.get(&keypoint.index())
    }

    /// Number of detected keypoints
    #[must_use]
    pub fn keypoint_count(&self) -> usize {
        self.keypoints.len()
    }

    /// A snapshot is usable for analysis once enough keypoints were detected
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.keypoints.len() >= MIN_VALID_KEYPOINTS
    }
}

// ABOUTME: Closed registry of measurable joints and the metric function behind each one
// ABOUTME: Resolves authored joint names to typed identifiers with exhaustive dispatch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_coach_core::models::{PoseSnapshot, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::joint_metrics;

/// A measurable joint
///
/// Unsided names in exercise definitions (`hip`, `knee`, ...) resolve to the
/// left side, which faces the camera in the catalog's floor exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    /// Shoulder-hip-knee angle
    Hip(Side),
    /// Hip-knee-ankle angle
    Knee(Side),
    /// Shoulder-elbow-wrist angle
    Elbow(Side),
    /// Elbow-shoulder-hip angle
    Shoulder(Side),
    /// Spine deviation from vertical
    Spine,
    /// Hip line deviation from horizontal
    Pelvis,
}

impl Joint {
    /// Every resolvable joint
    pub const ALL: [Self; 10] = [
        Self::Hip(Side::Left),
        Self::Hip(Side::Right),
        Self::Knee(Side::Left),
        Self::Knee(Side::Right),
        Self::Elbow(Side::Left),
        Self::Elbow(Side::Right),
        Self::Shoulder(Side::Left),
        Self::Shoulder(Side::Right),
        Self::Spine,
        Self::Pelvis,
    ];

    /// Resolve an authored joint name, ignoring case, spacing, and an `_angle` suffix
    ///
    /// Returns `None` for names outside the registry.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        let normalized = normalized.strip_suffix("_angle").unwrap_or(&normalized);

        let (side, base) = if let Some(rest) = normalized.strip_prefix("left_") {
            (Side::Left, rest)
        } else if let Some(rest) = normalized.strip_prefix("right_") {
            (Side::Right, rest)
        } else {
            (Side::Left, normalized)
        };

        match base {
            "hip" => Some(Self::Hip(side)),
            "knee" => Some(Self::Knee(side)),
            "elbow" => Some(Self::Elbow(side)),
            "shoulder" => Some(Self::Shoulder(side)),
            "spine" | "spine_alignment" | "back" => Some(Self::Spine),
            "pelvis" | "pelvic_tilt" => Some(Self::Pelvis),
            _ => None,
        }
    }

    /// Measure this joint on a pose, in degrees
    #[must_use]
    pub fn measure(self, pose: &PoseSnapshot) -> f64 {
        match self {
            Self::Hip(side) => joint_metrics::hip_angle(pose, side),
            Self::Knee(side) => joint_metrics::knee_angle(pose, side),
            Self::Elbow(side) => joint_metrics::elbow_angle(pose, side),
            Self::Shoulder(side) => joint_metrics::shoulder_angle(pose, side),
            Self::Spine => joint_metrics::spine_alignment(pose),
            Self::Pelvis => joint_metrics::pelvic_tilt(pose),
        }
    }

    /// Stable key used in the measured-angles map
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Hip(side) => format!("{}_hip", side.as_str()),
            Self::Knee(side) => format!("{}_knee", side.as_str()),
            Self::Elbow(side) => format!("{}_elbow", side.as_str()),
            Self::Shoulder(side) => format!("{}_shoulder", side.as_str()),
            Self::Spine => "spine_alignment".to_owned(),
            Self::Pelvis => "pelvic_tilt".to_owned(),
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hip(side) => write!(f, "{} hip", side.as_str()),
            Self::Knee(side) => write!(f, "{} knee", side.as_str()),
            Self::Elbow(side) => write!(f, "{} elbow", side.as_str()),
            Self::Shoulder(side) => write!(f, "{} shoulder", side.as_str()),
            Self::Spine => f.write_str("spine"),
            Self::Pelvis => f.write_str("pelvis"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Joint::parse("hip"), Some(Joint::Hip(Side::Left)));
        assert_eq!(Joint::parse("Right Knee"), Some(Joint::Knee(Side::Right)));
        assert_eq!(Joint::parse("left_elbow_angle"), Some(Joint::Elbow(Side::Left)));
        assert_eq!(Joint::parse("spine_alignment"), Some(Joint::Spine));
        assert_eq!(Joint::parse("pelvic_tilt"), Some(Joint::Pelvis));
        assert_eq!(Joint::parse("tail"), None);
    }

    #[test]
    fn test_keys_round_trip_through_parse() {
        for joint in Joint::ALL {
            assert_eq!(Joint::parse(&joint.key()), Some(joint));
        }
    }
}

// ABOUTME: Geometric joint metrics computed from pose landmarks
// ABOUTME: Three-point angles, spine alignment, pelvic tilt, lying detection, and body symmetry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Joint Metrics Module
//!
//! Every function here is total: missing keypoints and degenerate geometry
//! produce a documented neutral value instead of an error. Angles are computed
//! on the image plane (x, y); landmark depth is too noisy to score against.

use pierre_coach_core::constants::detection::MIN_SYMMETRY_VISIBILITY;
use pierre_coach_core::constants::posture::{LYING_DOWN_THRESHOLD, SYMMETRY_OFFSET_SCALE};
use pierre_coach_core::models::{Keypoint, Landmark, PoseSnapshot, Side};

/// Symmetric landmark pairs compared by `body_symmetry`
const SYMMETRIC_PAIRS: [(Keypoint, Keypoint); 4] = [
    (Keypoint::LeftShoulder, Keypoint::RightShoulder),
    (Keypoint::LeftHip, Keypoint::RightHip),
    (Keypoint::LeftKnee, Keypoint::RightKnee),
    (Keypoint::LeftAnkle, Keypoint::RightAnkle),
];

/// Angle at vertex `p2` formed by `p1` and `p3`, in degrees
///
/// Returns 0 when either arm of the angle has zero length.
#[must_use]
pub fn angle(p1: &Landmark, p2: &Landmark, p3: &Landmark) -> f64 {
    let (ax, ay) = (p1.x - p2.x, p1.y - p2.y);
    let (bx, by) = (p3.x - p2.x, p3.y - p2.y);

    let magnitude_a = ax.hypot(ay);
    let magnitude_b = bx.hypot(by);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let cosine = ax.mul_add(bx, ay * by) / (magnitude_a * magnitude_b);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

fn midpoint(pose: &PoseSnapshot, left: Keypoint, right: Keypoint) -> Option<(f64, f64)> {
    let l = pose.get(left)?;
    let r = pose.get(right)?;
    Some(((l.x + r.x) / 2.0, (l.y + r.y) / 2.0))
}

fn three_point(pose: &PoseSnapshot, a: Keypoint, vertex: Keypoint, c: Keypoint) -> f64 {
    match (pose.get(a), pose.get(vertex), pose.get(c)) {
        (Some(a), Some(vertex), Some(c)) => angle(a, vertex, c),
        _ => 0.0,
    }
}

/// Deviation of the shoulder-to-hip line from vertical, in degrees
///
/// Returns 90 when the shoulder and hip midpoints share the same vertical
/// coordinate, and 0 when shoulders or hips are missing.
#[must_use]
pub fn spine_alignment(pose: &PoseSnapshot) -> f64 {
    let (Some(shoulders), Some(hips)) = (
        midpoint(pose, Keypoint::LeftShoulder, Keypoint::RightShoulder),
        midpoint(pose, Keypoint::LeftHip, Keypoint::RightHip),
    ) else {
        return 0.0;
    };

    let dx = (hips.0 - shoulders.0).abs();
    let dy = (hips.1 - shoulders.1).abs();
    if dy == 0.0 {
        return 90.0;
    }
    dx.atan2(dy).to_degrees()
}

/// Shoulder-hip-knee angle on the given side; 0 if a keypoint is missing
#[must_use]
pub fn hip_angle(pose: &PoseSnapshot, side: Side) -> f64 {
    three_point(
        pose,
        Keypoint::shoulder(side),
        Keypoint::hip(side),
        Keypoint::knee(side),
    )
}

/// Hip-knee-ankle angle on the given side; 0 if a keypoint is missing
#[must_use]
pub fn knee_angle(pose: &PoseSnapshot, side: Side) -> f64 {
    three_point(
        pose,
        Keypoint::hip(side),
        Keypoint::knee(side),
        Keypoint::ankle(side),
    )
}

/// Shoulder-elbow-wrist angle on the given side; 0 if a keypoint is missing
#[must_use]
pub fn elbow_angle(pose: &PoseSnapshot, side: Side) -> f64 {
    three_point(
        pose,
        Keypoint::shoulder(side),
        Keypoint::elbow(side),
        Keypoint::wrist(side),
    )
}

/// Elbow-shoulder-hip angle (arm elevation) on the given side; 0 if a keypoint is missing
#[must_use]
pub fn shoulder_angle(pose: &PoseSnapshot, side: Side) -> f64 {
    three_point(
        pose,
        Keypoint::elbow(side),
        Keypoint::shoulder(side),
        Keypoint::hip(side),
    )
}

/// Signed angle of the left-to-right hip line from horizontal, in degrees
///
/// Positive when the right hip sits lower in the image. Returns 0 when both
/// hips share the same horizontal coordinate (the hip line is edge-on to the
/// camera), when they are level, or when a hip is missing.
#[must_use]
pub fn pelvic_tilt(pose: &PoseSnapshot) -> f64 {
    let (Some(left), Some(right)) = (pose.get(Keypoint::LeftHip), pose.get(Keypoint::RightHip))
    else {
        return 0.0;
    };

    let dx = (right.x - left.x).abs();
    let dy = right.y - left.y;
    if dx == 0.0 || dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}

/// Whether the shoulders and hips are at nearly the same height
#[must_use]
pub fn is_lying_down(pose: &PoseSnapshot) -> bool {
    match (
        midpoint(pose, Keypoint::LeftShoulder, Keypoint::RightShoulder),
        midpoint(pose, Keypoint::LeftHip, Keypoint::RightHip),
    ) {
        (Some(shoulders), Some(hips)) => (shoulders.1 - hips.1).abs() < LYING_DOWN_THRESHOLD,
        _ => false,
    }
}

/// Left/right symmetry score in [0, 1], 1 being perfectly level
///
/// Only pairs where both landmarks are clearly visible are compared; with no
/// qualifying pair the pose is treated as symmetric.
#[must_use]
pub fn body_symmetry(pose: &PoseSnapshot) -> f64 {
    let offsets: Vec<f64> = SYMMETRIC_PAIRS
        .iter()
        .filter_map(|&(left, right)| {
            let l = pose.get(left)?;
            let r = pose.get(right)?;
            (l.visibility > MIN_SYMMETRY_VISIBILITY && r.visibility > MIN_SYMMETRY_VISIBILITY)
                .then(|| (l.y - r.y).abs())
        })
        .collect();

    if offsets.is_empty() {
        return 1.0;
    }

    let mean_offset = offsets.iter().sum::<f64>() / offsets.len() as f64;
    (1.0 - mean_offset / SYMMETRY_OFFSET_SCALE).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_requires_both_sides() {
        let pose = PoseSnapshot::new(0).with(Keypoint::LeftHip, Landmark::new(0.4, 0.6));
        assert!(midpoint(&pose, Keypoint::LeftHip, Keypoint::RightHip).is_none());
    }

    #[test]
    fn test_right_angle() {
        let a = Landmark::new(0.0, 0.0);
        let vertex = Landmark::new(0.5, 0.0);
        let c = Landmark::new(0.5, 0.5);
        assert!((angle(&a, &vertex, &c) - 90.0).abs() < 1e-9);
    }
}

// ABOUTME: Pose source replaying a recorded JSON-lines pose stream, one snapshot per frame
// ABOUTME: Lets the coaching pipeline run end to end without a live pose model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recorded Pose Streams
//!
//! Each non-empty line is either a JSON [`PoseSnapshot`] or `null` for a frame
//! with no detected body. Line `n` (ignoring blank lines) answers the frame
//! with id `n`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Frame, FrameAnnotation, OverlayColor, PoseSnapshot};
use crate::providers::{PoseSource, PoseSourceFactory};

/// Opens [`RecordedPoseSource`]s over a shared recording
#[derive(Debug, Clone)]
pub struct RecordedPoseFactory {
    poses: Arc<Vec<Option<PoseSnapshot>>>,
}

impl RecordedPoseFactory {
    /// Wrap already-decoded poses
    #[must_use]
    pub fn from_poses(poses: Vec<Option<PoseSnapshot>>) -> Self {
        Self {
            poses: Arc::new(poses),
        }
    }

    /// Decode a JSON-lines recording
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` naming the first line that is not a pose or `null`
    pub fn from_jsonl_str(jsonl: &str) -> AppResult<Self> {
        let poses = jsonl
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Option<PoseSnapshot>>(line).map_err(|e| {
                    AppError::new(
                        ErrorCode::InvalidFormat,
                        format!("Invalid pose on line {}: {e}", index + 1),
                    )
                    .with_source(e)
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self::from_poses(poses))
    }

    /// Load a JSON-lines recording from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let factory = Self::from_jsonl_str(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), frames = factory.len(), "Pose recording loaded");
        Ok(factory)
    }

    /// Number of recorded frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether the recording is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl PoseSourceFactory for RecordedPoseFactory {
    fn open(&self) -> AppResult<Box<dyn PoseSource>> {
        Ok(Box::new(RecordedPoseSource {
            poses: Arc::clone(&self.poses),
            closed: false,
        }))
    }
}

/// Pose source answering frames from a recording
#[derive(Debug)]
pub struct RecordedPoseSource {
    poses: Arc<Vec<Option<PoseSnapshot>>>,
    closed: bool,
}

#[async_trait]
impl PoseSource for RecordedPoseSource {
    async fn detect(&mut self, frame: &Frame) -> AppResult<Option<PoseSnapshot>> {
        if self.closed {
            return Err(AppError::new(
                ErrorCode::ResourceUnavailable,
                "Recorded pose source is closed",
            ));
        }
        let recorded = usize::try_from(frame.id)
            .ok()
            .and_then(|index| self.poses.get(index))
            .cloned()
            .flatten();

        Ok(recorded.map(|mut pose| {
            pose.frame_id = frame.id;
            pose.timestamp = frame.captured_at;
            pose
        }))
    }

    fn draw_landmarks(&self, mut frame: Frame, pose: &PoseSnapshot, color: OverlayColor) -> Frame {
        frame.annotation = Some(FrameAnnotation {
            color,
            landmarks_drawn: pose.keypoint_count(),
        });
        frame
    }

    async fn close(&mut self) {
        self.closed = true;
        debug!("Recorded pose source closed");
    }
}

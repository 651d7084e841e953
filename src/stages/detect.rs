// ABOUTME: Detect stage turning frames into pose snapshots through a lazily opened pose source
// ABOUTME: Applies the stale-pose policy and renders correctness-colored overlays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};
use crate::models::{Frame, OverlayColor};
use crate::providers::{PoseSource, PoseSourceFactory};
use crate::session::CoachState;

/// Detect stage
///
/// A failed, timed-out, or empty detection keeps the previous pose: a single
/// bad frame never clears a known-good pose.
pub struct DetectStage {
    factory: Arc<dyn PoseSourceFactory>,
    source: Option<Box<dyn PoseSource>>,
    timeout: Duration,
}

impl DetectStage {
    /// Create a stage; the pose source is opened on first use
    #[must_use]
    pub fn new(factory: Arc<dyn PoseSourceFactory>, timeout: Duration) -> Self {
        Self {
            factory,
            source: None,
            timeout,
        }
    }

    /// Whether a pose source is currently held
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    fn acquire(&mut self) -> AppResult<&mut Box<dyn PoseSource>> {
        if self.source.is_none() {
            let source = self.factory.open()?;
            info!("Pose source opened");
            self.source = Some(source);
        }
        self.source
            .as_mut()
            .ok_or_else(|| AppError::internal("pose source unavailable after open"))
    }

    /// Detect the pose in `frame`; returns whether a new pose was accepted
    pub async fn run(&mut self, state: &mut CoachState, frame: Option<&Frame>) -> bool {
        let Some(frame) = frame else {
            return false;
        };

        let detect_timeout = self.timeout;
        let source = match self.acquire() {
            Ok(source) => source,
            Err(e) => {
                warn!(session.id = %state.session_id, error = %e, "Failed to open pose source");
                return false;
            }
        };

        let pose = match timeout(detect_timeout, source.detect(frame)).await {
            Ok(Ok(Some(pose))) => pose,
            Ok(Ok(None)) => {
                debug!(frame.id = frame.id, "No body detected, keeping previous pose");
                return false;
            }
            Ok(Err(e)) => {
                warn!(frame.id = frame.id, error = %e, "Pose detection failed, keeping previous pose");
                return false;
            }
            Err(_) => {
                warn!(
                    frame.id = frame.id,
                    timeout_ms = detect_timeout.as_millis(),
                    "Pose detection timed out, keeping previous pose"
                );
                return false;
            }
        };

        if let Some(current) = &state.current_pose {
            if pose.frame_id < current.frame_id {
                debug!(
                    frame.id = pose.frame_id,
                    current.frame_id = current.frame_id,
                    "Discarding out-of-order pose"
                );
                return false;
            }
        }

        state.record_pose(pose);
        true
    }

    /// Draw the current pose onto `frame`, colored by the latest analysis
    ///
    /// Returns the frame untouched when no source is open or no pose is known.
    #[must_use]
    pub fn annotate(&self, frame: Frame, state: &CoachState) -> Frame {
        match (&self.source, &state.current_pose) {
            (Some(source), Some(pose)) => {
                let color = OverlayColor::for_analysis(state.analysis.as_ref());
                source.draw_landmarks(frame, pose, color)
            }
            _ => frame,
        }
    }

    /// Close the pose source, if one was opened
    pub async fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close().await;
            info!("Pose source released");
        }
    }
}

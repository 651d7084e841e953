// ABOUTME: Domain models re-exported from pierre-coach-core plus video frame types
// ABOUTME: Frames carry raw image bytes in and overlay annotations out of the pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pierre_coach_core::constants::session::OVERLAY_WARNING_SCORE;

pub use pierre_coach_core::models::*;

/// Overlay color keyed by analysis correctness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColor {
    /// Correct form
    Green,
    /// Incorrect but acceptable form (score >= 60)
    Yellow,
    /// Poor form
    Red,
    /// No analysis yet
    White,
}

impl OverlayColor {
    /// Pick the overlay color for the latest analysis
    #[must_use]
    pub fn for_analysis(analysis: Option<&AnalysisResult>) -> Self {
        match analysis {
            None => Self::White,
            Some(result) if result.is_correct => Self::Green,
            Some(result) if result.score >= OVERLAY_WARNING_SCORE => Self::Yellow,
            Some(_) => Self::Red,
        }
    }

    /// RGB triple for renderers
    #[must_use]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0, 200, 0),
            Self::Yellow => (255, 200, 0),
            Self::Red => (220, 0, 0),
            Self::White => (255, 255, 255),
        }
    }
}

/// Overlay drawn onto a frame by a pose source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    /// Skeleton color
    pub color: OverlayColor,
    /// Number of landmarks drawn
    pub landmarks_drawn: usize,
}

/// A single video frame submitted to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic sequence number assigned by the caller
    pub id: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoded image bytes
    pub data: Bytes,
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Overlay added by annotation, if any
    pub annotation: Option<FrameAnnotation>,
}

impl Frame {
    /// Create a frame from encoded image bytes
    #[must_use]
    pub fn new(id: u64, width: u32, height: u32, data: impl Into<Bytes>) -> Self {
        Self {
            id,
            width,
            height,
            data: data.into(),
            captured_at: Utc::now(),
            annotation: None,
        }
    }

    /// Create a frame without pixel data (used when poses are replayed)
    #[must_use]
    pub fn empty(id: u64) -> Self {
        Self::new(id, 0, 0, Bytes::new())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn analysis(is_correct: bool, score: f64) -> AnalysisResult {
        AnalysisResult {
            is_correct,
            score,
            deviations: Vec::new(),
            suggestions: Vec::new(),
            angles: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_overlay_color_thresholds() {
        assert_eq!(OverlayColor::for_analysis(None), OverlayColor::White);
        assert_eq!(
            OverlayColor::for_analysis(Some(&analysis(true, 40.0))),
            OverlayColor::Green
        );
        assert_eq!(
            OverlayColor::for_analysis(Some(&analysis(false, 60.0))),
            OverlayColor::Yellow
        );
        assert_eq!(
            OverlayColor::for_analysis(Some(&analysis(false, 59.9))),
            OverlayColor::Red
        );
        assert_eq!(
            OverlayColor::for_analysis(Some(&analysis(false, 0.0))),
            OverlayColor::Red
        );
    }
}

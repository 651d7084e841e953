// ABOUTME: Track stage timing the current phase and triggering progression
// ABOUTME: Starts the phase clock lazily and advances once the phase duration has elapsed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tokio::time::Instant;
use tracing::{debug, info};

use crate::session::{CoachState, ProgressEvent};

/// Track stage
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackStage;

impl TrackStage {
    /// Advance the progression if the current phase has run its course
    pub fn run(state: &mut CoachState, now: Instant) -> Option<ProgressEvent> {
        if !state.is_exercising() {
            return None;
        }
        let duration = state.current_phase()?.duration();
        let started = *state.phase_start_time.get_or_insert(now);
        if now.saturating_duration_since(started) < duration {
            return None;
        }

        let event = state.advance_phase();
        if state.is_exercising() {
            state.phase_start_time = Some(now);
        }

        match event {
            ProgressEvent::SessionCompleted => info!(
                session.id = %state.session_id,
                average_score = state.average_score(),
                "All sets completed"
            ),
            _ => debug!(
                session.id = %state.session_id,
                ?event,
                phase = state.phase_index,
                rep = state.current_rep,
                set = state.current_set,
                "Progression advanced"
            ),
        }
        Some(event)
    }
}

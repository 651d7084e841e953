// ABOUTME: Coaching session module: state, progression, orchestrator, and multi-session registry
// ABOUTME: Exposes the per-tick outward contract consumed by transport layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Session orchestrator state machine
pub mod orchestrator;
/// Per-tick outward contract
pub mod outcome;
/// Concurrent session registry
pub mod registry;
/// Session state and progression
pub mod state;

pub use orchestrator::{CoachOrchestrator, CoachServices};
pub use outcome::{FeedbackPayload, FrameOutcome, StateSnapshot};
pub use registry::SessionRegistry;
pub use state::{CoachState, ProgressEvent, SessionState};

// ABOUTME: Main library entry point for the Pierre real-time form coach
// ABOUTME: Drives the detect/analyze/feedback/track pipeline over a stream of video frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Form Coach
//!
//! Coaches a user through an exercise in real time. Each video frame is turned
//! into a pose estimate, scored against the current exercise phase, and fed
//! through a phase/rep/set progression, while natural-language feedback is
//! generated in the background so that slow generation never stalls frames.
//!
//! ## Architecture
//!
//! - **Stages**: detect, analyze, feedback, and track, each mutating only its
//!   own slice of the session state
//! - **Session**: the orchestrator state machine and the multi-session registry
//! - **Providers**: traits for the external collaborators (pose source, safety
//!   monitor, feedback generator, speech synthesizer, exercise repository)
//! - **Catalog / Safety / LLM / Recording**: default collaborator implementations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_form_coach::catalog::ExerciseCatalog;
//! use pierre_form_coach::config::CoachConfig;
//! use pierre_form_coach::errors::AppResult;
//! use pierre_form_coach::recording::RecordedPoseFactory;
//! use pierre_form_coach::safety::SessionSafetyMonitor;
//! use pierre_form_coach::session::{CoachOrchestrator, CoachServices};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let services = CoachServices::new(
//!         Arc::new(ExerciseCatalog::builtin()),
//!         Arc::new(RecordedPoseFactory::from_file("session.jsonl")?),
//!         Box::new(SessionSafetyMonitor::default()),
//!     );
//!     let mut coach = CoachOrchestrator::new(CoachConfig::from_env()?, services);
//!     coach.start_session("diaphragmatic_breathing").await?;
//!     coach.start_exercise();
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration for the pipeline, safety monitor, and LLM
pub mod config;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Domain constants re-exported from the core crate
pub use pierre_coach_core::constants;

/// Production logging and structured output
pub mod logging;

/// Domain models re-exported from the core crate, plus video frames
pub mod models;

/// External collaborator contracts consumed by the pipeline
pub mod providers;

/// Built-in exercise library with YAML loading
pub mod catalog;

/// Default safety monitor (fatigue, asymmetry, poor-form streaks)
pub mod safety;

/// OpenAI-compatible feedback generation
#[cfg(feature = "llm")]
pub mod llm;

/// Pose source replaying recorded pose streams
pub mod recording;

/// Per-frame pipeline stages
pub mod stages;

/// Session state, progression, orchestrator, and registry
pub mod session;

/// Pose geometry and posture scoring
pub use pierre_coach_intelligence as intelligence;

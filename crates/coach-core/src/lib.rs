// ABOUTME: Core types and constants for the Pierre form coach
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Core
//!
//! Foundation crate providing shared types for the real-time form coach.
//! It changes rarely so the algorithm and session crates compile incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Buffer caps, detection and posture thresholds
//! - **models**: Pose snapshots, exercise definitions, analysis results, feedback

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (poses, exercises, analysis, feedback, safety alerts)
pub mod models;

// ABOUTME: Error module re-exporting the unified error types from pierre-coach-core
// ABOUTME: Preserves `crate::errors` import paths across the session crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Re-exports `AppError`, `ErrorCode`, and `AppResult` from the core crate.

pub use pierre_coach_core::errors::*;

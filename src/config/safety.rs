// ABOUTME: Safety monitor thresholds loaded from COACH_SAFETY_* environment variables
// ABOUTME: Asymmetry levels, fatigue window, poor-form streak, and continuous-work limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env_or;
use crate::constants::safety::{
    ASYMMETRY_CRITICAL, ASYMMETRY_WARNING, FATIGUE_DROP_POINTS, FATIGUE_WINDOW,
    MAX_CONTINUOUS_WORK_SECS, POOR_FORM_STREAK,
};
use crate::errors::{AppError, AppResult};

/// Thresholds of [`SessionSafetyMonitor`](crate::safety::SessionSafetyMonitor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Symmetry below which a warning is raised
    pub asymmetry_warning: f64,
    /// Symmetry below which a critical alert is raised
    pub asymmetry_critical: f64,
    /// Scores per fatigue window
    pub fatigue_window: usize,
    /// Mean score drop that signals fatigue
    pub fatigue_drop_points: f64,
    /// Consecutive incorrect analyses before a poor-form warning
    pub poor_form_streak: u32,
    /// Seconds of work without rest before a rest is recommended
    pub max_continuous_work_secs: u64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            asymmetry_warning: ASYMMETRY_WARNING,
            asymmetry_critical: ASYMMETRY_CRITICAL,
            fatigue_window: FATIGUE_WINDOW,
            fatigue_drop_points: FATIGUE_DROP_POINTS,
            poor_form_streak: POOR_FORM_STREAK,
            max_continuous_work_secs: MAX_CONTINUOUS_WORK_SECS,
        }
    }
}

impl SafetyConfig {
    /// Load safety thresholds from environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the thresholds are inconsistent
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            asymmetry_warning: env_or("COACH_SAFETY_ASYMMETRY_WARNING", ASYMMETRY_WARNING),
            asymmetry_critical: env_or("COACH_SAFETY_ASYMMETRY_CRITICAL", ASYMMETRY_CRITICAL),
            fatigue_window: env_or("COACH_SAFETY_FATIGUE_WINDOW", FATIGUE_WINDOW),
            fatigue_drop_points: env_or("COACH_SAFETY_FATIGUE_DROP", FATIGUE_DROP_POINTS),
            poor_form_streak: env_or("COACH_SAFETY_POOR_FORM_STREAK", POOR_FORM_STREAK),
            max_continuous_work_secs: env_or(
                "COACH_SAFETY_MAX_WORK_SECS",
                MAX_CONTINUOUS_WORK_SECS,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check threshold consistency
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first offending threshold
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.asymmetry_warning)
            || !(0.0..=1.0).contains(&self.asymmetry_critical)
        {
            return Err(AppError::config("asymmetry thresholds must lie in [0, 1]"));
        }
        if self.asymmetry_critical > self.asymmetry_warning {
            return Err(AppError::config(
                "COACH_SAFETY_ASYMMETRY_CRITICAL must not exceed COACH_SAFETY_ASYMMETRY_WARNING",
            ));
        }
        if self.fatigue_window == 0 {
            return Err(AppError::config("COACH_SAFETY_FATIGUE_WINDOW must be at least 1"));
        }
        if self.poor_form_streak == 0 {
            return Err(AppError::config("COACH_SAFETY_POOR_FORM_STREAK must be at least 1"));
        }
        Ok(())
    }

    /// Continuous work limit
    #[must_use]
    pub const fn max_continuous_work(&self) -> Duration {
        Duration::from_secs(self.max_continuous_work_secs)
    }
}

// ABOUTME: Feedback stage generating coaching messages in the background without stalling frames
// ABOUTME: One in-flight generation per session, rate limited, harvested on a later tick
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feedback Stage
//!
//! Generation may take seconds, so it runs as a detached task held in a
//! per-session [`FeedbackSlot`]. Every tick first harvests a finished task,
//! then considers starting a new one. A message therefore always surfaces on
//! a later tick than the one that started it.
//!
//! Message selection, decided when the task starts:
//!
//! 1. Critical safety alert: safety warning, priority 5
//! 2. Warning safety alert: rest prompt, priority 4
//! 3. Correct form scoring at least 80: generated encouragement
//! 4. Any deviation: generated correction of the first deviation
//! 5. Otherwise: the next verbal cue of the phase
//!
//! Generator errors fall back to templates. A panicked or cancelled task
//! yields no message.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::constants::priority;
use crate::constants::session::ENCOURAGEMENT_SCORE;
use crate::models::{AlertLevel, FeedbackKind, FeedbackMessage, SafetyAlert};
use crate::providers::{FeedbackContext, FeedbackGenerator, FeedbackIntent, SpeechSynthesizer};
use crate::session::CoachState;

/// Round-robin encouragement used when no generator answers
const ENCOURAGEMENT_TEMPLATES: [&str; 5] = [
    "Great form, keep it up!",
    "Nice and steady, you're doing well.",
    "That's it, smooth and controlled.",
    "Excellent alignment, keep breathing.",
    "Perfect, stay with that feeling.",
];

/// Per-session generation slot
///
/// Holds at most one in-flight task plus the rate-limit clock and template
/// cursors.
#[derive(Debug)]
pub struct FeedbackSlot {
    task: Option<JoinHandle<Option<FeedbackMessage>>>,
    last_attempt: Option<Instant>,
    cancel: CancellationToken,
    encouragement_cursor: usize,
    cue_cursor: usize,
}

impl Default for FeedbackSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSlot {
    /// Empty slot
    #[must_use]
    pub fn new() -> Self {
        Self {
            task: None,
            last_attempt: None,
            cancel: CancellationToken::new(),
            encouragement_cursor: 0,
            cue_cursor: 0,
        }
    }

    /// Whether a generation task is pending
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// When the last generation started
    #[must_use]
    pub const fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    fn is_rate_limited(&self, now: Instant, min_interval: Duration) -> bool {
        self.last_attempt
            .is_some_and(|last| now.saturating_duration_since(last) < min_interval)
    }

    fn next_encouragement(&mut self) -> &'static str {
        let text = ENCOURAGEMENT_TEMPLATES[self.encouragement_cursor % ENCOURAGEMENT_TEMPLATES.len()];
        self.encouragement_cursor = self.encouragement_cursor.wrapping_add(1);
        text
    }

    fn next_cue(&mut self, cues: &[String]) -> Option<String> {
        if cues.is_empty() {
            return None;
        }
        let cue = cues[self.cue_cursor % cues.len()].clone();
        self.cue_cursor = self.cue_cursor.wrapping_add(1);
        Some(cue)
    }
}

/// What a newly started task will produce
enum Plan {
    /// Message known up front
    Ready(FeedbackMessage),
    /// Ask the generator, with a template to fall back on
    Generate {
        context: FeedbackContext,
        fallback: FeedbackMessage,
    },
}

/// Feedback stage
#[derive(Clone)]
pub struct FeedbackStage {
    generator: Option<Arc<dyn FeedbackGenerator>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    min_interval: Duration,
    max_chars: usize,
}

impl FeedbackStage {
    /// Create a stage; without a generator only templates are used
    #[must_use]
    pub fn new(
        generator: Option<Arc<dyn FeedbackGenerator>>,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        min_interval: Duration,
        max_chars: usize,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            min_interval,
            max_chars,
        }
    }

    /// Harvest a finished generation, then start a new one if allowed
    ///
    /// Returns the message harvested on this tick, if any.
    pub async fn run(&self, state: &mut CoachState, slot: &mut FeedbackSlot) -> Option<FeedbackMessage> {
        let harvested = Self::harvest(state, slot).await;

        let now = Instant::now();
        if !slot.is_in_flight() && !slot.is_rate_limited(now, self.min_interval) {
            if let Some(plan) = self.plan(state, slot) {
                slot.last_attempt = Some(now);
                slot.task = Some(self.spawn(plan, slot.cancel.child_token()));
                debug!(session.id = %state.session_id, "Feedback generation started");
            }
        }

        harvested
    }

    async fn harvest(state: &mut CoachState, slot: &mut FeedbackSlot) -> Option<FeedbackMessage> {
        if !slot.task.as_ref().is_some_and(JoinHandle::is_finished) {
            return None;
        }
        let task = slot.task.take()?;

        match task.await {
            Ok(Some(message)) => {
                debug!(
                    session.id = %state.session_id,
                    feedback.kind = message.kind.as_str(),
                    feedback.priority = message.priority,
                    "Feedback harvested"
                );
                state.record_feedback(message.clone());
                Some(message)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(session.id = %state.session_id, error = %e, "Feedback task failed");
                None
            }
        }
    }

    fn plan(&self, state: &CoachState, slot: &mut FeedbackSlot) -> Option<Plan> {
        if !state.is_exercising() || state.current_pose.is_none() {
            return None;
        }
        let analysis = state.analysis.as_ref()?;
        let exercise = state.exercise.as_ref()?;
        let phase = exercise.phase(state.phase_index)?;

        if let Some(alert) = most_severe(&state.safety_alerts, AlertLevel::Critical) {
            return Some(Plan::Ready(FeedbackMessage::new(
                FeedbackKind::SafetyWarning,
                truncate(&format!("{} {}", alert.message, alert.recommendation), self.max_chars),
                priority::SAFETY,
                true,
            )));
        }
        if let Some(alert) = most_severe(&state.safety_alerts, AlertLevel::Warning) {
            return Some(Plan::Ready(FeedbackMessage::new(
                FeedbackKind::RestPrompt,
                truncate(&alert.recommendation, self.max_chars),
                priority::REST_PROMPT,
                true,
            )));
        }

        let context = |intent| FeedbackContext {
            intent,
            exercise: Arc::clone(exercise),
            phase: phase.clone(),
            analysis: analysis.clone(),
            alerts: state.safety_alerts.clone(),
            max_chars: self.max_chars,
        };

        if analysis.is_correct && analysis.score >= ENCOURAGEMENT_SCORE {
            let fallback = FeedbackMessage::new(
                FeedbackKind::Encouragement,
                slot.next_encouragement(),
                priority::ENCOURAGEMENT,
                true,
            );
            return Some(Plan::Generate {
                context: context(FeedbackIntent::Encouragement),
                fallback,
            });
        }

        if let Some((deviation, suggestion)) = analysis.first_deviation() {
            let text = if suggestion.trim().is_empty() {
                format!("Check your form: {deviation}")
            } else {
                suggestion.to_owned()
            };
            let fallback = FeedbackMessage::new(
                FeedbackKind::Correction,
                truncate(&text, self.max_chars),
                priority::CORRECTION,
                true,
            );
            return Some(Plan::Generate {
                context: context(FeedbackIntent::Correction {
                    deviation: deviation.to_owned(),
                    suggestion: suggestion.to_owned(),
                }),
                fallback,
            });
        }

        let cue = slot
            .next_cue(&phase.verbal_cues)
            .unwrap_or_else(|| phase.description.clone());
        if cue.trim().is_empty() {
            return None;
        }
        Some(Plan::Ready(FeedbackMessage::new(
            FeedbackKind::PhaseCue,
            truncate(&cue, self.max_chars),
            priority::PHASE_CUE,
            true,
        )))
    }

    fn spawn(&self, plan: Plan, cancel: CancellationToken) -> JoinHandle<Option<FeedbackMessage>> {
        let generator = self.generator.clone();
        let max_chars = self.max_chars;

        tokio::spawn(async move {
            let produce = async move {
                match plan {
                    Plan::Ready(message) => message,
                    Plan::Generate { context, fallback } => match generator {
                        Some(generator) => match generator.generate(&context).await {
                            Ok(mut message) => {
                                message.text = truncate(&message.text, max_chars);
                                message
                            }
                            Err(e) => {
                                warn!(error = %e, "Feedback generation failed, using template");
                                fallback
                            }
                        },
                        None => fallback,
                    },
                }
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                message = produce => Some(message),
            }
        })
    }

    /// Synthesize audio for the pending feedback
    ///
    /// Returns `None` when nothing should be spoken or synthesis fails.
    pub async fn synthesize_speech(&self, state: &CoachState) -> Option<Vec<u8>> {
        if !state.should_speak {
            return None;
        }
        let message = state.pending_feedback.as_ref()?;
        let synthesizer = self.synthesizer.as_ref()?;
        match synthesizer.synthesize(&message.text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!(session.id = %state.session_id, error = %e, "Speech synthesis failed");
                None
            }
        }
    }

    /// Cancel any in-flight generation; the slot accepts no further harvests
    pub fn cancel(slot: &mut FeedbackSlot) {
        slot.cancel.cancel();
        if let Some(task) = slot.task.take() {
            task.abort();
        }
    }
}

fn most_severe(alerts: &[SafetyAlert], level: AlertLevel) -> Option<&SafetyAlert> {
    alerts.iter().find(|alert| alert.level == level)
}

/// Cut `text` to at most `max_chars` characters, preferring a word boundary
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let budget = max_chars.saturating_sub(1);
    let chars: Vec<char> = text.chars().take(budget).collect();
    let end = chars
        .iter()
        .rposition(|c| c.is_whitespace())
        .filter(|&position| position > budget / 2)
        .unwrap_or(chars.len());
    let cut: String = chars[..end].iter().collect();
    format!("{}…", cut.trim_end_matches(|c: char| c.is_whitespace() || c == ','))
}

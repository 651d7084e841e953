// ABOUTME: Prompt templates for coaching feedback and session completion messages
// ABOUTME: Renders exercise, phase, and analysis context into short chat prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use crate::models::Exercise;
use crate::providers::{FeedbackContext, FeedbackIntent};

/// System prompt shared by every coaching request
pub const SYSTEM_PROMPT: &str = "You are a calm, encouraging physiotherapy coach guiding a user \
through a floor exercise in real time. Reply with one short spoken sentence. No lists, no emoji, \
no medical diagnoses.";

/// User prompt for an in-session message
#[must_use]
pub fn feedback_prompt(context: &FeedbackContext) -> String {
    let mut prompt = format!(
        "Exercise: {} ({}). Current phase: {}",
        context.exercise.name,
        context.exercise.category.as_str(),
        context.phase.kind.as_str(),
    );
    if !context.phase.description.is_empty() {
        let _ = write!(prompt, " - {}", context.phase.description);
    }
    let _ = write!(prompt, ".\nForm score: {:.0}/100.", context.analysis.score);

    match &context.intent {
        FeedbackIntent::Encouragement => {
            prompt.push_str("\nThe user's form is good. Encourage them to keep going.");
        }
        FeedbackIntent::Correction {
            deviation,
            suggestion,
        } => {
            let _ = write!(
                prompt,
                "\nProblem: {deviation}.\nSuggested fix: {suggestion}.\nTell the user how to fix it, kindly."
            );
        }
    }
    let _ = write!(prompt, "\nUse at most {} characters.", context.max_chars);
    prompt
}

/// User prompt for the closing message of a session
#[must_use]
pub fn completion_prompt(exercise: &Exercise, average_score: f64) -> String {
    format!(
        "The user just finished {} ({} sets of {} repetitions) with an average form score of \
         {average_score:.0}/100. Congratulate them in one or two short sentences and give one \
         tip for next time.",
        exercise.name, exercise.sets, exercise.repetitions
    )
}

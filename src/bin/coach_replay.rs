// ABOUTME: Replays a recorded pose stream through a full coaching session
// ABOUTME: Prints per-tick feedback and the end-of-session summary as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Coaching session replay tool.
//!
//! Usage:
//! ```bash
//! # Replay a recording against a built-in exercise
//! cargo run --bin coach-replay -- --recording session.jsonl --exercise glute_bridge
//!
//! # Add exercises from a YAML catalog and generate feedback with a local LLM
//! cargo run --bin coach-replay -- -r session.jsonl -e wall_sit --catalog extra.yaml --llm
//!
//! # List available exercises
//! cargo run --bin coach-replay -- --list
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use pierre_form_coach::catalog::ExerciseCatalog;
use pierre_form_coach::config::{CoachConfig, SafetyConfig};
use pierre_form_coach::logging::LoggingConfig;
use pierre_form_coach::models::Frame;
use pierre_form_coach::recording::RecordedPoseFactory;
use pierre_form_coach::safety::SessionSafetyMonitor;
use pierre_form_coach::session::{CoachOrchestrator, CoachServices};
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "coach-replay",
    about = "Pierre Form Coach session replay",
    long_about = "Run a coaching session over a recorded JSON-lines pose stream and print the feedback it produces"
)]
struct ReplayArgs {
    /// JSON-lines pose recording, one snapshot (or null) per frame
    #[arg(long, short = 'r', required_unless_present = "list")]
    recording: Option<PathBuf>,

    /// Exercise id to coach
    #[arg(long, short = 'e', default_value = "diaphragmatic_breathing")]
    exercise: String,

    /// Additional YAML exercise catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Replay speed in frames per second (0 replays as fast as possible)
    #[arg(long, default_value_t = 15)]
    fps: u32,

    /// Generate feedback through the COACH_LLM_* endpoint
    #[arg(long)]
    llm: bool,

    /// List available exercises and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn load_catalog(args: &ReplayArgs) -> Result<ExerciseCatalog> {
    let mut catalog = ExerciseCatalog::builtin();
    if let Some(path) = &args.catalog {
        catalog.merge(ExerciseCatalog::from_yaml_file(path)?);
    }
    Ok(catalog)
}

fn build_services(
    args: &ReplayArgs,
    catalog: ExerciseCatalog,
    recording: RecordedPoseFactory,
) -> Result<CoachServices> {
    let services = CoachServices::new(
        Arc::new(catalog),
        Arc::new(recording),
        Box::new(SessionSafetyMonitor::new(SafetyConfig::from_env()?)),
    );
    if args.llm {
        with_llm(services)
    } else {
        Ok(services)
    }
}

#[cfg(feature = "llm")]
fn with_llm(services: CoachServices) -> Result<CoachServices> {
    use pierre_form_coach::config::LlmConfig;
    use pierre_form_coach::llm::OpenAiFeedbackGenerator;

    let generator = OpenAiFeedbackGenerator::new(LlmConfig::from_env()?)?;
    info!(model = generator.model(), "LLM feedback enabled");
    Ok(services.with_generator(Arc::new(generator)))
}

#[cfg(not(feature = "llm"))]
fn with_llm(services: CoachServices) -> Result<CoachServices> {
    warn!("Built without the `llm` feature, using template feedback");
    Ok(services)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    LoggingConfig::for_replay(args.verbose).init()?;

    let catalog = load_catalog(&args)?;
    if args.list {
        for id in catalog.ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let Some(path) = args.recording.as_ref() else {
        bail!("--recording is required");
    };
    let recording = RecordedPoseFactory::from_file(path)?;
    if recording.is_empty() {
        bail!("recording {} contains no frames", path.display());
    }
    let frame_count = recording.len();

    let services = build_services(&args, catalog, recording)?;
    let mut coach = CoachOrchestrator::new(CoachConfig::from_env()?, services);
    coach.start_session(&args.exercise).await?;
    coach.start_exercise();

    let pacing = (args.fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(args.fps)));
    for id in 0..frame_count as u64 {
        let Some(outcome) = coach.process_frame(Some(Frame::empty(id))).await else {
            warn!("Session ended unexpectedly");
            break;
        };
        if let Some(feedback) = &outcome.feedback {
            println!(
                "[frame {id:>5}] {:<14} p{} {}",
                feedback.kind.as_str(),
                feedback.priority,
                feedback.text
            );
        }
        if outcome.completed {
            info!(frame = id, "Exercise completed");
            break;
        }
        if let Some(pacing) = pacing {
            sleep(pacing).await;
        }
    }

    let summary = coach.end_session().await;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

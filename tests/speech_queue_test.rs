// ABOUTME: Integration tests for the serial speech synthesis queue
// ABOUTME: Covers FIFO delivery, priority preemption, synthesis failures, and shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{init_test_logging, EchoSynthesizer};
use pierre_form_coach::models::{FeedbackKind, FeedbackMessage};
use pierre_form_coach::stages::{EnqueueMode, SpeechClip, SpeechQueue};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

fn message(text: &str, priority: u8) -> FeedbackMessage {
    FeedbackMessage::new(FeedbackKind::Correction, text, priority, true)
}

fn queue(synthesizer: EchoSynthesizer) -> (SpeechQueue, mpsc::UnboundedReceiver<SpeechClip>, Arc<EchoSynthesizer>) {
    init_test_logging();
    let synthesizer = Arc::new(synthesizer);
    let (sink, clips) = mpsc::unbounded_channel();
    (SpeechQueue::new(synthesizer.clone(), sink), clips, synthesizer)
}

async fn next_text(clips: &mut mpsc::UnboundedReceiver<SpeechClip>) -> String {
    timeout(Duration::from_secs(10), clips.recv())
        .await
        .unwrap()
        .unwrap()
        .text
}

#[tokio::test(start_paused = true)]
async fn test_clips_arrive_in_enqueue_order() {
    let (mut queue, mut clips, _) = queue(EchoSynthesizer::with_delay(Duration::from_millis(300)));

    for text in ["one", "two", "three"] {
        queue.enqueue(message(text, 2), EnqueueMode::Normal).await;
    }

    assert_eq!(next_text(&mut clips).await, "one");
    assert_eq!(next_text(&mut clips).await, "two");
    assert_eq!(next_text(&mut clips).await, "three");
}

#[tokio::test(start_paused = true)]
async fn test_priority_drops_pending_entries() {
    let (mut queue, mut clips, synthesizer) =
        queue(EchoSynthesizer::with_delay(Duration::from_secs(1)));

    queue.enqueue(message("first", 2), EnqueueMode::Normal).await;
    // let the consumer pick up the first entry
    sleep(Duration::from_millis(100)).await;

    queue.enqueue(message("second", 2), EnqueueMode::Normal).await;
    queue.enqueue(message("third", 3), EnqueueMode::Normal).await;
    assert_eq!(queue.pending_len().await, 2);

    queue.enqueue(message("stop now", 5), EnqueueMode::Priority).await;
    assert_eq!(queue.pending_len().await, 1);

    assert_eq!(next_text(&mut clips).await, "first");
    assert_eq!(next_text(&mut clips).await, "stop now");
    assert!(timeout(Duration::from_secs(5), clips.recv()).await.is_err());
    assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_synthesis_skips_entry() {
    let (mut queue, mut clips, _) = queue(EchoSynthesizer::failing_on("broken"));

    for text in ["before", "broken", "after"] {
        queue.enqueue(message(text, 2), EnqueueMode::Normal).await;
    }

    assert_eq!(next_text(&mut clips).await, "before");
    assert_eq!(next_text(&mut clips).await, "after");
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_delivery() {
    let (mut queue, mut clips, synthesizer) =
        queue(EchoSynthesizer::with_delay(Duration::from_secs(1)));

    queue.enqueue(message("first", 2), EnqueueMode::Normal).await;
    queue.enqueue(message("second", 2), EnqueueMode::Normal).await;
    sleep(Duration::from_millis(100)).await;

    queue.close().await;
    assert_eq!(queue.pending_len().await, 0);

    queue.enqueue(message("late", 2), EnqueueMode::Normal).await;
    assert_eq!(queue.pending_len().await, 0);
    assert!(timeout(Duration::from_secs(5), clips.recv()).await.is_err());
    assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clip_carries_message_metadata() {
    let (mut queue, mut clips, _) = queue(EchoSynthesizer::new());
    queue
        .enqueue(
            FeedbackMessage::new(FeedbackKind::SafetyWarning, "Stop", 5, true),
            EnqueueMode::Priority,
        )
        .await;

    let clip = timeout(Duration::from_secs(1), clips.recv()).await.unwrap().unwrap();
    assert_eq!(clip.kind, FeedbackKind::SafetyWarning);
    assert_eq!(clip.priority, 5);
    assert_eq!(clip.audio, b"Stop".to_vec());
}

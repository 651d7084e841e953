// ABOUTME: FIFO speech queue synthesizing feedback serially on a single consumer task
// ABOUTME: Priority enqueue drops pending entries so urgent messages are spoken next
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::{FeedbackKind, FeedbackMessage};
use crate::providers::SpeechSynthesizer;

/// How a message joins the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueMode {
    /// Append behind pending entries
    Normal,
    /// Drop pending entries, then append
    Priority,
}

/// Synthesized audio for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    /// Spoken text
    pub text: String,
    /// Message kind
    pub kind: FeedbackKind,
    /// Message priority
    pub priority: u8,
    /// Encoded audio
    pub audio: Vec<u8>,
}

/// Serial speech synthesis queue
///
/// The consumer task is spawned on the first enqueue and lives until
/// [`close`](Self::close).
pub struct SpeechQueue {
    pending: Arc<Mutex<VecDeque<FeedbackMessage>>>,
    notify: Arc<Notify>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: mpsc::UnboundedSender<SpeechClip>,
    cancel: CancellationToken,
    consumer: Option<JoinHandle<()>>,
}

impl SpeechQueue {
    /// Create a queue delivering clips to `sink`
    #[must_use]
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        sink: mpsc::UnboundedSender<SpeechClip>,
    ) -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            synthesizer,
            sink,
            cancel: CancellationToken::new(),
            consumer: None,
        }
    }

    /// Queue a message for synthesis
    pub async fn enqueue(&mut self, message: FeedbackMessage, mode: EnqueueMode) {
        if self.cancel.is_cancelled() {
            debug!("Speech queue closed, dropping message");
            return;
        }
        self.ensure_consumer();

        {
            let mut pending = self.pending.lock().await;
            if mode == EnqueueMode::Priority && !pending.is_empty() {
                debug!(dropped = pending.len(), "Priority speech preempts pending entries");
                pending.clear();
            }
            pending.push_back(message);
        }
        self.notify.notify_one();
    }

    /// Number of messages waiting for synthesis
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Stop the consumer and drop pending entries
    pub async fn close(&mut self) {
        self.cancel.cancel();
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
        }
        self.pending.lock().await.clear();
    }

    fn ensure_consumer(&mut self) {
        if self.consumer.is_some() {
            return;
        }
        let pending = Arc::clone(&self.pending);
        let notify = Arc::clone(&self.notify);
        let synthesizer = Arc::clone(&self.synthesizer);
        let sink = self.sink.clone();
        let cancel = self.cancel.clone();

        self.consumer = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = notify.notified() => {}
                }
                loop {
                    let next = pending.lock().await.pop_front();
                    let Some(message) = next else { break };

                    let audio = tokio::select! {
                        biased;
                        () = cancel.cancelled() => return,
                        result = synthesizer.synthesize(&message.text) => result,
                    };
                    match audio {
                        Ok(audio) => {
                            let clip = SpeechClip {
                                text: message.text,
                                kind: message.kind,
                                priority: message.priority,
                                audio,
                            };
                            if sink.send(clip).is_err() {
                                debug!("Speech sink closed, stopping consumer");
                                return;
                            }
                        }
                        Err(e) => warn!(error = %e, "Speech synthesis failed, skipping entry"),
                    }
                }
            }
        }));
    }
}

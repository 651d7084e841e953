// ABOUTME: Registry of concurrent coaching sessions keyed by session id
// ABOUTME: Each session is an orchestrator behind its own async mutex
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::orchestrator::CoachOrchestrator;
use super::outcome::{FrameOutcome, StateSnapshot};
use crate::errors::AppResult;
use crate::models::Frame;

type OrchestratorFactory = dyn Fn() -> CoachOrchestrator + Send + Sync;

/// Concurrent sessions, one orchestrator each
///
/// Frames for one session are serialized by that session's mutex; different
/// sessions progress independently.
pub struct SessionRegistry {
    factory: Box<OrchestratorFactory>,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<CoachOrchestrator>>>>,
}

impl SessionRegistry {
    /// Create a registry building orchestrators with `factory`
    #[must_use]
    pub fn new(factory: impl Fn() -> CoachOrchestrator + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session for an exercise
    ///
    /// # Errors
    ///
    /// Returns the orchestrator's error for an unknown or invalid exercise
    pub async fn create(&self, exercise_id: &str) -> AppResult<StateSnapshot> {
        let mut orchestrator = (self.factory)();
        let snapshot = orchestrator.start_session(exercise_id).await?;
        self.sessions
            .write()
            .await
            .insert(snapshot.session_id, Arc::new(Mutex::new(orchestrator)));
        info!(session.id = %snapshot.session_id, "Session registered");
        Ok(snapshot)
    }

    /// Orchestrator of a session
    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<CoachOrchestrator>>> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    /// Run a frame through a session's pipeline
    pub async fn process_frame(&self, session_id: Uuid, frame: Option<Frame>) -> Option<FrameOutcome> {
        let orchestrator = self.get(session_id).await?;
        let mut orchestrator = orchestrator.lock().await;
        orchestrator.process_frame(frame).await
    }

    /// End a session and return its summary; empty when the id is unknown
    pub async fn remove(&self, session_id: Uuid) -> Map<String, Value> {
        let Some(orchestrator) = self.sessions.write().await.remove(&session_id) else {
            return Map::new();
        };
        let summary = orchestrator.lock().await.end_session().await;
        info!(session.id = %session_id, "Session removed");
        summary
    }

    /// Ids of registered sessions
    pub async fn session_ids(&self) -> Vec<Uuid> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Number of registered sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is registered
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// End every session; returns how many were ended
    pub async fn shutdown(&self) -> usize {
        let drained: Vec<_> = self.sessions.write().await.drain().collect();
        let count = drained.len();
        for (_, orchestrator) in drained {
            orchestrator.lock().await.end_session().await;
        }
        info!(sessions = count, "Session registry shut down");
        count
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use crate::{
    config::WizardConfig,
    controller::{WizardController, WizardHandle},
    error::{FlowError, Result},
    provider::RecommendationProvider,
};

/// Live sessions keyed by id. Every session gets its own controller task and state.
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, WizardHandle>>,
    provider: Arc<dyn RecommendationProvider>,
    config: WizardConfig,
}

impl SessionRegistry {
    pub fn new(provider: Arc<dyn RecommendationProvider>, config: WizardConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            provider,
            config,
        }
    }

    /// Start a new session on the splash step.
    pub fn create(&self) -> WizardHandle {
        let handle = WizardController::spawn(Arc::clone(&self.provider), self.config);
        self.sessions
            .insert(handle.session_id().to_string(), handle.clone());
        info!(session_id = %handle.session_id(), live = self.sessions.len(), "Session registered");
        handle
    }

    pub fn get(&self, id: &str) -> Result<WizardHandle> {
        self.sessions
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FlowError::SessionNotFound(id.to_string()))
    }

    /// Tear the session down and forget it. Pending timers and provider calls are cancelled.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let (_, handle) = self
            .sessions
            .remove(id)
            .ok_or_else(|| FlowError::SessionNotFound(id.to_string()))?;
        match handle.shutdown().await {
            Ok(()) | Err(FlowError::SessionClosed) => {}
            Err(e) => return Err(e),
        }
        info!(session_id = %id, live = self.sessions.len(), "Session removed");
        Ok(())
    }

    pub async fn shutdown_all(&self) {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            let _ = self.remove(&id).await;
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

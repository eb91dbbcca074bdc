use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ModelAssetTable;
use crate::modules::state::session::{SessionHandle, SessionSnapshot};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GlobalMetrics {
    pub active_sessions: usize,
    pub total_state_changes: u64,
    pub total_errors: u64,
    pub mean_health: f64,
}

pub struct SessionManager {
    assets: Arc<ModelAssetTable>,
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new(assets: Arc<ModelAssetTable>) -> Self {
        SessionManager {
            assets,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// An already-registered id returns the existing session unchanged,
    /// keeping the first model choice; unknown model names resolve to the
    /// default model.
    pub fn create_session(&self, session_id: &str, model: Option<&str>) -> SessionHandle {
        let mut sessions = self.sessions.lock();
        if let Some(existing) = sessions.get(session_id) {
            return existing.clone();
        }

        let model = self.assets.resolve_model(model).to_string();
        let handle = SessionHandle::new(session_id, &model, Arc::clone(&self.assets));
        sessions.insert(session_id.to_string(), handle.clone());
        info!(session_id, model = %model, "session created");
        handle
    }

    pub fn session(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.lock().get(session_id).cloned()
    }

    /// Resets the session, cancelling its outstanding timers, before
    /// dropping it from the registry.
    pub fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().remove(session_id);
        match removed {
            Some(handle) => {
                handle.reset(false);
                info!(session_id, "session removed");
                true
            }
            None => {
                debug!(session_id, "remove for unknown session ignored");
                false
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.lock().keys().cloned().collect()
    }

    pub fn cleanup_inactive(&self, threshold: Duration) -> usize {
        let candidates: Vec<(String, SessionHandle)> = self
            .sessions
            .lock()
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect();

        let mut removed = 0;
        for (session_id, handle) in candidates {
            if handle.idle_for() > threshold && self.remove_session(&session_id) {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "idle session sweep complete");
        }
        removed
    }

    pub fn all_session_states(&self) -> Vec<SessionSnapshot> {
        let handles: Vec<SessionHandle> = self.sessions.lock().values().cloned().collect();
        handles.iter().map(SessionHandle::snapshot).collect()
    }

    pub fn global_metrics(&self) -> GlobalMetrics {
        let handles: Vec<SessionHandle> = self.sessions.lock().values().cloned().collect();

        let mut total_state_changes = 0;
        let mut total_errors = 0;
        let mut health_sum = 0.0;
        for handle in &handles {
            let metrics = handle.metrics();
            total_state_changes += metrics.state_changes;
            total_errors += metrics.error_count;
            health_sum += metrics.health_score();
        }

        let mean_health = if handles.is_empty() {
            1.0
        } else {
            health_sum / handles.len() as f64
        };

        GlobalMetrics {
            active_sessions: handles.len(),
            total_state_changes,
            total_errors,
            mean_health,
        }
    }
}

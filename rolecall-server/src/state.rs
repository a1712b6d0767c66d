//! Shared application state for the rolecall server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rolecall_core::{
    CompletionCoordinator, ConversationProvider, ReportGenerator, ScoringEngine,
    SessionIssuer, ShareCapabilityManager, Store, WebhookGateway,
};

/// Shared application state accessible by all handlers
///
/// Collaborator clients are constructed once at process start and injected
/// here; handlers never build their own.
pub struct AppState {
    /// Persistent store behind all conditional updates
    pub store: Arc<dyn Store>,
    /// Issues correlated conversation sessions
    pub sessions: SessionIssuer,
    /// Transitions attempts exactly once and triggers reports
    pub completions: CompletionCoordinator,
    /// Generates and serves performance reports
    pub reports: Arc<ReportGenerator>,
    /// Issues/revokes/resolves share capabilities
    pub shares: ShareCapabilityManager,
    /// Verifies completion webhook signatures
    pub gateway: WebhookGateway,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire up all components over the given store and collaborators
    pub fn new(
        store: Arc<dyn Store>,
        conversations: Arc<dyn ConversationProvider>,
        engine: Arc<dyn ScoringEngine>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        let reports = Arc::new(ReportGenerator::new(store.clone(), engine));
        Self {
            sessions: SessionIssuer::new(store.clone(), conversations),
            completions: CompletionCoordinator::new(store.clone(), reports.clone()),
            shares: ShareCapabilityManager::new(store.clone()),
            gateway: WebhookGateway::new(webhook_secret),
            reports,
            store,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolecall_core::{MemoryStore, MockConversationProvider, MockScoringEngine};

    #[test]
    fn app_state_wires_components() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockConversationProvider::new()),
            Arc::new(MockScoringEngine::new(75)),
            "whsec_test",
        );
        assert!(state.uptime_seconds() >= 0);
    }
}

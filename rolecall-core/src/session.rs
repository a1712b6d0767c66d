//! Session issuance: opens a correlated realtime session for a candidate

use std::sync::Arc;

use crate::domain::{Attempt, AttemptStatus};
use crate::error::CoreError;
use crate::providers::{ConversationProvider, Identity};
use crate::store::Store;

/// Result of starting (or refreshing) a session
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub attempt: Attempt,
    pub session_url: String,
}

/// Issues correlated conversation sessions for authorized candidates
///
/// Owns attempt creation and pre-completion refresh; no other component
/// writes attempt state before the terminal transition.
pub struct SessionIssuer {
    store: Arc<dyn Store>,
    conversations: Arc<dyn ConversationProvider>,
}

impl SessionIssuer {
    pub fn new(store: Arc<dyn Store>, conversations: Arc<dyn ConversationProvider>) -> Self {
        Self {
            store,
            conversations,
        }
    }

    /// Start a session for `candidate` on `module_id`
    ///
    /// Re-calling while the attempt is PENDING is safe: the correlation id
    /// and session URL are refreshed in place. The provider call happens
    /// before any persistence, so an upstream failure leaves no orphaned
    /// rows.
    pub async fn start_session(
        &self,
        module_id: &str,
        candidate: &Identity,
    ) -> Result<StartedSession, CoreError> {
        let module = self
            .store
            .module(module_id)
            .await?
            .filter(|m| m.active)
            .ok_or_else(|| CoreError::NotFound(format!("module not found: {module_id}")))?;

        if !module.allows_candidate(&candidate.email) {
            return Err(CoreError::NotAuthorized(
                "you do not have access to this module".to_string(),
            ));
        }

        // Early conflict check so a finished candidate never burns a
        // provider session; the guarded write below re-checks under the lock
        let existing = self
            .store
            .attempt_for(module_id, &candidate.subject)
            .await?;
        if let Some(attempt) = &existing {
            if attempt.status == AttemptStatus::Completed {
                return Err(CoreError::Conflict(
                    "you have already completed this module".to_string(),
                ));
            }
        }

        // Provider call first; only then touch the store
        let session = self.conversations.open_session(&module.scenario).await?;

        // Single atomic create-or-refresh: concurrent starts for the same
        // (module, candidate) pair converge on one attempt row
        let attempt = self
            .store
            .create_or_refresh_attempt(
                module_id,
                &candidate.subject,
                &session.conversation_id,
                &session.session_url,
            )
            .await?;

        tracing::info!(
            attempt_id = %attempt.id,
            conversation_id = %session.conversation_id,
            "attempt session issued"
        );

        Ok(StartedSession {
            session_url: session.session_url,
            attempt,
        })
    }
}

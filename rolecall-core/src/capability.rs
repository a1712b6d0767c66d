//! Share capability tokens: anonymous, time-bounded, module-scoped access
//!
//! Capability behavior lives on a plain value type rather than the stored
//! module record, so validity rules can be tested without a store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::{Module, ModulePublic};
use crate::error::CoreError;
use crate::store::Store;

/// Raw entropy per token; 32 bytes = 256 bits, hex-encoded to 64 chars
const SHARE_TOKEN_BYTES: usize = 32;

/// An issued share capability: opaque token plus optional expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCapability {
    /// High-entropy opaque token
    pub token: String,
    /// Expiry instant; `None` means the token never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareCapability {
    /// Issue a fresh capability, expiring `expiry_days` from `now` if given
    pub fn issue(expiry_days: Option<i64>, now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; SHARE_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            token: hex::encode(bytes),
            expires_at: expiry_days.map(|days| now + Duration::days(days)),
        }
    }

    /// Whether the capability is still valid at `now`
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now <= expires_at,
            None => true,
        }
    }
}

/// Issues, revokes, validates, and resolves share capabilities
///
/// The module's capability fields are mutated exclusively here, under the
/// module owner's authority.
pub struct ShareCapabilityManager {
    store: Arc<dyn Store>,
}

impl ShareCapabilityManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Issue a capability for a module, replacing (and so revoking) any
    /// prior one
    pub async fn issue(
        &self,
        module_id: &str,
        owner: &str,
        expiry_days: Option<i64>,
    ) -> Result<ShareCapability, CoreError> {
        self.owned_module(module_id, owner).await?;

        let capability = ShareCapability::issue(expiry_days, Utc::now());
        self.store
            .set_module_share(module_id, Some(capability.clone()))
            .await?;

        tracing::info!(module_id, "share capability issued");
        Ok(capability)
    }

    /// Clear a module's capability, invalidating the token immediately
    pub async fn revoke(&self, module_id: &str, owner: &str) -> Result<(), CoreError> {
        self.owned_module(module_id, owner).await?;
        self.store.set_module_share(module_id, None).await?;

        tracing::info!(module_id, "share capability revoked");
        Ok(())
    }

    /// Whether `token` grants access to any module at `now`
    pub async fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<bool, CoreError> {
        let module = self.store.module_by_share_token(token).await?;
        Ok(match module.and_then(|m| m.share) {
            Some(capability) => capability.is_valid(now),
            None => false,
        })
    }

    /// Resolve module access by capability token or candidate email
    ///
    /// Both paths require the module to be active. Returns the redacted
    /// public projection.
    pub async fn resolve(
        &self,
        token: Option<&str>,
        candidate_email: Option<&str>,
    ) -> Result<ModulePublic, CoreError> {
        if let Some(token) = token {
            let module = self
                .store
                .module_by_share_token(token)
                .await?
                .filter(|m| m.active)
                .ok_or_else(|| CoreError::NotFound("invalid or expired share link".to_string()))?;

            let valid = module
                .share
                .as_ref()
                .is_some_and(|c| c.is_valid(Utc::now()));
            if !valid {
                return Err(CoreError::NotAuthorized(
                    "share link has expired or been revoked".to_string(),
                ));
            }
            return Ok(module.public_view());
        }

        if let Some(email) = candidate_email {
            return self
                .store
                .modules_for_candidate(email)
                .await?
                .first()
                .map(Module::public_view)
                .ok_or_else(|| CoreError::NotFound("invalid or expired share link".to_string()));
        }

        Err(CoreError::Validation(
            "a share token or candidate identity is required".to_string(),
        ))
    }

    /// Active modules whose allowlist contains the candidate's email
    pub async fn list_for_candidate(&self, email: &str) -> Result<Vec<ModulePublic>, CoreError> {
        let modules = self.store.modules_for_candidate(email).await?;
        Ok(modules.iter().map(Module::public_view).collect())
    }

    async fn owned_module(&self, module_id: &str, owner: &str) -> Result<Module, CoreError> {
        let module = self
            .store
            .module(module_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("module not found: {module_id}")))?;
        if module.owner != owner {
            return Err(CoreError::NotAuthorized(
                "you do not own this module".to_string(),
            ));
        }
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_has_256_bits_of_entropy() {
        let capability = ShareCapability::issue(None, Utc::now());
        // 32 bytes hex-encoded
        assert_eq!(capability.token.len(), 64);
        assert!(capability.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(capability.expires_at.is_none());
    }

    #[test]
    fn issued_tokens_are_unique() {
        let a = ShareCapability::issue(None, Utc::now());
        let b = ShareCapability::issue(None, Utc::now());
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn one_day_expiry_validates_now_but_not_after_25_hours() {
        let now = Utc::now();
        let capability = ShareCapability::issue(Some(1), now);

        assert!(capability.is_valid(now));
        assert!(capability.is_valid(now + Duration::hours(23)));
        assert!(!capability.is_valid(now + Duration::hours(25)));
    }

    #[test]
    fn capability_without_expiry_never_expires() {
        let now = Utc::now();
        let capability = ShareCapability::issue(None, now);
        assert!(capability.is_valid(now + Duration::days(365)));
    }

    mod manager {
        use super::*;
        use crate::domain::{Difficulty, ScenarioConfig};
        use crate::store::MemoryStore;

        fn sample_module(owner: &str) -> Module {
            Module::new(
                owner,
                "Returns desk",
                vec!["cand@example.com".to_string()],
                ScenarioConfig {
                    topic: "returns".to_string(),
                    difficulty: Difficulty::Easy,
                    agent_role: "customer".to_string(),
                    agent_prompt: "prompt".to_string(),
                    agent_first_message: "hi".to_string(),
                    candidate_role: "rep".to_string(),
                    problem_statement: "handle a return".to_string(),
                },
            )
        }

        async fn setup() -> (Arc<MemoryStore>, ShareCapabilityManager, String) {
            let store = Arc::new(MemoryStore::new());
            let module = sample_module("owner-1");
            let module_id = module.id.clone();
            store.insert_module(module).await.unwrap();
            let manager = ShareCapabilityManager::new(store.clone());
            (store, manager, module_id)
        }

        #[tokio::test]
        async fn reissue_replaces_the_prior_token() {
            let (_store, manager, module_id) = setup().await;

            let first = manager.issue(&module_id, "owner-1", None).await.unwrap();
            let second = manager.issue(&module_id, "owner-1", None).await.unwrap();
            assert_ne!(first.token, second.token);

            // The replaced token no longer grants anything
            assert!(!manager.validate(&first.token, Utc::now()).await.unwrap());
            assert!(manager.validate(&second.token, Utc::now()).await.unwrap());
        }

        #[tokio::test]
        async fn revoke_invalidates_immediately() {
            let (_store, manager, module_id) = setup().await;

            let capability = manager.issue(&module_id, "owner-1", Some(7)).await.unwrap();
            assert!(manager.validate(&capability.token, Utc::now()).await.unwrap());

            manager.revoke(&module_id, "owner-1").await.unwrap();
            assert!(!manager.validate(&capability.token, Utc::now()).await.unwrap());
        }

        #[tokio::test]
        async fn non_owner_cannot_issue_or_revoke() {
            let (_store, manager, module_id) = setup().await;

            let err = manager.issue(&module_id, "owner-2", None).await.unwrap_err();
            assert!(matches!(err, CoreError::NotAuthorized(_)));

            let err = manager.revoke(&module_id, "owner-2").await.unwrap_err();
            assert!(matches!(err, CoreError::NotAuthorized(_)));
        }

        #[tokio::test]
        async fn resolve_by_token_returns_public_projection() {
            let (_store, manager, module_id) = setup().await;
            let capability = manager.issue(&module_id, "owner-1", None).await.unwrap();

            let view = manager.resolve(Some(&capability.token), None).await.unwrap();
            assert_eq!(view.id, module_id);
            assert_eq!(view.title, "Returns desk");
        }

        #[tokio::test]
        async fn resolve_rejects_expired_token() {
            let (store, manager, module_id) = setup().await;

            // Plant a capability that expired yesterday
            let expired = ShareCapability {
                token: "deadbeef".to_string(),
                expires_at: Some(Utc::now() - Duration::days(1)),
            };
            store
                .set_module_share(&module_id, Some(expired))
                .await
                .unwrap();

            let err = manager.resolve(Some("deadbeef"), None).await.unwrap_err();
            assert!(matches!(err, CoreError::NotAuthorized(_)));
        }

        #[tokio::test]
        async fn resolve_by_candidate_email_requires_allowlisting() {
            let (_store, manager, _module_id) = setup().await;

            let view = manager
                .resolve(None, Some("cand@example.com"))
                .await
                .unwrap();
            assert_eq!(view.title, "Returns desk");

            let err = manager
                .resolve(None, Some("other@example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::NotFound(_)));
        }

        #[tokio::test]
        async fn resolve_ignores_inactive_modules() {
            let (store, manager, module_id) = setup().await;
            let capability = manager.issue(&module_id, "owner-1", None).await.unwrap();

            let mut module = store.module(&module_id).await.unwrap().unwrap();
            module.active = false;
            store.insert_module(module).await.unwrap();

            let err = manager
                .resolve(Some(&capability.token), None)
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::NotFound(_)));
        }

        #[tokio::test]
        async fn resolve_with_neither_input_is_a_validation_error() {
            let (_store, manager, _module_id) = setup().await;
            let err = manager.resolve(None, None).await.unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)));
        }

        #[tokio::test]
        async fn list_for_candidate_projects_active_modules() {
            let (store, manager, _module_id) = setup().await;
            store.insert_module(sample_module("owner-3")).await.unwrap();

            let modules = manager.list_for_candidate("cand@example.com").await.unwrap();
            assert_eq!(modules.len(), 2);
        }
    }
}

//! In-memory store implementation
//!
//! A single RwLock over all three maps makes every conditional update one
//! atomic step, which is what the completion pipeline relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::capability::ShareCapability;
use crate::domain::{Attempt, AttemptReport, AttemptStatus, Module};
use crate::error::CoreError;

#[derive(Default)]
struct Inner {
    modules: HashMap<String, Module>,
    attempts: HashMap<String, Attempt>,
    reports: HashMap<String, AttemptReport>,
}

/// In-memory implementation of [`Store`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_module(&self, module: Module) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        inner.modules.insert(module.id.clone(), module);
        Ok(())
    }

    async fn module(&self, module_id: &str) -> Result<Option<Module>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner.modules.get(module_id).cloned())
    }

    async fn set_module_share(
        &self,
        module_id: &str,
        share: Option<ShareCapability>,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        let module = inner
            .modules
            .get_mut(module_id)
            .ok_or_else(|| CoreError::NotFound(format!("module not found: {module_id}")))?;
        module.share = share;
        Ok(())
    }

    async fn module_by_share_token(&self, token: &str) -> Result<Option<Module>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .modules
            .values()
            .find(|m| m.share.as_ref().is_some_and(|c| c.token == token))
            .cloned())
    }

    async fn modules_for_candidate(&self, email: &str) -> Result<Vec<Module>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .modules
            .values()
            .filter(|m| m.active && m.allows_candidate(email))
            .cloned()
            .collect())
    }

    async fn insert_attempt(&self, attempt: Attempt) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        inner.attempts.insert(attempt.id.clone(), attempt);
        Ok(())
    }

    async fn attempt(&self, attempt_id: &str) -> Result<Option<Attempt>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner.attempts.get(attempt_id).cloned())
    }

    async fn attempt_for(
        &self,
        module_id: &str,
        candidate: &str,
    ) -> Result<Option<Attempt>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .attempts
            .values()
            .find(|a| a.module_id == module_id && a.candidate == candidate)
            .cloned())
    }

    async fn attempt_by_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Attempt>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .attempts
            .values()
            .find(|a| a.conversation_id == conversation_id)
            .cloned())
    }

    async fn create_or_refresh_attempt(
        &self,
        module_id: &str,
        candidate: &str,
        conversation_id: &str,
        session_url: &str,
    ) -> Result<Attempt, CoreError> {
        let mut inner = self.inner.write().await;

        // Existence check and write under one guard; concurrent starts for
        // the same pair converge on a single row
        if let Some(attempt) = inner
            .attempts
            .values_mut()
            .find(|a| a.module_id == module_id && a.candidate == candidate)
        {
            if attempt.status == AttemptStatus::Completed {
                return Err(CoreError::Conflict(
                    "attempt already completed".to_string(),
                ));
            }
            attempt.conversation_id = conversation_id.to_string();
            attempt.session_url = session_url.to_string();
            attempt.updated_at = Utc::now();
            return Ok(attempt.clone());
        }

        let attempt = Attempt::new(module_id, candidate, conversation_id, session_url);
        inner.attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn complete_attempt_if_pending(&self, attempt_id: &str) -> Result<bool, CoreError> {
        let mut inner = self.inner.write().await;
        let attempt = inner
            .attempts
            .get_mut(attempt_id)
            .ok_or_else(|| CoreError::NotFound(format!("attempt not found: {attempt_id}")))?;
        if attempt.status == AttemptStatus::Completed {
            return Ok(false);
        }
        attempt.status = AttemptStatus::Completed;
        attempt.updated_at = Utc::now();
        Ok(true)
    }

    async fn link_report(&self, report: AttemptReport) -> Result<AttemptReport, CoreError> {
        let mut inner = self.inner.write().await;

        // Return the existing report if one is already linked
        if let Some(attempt) = inner.attempts.get(&report.attempt_id) {
            if let Some(existing_id) = &attempt.report_id {
                if let Some(existing) = inner.reports.get(existing_id) {
                    return Ok(existing.clone());
                }
            }
        }

        let attempt = inner
            .attempts
            .get_mut(&report.attempt_id)
            .ok_or_else(|| {
                CoreError::NotFound(format!("attempt not found: {}", report.attempt_id))
            })?;
        attempt.report_id = Some(report.id.clone());
        attempt.status = AttemptStatus::Completed;
        attempt.updated_at = Utc::now();

        inner.reports.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    async fn report(&self, report_id: &str) -> Result<Option<AttemptReport>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reports.get(report_id).cloned())
    }
}

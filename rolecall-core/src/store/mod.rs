//! Persistent store trait
//!
//! All cross-request coordination happens through the store via
//! conditional/atomic updates; no component holds mutable state of its own.
//! The guarded operations ([`Store::create_or_refresh_attempt`],
//! [`Store::complete_attempt_if_pending`], [`Store::link_report`]) are the
//! writes that race across requests, and each is a single atomic step.

mod memory;

use async_trait::async_trait;

use crate::capability::ShareCapability;
use crate::domain::{Attempt, AttemptReport, Module};
use crate::error::CoreError;

pub use memory::MemoryStore;

/// Persistent store for modules, attempts, and reports
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new module
    async fn insert_module(&self, module: Module) -> Result<(), CoreError>;

    /// Fetch a module by id
    async fn module(&self, module_id: &str) -> Result<Option<Module>, CoreError>;

    /// Replace a module's share capability (None clears it)
    async fn set_module_share(
        &self,
        module_id: &str,
        share: Option<ShareCapability>,
    ) -> Result<(), CoreError>;

    /// Fetch the module holding the given share token, if any
    async fn module_by_share_token(&self, token: &str) -> Result<Option<Module>, CoreError>;

    /// Active modules whose candidate allowlist contains `email`
    async fn modules_for_candidate(&self, email: &str) -> Result<Vec<Module>, CoreError>;

    /// Insert a new attempt
    ///
    /// Unconditional; session issuance goes through
    /// [`Store::create_or_refresh_attempt`] instead so the one-attempt-per
    /// (module, candidate) invariant holds under concurrent starts.
    async fn insert_attempt(&self, attempt: Attempt) -> Result<(), CoreError>;

    /// Fetch an attempt by id
    async fn attempt(&self, attempt_id: &str) -> Result<Option<Attempt>, CoreError>;

    /// Fetch the attempt for a (module, candidate) pair, of which there is
    /// at most one
    async fn attempt_for(
        &self,
        module_id: &str,
        candidate: &str,
    ) -> Result<Option<Attempt>, CoreError>;

    /// Fetch an attempt by its correlation id
    async fn attempt_by_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Attempt>, CoreError>;

    /// Create the attempt for a (module, candidate) pair, or refresh the
    /// existing one's correlation id and session URL, in one atomic step
    ///
    /// The existence check and the write happen under the same guard, so
    /// concurrent starts for the same pair converge on a single row. Fails
    /// with `Conflict` if the pair's attempt has already completed; the
    /// correlation id is immutable from then on.
    async fn create_or_refresh_attempt(
        &self,
        module_id: &str,
        candidate: &str,
        conversation_id: &str,
        session_url: &str,
    ) -> Result<Attempt, CoreError>;

    /// Conditionally flip an attempt PENDING -> COMPLETED
    ///
    /// Returns `true` only for the call that actually flips the status;
    /// duplicate deliveries observe `false` and take no further action.
    async fn complete_attempt_if_pending(&self, attempt_id: &str) -> Result<bool, CoreError>;

    /// Persist a report and link it to its attempt in one atomic step
    ///
    /// If the attempt already has a linked report the existing report is
    /// returned unchanged, so at most one report ever exists per attempt.
    /// Linking also sets the attempt COMPLETED if it is not already.
    async fn link_report(&self, report: AttemptReport) -> Result<AttemptReport, CoreError>;

    /// Fetch a report by id
    async fn report(&self, report_id: &str) -> Result<Option<AttemptReport>, CoreError>;
}

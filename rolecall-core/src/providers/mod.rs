//! Collaborator traits for external providers
//!
//! The conversation provider, scoring engine, and identity verifier are
//! consumed as opaque contracts. Constructing them once at process start
//! and passing them into each component keeps every collaborator
//! substitutable with a mock in tests.

mod mock;

use async_trait::async_trait;

use crate::domain::ScenarioConfig;
use crate::error::CoreError;

pub use mock::{MockConversationProvider, MockScoringEngine, StaticIdentityVerifier};

/// A provider-issued realtime session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSession {
    /// Correlation id embedded in the session URL and echoed by the
    /// completion webhook
    pub conversation_id: String,
    /// Signed URL the candidate connects to
    pub session_url: String,
}

/// A verified caller identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable subject id from the identity provider
    pub subject: String,
    /// Email address used for module allowlists
    pub email: String,
}

/// Opens correlated realtime conversation sessions
#[async_trait]
pub trait ConversationProvider: Send + Sync {
    /// Request a fresh signed session for the given scenario
    async fn open_session(&self, scenario: &ScenarioConfig) -> Result<SignedSession, CoreError>;
}

/// Scores a finished conversation from a text prompt
///
/// The response text is expected to contain one JSON object; parsing and
/// validation happen in the report generator.
#[async_trait]
pub trait ScoringEngine: Send + Sync {
    async fn evaluate(&self, prompt: &str) -> Result<String, CoreError>;
}

/// Verifies a bearer credential and returns the stable identity behind it
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, bearer: &str) -> Result<Identity, CoreError>;
}

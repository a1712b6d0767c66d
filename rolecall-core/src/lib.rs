//! rolecall-core: attempt lifecycle and secure webhook completion pipeline
//!
//! This crate implements the core of rolecall, a system that runs
//! structured voice-based simulated conversations against configurable
//! assessment scenarios and produces scored performance reports:
//!
//! - **Session issuance** - [`SessionIssuer`] opens a correlated realtime
//!   session for an authorized candidate
//! - **Webhook gateway** - [`WebhookGateway`] authenticates out-of-band
//!   completion events by timestamped HMAC signature
//! - **Completion coordination** - [`CompletionCoordinator`] transitions
//!   attempt state exactly once under at-least-once delivery
//! - **Report generation** - [`ReportGenerator`] invokes the scoring engine
//!   and persists an idempotent performance report
//! - **Share capabilities** - [`ShareCapabilityManager`] issues anonymous,
//!   time-bounded, module-scoped access tokens
//!
//! External collaborators (conversation provider, scoring engine, identity
//! verifier) are injected through the traits in [`providers`]; the
//! persistent store behind all conditional updates is the [`Store`] trait.

pub mod capability;
pub mod completion;
pub mod domain;
pub mod error;
pub mod providers;
pub mod reporting;
pub mod session;
pub mod store;
pub mod webhook;

// Re-export key types for convenience
pub use capability::{ShareCapability, ShareCapabilityManager};
pub use completion::{CompletionCoordinator, CompletionOutcome};
pub use domain::{
    Attempt, AttemptReport, AttemptStatus, DetailedFeedback, Difficulty, DimensionScore, Module,
    ModulePublic, Recommendation, ScenarioConfig, SpeakerRole, TranscriptMessage, TranscriptStats,
};
pub use error::{CoreError, SignatureError};
pub use providers::{
    ConversationProvider, Identity, IdentityVerifier, MockConversationProvider, MockScoringEngine,
    ScoringEngine, SignedSession, StaticIdentityVerifier,
};
pub use reporting::ReportGenerator;
pub use session::{SessionIssuer, StartedSession};
pub use store::{MemoryStore, Store};
pub use webhook::{CompletionData, CompletionEvent, WebhookGateway};

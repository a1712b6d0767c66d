//! Completion webhook gateway
//!
//! Authenticates inbound completion events by signature before any
//! structural parsing, then hands the parsed event to the coordinator.

mod event;
mod signature;

use chrono::{DateTime, Utc};

use crate::error::CoreError;

pub use event::{CallMetadata, CompletionData, CompletionEvent, TERMINAL_STATUS};
pub use signature::{SIGNATURE_TOLERANCE_SECS, SignatureHeader, verify_signature};

/// Verifies and admits completion webhooks
pub struct WebhookGateway {
    secret: String,
}

impl WebhookGateway {
    /// Create a gateway with the shared webhook secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify the signature over the exact received bytes, then parse
    ///
    /// A rejected request returns an error with no side effects; retry
    /// policy stays with the event source.
    pub fn admit(
        &self,
        raw_body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<CompletionEvent, CoreError> {
        verify_signature(raw_body, signature_header, &self.secret, now)?;

        serde_json::from_slice(raw_body)
            .map_err(|e| CoreError::Validation(format!("malformed completion payload: {e}")))
    }
}

//! Error types for rolecall-core

use thiserror::Error;

/// Top-level error type for rolecall-core
///
/// Every boundary maps a variant to a stable (kind, message) pair;
/// internal details stay out of the message text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller lacks entitlement for the operation
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// No such module, attempt, report, or correlation id
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation conflicts with existing state
    #[error("conflict: {0}")]
    Conflict(String),

    /// A provider or engine call failed
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The scoring engine returned an unparseable or non-conforming result
    #[error("report parse error: {0}")]
    ReportParse(String),

    /// Persistent store failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Webhook signature verification failure
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),
}

impl CoreError {
    /// Stable machine-readable kind for boundary responses
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation",
            CoreError::NotAuthorized(_) => "not_authorized",
            CoreError::NotFound(_) => "not_found",
            CoreError::Conflict(_) => "conflict",
            CoreError::Upstream(_) => "upstream",
            CoreError::ReportParse(_) => "report_parse",
            CoreError::Storage(_) => "storage",
            CoreError::Signature(SignatureError::Expired { .. }) => "signature_expired",
            CoreError::Signature(_) => "signature_invalid",
        }
    }
}

/// Errors from webhook signature verification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Header is missing or not in `t=...,v0=...` form
    #[error("malformed signature header: {0}")]
    Malformed(String),

    /// Timestamp is older than the tolerance window
    #[error("signature timestamp is {age_secs}s old, exceeds {tolerance_secs}s tolerance")]
    Expired { age_secs: i64, tolerance_secs: i64 },

    /// Computed HMAC does not match the presented one
    #[error("signature mismatch")]
    Mismatch,
}

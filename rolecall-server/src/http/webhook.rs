//! Completion webhook endpoint
//!
//! The handler takes the raw body bytes and verifies the signature over
//! them before any parsing; extracting a typed JSON body first would
//! re-serialize the payload and invalidate the signature.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use rolecall_core::{CompletionOutcome, CoreError, SignatureError};

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the `t=...,v0=...` signature
pub const SIGNATURE_HEADER: &str = "conversation-signature";

/// POST /webhooks/conversation/post-call - provider completion event
///
/// Returns 200 for admitted events, including duplicates and non-terminal
/// statuses, so the provider does not retry; signature failures return
/// non-2xx and leave retry policy to the provider.
pub async fn post_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(CoreError::Signature(SignatureError::Malformed(
            "missing signature header".to_string(),
        )))
        .map_err(ApiError::Core)?;

    let event = state.gateway.admit(&body, signature, Utc::now())?;

    match state.completions.complete(&event.data).await? {
        CompletionOutcome::Ignored => {
            tracing::debug!("non-terminal completion acknowledged");
        }
        CompletionOutcome::AlreadyCompleted => {
            tracing::debug!("duplicate completion acknowledged");
        }
        CompletionOutcome::Completed { report_id } => {
            tracing::info!(%report_id, "completion processed");
        }
    }

    Ok(StatusCode::OK)
}

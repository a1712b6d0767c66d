//! Attempt/session endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rolecall_core::{AttemptStatus, Identity};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

/// Response for starting (or refreshing) a session
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    /// Attempt identifier
    pub attempt_id: String,
    /// Signed session URL to connect to
    pub session_url: String,
    /// Current attempt status (always PENDING on success)
    pub status: AttemptStatus,
}

/// POST /api/modules/:module_id/attempts - start a session
///
/// Idempotent while the attempt is PENDING: repeat calls refresh the
/// session URL in place.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(module_id): Path<String>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let started = state.sessions.start_session(&module_id, &identity).await?;

    Ok(Json(StartSessionResponse {
        attempt_id: started.attempt.id,
        session_url: started.session_url,
        status: started.attempt.status,
    }))
}

//! Share capability endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rolecall_core::{Identity, ModulePublic};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

/// Request body for issuing a share capability
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IssueShareRequest {
    /// Days until the token expires; omit for no expiry
    #[serde(default)]
    pub expiry_days: Option<i64>,
}

/// Response for issuing a share capability
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueShareResponse {
    /// Opaque capability token
    pub token: String,
    /// Expiry instant, if one was requested
    pub expires_at: Option<DateTime<Utc>>,
}

/// POST /api/modules/:module_id/share - issue a capability token
///
/// Replaces (and so revokes) any previously issued token for the module.
pub async fn issue(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(module_id): Path<String>,
    body: Option<Json<IssueShareRequest>>,
) -> Result<Json<IssueShareResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let capability = state
        .shares
        .issue(&module_id, &identity.subject, request.expiry_days)
        .await?;

    Ok(Json(IssueShareResponse {
        token: capability.token,
        expires_at: capability.expires_at,
    }))
}

/// DELETE /api/modules/:module_id/share - revoke the capability token
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(module_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.shares.revoke(&module_id, &identity.subject).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/share/:token - resolve anonymous access by capability token
pub async fn resolve_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ModulePublic>, ApiError> {
    let module = state.shares.resolve(Some(&token), None).await?;
    Ok(Json(module))
}

/// GET /api/modules - active modules the caller may attempt
pub async fn list_modules(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ModulePublic>>, ApiError> {
    let modules = state.shares.list_for_candidate(&identity.email).await?;
    Ok(Json(modules))
}

//! Server error type and HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use rolecall_core::{CoreError, SignatureError};

/// Errors that can occur in the rolecall server
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain error from rolecall-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Request is missing a usable bearer credential
    #[error("missing or malformed authorization header")]
    MissingCredential,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::NotAuthorized(_) => StatusCode::FORBIDDEN,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::Conflict(_) => StatusCode::CONFLICT,
                CoreError::Upstream(_) | CoreError::ReportParse(_) => StatusCode::BAD_GATEWAY,
                CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CoreError::Signature(_) => StatusCode::UNAUTHORIZED,
            },
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Core(err) => err.kind(),
            ApiError::MissingCredential => "not_authorized",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Stable (kind, message) pair; internal details stay server-side
        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

// Signature errors arrive from the gateway already wrapped in CoreError,
// but handlers verifying directly get the same mapping.
impl From<SignatureError> for ApiError {
    fn from(err: SignatureError) -> Self {
        ApiError::Core(CoreError::Signature(err))
    }
}

//! Authentication middleware for axum
//!
//! Verifies the bearer credential through the injected identity verifier
//! and attaches the resulting [`Identity`] to the request extensions. The
//! webhook route is not behind this middleware; it authenticates by
//! signature instead.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use rolecall_core::IdentityVerifier;

/// Authentication layer state
#[derive(Clone)]
pub struct AuthLayer {
    verifier: Arc<dyn IdentityVerifier>,
}

impl AuthLayer {
    /// Create a new AuthLayer with the given verifier
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware function
pub async fn auth_middleware(
    axum::Extension(auth_layer): axum::Extension<AuthLayer>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(bearer) = extract_bearer(&request) else {
        tracing::debug!("no bearer credential provided");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let identity = match auth_layer.verifier.verify(bearer).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!("credential verification failed: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

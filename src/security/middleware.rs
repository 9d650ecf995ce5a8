//! Security Middleware Module
//!
//! Provides Axum middleware for bearer-token authentication and security
//! headers. Authentication inserts validated [`Claims`] into the request
//! extensions; handlers resolve the full user record from there.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::result::Result as StdResult;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::security::auth::{Claims, JwtAuth};

/// Extension trait for reading claims from request extensions
pub trait RequestClaimsExt {
    fn claims(&self) -> Option<&Claims>;
    fn set_claims(&mut self, claims: Claims);
}

impl RequestClaimsExt for Request<Body> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }

    fn set_claims(&mut self, claims: Claims) {
        self.extensions_mut().insert(claims);
    }
}

/// Bearer authentication middleware
///
/// Missing header, malformed scheme and invalid tokens are all reported as
/// the same `Unauthorized` error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> StdResult<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = JwtAuth::extract_bearer(auth_header)
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

    let claims = state.jwt_auth.validate_token(token)?;
    req.set_claims(claims);

    Ok(next.run(req).await)
}

/// Security headers middleware
pub async fn security_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> StdResult<Response, StatusCode> {
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert("X-Content-Type-Options", "nosniff".parse().unwrap());

    response
        .headers_mut()
        .insert("X-Frame-Options", "DENY".parse().unwrap());

    response.headers_mut().insert(
        "Referrer-Policy",
        "strict-origin-when-cross-origin".parse().unwrap(),
    );

    Ok(response)
}

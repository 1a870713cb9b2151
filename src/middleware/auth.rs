// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-token authentication middleware.
//!
//! Tokens are opaque random strings minted at login and held in the
//! in-memory store; there is nothing to decode or verify beyond lookup.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(&state.config.session_cookie_name) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Unauthorized),
        }
    };

    let username = state
        .store
        .username_for_token(&token)
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser { username });

    Ok(next.run(request).await)
}

/// Mint an opaque session token: 32 random bytes, URL-safe base64.
pub fn new_session_token() -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("system RNG failure"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

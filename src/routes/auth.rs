// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and logout routes.
//!
//! There are no passwords. Login is a bare username handshake: the account
//! is created in memory on first sight, and the caller gets an opaque
//! session token both as an HTTP-only cookie and in the response body (the
//! mobile client prefers the `Authorization` header).

use axum::{
    extract::{Request, State},
    http::header,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::new_session_token;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// Session cookie lifetime.
const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32, message = "username must be 1-32 characters"))]
    pub username: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// Log in with a username. Creates the account on first login; later
/// logins pick up the existing in-memory state.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let username = body.username.trim().to_string();
    let request = LoginRequest {
        username: username.clone(),
    };
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.store.ensure_account(
        &username,
        format_utc_rfc3339(chrono::Utc::now()),
        state.config.target_distance_km,
    );

    let token = new_session_token()?;
    state.store.insert_session(&token, &username);

    tracing::info!(username = %username, "user logged in");

    let cookie = Cookie::build((state.config.session_cookie_name.clone(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(SESSION_MAX_AGE)
        .build();

    Ok((jar.add(cookie), Json(LoginResponse { token, username })))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Log out. Drops the session token and evicts any live recorder, which
/// aborts its tick loops. Safe to call without a valid session.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
) -> (CookieJar, Json<LogoutResponse>) {
    let token = jar
        .get(&state.config.session_cookie_name)
        .map(|c| c.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.to_string())
        });

    if let Some(token) = token {
        if let Some(username) = state.store.remove_session(&token) {
            // Dropping the recorder entry aborts any running timers.
            state.recorders.remove(&username);
            tracing::info!(username = %username, "user logged out");
        }
    }

    let removal = Cookie::build((state.config.session_cookie_name.clone(), ""))
        .path("/")
        .build();

    (jar.remove(removal), Json(LogoutResponse { success: true }))
}

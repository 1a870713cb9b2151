// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use serde_json::Value;
use snapfit::config::Config;
use snapfit::middleware::auth::new_session_token;
use snapfit::routes::create_router;
use snapfit::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app with the default config and an empty store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create an account and a session for it directly in the store,
/// bypassing the login route. Returns the session token.
#[allow(dead_code)]
pub fn login_direct(state: &Arc<AppState>, username: &str) -> String {
    state.store.ensure_account(
        username,
        "2026-01-17T09:00:00Z".to_string(),
        state.config.target_distance_km,
    );
    let token = new_session_token().unwrap();
    state.store.insert_session(&token, username);
    token
}

/// GET with a bearer token.
#[allow(dead_code)]
pub async fn authed_get(app: &axum::Router, token: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST a JSON body (or nothing) with a bearer token.
#[allow(dead_code)]
pub async fn authed_post(
    app: &axum::Router,
    token: &str,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// DELETE with a bearer token.
#[allow(dead_code)]
pub async fn authed_delete(app: &axum::Router, token: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Parse a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A tiny valid JPEG payload (magic bytes only; the server never decodes
/// past the header).
#[allow(dead_code)]
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

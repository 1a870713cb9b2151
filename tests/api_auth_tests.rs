// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication and session tests.
//!
//! These tests verify that:
//! 1. Login validates the username and yields a working session token
//! 2. Protected routes reject missing/invalid tokens and accept valid ones
//! 3. Logout invalidates the session and evicts any live recorder

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{authed_get, authed_post, body_json, create_test_app, login_direct};

async fn login_request(app: &axum::Router, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_returns_token_and_cookie() {
    let (app, state) = create_test_app();

    let response = login_request(&app, json!({ "username": "pat" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{}=", state.config.session_cookie_name)));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["username"], "pat");
    let token = body["token"].as_str().unwrap();

    // The token works as a bearer token.
    let response = authed_get(&app, token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_trims_and_validates_username() {
    let (app, _) = create_test_app();

    let response = login_request(&app, json!({ "username": "  pat  " })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "pat");

    let response = login_request(&app, json!({ "username": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = login_request(&app, json!({ "username": "x".repeat(33) })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repeat_login_keeps_existing_account_state() {
    let (app, state) = create_test_app();

    let response = login_request(&app, json!({ "username": "pat" })).await;
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    // Mutate account state, then log in again.
    let _ = state.store.with_account("pat", |account| {
        account.streak = 42;
    });
    login_request(&app, json!({ "username": "pat" })).await;

    let body = body_json(authed_get(&app, &token, "/api/me").await).await;
    assert_eq!(body["streak"], 42);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/api/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_test_app();

    let response = authed_get(&app, "not-a-real-token", "/api/activities").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let (app, state) = create_test_app();
    let token = login_direct(&state, "pat");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(
                    header::COOKIE,
                    format!("{}={}", state.config.session_cookie_name, token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_invalidates_session_and_evicts_recorder() {
    let (app, state) = create_test_app();
    let token = login_direct(&state, "pat");

    // Stand up a live recording session.
    let response = authed_post(&app, &token, "/api/recorder", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.recorders.contains_key("pat"));

    let response = authed_post(&app, &token, "/auth/logout", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Session gone, recorder gone (its timers aborted on drop).
    assert!(!state.recorders.contains_key("pat"));
    let response = authed_get(&app, &token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_is_harmless() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friends, friend requests, user search, and the leaderboard.
//!
//! All social data is mock: the friends list, pending requests, and the
//! search pool are seeded per account, and the leaderboard swaps the
//! caller's live streak into otherwise static standings.

use axum::{
    extract::{Extension, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::round_km;
use crate::models::{Friend, FriendRequest, LeaderboardEntry};
use crate::services::social;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/social/friends",
            get(get_friends).post(send_request),
        )
        .route("/api/social/friends/{id}", delete(remove_friend))
        .route("/api/social/requests", get(get_requests))
        .route("/api/social/requests/{id}/accept", post(accept_request))
        .route("/api/social/requests/{id}/decline", post(decline_request))
        .route("/api/social/search", post(search_users))
        .route("/api/leaderboard", get(get_leaderboard))
}

// ─── Friends ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FriendsResponse {
    pub friends: Vec<Friend>,
}

/// Friends list, highest streak first.
async fn get_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FriendsResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            let mut friends = account.friends.clone();
            friends.sort_by(|a, b| b.streak.cmp(&a.streak));
            Json(FriendsResponse { friends })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

#[derive(Deserialize)]
pub struct SendRequestBody {
    pub username: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SendRequestResponse {
    pub sent: bool,
    pub to: String,
}

/// Send a friend request to a user found via search. The target is a mock
/// user, so the request never progresses; the endpoint only confirms it
/// went out.
async fn send_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendRequestBody>,
) -> Result<Json<SendRequestResponse>> {
    let target = body.username.trim().to_string();
    if target.is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    let known = state
        .store
        .read_account(&user.username, |account| {
            !social::search_pool(&target, &account.username, &account.friends).is_empty()
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?;
    if !known {
        return Err(AppError::NotFound(format!("user {}", target)));
    }

    tracing::info!(from = %user.username, to = %target, "friend request sent");
    Ok(Json(SendRequestResponse {
        sent: true,
        to: target,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemoveFriendResponse {
    pub removed: String,
}

async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(friend_id): Path<u64>,
) -> Result<Json<RemoveFriendResponse>> {
    let removed = state
        .store
        .with_account(&user.username, |account| account.remove_friend(friend_id))
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?
        .ok_or_else(|| AppError::NotFound(format!("friend {}", friend_id)))?;

    tracing::info!(username = %user.username, removed = %removed, "friend removed");
    Ok(Json(RemoveFriendResponse { removed }))
}

// ─── Friend requests ─────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RequestsResponse {
    pub requests: Vec<FriendRequest>,
}

async fn get_requests(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RequestsResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            Json(RequestsResponse {
                requests: account.pending_requests.clone(),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AcceptResponse {
    pub friend: Friend,
}

/// Accept a pending request; the sender joins the friends list.
async fn accept_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(request_id): Path<u64>,
) -> Result<Json<AcceptResponse>> {
    let friend = state
        .store
        .with_account(&user.username, |account| account.accept_request(request_id))
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?
        .ok_or_else(|| AppError::NotFound(format!("friend request {}", request_id)))?;

    tracing::info!(
        username = %user.username,
        friend = %friend.username,
        "friend request accepted"
    );
    Ok(Json(AcceptResponse { friend }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeclineResponse {
    pub declined: String,
}

async fn decline_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(request_id): Path<u64>,
) -> Result<Json<DeclineResponse>> {
    let declined = state
        .store
        .with_account(&user.username, |account| {
            account.decline_request(request_id)
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?
        .ok_or_else(|| AppError::NotFound(format!("friend request {}", request_id)))?;

    tracing::info!(username = %user.username, declined = %declined, "friend request declined");
    Ok(Json(DeclineResponse { declined }))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchResponse {
    pub usernames: Vec<String>,
}

/// Search the mock user pool. Excludes the caller and existing friends.
async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            Json(SearchResponse {
                usernames: social::search_pool(&body.query, &account.username, &account.friends),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

/// Global standings ranked by streak, with the caller's row reflecting
/// their live streak and logged distance.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LeaderboardResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            let total_km: f64 = account.activities.iter().map(|a| a.distance_km).sum();
            Json(LeaderboardResponse {
                entries: social::leaderboard(&account.username, account.streak, round_km(total_km)),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

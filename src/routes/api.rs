// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, daily challenge, activity history, stats, and goal routes.

use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::{achievements_for, round_km};
use crate::models::{Achievement, ActivityRecord, ProfileStats};
use crate::time_utils::{format_utc_rfc3339, next_midnight_utc, seconds_until_midnight};
use crate::AppState;

/// Step for personal goal adjustments, in kilometers.
const GOAL_STEP_KM: f64 = 5.0;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/challenge", get(get_challenge))
        .route("/api/activities", get(get_activities))
        .route("/api/stats", get(get_stats))
        .route("/api/goal", get(get_goal).post(adjust_goal))
}

// ─── User profile ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub username: String,
    pub created_at: String,
    pub streak: u32,
    pub today_completed: bool,
    pub goal_km: f64,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            Json(UserResponse {
                username: account.username.clone(),
                created_at: account.created_at.clone(),
                streak: account.streak,
                today_completed: account.today_completed,
                goal_km: account.goal_km,
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

// ─── Daily challenge ─────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChallengeResponse {
    /// Today's distance goal in kilometers
    pub target_km: f64,
    /// When the challenge resets (RFC3339, next UTC midnight)
    pub deadline: String,
    pub seconds_remaining: i64,
    pub completed: bool,
    pub streak: u32,
}

/// Today's challenge prompt: goal, countdown, and completion status.
async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ChallengeResponse>> {
    let now = chrono::Utc::now();

    state
        .store
        .read_account(&user.username, |account| {
            Json(ChallengeResponse {
                target_km: state.config.target_distance_km,
                deadline: format_utc_rfc3339(next_midnight_utc(now)),
                seconds_remaining: seconds_until_midnight(now),
                completed: account.today_completed,
                streak: account.streak,
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

// ─── Activity history ────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityRecord>,
}

/// Completed activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ActivitiesResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            Json(ActivitiesResponse {
                activities: account.activities.clone(),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

// ─── Profile stats ───────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ProfileStats,
    pub achievements: Vec<Achievement>,
}

/// Aggregate stats and earned achievement badges.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let now = chrono::Utc::now();

    state
        .store
        .read_account(&user.username, |account| {
            Json(StatsResponse {
                stats: ProfileStats::from_activities(&account.activities, now),
                achievements: achievements_for(account.streak, &account.activities, now),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

// ─── Personal goal ───────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalResponse {
    pub goal_km: f64,
    /// Floor for decreases
    pub initial_goal_km: f64,
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GoalResponse>> {
    state
        .store
        .read_account(&user.username, |account| {
            Json(GoalResponse {
                goal_km: account.goal_km,
                initial_goal_km: account.initial_goal_km,
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Increase,
    Decrease,
}

#[derive(Deserialize)]
pub struct GoalRequest {
    pub direction: GoalDirection,
}

/// Adjust the personal goal by 5 km. Decreases never go below the goal
/// the account started with.
async fn adjust_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<GoalRequest>,
) -> Result<Json<GoalResponse>> {
    state
        .store
        .with_account(&user.username, |account| {
            account.goal_km = match body.direction {
                GoalDirection::Increase => round_km(account.goal_km + GOAL_STEP_KM),
                GoalDirection::Decrease => {
                    round_km((account.goal_km - GOAL_STEP_KM).max(account.initial_goal_km))
                }
            };

            tracing::info!(
                username = %account.username,
                goal_km = account.goal_km,
                "personal goal adjusted"
            );

            Json(GoalResponse {
                goal_km: account.goal_km,
                initial_goal_km: account.initial_goal_km,
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))
}

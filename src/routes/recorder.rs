// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP surface of the activity recorder.
//!
//! Each user has at most one live recording session, held in
//! `AppState::recorders`. The handlers here are thin: they look up the
//! caller's recorder and delegate to it; every state rule lives in the
//! `recorder` module itself.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Extension, State},
    routing::{get, post},
    Json, Router,
};
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityRecord, ActivityType};
use crate::recorder::{LiveRecorder, Snapshot, TrackingState};
use crate::services::photo;
use crate::time_utils::{format_elapsed, format_utc_rfc3339};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/recorder",
            post(create_session).get(get_snapshot).delete(cancel_session),
        )
        .route("/api/recorder/select", post(select_type))
        .route("/api/recorder/start", post(start))
        .route("/api/recorder/pause", post(pause))
        .route("/api/recorder/resume", post(resume))
        .route("/api/recorder/stop", post(stop))
        .route("/api/recorder/reset", post(reset))
        .route(
            "/api/recorder/photo",
            post(attach_photo).layer(DefaultBodyLimit::max(photo::MAX_PHOTO_BYTES)),
        )
        .route("/api/recorder/submit", post(submit))
}

/// Fetch the caller's live recorder.
fn recorder_for(state: &AppState, username: &str) -> Result<Arc<LiveRecorder>> {
    state
        .recorders
        .get(username)
        .map(|entry| Arc::clone(&entry))
        .ok_or_else(|| AppError::NotFound("recording session".to_string()))
}

// ─── Session lifecycle ───────────────────────────────────────

/// Wire shape of a session snapshot.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SnapshotResponse {
    pub state: TrackingState,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub distance_km: f64,
    pub elapsed_seconds: u32,
    /// Elapsed time as `M:SS` for display
    pub elapsed_display: String,
    pub has_photo: bool,
    pub target_km: f64,
    pub progress_percent: f64,
    pub pace_min_per_km: f64,
    pub goal_reached: bool,
}

impl From<Snapshot> for SnapshotResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            state: snapshot.state,
            activity_type: snapshot.activity_type,
            distance_km: snapshot.distance_km,
            elapsed_seconds: snapshot.elapsed_seconds,
            elapsed_display: format_elapsed(snapshot.elapsed_seconds),
            has_photo: snapshot.has_photo,
            target_km: snapshot.target_km,
            progress_percent: snapshot.progress_percent,
            pace_min_per_km: snapshot.pace_min_per_km,
            goal_reached: snapshot.goal_reached,
        }
    }
}

/// Create the caller's recording session. One session per user.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = Arc::new(LiveRecorder::new(
        state.config.target_distance_km,
        Duration::from_millis(state.config.distance_tick_ms),
    ));

    match state.recorders.entry(user.username.clone()) {
        Entry::Occupied(_) => {
            return Err(AppError::Conflict(
                "a recording session already exists".to_string(),
            ));
        }
        Entry::Vacant(entry) => {
            entry.insert(Arc::clone(&recorder));
        }
    }

    tracing::info!(username = %user.username, "recording session created");
    Ok(Json(recorder.snapshot().into()))
}

/// Current session snapshot, with derived progress and pace.
async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    Ok(Json(recorder.snapshot().into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Abandon the session from any state. Removing the entry drops the
/// recorder, which aborts both tick loops; no completion is ever produced
/// for a cancelled session.
async fn cancel_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CancelResponse>> {
    let (_, recorder) = state
        .recorders
        .remove(&user.username)
        .ok_or_else(|| AppError::NotFound("recording session".to_string()))?;
    recorder.cancel();

    tracing::info!(username = %user.username, "recording cancelled");
    Ok(Json(CancelResponse { cancelled: true }))
}

// ─── Transitions ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SelectRequest {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
}

/// Choose walking or running.
async fn select_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.select(body.activity_type)?;

    tracing::info!(
        username = %user.username,
        activity_type = body.activity_type.label(),
        "activity type selected"
    );
    Ok(Json(recorder.snapshot().into()))
}

async fn start(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.start()?;
    tracing::info!(username = %user.username, "tracking started");
    Ok(Json(recorder.snapshot().into()))
}

async fn pause(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.pause()?;
    tracing::info!(username = %user.username, "tracking paused");
    Ok(Json(recorder.snapshot().into()))
}

async fn resume(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.resume()?;
    tracing::info!(username = %user.username, "tracking resumed");
    Ok(Json(recorder.snapshot().into()))
}

async fn stop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.stop()?;

    let snapshot = recorder.snapshot();
    tracing::info!(
        username = %user.username,
        distance_km = snapshot.distance_km,
        elapsed_seconds = snapshot.elapsed_seconds,
        "tracking stopped"
    );
    Ok(Json(snapshot.into()))
}

/// Start a new activity after finishing, without tearing the session down.
async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    recorder.reset()?;
    tracing::info!(username = %user.username, "session reset");
    Ok(Json(recorder.snapshot().into()))
}

// ─── Verification & submission ───────────────────────────────

/// Attach the verification photo: raw image bytes in, data-URI stored.
/// Re-posting replaces the previous photo.
async fn attach_photo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<SnapshotResponse>> {
    let recorder = recorder_for(&state, &user.username)?;
    let data_uri = photo::to_data_uri(&body)?;
    recorder.attach_photo(data_uri)?;

    tracing::info!(username = %user.username, bytes = body.len(), "photo attached");
    Ok(Json(recorder.snapshot().into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmitResponse {
    pub activity: ActivityRecord,
    pub streak: u32,
}

/// Validate and complete the recording.
///
/// On success the completion is recorded against the account (activity
/// appended, streak bumped, today marked complete) and the session is
/// disposed; a new one must be created for the next activity.
///
/// The whole sequence runs under the caller's entry in the recorder map,
/// so validation, the account update, and the disposal are one atomic
/// step: a concurrent duplicate request finds no session instead of
/// recording a second completion.
async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SubmitResponse>> {
    let entry = match state.recorders.entry(user.username.clone()) {
        Entry::Occupied(entry) => entry,
        Entry::Vacant(_) => {
            return Err(AppError::NotFound("recording session".to_string()));
        }
    };
    let completion = entry.get().submit()?;

    let record = ActivityRecord {
        id: state.store.next_activity_id(),
        date: format_utc_rfc3339(chrono::Utc::now()),
        activity_type: completion.activity_type,
        distance_km: completion.distance_km,
        photo_url: Some(completion.photo),
    };

    let streak = state
        .store
        .with_account(&user.username, |account| {
            account.record_completion(record.clone())
        })
        .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?;

    // The session is spent; dispose of it.
    entry.remove();

    tracing::info!(
        username = %user.username,
        distance_km = record.distance_km,
        activity_type = record.activity_type.label(),
        streak,
        "challenge completed"
    );

    Ok(Json(SubmitResponse {
        activity: record,
        streak,
    }))
}

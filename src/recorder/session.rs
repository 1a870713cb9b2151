// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The pure activity-recording state machine.
//!
//! No timers live here. [`RecorderSession::tick_distance`] and
//! [`RecorderSession::tick_elapsed`] are plain methods; the interval tasks
//! in [`super::live`] call them on a schedule, and tests call them directly
//! for fully deterministic traces.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::RecorderError;
use crate::models::stats::round_km;
use crate::models::ActivityType;

/// Distance gained per 100 ms tick while walking, in kilometers.
pub const WALKING_KM_PER_TICK: f64 = 0.01;
/// Distance gained per 100 ms tick while running, in kilometers.
pub const RUNNING_KM_PER_TICK: f64 = 0.03;

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TrackingState {
    Idle,
    Tracking,
    Paused,
    Finished,
}

impl TrackingState {
    fn name(&self) -> &'static str {
        match self {
            TrackingState::Idle => "idle",
            TrackingState::Tracking => "tracking",
            TrackingState::Paused => "paused",
            TrackingState::Finished => "finished",
        }
    }
}

/// The result of a successful submission. Only constructible once the
/// distance goal is met, a photo is attached, and a type was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub distance_km: f64,
    pub photo: String,
    pub activity_type: ActivityType,
}

/// Point-in-time view of a session, taken under its lock. Carries the
/// derived values so callers never recompute them inconsistently.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: TrackingState,
    pub activity_type: Option<ActivityType>,
    pub distance_km: f64,
    pub elapsed_seconds: u32,
    pub has_photo: bool,
    pub target_km: f64,
    pub progress_percent: f64,
    pub pace_min_per_km: f64,
    pub goal_reached: bool,
}

/// One activity recording from type selection through submission.
///
/// Distance accrues by a fixed per-tick increment and is rounded to two
/// decimals after every increment (round-then-store, matching what the
/// tracker displays). It is never re-derived from tick counts, so a pause
/// or a missed tick can never make it jump.
#[derive(Debug, Clone)]
pub struct RecorderSession {
    target_km: f64,
    activity_type: Option<ActivityType>,
    state: TrackingState,
    distance_km: f64,
    elapsed_seconds: u32,
    photo: Option<String>,
}

impl RecorderSession {
    /// New idle session with no type chosen. `target_km` is fixed for the
    /// session's lifetime; `Config` guarantees it is positive.
    pub fn new(target_km: f64) -> Self {
        Self {
            target_km,
            activity_type: None,
            state: TrackingState::Idle,
            distance_km: 0.0,
            elapsed_seconds: 0,
            photo: None,
        }
    }

    // ─── Transitions ─────────────────────────────────────────────

    /// Choose walking or running. Allowed exactly once, before `start`;
    /// only a reset or cancel clears the choice.
    pub fn select(&mut self, activity_type: ActivityType) -> Result<(), RecorderError> {
        if self.state != TrackingState::Idle || self.activity_type.is_some() {
            return Err(self.invalid("select"));
        }
        self.activity_type = Some(activity_type);
        Ok(())
    }

    /// Begin tracking. Requires an idle session with a type chosen.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.state != TrackingState::Idle {
            return Err(self.invalid("start"));
        }
        if self.activity_type.is_none() {
            return Err(RecorderError::NoActivityType);
        }
        self.state = TrackingState::Tracking;
        Ok(())
    }

    /// Suspend tracking, preserving distance and elapsed time.
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        if self.state != TrackingState::Tracking {
            return Err(self.invalid("pause"));
        }
        self.state = TrackingState::Paused;
        Ok(())
    }

    /// Continue tracking from the preserved values.
    pub fn resume(&mut self) -> Result<(), RecorderError> {
        if self.state != TrackingState::Paused {
            return Err(self.invalid("resume"));
        }
        self.state = TrackingState::Tracking;
        Ok(())
    }

    /// End tracking. The session keeps its accrued values and moves to
    /// `Finished`, where the photo and submission steps happen.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if self.state != TrackingState::Tracking && self.state != TrackingState::Paused {
            return Err(self.invalid("stop"));
        }
        self.state = TrackingState::Finished;
        Ok(())
    }

    /// Start over after finishing ("Start New Activity"). Clears the type,
    /// distance, elapsed time, and photo.
    pub fn reset(&mut self) -> Result<(), RecorderError> {
        if self.state != TrackingState::Finished {
            return Err(self.invalid("reset"));
        }
        *self = Self::new(self.target_km);
        Ok(())
    }

    /// Abandon the session from any state. Never fails; afterwards the
    /// session is indistinguishable from a fresh one.
    pub fn cancel(&mut self) {
        *self = Self::new(self.target_km);
    }

    // ─── Accrual ─────────────────────────────────────────────────

    /// Apply one distance tick. A no-op outside `Tracking`, so a tick that
    /// loses a race with `pause` or `stop` cannot corrupt the counter.
    /// Returns the updated distance when the tick was applied.
    pub fn tick_distance(&mut self) -> Option<f64> {
        if self.state != TrackingState::Tracking {
            return None;
        }
        let rate = match self.activity_type {
            Some(ActivityType::Walking) => WALKING_KM_PER_TICK,
            Some(ActivityType::Running) => RUNNING_KM_PER_TICK,
            None => return None,
        };
        self.distance_km = round_km(self.distance_km + rate);
        Some(self.distance_km)
    }

    /// Apply one elapsed-second tick. Same guard as `tick_distance`.
    pub fn tick_elapsed(&mut self) -> Option<u32> {
        if self.state != TrackingState::Tracking {
            return None;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        Some(self.elapsed_seconds)
    }

    // ─── Verification & submission ───────────────────────────────

    /// Attach (or replace) the verification photo. Only allowed once
    /// tracking has finished; only presence is ever validated.
    pub fn attach_photo(&mut self, data_uri: String) -> Result<(), RecorderError> {
        if self.state != TrackingState::Finished {
            return Err(self.invalid("attach a photo"));
        }
        self.photo = Some(data_uri);
        Ok(())
    }

    /// Validate and complete the recording.
    ///
    /// Checks run in a fixed order: type chosen, then distance against the
    /// goal (the error names the shortfall), then photo presence. The
    /// session itself is untouched; the caller disposes of it after
    /// recording the completion.
    pub fn submit(&self) -> Result<Completion, RecorderError> {
        if self.state != TrackingState::Finished {
            return Err(self.invalid("submit"));
        }
        let activity_type = self.activity_type.ok_or(RecorderError::NoActivityType)?;
        if self.distance_km < self.target_km {
            return Err(RecorderError::InsufficientDistance {
                target_km: self.target_km,
                shortfall_km: round_km(self.target_km - self.distance_km),
            });
        }
        let photo = self.photo.clone().ok_or(RecorderError::PhotoRequired)?;

        Ok(Completion {
            distance_km: self.distance_km,
            photo,
            activity_type,
        })
    }

    // ─── Views ───────────────────────────────────────────────────

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn activity_type(&self) -> Option<ActivityType> {
        self.activity_type
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn target_km(&self) -> f64 {
        self.target_km
    }

    /// Goal progress, clamped to 100.
    pub fn progress_percent(&self) -> f64 {
        (self.distance_km / self.target_km * 100.0).min(100.0)
    }

    /// Minutes per kilometer, or 0 before any distance has accrued.
    pub fn pace_min_per_km(&self) -> f64 {
        if self.distance_km > 0.0 {
            (self.elapsed_seconds as f64 / 60.0) / self.distance_km
        } else {
            0.0
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.distance_km >= self.target_km
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            activity_type: self.activity_type,
            distance_km: self.distance_km,
            elapsed_seconds: self.elapsed_seconds,
            has_photo: self.photo.is_some(),
            target_km: self.target_km,
            progress_percent: self.progress_percent(),
            pace_min_per_km: self.pace_min_per_km(),
            goal_reached: self.goal_reached(),
        }
    }

    fn invalid(&self, operation: &'static str) -> RecorderError {
        RecorderError::InvalidState {
            operation,
            state: self.state_label(),
        }
    }

    /// State name for error messages. An idle session with a type already
    /// chosen reads as "ready", the screen the tracker shows between
    /// selection and start.
    fn state_label(&self) -> &'static str {
        if self.state == TrackingState::Idle && self.activity_type.is_some() {
            "ready"
        } else {
            self.state.name()
        }
    }
}

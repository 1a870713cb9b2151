// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity recording: the tracking state machine and its timer loops.
//!
//! [`RecorderSession`] is the pure, synchronous state machine; tests drive
//! its tick methods directly. [`LiveRecorder`] wraps one session with the
//! tokio interval tasks that deliver ticks in real time; the HTTP layer
//! only ever talks to a `LiveRecorder`.

pub mod live;
pub mod session;

pub use live::LiveRecorder;
pub use session::{
    Completion, RecorderSession, Snapshot, TrackingState, RUNNING_KM_PER_TICK,
    WALKING_KM_PER_TICK,
};

use thiserror::Error;

/// Errors from recorder operations.
///
/// All of these are recoverable: a rejected operation leaves the session
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecorderError {
    /// The operation is not allowed in the session's current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// No activity type has been chosen yet.
    #[error("no activity type selected")]
    NoActivityType,

    /// The distance goal has not been reached.
    #[error("{shortfall_km:.2} km short of the {target_km} km goal")]
    InsufficientDistance { target_km: f64, shortfall_km: f64 },

    /// No verification photo has been attached.
    #[error("a workout verification photo is required")]
    PhotoRequired,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Real-time driver for a recording session.
//!
//! A [`LiveRecorder`] owns one [`RecorderSession`] plus the two interval
//! tasks that feed it ticks while tracking: a fast distance tick and a one
//! second elapsed tick. The tasks exist only while the session is in
//! `Tracking`; every transition out of that state aborts them, and a tick
//! already in flight is neutralized by the session's own state guard.
//!
//! Lock order: transitions take the `loops` lock first and hold it across
//! the session mutation, so a state change and its loop spawn/abort are one
//! atomic step. The tick tasks only ever take the session lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::session::{Completion, RecorderSession, Snapshot};
use super::RecorderError;
use crate::models::ActivityType;

const ELAPSED_TICK: Duration = Duration::from_secs(1);

/// Join handles for the two tick tasks. At most one live handle per loop;
/// starting a loop aborts any previous handle first.
#[derive(Default)]
struct TickLoops {
    distance: Option<JoinHandle<()>>,
    elapsed: Option<JoinHandle<()>>,
}

impl TickLoops {
    fn abort_all(&mut self) {
        if let Some(handle) = self.distance.take() {
            handle.abort();
        }
        if let Some(handle) = self.elapsed.take() {
            handle.abort();
        }
    }
}

/// A recording session plus the timers that drive it.
///
/// All methods take `&self`; the per-user entry in the application state
/// holds this behind an `Arc`. Dropping the recorder aborts both tick
/// tasks, so evicting the entry is all the cleanup a logout or cancel
/// needs.
pub struct LiveRecorder {
    session: Arc<Mutex<RecorderSession>>,
    loops: Mutex<TickLoops>,
    distance_tick: Duration,
}

impl LiveRecorder {
    pub fn new(target_km: f64, distance_tick: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(RecorderSession::new(target_km))),
            loops: Mutex::new(TickLoops::default()),
            distance_tick,
        }
    }

    pub fn select(&self, activity_type: ActivityType) -> Result<(), RecorderError> {
        self.with_session(|s| s.select(activity_type))
    }

    pub fn start(&self) -> Result<(), RecorderError> {
        let mut loops = self.lock_loops();
        self.with_session(|s| s.start())?;
        self.spawn_loops(&mut loops);
        Ok(())
    }

    pub fn pause(&self) -> Result<(), RecorderError> {
        let mut loops = self.lock_loops();
        self.with_session(|s| s.pause())?;
        loops.abort_all();
        tracing::debug!("tick loops halted");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), RecorderError> {
        let mut loops = self.lock_loops();
        self.with_session(|s| s.resume())?;
        self.spawn_loops(&mut loops);
        Ok(())
    }

    pub fn stop(&self) -> Result<(), RecorderError> {
        let mut loops = self.lock_loops();
        self.with_session(|s| s.stop())?;
        loops.abort_all();
        tracing::debug!("tick loops halted");
        Ok(())
    }

    /// Start over after finishing. Loops are already down in `Finished`.
    pub fn reset(&self) -> Result<(), RecorderError> {
        self.with_session(|s| s.reset())
    }

    /// Abandon the recording from any state.
    pub fn cancel(&self) {
        let mut loops = self.lock_loops();
        loops.abort_all();
        self.with_session(|s| s.cancel());
        tracing::debug!("tick loops halted");
    }

    pub fn attach_photo(&self, data_uri: String) -> Result<(), RecorderError> {
        self.with_session(|s| s.attach_photo(data_uri))
    }

    pub fn submit(&self) -> Result<Completion, RecorderError> {
        self.with_session(|s| s.submit())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.with_session(|s| s.snapshot())
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut RecorderSession) -> T) -> T {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    fn lock_loops(&self) -> MutexGuard<'_, TickLoops> {
        self.loops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn both tick tasks, aborting any previous ones first. Each
    /// interval's immediate first tick is consumed so accrual starts one
    /// full period after tracking begins.
    fn spawn_loops(&self, loops: &mut TickLoops) {
        loops.abort_all();

        let session = Arc::clone(&self.session);
        let period = self.distance_tick;
        loops.distance = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                let ticked = session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .tick_distance();
                if ticked.is_none() {
                    break;
                }
            }
        }));

        let session = Arc::clone(&self.session);
        loops.elapsed = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(ELAPSED_TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                let ticked = session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .tick_elapsed();
                if ticked.is_none() {
                    break;
                }
            }
        }));

        tracing::debug!(distance_tick = ?period, "tick loops started");
    }
}

impl Drop for LiveRecorder {
    fn drop(&mut self) {
        self.loops
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

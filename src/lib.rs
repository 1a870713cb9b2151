// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SnapFit: daily fitness-challenge backend.
//!
//! This crate provides the API for the SnapFit app: users log in, receive a
//! daily distance-goal prompt, record a walking/running activity with
//! simulated GPS tracking, attach a verification photo, and browse friends,
//! leaderboard, and profile stats. The tracking state machine lives in
//! [`recorder`]; everything else is thin glue around it and static mock
//! social data held in memory.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod recorder;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use dashmap::DashMap;
use recorder::LiveRecorder;
use store::MemoryStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: MemoryStore,
    /// Live recording sessions, at most one per user. Removing an entry
    /// drops the recorder, which aborts its tick loops.
    pub recorders: DashMap<String, Arc<LiveRecorder>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: MemoryStore::new(),
            recorders: DashMap::new(),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completed activity model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The two supported activity types. Walking accrues distance more
/// slowly than running; everything else about a recording is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Walking,
    Running,
}

impl ActivityType {
    /// Display label used in activity feeds.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Walking => "Walking",
            ActivityType::Running => "Running",
        }
    }
}

/// A completed activity in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityRecord {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Completion date/time (ISO 8601)
    pub date: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance covered, in kilometers
    pub distance_km: f64,
    /// Verification photo as a URL or data URI
    pub photo_url: Option<String>,
}

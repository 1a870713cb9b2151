// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend, friend-request, and leaderboard models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ActivityType;

/// A friend as shown in the social feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Friend {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub username: String,
    pub streak: u32,
    pub total_distance_km: f64,
    /// Human-readable recency (e.g. "2 hours ago")
    pub last_active: String,
    pub recent_activity: Option<RecentActivity>,
}

/// A friend's most recent completed activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub distance_km: f64,
    /// Activity date (ISO 8601)
    pub date: String,
}

/// An incoming friend request awaiting accept/decline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FriendRequest {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub from_username: String,
    /// When the request was sent (ISO 8601)
    pub created_at: String,
}

/// One row of the streak leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub streak: u32,
    pub total_distance_km: f64,
    /// Marks the caller's own row
    pub is_you: bool,
}

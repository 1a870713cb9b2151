// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod social;
pub mod stats;

pub use activity::{ActivityRecord, ActivityType};
pub use social::{Friend, FriendRequest, LeaderboardEntry, RecentActivity};
pub use stats::{Achievement, ProfileStats};

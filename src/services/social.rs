// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mock social graph: seeded friends, pending requests, the search pool,
//! and the global leaderboard.
//!
//! There is no real user base behind these. Every account starts from the
//! same seeded friends and standings; only the caller's own row reflects
//! live state.

use crate::models::{ActivityType, Friend, FriendRequest, LeaderboardEntry, RecentActivity};

/// Usernames that friend search can find.
const SEARCH_POOL: [&str; 3] = ["lisa_jogs", "kevin_fitness", "rachel_runs"];

/// Leaderboard rows for everyone except the caller:
/// (username, streak, total km).
const STANDINGS: [(&str, u32, f64); 6] = [
    ("sarah_runs", 23, 187.5),
    ("mike_walker", 18, 165.2),
    ("alex_fit", 15, 142.8),
    ("emma_steps", 12, 128.4),
    ("john_active", 9, 89.3),
    ("lisa_jogs", 6, 76.5),
];

/// Friends every new account starts with.
pub fn seed_friends() -> Vec<Friend> {
    vec![
        Friend {
            id: 1,
            username: "sarah_runs".to_string(),
            streak: 23,
            total_distance_km: 187.5,
            last_active: "2 hours ago".to_string(),
            recent_activity: Some(RecentActivity {
                activity_type: ActivityType::Running,
                distance_km: 3.2,
                date: "2026-01-17".to_string(),
            }),
        },
        Friend {
            id: 2,
            username: "mike_walker".to_string(),
            streak: 18,
            total_distance_km: 165.2,
            last_active: "5 hours ago".to_string(),
            recent_activity: Some(RecentActivity {
                activity_type: ActivityType::Walking,
                distance_km: 2.5,
                date: "2026-01-17".to_string(),
            }),
        },
        Friend {
            id: 3,
            username: "alex_fit".to_string(),
            streak: 15,
            total_distance_km: 142.8,
            last_active: "1 day ago".to_string(),
            recent_activity: None,
        },
    ]
}

/// Pending requests every new account starts with.
pub fn seed_requests() -> Vec<FriendRequest> {
    vec![
        FriendRequest {
            id: 1,
            from_username: "emma_steps".to_string(),
            created_at: "2026-01-16".to_string(),
        },
        FriendRequest {
            id: 2,
            from_username: "john_active".to_string(),
            created_at: "2026-01-15".to_string(),
        },
    ]
}

/// A freshly accepted friend. Their stats start at zero; nothing real is
/// known about a mock user until they "do" something.
pub fn accepted_friend(id: u64, username: &str) -> Friend {
    Friend {
        id,
        username: username.to_string(),
        streak: 0,
        total_distance_km: 0.0,
        last_active: "Just now".to_string(),
        recent_activity: None,
    }
}

/// Case-insensitive substring search over the mock pool, excluding the
/// caller and anyone already on the friends list. A blank query matches
/// nothing.
pub fn search_pool(query: &str, current_username: &str, friends: &[Friend]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    SEARCH_POOL
        .iter()
        .filter(|user| user.to_lowercase().contains(&query))
        .filter(|user| **user != current_username)
        .filter(|user| !friends.iter().any(|f| f.username == **user))
        .map(|user| user.to_string())
        .collect()
}

/// Global standings with the caller swapped in for the mock "you" row,
/// ranked by streak.
pub fn leaderboard(
    current_username: &str,
    streak: u32,
    total_distance_km: f64,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = STANDINGS
        .iter()
        .map(|(username, streak, total)| LeaderboardEntry {
            rank: 0,
            username: username.to_string(),
            streak: *streak,
            total_distance_km: *total,
            is_you: false,
        })
        .collect();

    entries.push(LeaderboardEntry {
        rank: 0,
        username: current_username.to_string(),
        streak,
        total_distance_km,
        is_you: true,
    });

    entries.sort_by(|a, b| b.streak.cmp(&a.streak));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent in-memory state: accounts, session tokens, activity ids.
//!
//! Nothing persists across restarts. Accounts are created on first login
//! and seeded with a week of history so the app has something to show,
//! exactly the state the demo frontend ships with.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::models::{ActivityRecord, ActivityType, Friend, FriendRequest};
use crate::services::social;

/// Seed photo URLs, cycled across the seeded activities.
const SEED_PHOTOS: [&str; 3] = [
    "https://images.unsplash.com/photo-1709133636649-7cb8959ddcb3?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxvdXRkb29yJTIwam9nZ2luZ3xlbnwxfHx8fDE3Njg2ODYwMzJ8MA&ixlib=rb-4.1.0&q=80&w=1080",
    "https://images.unsplash.com/photo-1741676516502-69250deb38ca?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHx1bml2ZXJzaXR5JTIwc3R1ZGVudCUyMGV4ZXJjaXNlfGVufDF8fHx8MTc2ODY4NjAzMnww&ixlib=rb-4.1.0&q=80&w=1080",
    "https://images.unsplash.com/photo-1758520706103-41d01f815640?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxydW5uaW5nJTIwZml0bmVzc3xlbnwxfHx8fDE3Njg1NjE3OTR8MA&ixlib=rb-4.1.0&q=80&w=1080",
];

/// Seeded history: one week of alternating runs and walks.
/// (id, date, type, km); stored newest first.
const SEED_ACTIVITIES: [(u64, &str, ActivityType, f64); 7] = [
    (7, "2026-01-16", ActivityType::Running, 3.5),
    (6, "2026-01-15", ActivityType::Walking, 2.2),
    (5, "2026-01-14", ActivityType::Running, 4.0),
    (4, "2026-01-13", ActivityType::Walking, 2.1),
    (3, "2026-01-12", ActivityType::Running, 2.8),
    (2, "2026-01-11", ActivityType::Walking, 3.2),
    (1, "2026-01-10", ActivityType::Running, 2.5),
];

const SEED_STREAK: u32 = 7;

/// Ids below this are reserved for seed data.
const FIRST_DYNAMIC_ID: u64 = 100;

/// Everything the app knows about one user.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub username: String,
    /// Account creation time (ISO 8601)
    pub created_at: String,
    /// Consecutive days with a completed challenge
    pub streak: u32,
    /// Whether today's challenge has been completed
    pub today_completed: bool,
    /// Personal distance goal in kilometers
    pub goal_km: f64,
    /// Floor for goal decreases
    pub initial_goal_km: f64,
    /// Completed activities, newest first
    pub activities: Vec<ActivityRecord>,
    pub friends: Vec<Friend>,
    pub pending_requests: Vec<FriendRequest>,
    next_social_id: u64,
}

impl UserAccount {
    pub fn new(username: &str, created_at: String, goal_km: f64) -> Self {
        Self {
            username: username.to_string(),
            created_at,
            streak: SEED_STREAK,
            today_completed: false,
            goal_km,
            initial_goal_km: goal_km,
            activities: seed_activities(),
            friends: social::seed_friends(),
            pending_requests: social::seed_requests(),
            next_social_id: FIRST_DYNAMIC_ID,
        }
    }

    /// Record a completed challenge: prepend the activity, extend the
    /// streak, and mark today done.
    pub fn record_completion(&mut self, record: ActivityRecord) -> u32 {
        self.activities.insert(0, record);
        self.streak += 1;
        self.today_completed = true;
        self.streak
    }

    /// Accept a pending request. Returns the new friend, or `None` when no
    /// request has that id.
    pub fn accept_request(&mut self, request_id: u64) -> Option<Friend> {
        let index = self
            .pending_requests
            .iter()
            .position(|r| r.id == request_id)?;
        let request = self.pending_requests.remove(index);

        let friend = social::accepted_friend(self.take_social_id(), &request.from_username);
        self.friends.push(friend.clone());
        Some(friend)
    }

    /// Decline a pending request. Returns the declined username.
    pub fn decline_request(&mut self, request_id: u64) -> Option<String> {
        let index = self
            .pending_requests
            .iter()
            .position(|r| r.id == request_id)?;
        Some(self.pending_requests.remove(index).from_username)
    }

    /// Remove a friend by id. Returns the removed username.
    pub fn remove_friend(&mut self, friend_id: u64) -> Option<String> {
        let index = self.friends.iter().position(|f| f.id == friend_id)?;
        Some(self.friends.remove(index).username)
    }

    fn take_social_id(&mut self) -> u64 {
        let id = self.next_social_id;
        self.next_social_id += 1;
        id
    }
}

fn seed_activities() -> Vec<ActivityRecord> {
    SEED_ACTIVITIES
        .iter()
        .map(|(id, date, activity_type, km)| ActivityRecord {
            id: *id,
            date: date.to_string(),
            activity_type: *activity_type,
            distance_km: *km,
            photo_url: Some(SEED_PHOTOS[(*id as usize - 1) % 3].to_string()),
        })
        .collect()
}

/// Concurrent in-memory store, shared across handlers via `AppState`.
pub struct MemoryStore {
    accounts: DashMap<String, UserAccount>,
    /// session token -> username
    sessions: DashMap<String, String>,
    next_activity_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            next_activity_id: AtomicU64::new(FIRST_DYNAMIC_ID),
        }
    }

    /// Create the account on first login; later logins keep existing state.
    pub fn ensure_account(&self, username: &str, created_at: String, goal_km: f64) {
        self.accounts
            .entry(username.to_string())
            .or_insert_with(|| UserAccount::new(username, created_at, goal_km));
    }

    /// Read access to an account. `None` when the user does not exist.
    pub fn read_account<T>(
        &self,
        username: &str,
        f: impl FnOnce(&UserAccount) -> T,
    ) -> Option<T> {
        self.accounts.get(username).map(|account| f(&account))
    }

    /// Write access to an account. `None` when the user does not exist.
    pub fn with_account<T>(
        &self,
        username: &str,
        f: impl FnOnce(&mut UserAccount) -> T,
    ) -> Option<T> {
        self.accounts.get_mut(username).map(|mut account| f(&mut account))
    }

    pub fn insert_session(&self, token: &str, username: &str) {
        self.sessions
            .insert(token.to_string(), username.to_string());
    }

    pub fn username_for_token(&self, token: &str) -> Option<String> {
        self.sessions.get(token).map(|u| u.clone())
    }

    /// Drop a session token. Returns the username it belonged to.
    pub fn remove_session(&self, token: &str) -> Option<String> {
        self.sessions.remove(token).map(|(_, username)| username)
    }

    pub fn next_activity_id(&self) -> u64 {
        self.next_activity_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount::new("pat", "2026-01-17T09:00:00Z".to_string(), 2.0)
    }

    #[test]
    fn test_new_account_is_seeded() {
        let account = account();

        assert_eq!(account.streak, 7);
        assert!(!account.today_completed);
        assert_eq!(account.activities.len(), 7);
        // Newest first.
        assert_eq!(account.activities[0].id, 7);
        assert_eq!(account.activities[0].date, "2026-01-16");
        assert_eq!(account.activities[6].id, 1);
        assert_eq!(account.friends.len(), 3);
        assert_eq!(account.pending_requests.len(), 2);
    }

    #[test]
    fn test_record_completion_updates_streak_and_history() {
        let mut account = account();
        let record = ActivityRecord {
            id: 100,
            date: "2026-01-17T10:00:00Z".to_string(),
            activity_type: ActivityType::Running,
            distance_km: 2.01,
            photo_url: Some("data:image/jpeg;base64,AAAA".to_string()),
        };

        let streak = account.record_completion(record);

        assert_eq!(streak, 8);
        assert!(account.today_completed);
        assert_eq!(account.activities.len(), 8);
        assert_eq!(account.activities[0].id, 100);
    }

    #[test]
    fn test_accept_request_moves_it_to_friends() {
        let mut account = account();

        let friend = account.accept_request(1).expect("request 1 exists");

        assert_eq!(friend.username, "emma_steps");
        assert_eq!(friend.streak, 0);
        assert_eq!(account.pending_requests.len(), 1);
        assert_eq!(account.friends.len(), 4);
        assert!(account.accept_request(1).is_none());
    }

    #[test]
    fn test_remove_friend() {
        let mut account = account();

        assert_eq!(account.remove_friend(2), Some("mike_walker".to_string()));
        assert_eq!(account.friends.len(), 2);
        assert_eq!(account.remove_friend(2), None);
    }

    #[test]
    fn test_sessions_round_trip() {
        let store = MemoryStore::new();
        store.insert_session("token-a", "pat");

        assert_eq!(store.username_for_token("token-a"), Some("pat".to_string()));
        assert_eq!(store.remove_session("token-a"), Some("pat".to_string()));
        assert_eq!(store.username_for_token("token-a"), None);
    }

    #[test]
    fn test_activity_ids_start_above_seed_range() {
        let store = MemoryStore::new();
        let first = store.next_activity_id();
        let second = store.next_activity_id();

        assert!(first >= FIRST_DYNAMIC_ID);
        assert_eq!(second, first + 1);
    }
}

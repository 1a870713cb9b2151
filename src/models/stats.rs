// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile statistics derived from a user's activity history.
//!
//! All aggregates are computed on demand from the in-memory activity
//! list. Histories are small (one activity per day at the usual pace)
//! so there is no need for pre-computed rollups.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{ActivityRecord, ActivityType};

/// Aggregate stats shown on the profile screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileStats {
    /// Total distance across all activities (kilometers)
    pub total_distance_km: f64,
    /// Total completed activities
    pub total_activities: u32,
    /// Distance within the trailing 7-day window (kilometers)
    pub weekly_distance_km: f64,
    /// Percentage of the last 7 days with at least one activity
    pub completion_rate: u32,
}

/// An earned achievement badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Achievement {
    pub icon: String,
    pub title: String,
}

impl ProfileStats {
    /// Compute aggregates from an activity history.
    ///
    /// The weekly window covers the 7 days ending at `now`; activities
    /// with unparseable dates count toward totals but not the window.
    pub fn from_activities(activities: &[ActivityRecord], now: DateTime<Utc>) -> Self {
        let window_start = now - Duration::days(7);

        let mut total_distance_km = 0.0;
        let mut weekly_distance_km = 0.0;
        let mut active_days: HashSet<NaiveDate> = HashSet::new();

        for activity in activities {
            total_distance_km += activity.distance_km;

            if let Some(date) = parse_activity_date(&activity.date) {
                if date > window_start && date <= now {
                    weekly_distance_km += activity.distance_km;
                    active_days.insert(date.date_naive());
                }
            }
        }

        let completion_rate = (active_days.len().min(7) as f64 / 7.0 * 100.0).round() as u32;

        Self {
            total_distance_km: round_km(total_distance_km),
            total_activities: activities.len() as u32,
            weekly_distance_km: round_km(weekly_distance_km),
            completion_rate,
        }
    }
}

/// Badges earned from the current streak and history.
pub fn achievements_for(
    streak: u32,
    activities: &[ActivityRecord],
    now: DateTime<Utc>,
) -> Vec<Achievement> {
    let mut achievements = Vec::new();

    if streak >= 7 {
        achievements.push(Achievement {
            icon: "🔥".to_string(),
            title: "7 Day Streak".to_string(),
        });
    }

    // Perfect Week requires an activity on every one of the last 7 days,
    // which is exactly a 100% completion rate.
    let stats = ProfileStats::from_activities(activities, now);
    if stats.completion_rate >= 100 {
        achievements.push(Achievement {
            icon: "💯".to_string(),
            title: "Perfect Week".to_string(),
        });
    }

    if activities
        .iter()
        .any(|a| a.activity_type == ActivityType::Running)
    {
        achievements.push(Achievement {
            icon: "🏃".to_string(),
            title: "First Run".to_string(),
        });
    }

    achievements
}

/// Round to two decimal places so displayed distances stay tidy.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Activity dates are RFC3339 timestamps for recorded completions and
/// bare `YYYY-MM-DD` strings in seeded history; accept both.
fn parse_activity_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(date) {
        return Some(d.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_activity(id: u64, activity_type: ActivityType, date: &str, km: f64) -> ActivityRecord {
        ActivityRecord {
            id,
            date: date.to_string(),
            activity_type,
            distance_km: km,
            photo_url: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_totals_cover_all_activities() {
        let activities = vec![
            make_activity(1, ActivityType::Running, "2026-01-16T09:00:00Z", 2.5),
            make_activity(2, ActivityType::Walking, "2025-12-01T09:00:00Z", 3.0),
        ];

        let stats = ProfileStats::from_activities(&activities, now());

        assert_eq!(stats.total_activities, 2);
        assert_eq!(stats.total_distance_km, 5.5);
        // Only the recent activity falls inside the weekly window.
        assert_eq!(stats.weekly_distance_km, 2.5);
    }

    #[test]
    fn test_completion_rate_counts_distinct_days() {
        // Two activities on the same day still count as one active day.
        let activities = vec![
            make_activity(1, ActivityType::Running, "2026-01-16T09:00:00Z", 2.0),
            make_activity(2, ActivityType::Walking, "2026-01-16T18:00:00Z", 1.0),
            make_activity(3, ActivityType::Walking, "2026-01-15T09:00:00Z", 1.0),
        ];

        let stats = ProfileStats::from_activities(&activities, now());

        assert_eq!(stats.completion_rate, (2.0_f64 / 7.0 * 100.0).round() as u32);
    }

    #[test]
    fn test_unparseable_dates_count_toward_totals_only() {
        let activities = vec![make_activity(1, ActivityType::Walking, "yesterday", 2.0)];

        let stats = ProfileStats::from_activities(&activities, now());

        assert_eq!(stats.total_distance_km, 2.0);
        assert_eq!(stats.weekly_distance_km, 0.0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn test_streak_achievement_requires_seven_days() {
        let activities = vec![make_activity(1, ActivityType::Walking, "2026-01-16T09:00:00Z", 2.0)];

        let titles: Vec<String> = achievements_for(7, &activities, now())
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert!(titles.contains(&"7 Day Streak".to_string()));

        let titles: Vec<String> = achievements_for(6, &activities, now())
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert!(!titles.contains(&"7 Day Streak".to_string()));
    }

    #[test]
    fn test_perfect_week_requires_all_seven_days() {
        // One activity per day for the 7 days ending at `now`.
        let activities: Vec<ActivityRecord> = (0..7)
            .map(|i| {
                make_activity(
                    i + 1,
                    ActivityType::Walking,
                    &format!("2026-01-{:02}T09:00:00Z", 11 + i),
                    2.0,
                )
            })
            .collect();

        let earned = achievements_for(0, &activities, now());
        assert!(earned.iter().any(|a| a.title == "Perfect Week"));

        let earned = achievements_for(0, &activities[..6], now());
        assert!(!earned.iter().any(|a| a.title == "Perfect Week"));
    }

    #[test]
    fn test_first_run_requires_a_running_activity() {
        let walking = vec![make_activity(1, ActivityType::Walking, "2026-01-16T09:00:00Z", 2.0)];
        let running = vec![make_activity(1, ActivityType::Running, "2026-01-16T09:00:00Z", 2.0)];

        let has_first_run = |activities: &[ActivityRecord]| {
            achievements_for(0, activities, now())
                .iter()
                .any(|a| a.title == "First Run")
        };

        assert!(!has_first_run(&walking));
        assert!(has_first_run(&running));
    }

    #[test]
    fn test_round_km_to_hundredths() {
        assert_eq!(round_km(2.004999), 2.0);
        assert_eq!(round_km(2.006), 2.01);
        assert_eq!(round_km(0.1 + 0.2), 0.3);
    }
}

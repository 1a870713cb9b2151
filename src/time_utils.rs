// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format whole seconds as `M:SS` for display next to a live recording.
/// Minutes are not zero-padded; seconds always are.
pub fn format_elapsed(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// The next UTC midnight strictly after `now`. The daily challenge
/// resets on this boundary.
pub fn next_midnight_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Duration::days(1);
    tomorrow
        .and_hms_opt(0, 0, 0)
        .unwrap_or(now.naive_utc())
        .and_utc()
}

/// Whole seconds remaining until the next UTC midnight.
pub fn seconds_until_midnight(now: DateTime<Utc>) -> i64 {
    (next_midnight_utc(now) - now).num_seconds()
}

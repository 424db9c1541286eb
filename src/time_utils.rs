// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Calendar-day key for the sync cooldown, e.g. `Mon Oct 19 2026`.
pub fn calendar_day(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render a backend timestamp as a short date (`dd/mm/yyyy`).
///
/// Accepts RFC 3339 and naive ISO 8601 timestamps; anything else is returned
/// unchanged.
pub fn format_short_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format("%d/%m/%Y").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%d/%m/%Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return parsed.format("%d/%m/%Y").to_string();
    }
    timestamp.to_string()
}

// src/utils/format.rs

//! Display formatting for feed values.

use chrono::{DateTime, NaiveDateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

/// Human-friendly age of a backend timestamp relative to `now`.
pub fn relative_time(created_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = created_at.filter(|s| !s.trim().is_empty()) else {
        return "now".to_string();
    };
    let Some(date) = parse_timestamp(raw) else {
        return "recently".to_string();
    };

    let seconds = (now - date).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Accepts RFC 3339 and SQLite `CURRENT_TIMESTAMP` (UTC) forms.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Uppercased first character of the author, `U` when there is none.
pub fn initial(author: Option<&str>) -> String {
    author
        .and_then(|a| a.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

/// First `max` graphemes of `text`, with an ellipsis when truncated.
pub fn snippet(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Integral scores print bare, fractional ones with two decimals.
pub fn score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

//! Formatting helpers for risk scores, timestamps, and data age.

use chrono::{DateTime, Local, Utc};

/// Risk score with two decimals, `-` when absent.
pub fn fmt_risk(risk: Option<f64>) -> String {
    risk.map_or_else(|| "-".to_owned(), |r| format!("{r:.2}"))
}

/// Wall-clock time of an operation run, local timezone.
pub fn fmt_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Data age for the status bar: "just now", "42s ago", "3m 10s ago".
pub fn fmt_age(age: Option<chrono::Duration>) -> String {
    let Some(age) = age else {
        return "no data".into();
    };
    let secs = age.num_seconds().max(0);
    if secs < 5 {
        return "just now".into();
    }
    let human = humantime::format_duration(std::time::Duration::from_secs(
        u64::try_from(secs).unwrap_or(0),
    ));
    format!("{human} ago")
}

/// Truncate content to one display line.
pub fn fmt_snippet(content: &str, max: usize) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max)
        .collect();
    if content.chars().count() > max {
        format!("{flat}…")
    } else {
        flat
    }
}

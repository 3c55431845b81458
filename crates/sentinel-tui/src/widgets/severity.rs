//! Severity and scheduler indicators — colored dot + label spans.

use ratatui::style::Style;
use ratatui::text::Span;

use sentinel_core::Severity;

use crate::theme;

/// Styled `●`-prefixed severity label, colored by level.
pub fn severity_span(severity: Severity) -> Span<'static> {
    Span::styled(
        format!("● {}", severity.as_str()),
        Style::default().fg(theme::severity_color(severity)),
    )
}

/// Severity label for an optional severity (raw, unenriched rows).
pub fn severity_span_opt(severity: Option<Severity>) -> Span<'static> {
    match severity {
        Some(s) => severity_span(s),
        None => Span::styled("○ -", Style::default().fg(theme::MUTED_GRAY)),
    }
}

/// Scheduler indicator for the status bar: green ACTIVE, red STOPPED,
/// gray when the status endpoint hasn't answered yet.
pub fn scheduler_span(running: Option<bool>) -> Span<'static> {
    match running {
        Some(true) => Span::styled(
            "● scheduler ACTIVE",
            Style::default().fg(theme::CALM_GREEN),
        ),
        Some(false) => Span::styled(
            "○ scheduler STOPPED",
            Style::default().fg(theme::CRITICAL_RED),
        ),
        None => Span::styled("? scheduler", Style::default().fg(theme::MUTED_GRAY)),
    }
}

//! Dark ops-room palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use sentinel_core::Severity;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_CYAN: Color = Color::Rgb(94, 234, 212); // #5eead4
pub const SIGNAL_BLUE: Color = Color::Rgb(96, 165, 250); // #60a5fa
pub const WARNING_AMBER: Color = Color::Rgb(251, 191, 36); // #fbbf24
pub const DANGER_ORANGE: Color = Color::Rgb(251, 146, 60); // #fb923c
pub const CRITICAL_RED: Color = Color::Rgb(248, 113, 113); // #f87171
pub const CALM_GREEN: Color = Color::Rgb(74, 222, 128); // #4ade80

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const MUTED_GRAY: Color = Color::Rgb(100, 116, 139); // #64748b
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // #1e293b
pub const MAP_OUTLINE: Color = Color::Rgb(51, 65, 85); // #334155

// ── Severity mapping ──────────────────────────────────────────────────

/// Color for a severity level — shared by tables, map markers, and the
/// alert feed so the same level always reads the same.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => CALM_GREEN,
        Severity::Medium => WARNING_AMBER,
        Severity::High => DANGER_ORANGE,
        Severity::Critical => CRITICAL_RED,
    }
}

/// Color for a raw severity label out of the summary breakdown (which
/// is keyed by server strings, not the enum).
pub fn severity_label_color(label: &str) -> Color {
    label
        .parse::<Severity>()
        .map_or(DIM_WHITE, severity_color)
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_CYAN)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT_CYAN)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(SIGNAL_BLUE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// KPI card value text.
pub fn kpi_value() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// KPI card caption text.
pub fn kpi_caption() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// The spike/anomaly banner strip.
pub fn spike_banner() -> Style {
    Style::default()
        .fg(CRITICAL_RED)
        .add_modifier(Modifier::BOLD)
}

/// Status bar text.
pub fn status_bar() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD)
}

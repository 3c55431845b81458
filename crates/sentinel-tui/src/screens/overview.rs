//! Overview screen — KPI cards, severity chart, hourly trend, spike banner.
//!
//! Layout:
//! ┌─ ⚠ spike banner (only when spikes exist) ───────────────────────┐
//! ┌─ High ─┐┌─ Alerts ─┐┌─ Avg Risk ─┐┌─ Total ─┐┌─ 24h ─┐
//! ┌─ Severity Breakdown ─────────┐  ┌─ Hourly Trend ───────────────┐
//! │ bar chart                    │  │ sparkline                    │
//! └──────────────────────────────┘  └──────────────────────────────┘
//! ┌─ Top Incident Types ────────────────────────────────────────────┐

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph,
    Sparkline as RatatuiSparkline,
};
use tokio::sync::mpsc::UnboundedSender;

use sentinel_core::{Severity, Spike, Summary, TrendPoint};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Overview screen state.
pub struct OverviewScreen {
    focused: bool,
    summary: Option<Arc<Summary>>,
    trends: Arc<Vec<TrendPoint>>,
    spikes: Arc<Vec<Spike>>,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            summary: None,
            trends: Arc::new(Vec::new()),
            spikes: Arc::new(Vec::new()),
        }
    }

    /// Banner text for the spike strip, `None` when there is nothing to
    /// warn about (the strip is not rendered at all in that case).
    fn spike_banner_text(&self) -> Option<String> {
        if self.spikes.is_empty() {
            return None;
        }
        let labels: Vec<String> = self.spikes.iter().map(Spike::banner_label).collect();
        Some(format!("⚠ Anomaly spikes: {}", labels.join(", ")))
    }

    fn render_kpis(&self, frame: &mut Frame, area: Rect) {
        let cards = Layout::horizontal([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(area);

        let (high, alerts, avg_risk, total, last_24h) = match self.summary.as_deref() {
            Some(s) => (
                s.severity_count("high").to_string(),
                s.total_alerts.to_string(),
                format!("{:.2}", s.average_risk_score),
                s.total_incidents.to_string(),
                s.incidents_last_24h.to_string(),
            ),
            None => ("-".into(), "-".into(), "-".into(), "-".into(), "-".into()),
        };

        render_kpi_card(frame, cards[0], "High Incidents (h)", &high, theme::DANGER_ORANGE);
        render_kpi_card(frame, cards[1], "Active Alerts", &alerts, theme::WARNING_AMBER);
        render_kpi_card(frame, cards[2], "Average Risk", &avg_risk, theme::CALM_GREEN);
        render_kpi_card(frame, cards[3], "Total Incidents", &total, theme::SIGNAL_BLUE);
        render_kpi_card(frame, cards[4], "Incidents (24h)", &last_24h, theme::ACCENT_CYAN);
    }

    fn render_severity_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Severity Breakdown ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(summary) = self.summary.as_deref() else {
            frame.render_widget(
                Paragraph::new("  No data yet").style(theme::key_hint()),
                inner,
            );
            return;
        };

        let rows = summary.severity_chart_data();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new("  No data yet").style(theme::key_hint()),
                inner,
            );
            return;
        }

        let bars: Vec<Bar> = rows
            .iter()
            .map(|row| {
                Bar::default()
                    .label(Line::from(row.name.clone()))
                    .value(row.count)
                    .style(Style::default().fg(theme::severity_label_color(&row.name)))
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(9)
            .bar_gap(2);
        frame.render_widget(chart, inner);
    }

    fn render_trend(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Hourly Trend (24h) ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.trends.is_empty() {
            frame.render_widget(
                Paragraph::new("  No data yet").style(theme::key_hint()),
                inner,
            );
            return;
        }

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);

        if let Some(latest) = self.trends.last() {
            let label = Line::from(vec![
                Span::styled("  now ", theme::key_hint()),
                Span::styled(
                    format!("{} incidents", latest.incident_count),
                    Style::default().fg(theme::ACCENT_CYAN),
                ),
                Span::styled(format!("  ({})", latest.hour), theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(label), rows[0]);
        }

        let counts: Vec<u64> = self.trends.iter().map(|t| t.incident_count).collect();
        let sparkline = RatatuiSparkline::default()
            .data(&counts)
            .style(Style::default().fg(theme::SIGNAL_BLUE));
        frame.render_widget(sparkline, rows[1]);
    }

    fn render_top_types(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Top Incident Types ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if let Some(summary) = self.summary.as_deref() {
            let max_rows = inner.height as usize;
            for tc in summary.top_incident_types.iter().take(max_rows) {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<20}", tc.incident_type),
                        Style::default().fg(theme::ACCENT_CYAN),
                    ),
                    Span::styled(format!("{:>6}", tc.count), theme::table_row()),
                ]));
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled("  No data yet", theme::key_hint())));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_kpi_card(frame: &mut Frame, area: Rect, caption: &str, value: &str, accent: ratatui::style::Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(format!(" {caption}"), theme::kpi_caption())),
        Line::from(Span::styled(format!(" {value}"), theme::kpi_value())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

impl Component for OverviewScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // The High KPI card doubles as the severity shortcut — mirrors
        // clicking the card in a pointer UI.
        match key.code {
            KeyCode::Char('h') => Ok(Some(Action::FilterSeverity(Some(Severity::High)))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SummaryUpdated(summary) => {
                self.summary = Some(Arc::clone(summary));
            }
            Action::TrendsUpdated(trends) => {
                self.trends = Arc::clone(trends);
            }
            Action::SpikesUpdated(spikes) => {
                self.spikes = Arc::clone(spikes);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let banner = self.spike_banner_text();

        let mut constraints = Vec::new();
        if banner.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(4)); // KPI row
        constraints.push(Constraint::Min(8)); // charts
        constraints.push(Constraint::Length(6)); // top types
        let sections = Layout::vertical(constraints).split(area);

        let mut idx = 0;
        if let Some(text) = banner {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, theme::spike_banner()))),
                sections[idx],
            );
            idx += 1;
        }

        self.render_kpis(frame, sections[idx]);

        let charts = Layout::horizontal([
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(sections[idx + 1]);
        self.render_severity_chart(frame, charts[0]);
        self.render_trend(frame, charts[1]);

        self.render_top_types(frame, sections[idx + 2]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Overview"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(incident_type: &str, growth: f64) -> Spike {
        Spike {
            incident_type: incident_type.into(),
            previous_count: 4,
            current_count: 6,
            growth_rate: growth,
        }
    }

    #[test]
    fn no_spikes_means_no_banner() {
        let screen = OverviewScreen::new();
        assert_eq!(screen.spike_banner_text(), None);
    }

    #[test]
    fn banner_includes_spike_labels() {
        let mut screen = OverviewScreen::new();
        screen.spikes = Arc::new(vec![spike("ddos", 0.5)]);

        let text = screen.spike_banner_text().expect("banner should render");
        assert!(text.contains("DDOS (+50%)"), "got: {text}");
    }

    #[test]
    fn high_key_requests_high_severity_filter() {
        let mut screen = OverviewScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('h')))
            .expect("key handling should not fail");

        assert!(matches!(
            action,
            Some(Action::FilterSeverity(Some(Severity::High)))
        ));
    }
}

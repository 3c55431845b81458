//! Incidents screen — the explorer table with severity filtering.
//!
//! Filter keys: l/m/h/c scope the list to one severity (fetched from
//! the backend with `?severity=`), a clears the filter. The active
//! filter is shown in the panel title and survives auto-refresh.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use sentinel_core::{Incident, Severity};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{fmt, severity};

/// Incidents screen state.
pub struct IncidentsScreen {
    focused: bool,
    incidents: Arc<Vec<Incident>>,
    filter: Option<Severity>,
    selected: usize,
}

impl IncidentsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            incidents: Arc::new(Vec::new()),
            filter: None,
            selected: 0,
        }
    }

    fn clamp_selection(&mut self) {
        if self.incidents.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.incidents.len() - 1);
        }
    }

    fn title(&self) -> String {
        match self.filter {
            Some(sev) => format!(" Incidents [{}] ({}) ", sev.as_str(), self.incidents.len()),
            None => format!(" Incidents ({}) ", self.incidents.len()),
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Detail ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(incident) = self.incidents.get(self.selected) else {
            frame.render_widget(
                Paragraph::new(Span::styled("  Nothing selected", theme::key_hint())),
                inner,
            );
            return;
        };

        let collected = incident
            .collected_at
            .map_or_else(|| "-".to_owned(), fmt::fmt_clock);
        let source = incident.source.as_deref().unwrap_or("-");
        let snippet = incident
            .content
            .as_deref()
            .map_or_else(String::new, |c| {
                fmt::fmt_snippet(c, inner.width.saturating_sub(4) as usize)
            });

        let lines = vec![
            Line::from(vec![
                Span::styled("  source ", theme::key_hint()),
                Span::styled(source.to_owned(), theme::table_row()),
                Span::styled("   collected ", theme::key_hint()),
                Span::styled(collected, theme::table_row()),
            ]),
            Line::from(Span::styled(format!("  {snippet}"), theme::table_row())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for IncidentsScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('l') => Some(Action::FilterSeverity(Some(Severity::Low))),
            KeyCode::Char('m') => Some(Action::FilterSeverity(Some(Severity::Medium))),
            KeyCode::Char('h') => Some(Action::FilterSeverity(Some(Severity::High))),
            KeyCode::Char('c') => Some(Action::FilterSeverity(Some(Severity::Critical))),
            KeyCode::Char('a') => Some(Action::FilterSeverity(None)),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Home => Some(Action::ScrollToTop),
            KeyCode::End => Some(Action::ScrollToBottom),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::IncidentsUpdated(incidents) => {
                self.incidents = Arc::clone(incidents);
                self.clamp_selection();
            }
            Action::SeverityFilterChanged(filter) => {
                self.filter = *filter;
            }
            Action::ScrollDown if self.focused => {
                if !self.incidents.is_empty() {
                    self.selected = (self.selected + 1).min(self.incidents.len() - 1);
                }
            }
            Action::ScrollUp if self.focused => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollToTop if self.focused => {
                self.selected = 0;
            }
            Action::ScrollToBottom if self.focused => {
                self.selected = self.incidents.len().saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let sections =
            Layout::vertical([Constraint::Min(5), Constraint::Length(4)]).split(area);

        let block = Block::default()
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(sections[0]);
        frame.render_widget(block, sections[0]);

        if self.incidents.is_empty() {
            let hint = match self.filter {
                Some(sev) => format!("  No {} incidents — a clears the filter", sev.as_str()),
                None => "  No data yet".to_owned(),
            };
            frame.render_widget(Paragraph::new(Span::styled(hint, theme::key_hint())), inner);
        } else {
            let header =
                Row::new(vec!["ID", "Type", "Severity", "Risk", "Source"]).style(theme::table_header());

            let rows: Vec<Row> = self
                .incidents
                .iter()
                .map(|i| {
                    Row::new(vec![
                        Cell::from(i.id.to_string()),
                        Cell::from(i.type_label().to_owned()),
                        Cell::from(Line::from(severity::severity_span_opt(i.severity))),
                        Cell::from(fmt::fmt_risk(i.risk_score)),
                        Cell::from(i.source.clone().unwrap_or_else(|| "-".to_owned())),
                    ])
                    .style(theme::table_row())
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(8),
                    Constraint::Min(16),
                    Constraint::Length(12),
                    Constraint::Length(7),
                    Constraint::Length(12),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

            let mut state = TableState::default().with_selected(Some(self.selected));
            frame.render_stateful_widget(table, inner, &mut state);
        }

        self.render_detail(frame, sections[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Incidents"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn incident(id: i64, severity: Severity) -> Incident {
        Incident {
            id,
            incident_type: Some("ddos".into()),
            severity: Some(severity),
            risk_score: Some(0.8),
            latitude: None,
            longitude: None,
            cluster_id: None,
            source: Some("rss".into()),
            content: Some("report".into()),
            collected_at: None,
        }
    }

    #[test]
    fn filter_keys_map_to_severities() {
        let mut screen = IncidentsScreen::new();

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('h')))
            .expect("key handling should not fail");
        assert!(matches!(
            action,
            Some(Action::FilterSeverity(Some(Severity::High)))
        ));

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('a')))
            .expect("key handling should not fail");
        assert!(matches!(action, Some(Action::FilterSeverity(None))));
    }

    #[test]
    fn filter_state_tracks_store_broadcast() {
        let mut screen = IncidentsScreen::new();
        screen
            .update(&Action::SeverityFilterChanged(Some(Severity::High)))
            .expect("update should not fail");

        assert_eq!(screen.filter, Some(Severity::High));
        assert_eq!(screen.title(), " Incidents [high] (0) ");
    }

    #[test]
    fn selection_clamps_when_list_shrinks() {
        let mut screen = IncidentsScreen::new();
        screen.set_focused(true);
        screen
            .update(&Action::IncidentsUpdated(Arc::new(vec![
                incident(1, Severity::High),
                incident(2, Severity::High),
                incident(3, Severity::High),
            ])))
            .expect("update should not fail");
        screen
            .update(&Action::ScrollToBottom)
            .expect("update should not fail");
        assert_eq!(screen.selected, 2);

        screen
            .update(&Action::IncidentsUpdated(Arc::new(vec![incident(
                1,
                Severity::High,
            )])))
            .expect("update should not fail");
        assert_eq!(screen.selected, 0);
    }
}

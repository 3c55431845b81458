//! Threats screen — the ranked top-threats table.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use sentinel_core::Threat;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

/// Threats screen state.
pub struct ThreatsScreen {
    focused: bool,
    threats: Arc<Vec<Threat>>,
    selected: usize,
}

impl ThreatsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            threats: Arc::new(Vec::new()),
            selected: 0,
        }
    }

    fn clamp_selection(&mut self) {
        if self.threats.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.threats.len() - 1);
        }
    }
}

impl Component for ThreatsScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
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
            Action::ThreatsUpdated(threats) => {
                self.threats = Arc::clone(threats);
                self.clamp_selection();
            }
            Action::ScrollDown if self.focused => {
                if !self.threats.is_empty() {
                    self.selected = (self.selected + 1).min(self.threats.len() - 1);
                }
            }
            Action::ScrollUp if self.focused => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollToTop if self.focused => {
                self.selected = 0;
            }
            Action::ScrollToBottom if self.focused => {
                self.selected = self.threats.len().saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Top Threats ({}) ", self.threats.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.threats.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No data yet", theme::key_hint())),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["ID", "Type", "Risk", "Cluster"]).style(theme::table_header());

        let rows: Vec<Row> = self
            .threats
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.id.to_string()),
                    Cell::from(t.incident_type.clone()),
                    Cell::from(fmt::fmt_risk(Some(t.risk_score))),
                    Cell::from(
                        t.cluster_id
                            .map_or_else(|| "-".to_owned(), |c| c.to_string()),
                    ),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(16),
                Constraint::Length(8),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Threats"
    }
}

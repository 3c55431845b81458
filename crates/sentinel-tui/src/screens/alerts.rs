//! Alerts screen — the level-colored alert feed.

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use sentinel_core::Alert;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::severity;

/// Alerts screen state.
pub struct AlertsScreen {
    focused: bool,
    alerts: Arc<Vec<Alert>>,
}

impl AlertsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            alerts: Arc::new(Vec::new()),
        }
    }
}

impl Component for AlertsScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::AlertsUpdated(alerts) = action {
            self.alerts = Arc::clone(alerts);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Active Alerts ({}) ", self.alerts.len()))
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

        // Display is capped to what fits — the feed itself is already
        // limited server-side by the configured alert limit.
        let max_rows = inner.height as usize;
        let max_msg = inner.width.saturating_sub(16) as usize;

        let mut lines = Vec::new();
        for alert in self.alerts.iter().take(max_rows) {
            let msg: String = alert.message.chars().take(max_msg).collect();
            lines.push(Line::from(vec![
                Span::raw("  "),
                severity::severity_span(alert.level),
                Span::styled(format!("  {msg}"), theme::table_row()),
            ]));
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled("  No alerts", theme::key_hint())));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Alerts"
    }
}

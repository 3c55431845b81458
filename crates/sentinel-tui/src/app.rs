//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sentinel_core::{Monitor, SyncState};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::widgets::{fmt, severity};

/// How long a notification toast stays visible.
const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Loading-vs-ready, mirrored from the store.
    sync_state: SyncState,
    /// Scheduler flag from /operations/status (None until first fetch).
    scheduler_running: Option<bool>,
    /// True while a refresh batch is in flight.
    refreshing: bool,
    /// Spinner state for the loading splash / refresh indicator.
    throbber: ThrobberState,
    /// Blocks a second operation trigger while a POST is pending.
    op_in_flight: bool,
    last_ingestion: Option<DateTime<Utc>>,
    last_ai_run: Option<DateTime<Utc>>,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// The sync loop handle.
    monitor: Monitor,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Create a new App with all screens wired to the given monitor.
    pub fn new(monitor: Monitor) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            active_screen: ScreenId::Overview,
            previous_screen: None,
            screens,
            running: true,
            sync_state: SyncState::Loading,
            scheduler_running: None,
            refreshing: false,
            throbber: ThrobberState::default(),
            op_in_flight: false,
            last_ingestion: None,
            last_ai_run: None,
            help_visible: false,
            action_tx,
            action_rx,
            monitor,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = crate::tui::Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Spawn the data bridge — it owns connect/shutdown of the monitor.
        {
            let monitor = self.monitor.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(monitor, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Cancel the data bridge (which shuts the monitor down) and clean up
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Help
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Manual refresh + operations
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::RefreshNow)),
            (KeyModifiers::NONE, KeyCode::Char('i')) => return Ok(Some(Action::RunIngestion)),
            (KeyModifiers::NONE, KeyCode::Char('g')) => return Ok(Some(Action::RunAi)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            // Esc — back to the previous screen
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action — update app state and propagate to components.
    #[allow(clippy::too_many_lines, clippy::cognitive_complexity)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Tick => {
                self.throbber.calc_next();
                // Expire stale toasts
                if let Some((_, shown_at)) = self.notification {
                    if shown_at.elapsed() > TOAST_DURATION {
                        self.notification = None;
                    }
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::RefreshNow => {
                let monitor = self.monitor.clone();
                tokio::spawn(async move {
                    monitor.refresh().await;
                });
            }

            Action::FilterSeverity(filter) => {
                // The severity shortcut both scopes the list and jumps
                // to the explorer, like clicking a KPI card.
                let monitor = self.monitor.clone();
                let filter = *filter;
                tokio::spawn(async move {
                    monitor.filter_by_severity(filter).await;
                });
                self.action_tx
                    .send(Action::SwitchScreen(ScreenId::Incidents))?;
            }

            Action::RunIngestion => self.trigger_operation(OperationKind::Ingestion)?,
            Action::RunAi => self.trigger_operation(OperationKind::Ai)?,

            Action::OperationFinished => {
                self.op_in_flight = false;
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::DismissNotification => {
                self.notification = None;
            }

            Action::SyncStateChanged(state) => {
                self.sync_state = *state;
            }

            Action::SchedulerStatusUpdated(running) => {
                self.scheduler_running = Some(*running);
            }

            Action::RefreshingChanged(refreshing) => {
                self.refreshing = *refreshing;
            }

            Action::LastIngestionUpdated(ts) => {
                self.last_ingestion = *ts;
            }

            Action::LastAiRunUpdated(ts) => {
                self.last_ai_run = *ts;
            }

            _ => {}
        }

        // Propagate to all screens — data actions feed multiple views.
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }

        Ok(())
    }

    /// Kick off one of the two backend operations, guarded so a second
    /// trigger while the POST is pending becomes a toast instead.
    fn trigger_operation(&mut self, kind: OperationKind) -> Result<()> {
        if self.op_in_flight {
            self.action_tx.send(Action::Notify(Notification::info(
                "An operation is already running",
            )))?;
            return Ok(());
        }
        self.op_in_flight = true;

        let monitor = self.monitor.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let (label, result) = match kind {
                OperationKind::Ingestion => ("Ingestion", monitor.run_ingestion().await),
                OperationKind::Ai => ("AI analysis", monitor.run_ai().await),
            };
            let notification = match result {
                Ok(()) => Notification::success(format!("{label} triggered")),
                Err(e) => Notification::error(format!("{label} failed: {e}")),
            };
            let _ = tx.send(Action::Notify(notification));
            let _ = tx.send(Action::OperationFinished);
        });
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let sections = Layout::vertical([
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // body
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

        self.render_tab_bar(frame, sections[0]);

        if self.sync_state == SyncState::Loading {
            self.render_loading(frame, sections[1]);
        } else if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, sections[1]);
        }

        self.render_status_bar(frame, sections[2]);

        if let Some((ref notification, _)) = self.notification {
            render_toast(frame, sections[1], notification);
        }

        if self.help_visible {
            render_help(frame, frame.area());
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|s| Line::from(format!(" {} {} ", s.number(), s.label())))
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_loading(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        let throbber = Throbber::default()
            .label("Loading dashboard…")
            .style(theme::title_style());
        let width = 22u16.min(rows[1].width);
        let centered = Rect {
            x: rows[1].x + (rows[1].width.saturating_sub(width)) / 2,
            width,
            ..rows[1]
        };
        frame.render_stateful_widget(throbber, centered, &mut self.throbber);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        spans.push(severity::scheduler_span(self.scheduler_running));
        spans.push(Span::styled(" │ ", theme::key_hint()));

        if self.refreshing {
            spans.push(Span::styled("⟳ refreshing", theme::title_style()));
        } else {
            spans.push(Span::styled(
                fmt::fmt_age(self.monitor.store().data_age()),
                theme::status_bar(),
            ));
        }

        spans.push(Span::styled(" │ ingestion ", theme::key_hint()));
        spans.push(Span::styled(
            self.last_ingestion.map_or_else(|| "-".to_owned(), fmt::fmt_clock),
            theme::status_bar(),
        ));
        spans.push(Span::styled("  ai ", theme::key_hint()));
        spans.push(Span::styled(
            self.last_ai_run.map_or_else(|| "-".to_owned(), fmt::fmt_clock),
            theme::status_bar(),
        ));

        spans.push(Span::styled("   ", theme::key_hint()));
        for (key, label) in [("r", "refresh"), ("i", "ingest"), ("g", "ai"), ("?", "help"), ("q", "quit")] {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}"), theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Which backend operation a trigger action refers to.
#[derive(Debug, Clone, Copy)]
enum OperationKind {
    Ingestion,
    Ai,
}

fn render_toast(frame: &mut Frame, body: Rect, notification: &Notification) {
    let width = (notification.message.chars().count() as u16 + 4)
        .min(body.width.saturating_sub(2))
        .max(10);
    let area = Rect {
        x: body.right().saturating_sub(width + 1),
        y: body.bottom().saturating_sub(3),
        width,
        height: 3,
    };

    let color = match notification.level {
        NotificationLevel::Info => theme::SIGNAL_BLUE,
        NotificationLevel::Success => theme::CALM_GREEN,
        NotificationLevel::Error => theme::CRITICAL_RED,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(color));

    frame.render_widget(Clear, area);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            notification.message.clone(),
            ratatui::style::Style::default().fg(color),
        )),
        inner,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let width = 46u16.min(area.width.saturating_sub(4));
    let height = 14u16.min(area.height.saturating_sub(2));
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(" Help ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let lines = vec![
        Line::from(""),
        help_line("1-5", "switch screen"),
        help_line("Tab / Shift+Tab", "cycle screens"),
        help_line("r", "refresh now"),
        help_line("i", "run ingestion"),
        help_line("g", "run AI engine"),
        help_line("l/m/h/c, a", "severity filter / all"),
        help_line("j/k, Home/End", "move selection"),
        help_line("Esc", "back"),
        help_line("?", "toggle this help"),
        help_line("q / Ctrl+C", "quit"),
    ];

    frame.render_widget(Clear, popup);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<16}"), theme::key_hint_key()),
        Span::styled(desc.to_owned(), theme::key_hint()),
    ])
}

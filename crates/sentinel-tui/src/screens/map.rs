//! Map screen — geo-tagged incidents plotted on a braille world map.
//!
//! The terminal stand-in for the original tile map: a canvas world
//! outline with one marker per geo-tagged incident, colored by
//! severity. The highest-risk incidents get inline type labels.

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use sentinel_core::{Incident, Severity};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// How many top-risk incidents get a type label on the map.
const LABELED_INCIDENTS: usize = 3;

/// Map screen state.
pub struct MapScreen {
    focused: bool,
    /// Risk-ordered snapshot from the store.
    incidents: Arc<Vec<Arc<Incident>>>,
}

impl MapScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            incidents: Arc::new(Vec::new()),
        }
    }

    /// Marker coordinates grouped by severity so each group renders as
    /// one `Points` layer in its severity color.
    fn marker_groups(&self) -> Vec<(Severity, Vec<(f64, f64)>)> {
        Severity::ALL
            .iter()
            .map(|&sev| {
                let coords: Vec<(f64, f64)> = self
                    .incidents
                    .iter()
                    .filter(|i| i.severity == Some(sev))
                    .filter_map(|i| i.position().map(|(lat, lon)| (lon, lat)))
                    .collect();
                (sev, coords)
            })
            .collect()
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("  ", theme::key_hint())];
        for sev in Severity::ALL {
            spans.push(Span::styled(
                "● ",
                Style::default().fg(theme::severity_color(sev)),
            ));
            spans.push(Span::styled(format!("{} ", sev.as_str()), theme::key_hint()));
        }
        spans.push(Span::styled(
            format!("  {} geo-tagged incidents", self.incidents.len()),
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for MapScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::MapIncidentsUpdated(incidents) = action {
            self.incidents = Arc::clone(incidents);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let sections =
            Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).split(area);

        let block = Block::default()
            .title(" Global Incident Map ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let groups = self.marker_groups();
        let labeled: Vec<(f64, f64, String, Severity)> = self
            .incidents
            .iter()
            .filter_map(|i| {
                i.position().map(|(lat, lon)| {
                    (
                        lon,
                        lat,
                        i.type_label().to_owned(),
                        i.severity.unwrap_or(Severity::Low),
                    )
                })
            })
            .take(LABELED_INCIDENTS)
            .collect();

        let canvas = Canvas::default()
            .block(block)
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: theme::MAP_OUTLINE,
                    resolution: MapResolution::High,
                });

                for (sev, coords) in &groups {
                    if !coords.is_empty() {
                        ctx.draw(&Points {
                            coords: coords.as_slice(),
                            color: theme::severity_color(*sev),
                        });
                    }
                }

                // Label the riskiest incidents (snapshot is risk-ordered).
                for (lon, lat, label, sev) in &labeled {
                    ctx.print(
                        *lon,
                        *lat,
                        Line::from(Span::styled(
                            format!("● {label}"),
                            Style::default().fg(theme::severity_color(*sev)),
                        )),
                    );
                }
            });
        frame.render_widget(canvas, sections[0]);

        self.render_legend(frame, sections[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Map"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo_incident(id: i64, sev: Severity, lat: f64, lon: f64) -> Arc<Incident> {
        Arc::new(Incident {
            id,
            incident_type: Some("protest".into()),
            severity: Some(sev),
            risk_score: Some(0.5),
            latitude: Some(lat),
            longitude: Some(lon),
            cluster_id: None,
            source: None,
            content: None,
            collected_at: None,
        })
    }

    #[test]
    fn markers_group_by_severity() {
        let mut screen = MapScreen::new();
        screen.incidents = Arc::new(vec![
            geo_incident(1, Severity::High, 48.85, 2.35),
            geo_incident(2, Severity::High, 51.5, -0.12),
            geo_incident(3, Severity::Low, 35.68, 139.69),
        ]);

        let groups = screen.marker_groups();
        let high = groups
            .iter()
            .find(|(s, _)| *s == Severity::High)
            .map(|(_, c)| c.len());
        assert_eq!(high, Some(2));

        // Canvas coordinates are (x=lon, y=lat).
        let low = groups
            .iter()
            .find(|(s, _)| *s == Severity::Low)
            .map(|(_, c)| c.clone())
            .unwrap_or_default();
        assert_eq!(low, vec![(139.69, 35.68)]);
    }
}

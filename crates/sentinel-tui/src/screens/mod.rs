//! Screen components, one per tab.

pub mod alerts;
pub mod incidents;
pub mod map;
pub mod overview;
pub mod threats;

use crate::component::Component;
use crate::screen::ScreenId;

/// Construct every screen, keyed for the App's screen map.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Overview,
            Box::new(overview::OverviewScreen::new()) as Box<dyn Component>,
        ),
        (ScreenId::Threats, Box::new(threats::ThreatsScreen::new())),
        (
            ScreenId::Incidents,
            Box::new(incidents::IncidentsScreen::new()),
        ),
        (ScreenId::Map, Box::new(map::MapScreen::new())),
        (ScreenId::Alerts, Box::new(alerts::AlertsScreen::new())),
    ]
}

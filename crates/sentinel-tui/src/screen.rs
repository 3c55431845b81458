//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Overview, // 1
    Threats,   // 2
    Incidents, // 3
    Map,       // 4
    Alerts,    // 5
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 5] = [
        Self::Overview,
        Self::Threats,
        Self::Incidents,
        Self::Map,
        Self::Alerts,
    ];

    /// Numeric key (1-5) for this screen.
    #[allow(dead_code)]
    pub fn number(self) -> u8 {
        match self {
            Self::Overview => 1,
            Self::Threats => 2,
            Self::Incidents => 3,
            Self::Map => 4,
            Self::Alerts => 5,
        }
    }

    /// Screen from a numeric key (1-5). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Overview),
            2 => Some(Self::Threats),
            3 => Some(Self::Incidents),
            4 => Some(Self::Map),
            5 => Some(Self::Alerts),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Threats => "Threats",
            Self::Incidents => "Incidents",
            Self::Map => "Map",
            Self::Alerts => "Alerts",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(ScreenId::Alerts.next(), ScreenId::Overview);
        assert_eq!(ScreenId::Overview.prev(), ScreenId::Alerts);
    }

    #[test]
    fn number_round_trips() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(screen.number()), Some(screen));
        }
        assert_eq!(ScreenId::from_number(9), None);
    }
}

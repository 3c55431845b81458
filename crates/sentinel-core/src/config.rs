// ── Runtime connection configuration ──
//
// These types describe *how* to reach the OSNIT Shield backend. They
// carry connection tuning only and never touch disk — the TUI builds a
// `MonitorConfig` from sentinel-config and hands it in.

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default — the backend usually sits on
    /// localhost or behind a properly-certified proxy.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed proxies).
    DangerAcceptInvalid,
}

/// Configuration for one Monitor instance.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL (e.g., `http://127.0.0.1:8000`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
    /// How often the poll batch re-runs (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// `?limit=` for the raw incident list.
    pub incident_limit: u32,
    /// `?limit=` for the alerts feed.
    pub alert_limit: u32,
    /// `?limit=` for the top-threats ranking.
    pub threat_limit: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://127.0.0.1:8000").expect("static URL is valid"),
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(15),
            refresh_interval_secs: 30,
            incident_limit: 50,
            alert_limit: 20,
            threat_limit: 10,
        }
    }
}

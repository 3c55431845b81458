//! Shared configuration for the sentinel dashboard.
//!
//! TOML file + `SENTINEL_*` environment layering via figment, and
//! translation to `sentinel_core::MonitorConfig`. The TUI binary layers
//! its own CLI flags on top of what this crate resolves.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sentinel_core::{MonitorConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL (e.g., "http://127.0.0.1:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Auto-refresh cadence in seconds (0 disables the timer).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `?limit=` for the raw incident list.
    #[serde(default = "default_incident_limit")]
    pub incident_limit: u32,

    /// `?limit=` for the alerts feed.
    #[serde(default = "default_alert_limit")]
    pub alert_limit: u32,

    /// `?limit=` for the top-threats ranking.
    #[serde(default = "default_threat_limit")]
    pub threat_limit: u32,

    /// Skip TLS verification (self-signed reverse proxies).
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_interval_secs: default_refresh_interval(),
            timeout_secs: default_timeout(),
            incident_limit: default_incident_limit(),
            alert_limit: default_alert_limit(),
            threat_limit: default_threat_limit(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    15
}
fn default_incident_limit() -> u32 {
    50
}
fn default_alert_limit() -> u32 {
    20
}
fn default_threat_limit() -> u32 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "osnit-shield", "sentinel").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sentinel");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path (tests, `--config` overrides).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SENTINEL_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `MonitorConfig` from the resolved config.
pub fn to_monitor_config(cfg: &Config) -> Result<MonitorConfig, ConfigError> {
    let url: url::Url = cfg.base_url.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {}", cfg.base_url),
    })?;

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(MonitorConfig {
        url,
        tls,
        timeout: Duration::from_secs(cfg.timeout_secs),
        refresh_interval_secs: cfg.refresh_interval_secs,
        incident_limit: cfg.incident_limit,
        alert_limit: cfg.alert_limit,
        threat_limit: cfg.threat_limit,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.refresh_interval_secs, 30);
        assert_eq!(cfg.incident_limit, 50);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://shield.internal:8443\"\nrefresh_interval_secs = 10\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.base_url, "https://shield.internal:8443");
        assert_eq!(cfg.refresh_interval_secs, 10);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.alert_limit, 20);
    }

    #[test]
    fn invalid_base_url_is_a_validation_error() {
        let cfg = Config {
            base_url: "not a url".into(),
            ..Default::default()
        };

        let result = to_monitor_config(&cfg);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn insecure_flag_maps_to_tls_mode() {
        let cfg = Config {
            insecure: true,
            ..Default::default()
        };

        let monitor_cfg = to_monitor_config(&cfg).unwrap();
        assert_eq!(monitor_cfg.tls, TlsVerification::DangerAcceptInvalid);
    }
}

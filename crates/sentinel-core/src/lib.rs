//! Business logic for the sentinel dashboard.
//!
//! Owns all remote-state fetching: the [`Monitor`] runs the polling
//! loop against the OSNIT Shield backend, the [`DataStore`] holds the
//! most recent successfully-fetched snapshot per endpoint, and
//! presentation layers consume read-only snapshots or `watch`
//! subscriptions. A failed fetch for one endpoint never invalidates
//! data already displayed from another.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod store;

pub use config::{MonitorConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Alert, Incident, Severity, SeverityCount, Spike, Summary, Threat, TrendPoint};
pub use monitor::Monitor;
pub use store::{DataStore, SyncState};

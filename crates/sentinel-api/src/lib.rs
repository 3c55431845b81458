//! Async Rust client for the OSNIT Shield intelligence API.
//!
//! The backend exposes three route groups over plain JSON REST:
//! `/intelligence/*` (aggregates, trends, alerts, threats, spikes),
//! `/incidents*` (raw and geo-tagged incident records), and
//! `/operations/*` (scheduler status plus the two fire-and-forget
//! job triggers). This crate is a thin, faithful wire layer — domain
//! modeling lives in `sentinel-core`.

mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ShieldClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};

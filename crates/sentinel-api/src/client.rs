// Hand-crafted async HTTP client for the OSNIT Shield backend.
//
// Base path: / (route groups: /intelligence, /incidents, /operations)
// Auth: none — the observed surface is unauthenticated.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types;

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    // FastAPI error envelope: {"detail": "..."} — detail may also be a
    // structured validation list, hence the permissive Value.
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the OSNIT Shield intelligence API.
///
/// One method per endpoint; all methods are independent so the sync
/// loop can issue them concurrently and tolerate per-endpoint failure.
#[derive(Clone)]
pub struct ShieldClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ShieldClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (tests, custom middleware).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        let base_url = match Self::normalize_base_url(base_url.as_str()) {
            Ok(u) => u,
            Err(_) => base_url,
        };
        Self { http, base_url }
    }

    /// Ensure the base URL ends with a single trailing slash so
    /// `Url::join` treats it as a directory.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// Join a relative path (e.g. `"intelligence/summary"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        Error::Api {
            status: status.as_u16(),
            message: detail.unwrap_or(if raw.is_empty() {
                status.to_string()
            } else {
                raw
            }),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Intelligence ─────────────────────────────────────────────────

    pub async fn get_summary(&self) -> Result<types::SummaryResponse, Error> {
        self.get("intelligence/summary").await
    }

    pub async fn get_trends(&self) -> Result<types::TrendsResponse, Error> {
        self.get("intelligence/trends").await
    }

    pub async fn get_alerts(&self, limit: Option<u32>) -> Result<types::AlertsResponse, Error> {
        match limit {
            Some(n) => {
                self.get_with_params("intelligence/alerts", &[("limit", n.to_string())])
                    .await
            }
            None => self.get("intelligence/alerts").await,
        }
    }

    pub async fn get_top_threats(
        &self,
        limit: Option<u32>,
    ) -> Result<types::TopThreatsResponse, Error> {
        match limit {
            Some(n) => {
                self.get_with_params("intelligence/top-threats", &[("limit", n.to_string())])
                    .await
            }
            None => self.get("intelligence/top-threats").await,
        }
    }

    pub async fn get_spikes(&self) -> Result<types::SpikesResponse, Error> {
        self.get("intelligence/spikes").await
    }

    // ── Incidents ────────────────────────────────────────────────────

    /// Geo-tagged incidents for the map view.
    pub async fn get_map_incidents(&self) -> Result<types::MapResponse, Error> {
        self.get("incidents/map").await
    }

    /// Raw incident list, optionally scoped by severity. Returns a bare
    /// JSON array (no envelope).
    pub async fn list_incidents(
        &self,
        limit: Option<u32>,
        severity: Option<&str>,
    ) -> Result<Vec<types::IncidentResponse>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(n) = limit {
            params.push(("limit", n.to_string()));
        }
        if let Some(s) = severity {
            params.push(("severity", s.to_owned()));
        }

        if params.is_empty() {
            self.get("incidents").await
        } else {
            self.get_with_params("incidents", &params).await
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn get_scheduler_status(&self) -> Result<types::StatusResponse, Error> {
        self.get("operations/status").await
    }

    /// Trigger an ingestion job. Fire-and-forget on the backend side —
    /// a 2xx only acknowledges that the job was started.
    pub async fn run_ingestion(&self) -> Result<(), Error> {
        self.post_empty("operations/run-ingestion").await
    }

    /// Trigger an AI analysis job. Same acknowledgement semantics as
    /// [`run_ingestion`](Self::run_ingestion).
    pub async fn run_ai(&self) -> Result<(), Error> {
        self.post_empty("operations/run-ai").await
    }
}

//! HTTP reservation backend.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::calendar::YearMonth;
use crate::config::EngineConfig;
use crate::error::{Result, ReservoError};
use crate::reservation::RawReservation;
use crate::source::ReservationSource;

/// Response body of `GET /api/entities/{id}/reservations`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<RawReservation>,
}

/// Fetches reservations from the backend's month endpoint.
///
/// Each instance owns its own client, built from the config it was given.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// # Errors
    /// Returns `ReservoError::Config` if the config is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ReservoError::Config(format!("failed to build HTTP client: {}", e)))?;
        let base_url = Url::parse(config.base_url()).map_err(|e| {
            ReservoError::Config(format!("invalid backend_url '{}': {}", config.base_url(), e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ReservoError::Config(format!(
                "backend_url cannot be used as a base URL: '{}'",
                config.base_url()
            )));
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/api/entities/{entity_id}/reservations?year=Y&month=M`.
    ///
    /// The entity id is pushed as a single percent-encoded path segment, so
    /// `/`, `?` or `#` inside it cannot change the path or the query.
    pub fn month_url(&self, entity_id: &str, month: YearMonth) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "entities", entity_id, "reservations"]);
        }
        url.query_pairs_mut()
            .append_pair("year", &month.year.to_string())
            .append_pair("month", &month.month.to_string());
        url
    }
}

#[async_trait]
impl ReservationSource for HttpSource {
    async fn fetch_month(&self, entity_id: &str, month: YearMonth) -> Result<Vec<RawReservation>> {
        let upstream = |reason: String| ReservoError::UpstreamFetch {
            entity_id: entity_id.to_string(),
            month: month.to_string(),
            reason,
        };

        let url = self.month_url(entity_id, month);
        tracing::debug!(%url, "fetching reservations");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream(format!("HTTP {}", status)));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| upstream(format!("malformed payload: {}", e)))?;

        if !envelope.success {
            return Err(upstream("backend reported success=false".to_string()));
        }
        Ok(envelope.data)
    }
}

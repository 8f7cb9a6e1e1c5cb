//! Client for the avalanche.org map-layer feed
//!
//! The fetcher issues exactly one request per call. Retries, if any, come from
//! the middleware stack the caller built the HTTP client with.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, info, instrument, warn};

use super::ForecastEntry;
use crate::config::SourceConfig;
use crate::error::{AvalancheError, FetchError};

/// Anything that can produce the current list of regional forecasts
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// Build the shared HTTP client, attaching the configured retry policy.
pub fn build_http_client(config: &SourceConfig) -> crate::Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(concat!("avalanche-forecast/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AvalancheError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// Forecast source backed by the avalanche.org map layer
pub struct AvalancheOrgClient {
    client: ClientWithMiddleware,
    url: String,
}

impl AvalancheOrgClient {
    pub fn new(config: &SourceConfig) -> crate::Result<Self> {
        Ok(Self::with_client(build_http_client(config)?, &config.url))
    }

    #[must_use]
    pub fn with_client(client: ClientWithMiddleware, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl ForecastSource for AvalancheOrgClient {
    #[instrument(name = "fetch_forecasts", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<ForecastEntry>, FetchError> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Forecast source answered with {}", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!("Received {} bytes from forecast source", body.len());

        let layer: maplayer::MapLayer =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        let entries: Vec<ForecastEntry> = layer
            .features
            .into_iter()
            .map(|feature| feature.properties.into())
            .collect();

        info!(
            "Fetched {} regional forecasts in {:.3}s",
            entries.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(entries)
    }
}

/// Wire format of the avalanche.org map layer
mod maplayer {
    use serde::Deserialize;

    use super::ForecastEntry;

    #[derive(Debug, Deserialize)]
    pub struct MapLayer {
        pub features: Vec<Feature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Feature {
        pub properties: Properties,
    }

    #[derive(Debug, Deserialize)]
    pub struct Properties {
        pub name: String,
        pub center: String,
        pub link: String,
        pub state: String,
        pub travel_advice: String,
        pub danger: String,
        pub danger_level: i32,
    }

    impl From<Properties> for ForecastEntry {
        fn from(p: Properties) -> Self {
            ForecastEntry {
                name: p.name,
                center: p.center,
                link: p.link,
                state: p.state,
                travel_advice: p.travel_advice,
                danger: p.danger,
                danger_level: p.danger_level,
            }
        }
    }
}

//! GEOGLOWS REST v2 client.

use crate::dataset::{Dataset, DatasetType};
use crate::error::{GlowsError, Result};
use crate::river::RiverId;
use crate::source::StreamflowSource;
use crate::transform::TransformTable;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://geoglows.ecmwf.int/api/v2";

/// Connection settings for [`HttpSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSourceConfig {
    pub base_url: String,
    /// Total attempts per request, including the first.
    pub retries: u32,
    pub timeout: Duration,
    /// Delay before the first retry; doubled after each failure.
    pub initial_backoff: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        HttpSourceConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            retries: 3,
            timeout: Duration::from_secs(60),
            initial_backoff: Duration::from_millis(1000),
        }
    }
}

/// Fetches datasets from the GEOGLOWS REST API as CSV.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(HttpSource { client, config })
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn url(&self, endpoint: &str, river_id: RiverId) -> String {
        format!(
            "{}/{}/{}?format=csv",
            self.config.base_url.trim_end_matches('/'),
            endpoint,
            river_id
        )
    }

    /// GET `url`, retrying with exponential backoff.
    ///
    /// The last failure is reported as [`GlowsError::DataUnavailable`].
    async fn get_text(&self, url: &str, dataset: &str, river_id: RiverId) -> Result<String> {
        let max_tries = self.config.retries.max(1);
        let mut sleep = self.config.initial_backoff;
        let mut last_reason = String::new();

        for attempt in 1..=max_tries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    if response.status() != StatusCode::OK {
                        last_reason = format!("bad response status {}", response.status());
                        warn!(
                            "Attempt {}/{}: {} for {} of river {}",
                            attempt, max_tries, last_reason, dataset, river_id
                        );
                    } else {
                        match response.text().await {
                            Ok(body) if body.trim().is_empty() => {
                                last_reason = "empty response".to_string();
                                warn!(
                                    "Attempt {}/{}: Empty response for {} of river {}",
                                    attempt, max_tries, dataset, river_id
                                );
                            }
                            Ok(body) => return Ok(body),
                            Err(e) => {
                                last_reason = format!("failed to read response body: {e}");
                                warn!(
                                    "Attempt {}/{}: {} for {} of river {}",
                                    attempt, max_tries, last_reason, dataset, river_id
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    last_reason = format!("request failed: {e}");
                    warn!(
                        "Attempt {}/{}: {} for {} of river {}",
                        attempt, max_tries, last_reason, dataset, river_id
                    );
                }
            }

            if attempt < max_tries {
                info!(
                    "Sleeping for {} milliseconds before retry for {} of river {}",
                    sleep.as_millis(),
                    dataset,
                    river_id
                );
                tokio::time::sleep(sleep).await;
                sleep *= 2;
            }
        }

        Err(GlowsError::DataUnavailable {
            dataset: dataset.to_string(),
            river_id: river_id.to_string(),
            reason: format!("{last_reason} after {max_tries} attempts"),
        })
    }
}

impl StreamflowSource for HttpSource {
    async fn fetch(&self, kind: DatasetType, river_id: RiverId) -> Result<Dataset> {
        let url = self.url(kind.endpoint(), river_id);
        info!("Fetching {} for river {} from {}", kind, river_id, url);
        let body = self.get_text(&url, kind.as_str(), river_id).await?;
        Dataset::from_csv(kind, &body).map_err(|e| GlowsError::DataUnavailable {
            dataset: kind.to_string(),
            river_id: river_id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn global_transform(&self, river_id: RiverId) -> Result<TransformTable> {
        let url = self.url("sfdc", river_id);
        info!("Fetching global transform for river {} from {}", river_id, url);
        let body = self.get_text(&url, "sfdc", river_id).await?;
        TransformTable::from_csv(&body).map_err(|e| GlowsError::DataUnavailable {
            dataset: "sfdc".to_string(),
            river_id: river_id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let source = HttpSource::new(HttpSourceConfig {
            base_url: "https://example.org/api/v2/".to_string(),
            ..HttpSourceConfig::default()
        })
        .unwrap();
        assert_eq!(
            source.url(DatasetType::ForecastEnsembles.endpoint(), RiverId(710093)),
            "https://example.org/api/v2/forecastensembles/710093?format=csv"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_data_unavailable() {
        let source = HttpSource::new(HttpSourceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            retries: 2,
            timeout: Duration::from_millis(500),
            initial_backoff: Duration::from_millis(1),
        })
        .unwrap();
        let err = source
            .fetch(DatasetType::Forecast, RiverId(1))
            .await
            .unwrap_err();
        match err {
            GlowsError::DataUnavailable { dataset, reason, .. } => {
                assert_eq!(dataset, "forecast");
                assert!(reason.ends_with("after 2 attempts"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

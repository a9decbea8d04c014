//! Market-data REST client
//!
//! Thin wrapper over the provider's HTTP API with a retry policy for rate
//! limiting and a deliberately serialized multi-asset update path.
//! Uses a long-lived reqwest::Client for connection pooling.

pub mod types;

pub use types::{Candles, CompanyProfile, ForexRates, Quote};

use crate::error::BankableError;
use crate::Result;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Header carrying the API token
const AUTH_HEADER: &str = "X-Finnhub-Token";

/// Retries allowed when the provider answers 429
const MAX_RETRIES: u32 = 2;

/// Spacing between sequential asset updates, to stay under the rate limit
const REQUEST_SPACING: Duration = Duration::from_millis(250);

/// Reusable market-data client (connection-pooled)
pub struct MarketDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the API key from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MARKET_API_KEY")
            .or_else(|_| std::env::var("FINNHUB_API_KEY"))
            .map_err(|_| {
                BankableError::ConfigError(
                    "MARKET_API_KEY (or FINNHUB_API_KEY) is not set".to_string(),
                )
            })?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Issue a GET with the auth header, retrying on HTTP 429.
    ///
    /// Retry delays follow the provider guidance: 1s before the first
    /// retry, 2s before the second. Any other non-success status
    /// propagates immediately with the response body attached.
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries_left = MAX_RETRIES;

        loop {
            let response = self
                .client
                .get(&url)
                .query(params)
                .header(AUTH_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| {
                    error!(endpoint = %endpoint, error = %e, "Market API request failed");
                    BankableError::MarketDataError(format!(
                        "request failed for {}: {}",
                        endpoint, e
                    ))
                })?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retries_left == 0 {
                    return Err(BankableError::RateLimitExceeded(MAX_RETRIES));
                }

                let delay = Duration::from_millis(1_000 * (3 - retries_left) as u64);
                warn!(
                    endpoint = %endpoint,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limit hit, retrying"
                );
                tokio::time::sleep(delay).await;
                retries_left -= 1;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(endpoint = %endpoint, status = %status, "Market API error response");
                return Err(BankableError::MarketDataError(format!(
                    "{} returned {}: {}",
                    endpoint, status, body
                )));
            }

            return response.json::<T>().await.map_err(|e| {
                error!(endpoint = %endpoint, error = %e, "Failed to parse market API response");
                BankableError::MarketDataError(format!(
                    "invalid response from {}: {}",
                    endpoint, e
                ))
            });
        }
    }

    /// Verify the API key works.
    pub async fn test_connection(&self) -> Result<serde_json::Value> {
        self.request("/stock/symbol", &[("exchange", "US".to_string())])
            .await
    }

    /// Real-time quote for a stock symbol.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        self.request("/quote", &[("symbol", symbol.to_string())])
            .await
    }

    /// OHLCV candles for a stock symbol.
    pub async fn stock_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Candles> {
        self.request(
            "/stock/candle",
            &[
                ("symbol", symbol.to_string()),
                ("resolution", resolution.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )
        .await
    }

    /// OHLCV candles for a crypto symbol.
    pub async fn crypto_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Candles> {
        self.request(
            "/crypto/candle",
            &[
                ("symbol", symbol.to_string()),
                ("resolution", resolution.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )
        .await
    }

    /// Company profile for a stock symbol.
    pub async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.request("/stock/profile2", &[("symbol", symbol.to_string())])
            .await
    }

    /// Exchange rates against a base currency.
    pub async fn forex_rates(&self, base: &str) -> Result<ForexRates> {
        self.request("/forex/rates", &[("base", base.to_string())])
            .await
    }

    /// Update assets one at a time with a fixed spacing between calls.
    ///
    /// This is deliberate serialization, not parallelism: the provider's
    /// rate limit is per-second, so requests are paced 250ms apart.
    /// Output order equals input order; the first failure aborts the run.
    pub async fn update_assets_sequential<T, U, F, Fut>(
        &self,
        assets: Vec<T>,
        mut update_fn: F,
    ) -> Result<Vec<U>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<U>>,
    {
        let mut results = Vec::with_capacity(assets.len());

        for asset in assets {
            if !results.is_empty() {
                tokio::time::sleep(REQUEST_SPACING).await;
            }

            match update_fn(asset).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(error = %e, "Asset update failed, aborting batch");
                    return Err(e);
                }
            }
        }

        info!(count = results.len(), "Asset batch updated");
        Ok(results)
    }
}

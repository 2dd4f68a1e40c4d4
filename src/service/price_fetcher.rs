//! Price fetcher: one request to a CoinGecko-compatible `/simple/price`
//! endpoint per refresh cycle.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::{CoinId, TrackedCoins};
use crate::error::TrackerError;

/// USD price per tracked coin.
pub type PriceMap = HashMap<CoinId, f64>;

/// Source of USD spot prices.
///
/// Implementations either resolve every requested coin or fail with
/// [`TrackerError::Upstream`]; partial maps are never returned.
#[async_trait]
pub trait PriceProvider: Send + Sync + fmt::Debug {
    /// Fetches the USD price of every coin in `coins`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Upstream`] on transport failure, timeout,
    /// a non-success status, a malformed body, or a missing coin.
    async fn fetch_prices(&self, coins: &TrackedCoins) -> Result<PriceMap, TrackerError>;
}

#[derive(Debug, Deserialize)]
struct Quote {
    usd: Option<f64>,
}

/// CoinGecko-backed price provider.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: Url,
}

impl CoinGeckoClient {
    /// Creates a client against `base_url` (e.g.
    /// `https://api.coingecko.com/api/v3`) with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the HTTP client cannot be built
    /// or the base URL cannot carry a path.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TrackerError> {
        if base_url.cannot_be_a_base() {
            return Err(TrackerError::Config(format!(
                "price API base URL {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("memecoin-pulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Config(format!("http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn price_url(&self, coins: &TrackedCoins) -> Result<Url, TrackerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TrackerError::Internal(format!("bad base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["simple", "price"]);
        url.query_pairs_mut()
            .append_pair("ids", &coins.joined())
            .append_pair("vs_currencies", "usd");
        Ok(url)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoClient {
    async fn fetch_prices(&self, coins: &TrackedCoins) -> Result<PriceMap, TrackerError> {
        let url = self.price_url(coins)?;
        tracing::debug!(%url, "fetching prices");

        let body = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let parsed: HashMap<String, Quote> = serde_json::from_slice(&body)
            .map_err(|e| TrackerError::Upstream(format!("malformed price response: {e}")))?;

        extract_prices(coins, &parsed)
    }
}

/// Picks the USD price of every requested coin out of a parsed response.
fn extract_prices(
    coins: &TrackedCoins,
    parsed: &HashMap<String, Quote>,
) -> Result<PriceMap, TrackerError> {
    coins
        .iter()
        .map(|coin| {
            let quote = parsed.get(coin.as_str()).ok_or_else(|| {
                TrackerError::Upstream(format!("coin missing in price response: {coin}"))
            })?;
            let usd = quote
                .usd
                .filter(|p| p.is_finite())
                .ok_or_else(|| TrackerError::Upstream(format!("usd price missing for {coin}")))?;
            Ok((coin.clone(), usd))
        })
        .collect()
}

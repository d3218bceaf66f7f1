use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::feed::{FeedError, PriceFeed, PriceSnapshot};

/// Public CoinDesk endpoint serving the Bitcoin Price Index.
pub const COINDESK_BASE_URL: &str = "https://api.coindesk.com";

const CURRENT_PRICE_PATH: &str = "/v1/bpi/currentprice.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Live feed client. One GET per fetch, a single attempt, no retry; a timed
/// out or failed call is handled by the aggregator's fallback policy.
pub struct CoinDeskFeed {
    base_url: String,
    client: Client,
}

impl CoinDeskFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("coinview/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(CoinDeskFeed {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl PriceFeed for CoinDeskFeed {
    #[instrument(name = "CoinDeskFetch", skip(self))]
    async fn fetch_current(&self) -> Result<PriceSnapshot, FeedError> {
        let url = format!("{}{}", self.base_url, CURRENT_PRICE_PATH);
        debug!("Requesting current price from {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        response
            .json::<PriceSnapshot>()
            .await
            .map_err(FeedError::Decode)
    }
}

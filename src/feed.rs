//! Bitcoin Price Index feed contract and wire types.

use async_trait::async_trait;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Internal-only failure of the outbound feed call. Every variant degrades
/// to the fallback dataset; none of them reach a caller.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The `bpi` map keeps the feed's own key order; the transformed view
/// iterates quotes in snapshot order, not sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub time: Option<FeedTime>,
    pub disclaimer: Option<String>,
    #[serde(rename = "chartName")]
    pub chart_name: Option<String>,
    pub bpi: Option<IndexMap<String, BpiQuote>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedTime {
    pub updated: Option<String>,
    #[serde(rename = "updatedISO")]
    pub updated_iso: Option<String>,
    #[serde(rename = "updateduk")]
    pub updated_uk: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BpiQuote {
    pub code: Option<String>,
    pub symbol: Option<String>,
    /// Feed-native display formatting, e.g. `"23,342.0112"`.
    pub rate: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub rate_float: Decimal,
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_current(&self) -> Result<PriceSnapshot, FeedError>;
}

/// Substitute dataset served whenever the live feed cannot be used. Built
/// once at startup; `fallback_snapshot` hands out clones.
static FALLBACK: Lazy<PriceSnapshot> = Lazy::new(|| PriceSnapshot {
    time: Some(FeedTime {
        updated: Some("Aug 3, 2022 20:25:00 UTC".to_string()),
        updated_iso: Some("2022-08-03T20:25:00+00:00".to_string()),
        updated_uk: Some("Aug 3, 2022 at 21:25 BST".to_string()),
    }),
    disclaimer: Some(
        "This data was produced from the CoinDesk Bitcoin Price Index (USD). \
         Non-USD currency data converted using hourly conversion rate from \
         openexchangerates.org"
            .to_string(),
    ),
    chart_name: Some("Bitcoin".to_string()),
    bpi: Some(IndexMap::from([
        (
            "USD".to_string(),
            BpiQuote {
                code: Some("USD".to_string()),
                symbol: Some("$".to_string()),
                rate: Some("23,342.0112".to_string()),
                description: Some("US Dollar".to_string()),
                rate_float: Decimal::new(233_420_112, 4),
            },
        ),
        (
            "GBP".to_string(),
            BpiQuote {
                code: Some("GBP".to_string()),
                symbol: Some("£".to_string()),
                rate: Some("19,504.3978".to_string()),
                description: Some("British Pound Sterling".to_string()),
                rate_float: Decimal::new(195_043_978, 4),
            },
        ),
        (
            "EUR".to_string(),
            BpiQuote {
                code: Some("EUR".to_string()),
                symbol: Some("€".to_string()),
                rate: Some("22,738.5269".to_string()),
                description: Some("Euro".to_string()),
                rate_float: Decimal::new(227_385_269, 4),
            },
        ),
    ])),
});

pub fn fallback_snapshot() -> PriceSnapshot {
    FALLBACK.clone()
}

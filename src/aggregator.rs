//! Joins the live (or fallback) price feed with local reference data.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::currency::CurrencyService;
use crate::feed::{FeedError, PriceFeed, PriceSnapshot, fallback_snapshot};
use crate::store::StoreError;

/// Canonical display format every timestamp is normalized to.
pub const DISPLAY_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const FEED_TIME_FORMAT: &str = "%b %d, %Y %H:%M:%S";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBoard {
    pub updated_time: String,
    pub currencies: Vec<CurrencyRate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub code: String,
    pub chinese_name: String,
    pub rate: Decimal,
}

/// Combines the volatile external feed with the local reference table.
/// Owns no state of its own; both inputs are read fresh on every call.
pub struct PriceAggregator {
    feed: Arc<dyn PriceFeed>,
    currencies: Arc<CurrencyService>,
}

impl PriceAggregator {
    pub fn new(feed: Arc<dyn PriceFeed>, currencies: Arc<CurrencyService>) -> Self {
        Self { feed, currencies }
    }

    /// The live snapshot, or the fallback dataset when the feed call fails in
    /// any way. Never fails.
    pub async fn current_price(&self) -> PriceSnapshot {
        snapshot_or_fallback(self.feed.fetch_current().await)
    }

    /// Builds the client-facing view: one entry per feed quote, in snapshot
    /// order, with display names resolved from the reference table. A failing
    /// feed degrades to the fallback dataset; a failing store is an
    /// infrastructure fault and propagates.
    pub async fn price_board(&self) -> Result<PriceBoard, StoreError> {
        let (snapshot, records) = futures::join!(self.current_price(), self.currencies.list());
        let records = records?;

        let names: HashMap<String, String> = records
            .into_iter()
            .map(|record| (record.code, record.chinese_name))
            .collect();

        let updated_time =
            normalize_updated_time(snapshot.time.as_ref().and_then(|t| t.updated.as_deref()));

        let mut currencies = Vec::new();
        if let Some(bpi) = &snapshot.bpi {
            for quote in bpi.values() {
                let Some(code) = &quote.code else {
                    continue;
                };
                currencies.push(CurrencyRate {
                    code: code.clone(),
                    chinese_name: names.get(code).cloned().unwrap_or_default(),
                    rate: quote.rate_float,
                });
            }
        }

        Ok(PriceBoard {
            updated_time,
            currencies,
        })
    }
}

/// The feed masking policy, kept in one place: any [`FeedError`] becomes the
/// fallback dataset.
fn snapshot_or_fallback(result: Result<PriceSnapshot, FeedError>) -> PriceSnapshot {
    match result {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(%err, "price feed unavailable, serving fallback dataset");
            fallback_snapshot()
        }
    }
}

/// Normalizes the feed's `"Jul 4, 2025 15:00:00 UTC"` style timestamp to
/// [`DISPLAY_TIME_FORMAT`]. Missing or unparsable input is replaced with the
/// current UTC wall-clock time in the same format.
fn normalize_updated_time(updated: Option<&str>) -> String {
    let Some(raw) = updated.filter(|value| !value.is_empty()) else {
        return Utc::now().format(DISPLAY_TIME_FORMAT).to_string();
    };

    let trimmed = raw.replace(" UTC", "");
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&trimmed, FEED_TIME_FORMAT) {
        return parsed.format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&trimmed) {
        return parsed.format(DISPLAY_TIME_FORMAT).to_string();
    }
    Utc::now().format(DISPLAY_TIME_FORMAT).to_string()
}

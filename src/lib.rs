pub mod aggregator;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod currency;
pub mod feed;
pub mod log;
pub mod providers;
pub mod store;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregator::PriceAggregator;
use crate::config::AppConfig;
use crate::crypto::{AesCbcCipher, CryptoBox};
use crate::currency::CurrencyService;
use crate::providers::coindesk::{COINDESK_BASE_URL, CoinDeskFeed};
use crate::store::disk::FjallRepository;

pub enum AppCommand {
    Raw,
    Price { json: bool },
    CurrencyList,
    CurrencyGet { code: String },
    CurrencyAdd { code: String, name: String },
    CurrencyUpdate { code: String, name: String },
    CurrencyRemove { code: String },
}

/// The wired application: the currency service over the persistent store,
/// and the aggregator over the configured feed.
pub struct App {
    pub currencies: Arc<CurrencyService>,
    pub aggregator: PriceAggregator,
}

pub fn build_app(config: &AppConfig) -> Result<App> {
    let cipher = AesCbcCipher::new(&config.crypto.key, &config.crypto.iv)?;
    let crypto = CryptoBox::new(Arc::new(cipher));

    let data_path = config.data_path()?;
    let repository = Arc::new(FjallRepository::open(&data_path)?);
    let currencies = Arc::new(CurrencyService::new(repository, crypto));

    let base_url = config
        .feed
        .as_ref()
        .map_or(COINDESK_BASE_URL, |feed| feed.base_url.as_str());
    let feed = Arc::new(CoinDeskFeed::new(base_url)?);
    let aggregator = PriceAggregator::new(feed, Arc::clone(&currencies));

    Ok(App {
        currencies,
        aggregator,
    })
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinview starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = build_app(&config)?;

    match command {
        AppCommand::Raw => cli::price::show_raw(&app.aggregator).await,
        AppCommand::Price { json } => cli::price::show_board(&app.aggregator, json).await,
        AppCommand::CurrencyList => cli::currencies::list(&app.currencies).await,
        AppCommand::CurrencyGet { code } => cli::currencies::get(&app.currencies, &code).await,
        AppCommand::CurrencyAdd { code, name } => {
            cli::currencies::add(&app.currencies, &code, &name).await
        }
        AppCommand::CurrencyUpdate { code, name } => {
            cli::currencies::update(&app.currencies, &code, &name).await
        }
        AppCommand::CurrencyRemove { code } => {
            cli::currencies::remove(&app.currencies, &code).await
        }
    }
}

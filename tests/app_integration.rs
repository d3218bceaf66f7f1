use rust_decimal::Decimal;
use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_feed_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/bpi/currentprice.json"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(feed_url: &str, data_dir: &std::path::Path) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
crypto:
  key: "0123456789abcdef0123456789abcdef"
  iv: "abcdef9876543210"
feed:
  base_url: "{}"
data_dir: "{}"
"#,
            feed_url,
            data_dir.display()
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_flow_with_live_feed_mock() {
    let body = r#"{
        "time": {"updated": "Jul 4, 2025 15:00:00 UTC"},
        "disclaimer": "test data",
        "chartName": "Bitcoin",
        "bpi": {
            "USD": {"code": "USD", "symbol": "$", "rate": "50,000.0000", "description": "US Dollar", "rate_float": 50000.0},
            "JPY": {"code": "JPY", "symbol": "¥", "rate": "7,000,000.0000", "description": "Japanese Yen", "rate_float": 7000000.0}
        }
    }"#;
    let mock_server = test_utils::create_feed_server(
        wiremock::ResponseTemplate::new(200).set_body_string(body),
    )
    .await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path());

    let config = coinview::config::AppConfig::load_from_path(config_file.path()).unwrap();
    let app = coinview::build_app(&config).unwrap();

    app.currencies.create("USD", "美元").await.unwrap();

    let board = app.aggregator.price_board().await.unwrap();
    info!(?board, "Received price board");

    assert_eq!(board.updated_time, "2025/07/04 15:00:00");
    assert_eq!(board.currencies.len(), 2);

    // Known code joins with the stored (and decrypted) display name.
    assert_eq!(board.currencies[0].code, "USD");
    assert_eq!(board.currencies[0].chinese_name, "美元");
    assert_eq!(board.currencies[0].rate, Decimal::new(50_000, 0));

    // Unknown code falls back to an empty name.
    assert_eq!(board.currencies[1].code, "JPY");
    assert_eq!(board.currencies[1].chinese_name, "");
}

#[test_log::test(tokio::test)]
async fn test_feed_failure_serves_fallback_dataset() {
    let mock_server = test_utils::create_feed_server(wiremock::ResponseTemplate::new(500)).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path());

    let config = coinview::config::AppConfig::load_from_path(config_file.path()).unwrap();
    let app = coinview::build_app(&config).unwrap();

    let board = app.aggregator.price_board().await.unwrap();

    assert_eq!(board.updated_time, "2022/08/03 20:25:00");
    let usd = board
        .currencies
        .iter()
        .find(|c| c.code == "USD")
        .expect("fallback dataset includes USD");
    assert_eq!(usd.rate, Decimal::new(233_420_112, 4));

    let raw = app.aggregator.current_price().await;
    assert_eq!(raw.chart_name.as_deref(), Some("Bitcoin"));
    let codes: Vec<&String> = raw.bpi.as_ref().unwrap().keys().collect();
    assert_eq!(codes, ["USD", "GBP", "EUR"]);
}

#[test_log::test(tokio::test)]
async fn test_raw_snapshot_round_trips_the_feed_shape() {
    let body = r#"{
        "time": {"updated": "Jul 4, 2025 15:00:00 UTC", "updatedISO": "2025-07-04T15:00:00+00:00"},
        "chartName": "Bitcoin",
        "bpi": {
            "USD": {"code": "USD", "symbol": "$", "rate": "50,000.0000", "description": "US Dollar", "rate_float": 50000.0}
        }
    }"#;
    let mock_server = test_utils::create_feed_server(
        wiremock::ResponseTemplate::new(200).set_body_string(body),
    )
    .await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path());

    let config = coinview::config::AppConfig::load_from_path(config_file.path()).unwrap();
    let app = coinview::build_app(&config).unwrap();

    let raw = app.aggregator.current_price().await;
    let json: serde_json::Value = serde_json::to_value(&raw).unwrap();

    assert_eq!(json["chartName"], "Bitcoin");
    assert_eq!(json["time"]["updated"], "Jul 4, 2025 15:00:00 UTC");
    assert_eq!(json["bpi"]["USD"]["rate"], "50,000.0000");
}

#[test_log::test(tokio::test)]
async fn test_currencies_persist_encrypted_across_restarts() {
    let mock_server = test_utils::create_feed_server(wiremock::ResponseTemplate::new(500)).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = test_utils::write_config(&mock_server.uri(), data_dir.path());
    let config = coinview::config::AppConfig::load_from_path(config_file.path()).unwrap();

    {
        let app = coinview::build_app(&config).unwrap();
        app.currencies.create("TWD", "新台幣").await.unwrap();
    }

    // The value on disk is ciphertext, not the submitted name.
    let stored_somewhere_in = |needle: &[u8]| -> bool {
        fn scan(dir: &std::path::Path, needle: &[u8], found: &mut bool) {
            for entry in fs::read_dir(dir).into_iter().flatten().flatten() {
                let path = entry.path();
                if path.is_dir() {
                    scan(&path, needle, found);
                } else if let Ok(bytes) = fs::read(&path) {
                    if bytes.windows(needle.len()).any(|w| w == needle) {
                        *found = true;
                    }
                }
            }
        }
        let mut found = false;
        scan(data_dir.path(), needle, &mut found);
        found
    };
    assert!(!stored_somewhere_in("新台幣".as_bytes()));

    let app = coinview::build_app(&config).unwrap();
    let records = app.currencies.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code, "TWD");
    assert_eq!(records[0].chinese_name, "新台幣");
}

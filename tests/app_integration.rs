use chrono::{Duration, Utc};
use cotiza::cache::RateCache;
use cotiza::core::config::{ClientConfig, UpstreamConfig};
use cotiza::core::{RateError, RateSet, RateSnapshot, RateSource};
use cotiza::loader::RateLoader;
use cotiza::providers::{BcraProvider, GatewayClient};
use cotiza::store::disk::DiskStore;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const UPSTREAM_JSON: &str = r#"{
        "status": 200,
        "results": {
            "fecha": "2025-03-14",
            "detalle": [
                {"codigoMoneda": "EUR", "descripcion": "EURO", "tipoPase": 1.09, "tipoCotizacion": 1161.2},
                {"codigoMoneda": "USD", "descripcion": "DOLAR E.E.U.U.", "tipoPase": 1.0, "tipoCotizacion": 1000.0},
                {"codigoMoneda": "BRL", "descripcion": "REAL (Brasil)", "tipoPase": 0.18, "tipoCotizacion": 180.0},
                {"codigoMoneda": "PYG", "descripcion": "GUARANI (Paraguay)", "tipoPase": 0.0001, "tipoCotizacion": 0.13},
                {"codigoMoneda": "UYU", "descripcion": "PESO URUGUAYO", "tipoPase": 0.025, "tipoCotizacion": 25.0}
            ]
        }
    }"#;

    pub async fn create_upstream(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    /// Starts a gateway in front of `upstream_uri` and returns its base URL.
    pub async fn start_gateway(upstream_uri: &str) -> String {
        let provider = cotiza::providers::BcraProvider::new(&cotiza::core::config::UpstreamConfig {
            base_url: upstream_uri.to_string(),
            accept_invalid_certs: false,
            timeout_secs: 5,
        })
        .expect("Failed to build upstream provider");
        let gateway = cotiza::gateway::RateGateway::new(Arc::new(provider));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind gateway");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(cotiza::gateway::server::serve(listener, gateway));
        format!("http://{addr}")
    }

    /// An address nothing is listening on.
    pub async fn dead_address() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local address");
        drop(listener);
        format!("http://{addr}")
    }

    pub fn write_config(dir: &std::path::Path, gateway_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("data");
        let content = format!(
            r#"
client:
  gateway_url: "{}"
  timeout_secs: 5
data_path: "{}"
"#,
            gateway_url,
            data_path.display()
        );
        std::fs::write(&config_path, content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_gateway_filters_upstream_quotes() {
    let upstream = test_utils::create_upstream(200, test_utils::UPSTREAM_JSON).await;
    let gateway_url = test_utils::start_gateway(&upstream.uri()).await;

    let response = reqwest::get(format!("{gateway_url}/api/cotizaciones"))
        .await
        .expect("Gateway request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Gateway body is not JSON");
    info!(?body, "Gateway response");
    assert_eq!(body["success"], true);
    assert_eq!(body["fecha"], "2025-03-14");
    let codes: Vec<&str> = body["cotizaciones"]
        .as_array()
        .expect("cotizaciones should be an array")
        .iter()
        .map(|q| q["codigoMoneda"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["USD", "BRL", "PYG", "UYU"]);
}

#[test_log::test(tokio::test)]
async fn test_gateway_ignores_odd_records_outside_allow_list() {
    let body = r#"{
        "status": 200,
        "results": {
            "fecha": "2025-03-14",
            "detalle": [
                {"codigoMoneda": "XAU", "descripcion": "ORO", "tipoCotizacion": null},
                {"codigoMoneda": "USD", "descripcion": "DOLAR E.E.U.U.", "tipoCotizacion": 1000.0}
            ]
        }
    }"#;
    let upstream = test_utils::create_upstream(200, body).await;
    let gateway_url = test_utils::start_gateway(&upstream.uri()).await;

    let response = reqwest::get(format!("{gateway_url}/api/cotizaciones"))
        .await
        .expect("Gateway request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Gateway body is not JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["cotizaciones"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["cotizaciones"][0]["codigoMoneda"], "USD");
}

#[test_log::test(tokio::test)]
async fn test_gateway_reports_upstream_bad_status_as_500() {
    let upstream = test_utils::create_upstream(503, "Service Unavailable").await;
    let gateway_url = test_utils::start_gateway(&upstream.uri()).await;

    let response = reqwest::get(format!("{gateway_url}/api/cotizaciones"))
        .await
        .expect("Gateway request failed");
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.expect("Gateway body is not JSON");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock_upstream() {
    let upstream = test_utils::create_upstream(200, test_utils::UPSTREAM_JSON).await;
    let gateway_url = test_utils::start_gateway(&upstream.uri()).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &gateway_url);

    let result = cotiza::run_command(
        cotiza::AppCommand::Convert {
            amount: "10".to_string(),
            from: "usd".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
    assert!(dir.path().join("data").join("storage").exists());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_reported_inline() {
    let upstream = test_utils::create_upstream(200, test_utils::UPSTREAM_JSON).await;
    let gateway_url = test_utils::start_gateway(&upstream.uri()).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &gateway_url);

    let result = cotiza::run_command(
        cotiza::AppCommand::Convert {
            amount: "-5".to_string(),
            from: "XYZ".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Validation errors should not fail the command");
}

#[test_log::test(tokio::test)]
async fn test_no_gateway_and_no_saved_rates_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &test_utils::dead_address().await);

    let result = cotiza::run_command(
        cotiza::AppCommand::Rates {
            from: "ARS".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Rates without any source should fail");
    assert!(err.to_string().contains("no saved rates"));
}

#[test_log::test(tokio::test)]
async fn test_falls_back_to_saved_rates_when_upstream_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(DiskStore::open(dir.path()).expect("Failed to open store"));
    let cache = RateCache::new(store);

    // Seed the cache through a successful fetch, then pretend it was two hours ago
    let healthy = test_utils::create_upstream(200, test_utils::UPSTREAM_JSON).await;
    let provider = BcraProvider::new(&UpstreamConfig {
        base_url: healthy.uri(),
        accept_invalid_certs: false,
        timeout_secs: 5,
    })
    .expect("Failed to build provider");
    let rates = provider.fetch_rates().await.expect("Seed fetch failed");
    let two_hours_ago = Utc::now() - Duration::hours(2);
    let snapshot = RateSnapshot::from_rate_set(
        RateSet {
            as_of: rates.as_of,
            quotes: cotiza::gateway::filter_allowed(rates.quotes),
        },
        two_hours_ago,
    )
    .expect("Seed snapshot invalid");
    cache.save_captured_at(&snapshot, two_hours_ago).await;

    // Now the upstream is down behind the gateway
    let failing = test_utils::create_upstream(503, "Service Unavailable").await;
    let gateway_url = test_utils::start_gateway(&failing.uri()).await;
    let client = GatewayClient::new(&ClientConfig {
        gateway_url,
        timeout_secs: 5,
    })
    .expect("Failed to build gateway client");

    let direct = client.fetch_rates().await;
    assert!(matches!(direct, Err(RateError::GatewayFailure(_))));

    let loaded = RateLoader::new(&client, &cache)
        .load()
        .await
        .expect("Fallback to saved rates failed");
    assert!(loaded.is_stale());
    assert_eq!(loaded.snapshot.quotes(), snapshot.quotes());

    let notice = cotiza::cli::rates::stale_notice(&loaded, Utc::now())
        .expect("Stale rates should carry a notice");
    assert!(notice.contains("2 hours ago"), "unexpected notice: {notice}");
    assert!(notice.contains("503"), "notice should name the failure: {notice}");
}

use crate::core::error::RateError;
use std::error::Error as _;
use std::time::Duration;
use tracing::warn;

pub const USER_AGENT: &str = concat!("cotiza/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client for one endpoint.
///
/// `accept_invalid_certs` turns off certificate validation for everything this
/// client talks to, so it must only ever be set for a single known endpoint.
pub fn build_client(
    endpoint: &str,
    timeout: Duration,
    accept_invalid_certs: bool,
) -> Result<reqwest::Client, RateError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout);
    if accept_invalid_certs {
        warn!(
            endpoint,
            "TLS certificate validation is DISABLED for this endpoint (upstream.accept_invalid_certs)"
        );
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
        .build()
        .map_err(|e| RateError::UpstreamUnreachable(error_chain(&e)))
}

/// Joins an error with its sources, since reqwest keeps the useful part
/// (DNS, TLS, timeout) in the source chain.
pub fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves `GET /` over HTTPS with a self-signed certificate for 127.0.0.1.
    async fn spawn_self_signed_server() -> String {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem(
            include_bytes!("../../tests/fixtures/self_signed_cert.pem").to_vec(),
            include_bytes!("../../tests/fixtures/self_signed_key.pem").to_vec(),
        )
        .await
        .unwrap();
        let app = axum::Router::new().route("/", axum::routing::get(|| async { "ok" }));

        let handle = axum_server::Handle::new();
        let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), tls_config)
            .handle(handle.clone())
            .serve(app.into_make_service());
        tokio::spawn(server);
        let addr = handle.listening().await.unwrap();
        format!("https://127.0.0.1:{}/", addr.port())
    }

    #[tokio::test]
    async fn test_self_signed_certificate_rejected_by_default() {
        let url = spawn_self_signed_server().await;
        let client = build_client(&url, Duration::from_secs(5), false).unwrap();

        let err = client.get(&url).send().await.unwrap_err();
        assert!(err.is_connect() || err.is_request(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_self_signed_certificate_accepted_when_allowed() {
        let url = spawn_self_signed_server().await;
        let client = build_client(&url, Duration::from_secs(5), true).unwrap();

        let response = client.get(&url).send().await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_error_chain_includes_cause() {
        let client = build_client("http://127.0.0.1:1", Duration::from_secs(1), false).unwrap();
        let err = client.get("http://127.0.0.1:1/").send().await.unwrap_err();
        let message = error_chain(&err);
        assert!(message.starts_with(&err.to_string()));
    }
}

use super::util::{build_client, error_chain};
use crate::core::config::ClientConfig;
use crate::core::error::RateError;
use crate::core::quote::RateSet;
use crate::core::source::RateSource;
use crate::gateway::{GatewayResponse, RATES_PATH};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Consumer side client of the rate gateway.
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RateError> {
        // The gateway is ours, so certificates are always checked.
        let client = build_client(
            &config.gateway_url,
            Duration::from_secs(config.timeout_secs),
            false,
        )?;
        Ok(Self {
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl RateSource for GatewayClient {
    #[instrument(name = "GatewayFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Result<RateSet, RateError> {
        let url = format!("{}{}", self.base_url, RATES_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::UpstreamUnreachable(error_chain(&e)))?;

        let http_status = response.status();
        debug!(%http_status, "Received gateway response");

        // Failures come back as HTTP 500 with a JSON body, so parse first.
        let payload = match response.json::<GatewayResponse>().await {
            Ok(payload) => payload,
            Err(e) if http_status.is_success() => {
                return Err(RateError::UpstreamMalformed(error_chain(&e)));
            }
            Err(_) => {
                return Err(RateError::UpstreamBadStatus(i64::from(http_status.as_u16())));
            }
        };

        if !payload.success {
            return Err(RateError::GatewayFailure(
                payload
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        match (payload.fecha, payload.cotizaciones) {
            (Some(as_of), Some(quotes)) => Ok(RateSet { as_of, quotes }),
            _ => Err(RateError::UpstreamMalformed(
                "gateway response is missing fecha or cotizaciones".to_string(),
            )),
        }
    }
}

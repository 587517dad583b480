use super::util::{build_client, error_chain};
use crate::core::config::UpstreamConfig;
use crate::core::error::RateError;
use crate::core::quote::{CurrencyQuote, RateSet};
use crate::core::source::RateSource;
use crate::gateway::ALLOW_LIST;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// The status the upstream reports in its body on success.
const SUCCESS_STATUS: i64 = 200;

#[derive(Debug, Deserialize)]
struct BcraResponse {
    status: i64,
    results: Option<BcraResults>,
}

#[derive(Debug, Deserialize)]
struct BcraResults {
    fecha: NaiveDate,
    // Records are decoded one by one so a single odd entry cannot sink the set
    detalle: Vec<serde_json::Value>,
}

/// Decodes each upstream record, skipping the ones that do not fit a quote.
/// Skipping an allow-listed currency is worth a warning; anything else is
/// dropped by the gateway anyway.
fn parse_quotes(records: Vec<serde_json::Value>) -> Vec<CurrencyQuote> {
    records
        .into_iter()
        .filter_map(|record| {
            let code = record
                .get("codigoMoneda")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("?")
                .to_string();
            match serde_json::from_value::<CurrencyQuote>(record) {
                Ok(quote) => Some(quote),
                Err(e) if ALLOW_LIST.contains(&code.as_str()) => {
                    warn!(%code, error = %e, "Skipping malformed upstream quote");
                    None
                }
                Err(e) => {
                    debug!(%code, error = %e, "Skipping malformed upstream quote");
                    None
                }
            }
        })
        .collect()
}

/// Client for the central bank exchange rate endpoint. Returns every quote the
/// upstream publishes; filtering is the gateway's job.
pub struct BcraProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BcraProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, RateError> {
        let client = build_client(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.accept_invalid_certs,
        )?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/", self.base_url)
    }
}

#[async_trait]
impl RateSource for BcraProvider {
    #[instrument(name = "BcraFetch", skip(self), fields(url = %self.url()))]
    async fn fetch_rates(&self) -> Result<RateSet, RateError> {
        let url = self.url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::UpstreamUnreachable(error_chain(&e)))?;

        let http_status = response.status();
        debug!(%http_status, "Received upstream response");
        if !http_status.is_success() {
            return Err(RateError::UpstreamBadStatus(i64::from(http_status.as_u16())));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| RateError::UpstreamUnreachable(error_chain(&e)))?;

        let body: BcraResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = ?e,
                response = %response_text,
                "Failed to parse upstream response"
            );
            RateError::UpstreamMalformed(e.to_string())
        })?;

        if body.status != SUCCESS_STATUS {
            return Err(RateError::UpstreamBadStatus(body.status));
        }
        let results = body
            .results
            .ok_or_else(|| RateError::UpstreamMalformed("missing results".to_string()))?;

        let quotes = parse_quotes(results.detalle);
        debug!("Fetched {} quotes as of {}", quotes.len(), results.fecha);
        Ok(RateSet {
            as_of: results.fecha,
            quotes,
        })
    }
}

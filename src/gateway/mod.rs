//! Server side proxy that normalizes upstream quotes for the consumer.

pub mod server;

use crate::core::quote::CurrencyQuote;
use crate::core::source::RateSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const RATES_PATH: &str = "/api/cotizaciones";

/// Currencies exposed downstream, in no particular order. Output keeps the
/// upstream ordering.
pub const ALLOW_LIST: [&str; 4] = ["USD", "PYG", "BRL", "UYU"];

/// JSON body of `GET /api/cotizaciones`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cotizaciones: Option<Vec<CurrencyQuote>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayResponse {
    pub fn ok(fecha: NaiveDate, cotizaciones: Vec<CurrencyQuote>) -> Self {
        Self {
            success: true,
            fecha: Some(fecha),
            cotizaciones: Some(cotizaciones),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            fecha: None,
            cotizaciones: None,
            error: Some(error),
        }
    }
}

/// Stateless: every call makes exactly one upstream request.
#[derive(Clone)]
pub struct RateGateway {
    source: Arc<dyn RateSource>,
}

impl RateGateway {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    pub async fn quotes(&self) -> GatewayResponse {
        match self.source.fetch_rates().await {
            Ok(rates) => {
                let quotes = filter_allowed(rates.quotes);
                debug!("Serving {} quotes as of {}", quotes.len(), rates.as_of);
                GatewayResponse::ok(rates.as_of, quotes)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch upstream rates");
                GatewayResponse::failed(e.to_string())
            }
        }
    }
}

/// Keeps allow-listed codes with usable rates, in upstream order.
pub fn filter_allowed(quotes: Vec<CurrencyQuote>) -> Vec<CurrencyQuote> {
    quotes
        .into_iter()
        .filter(|q| ALLOW_LIST.contains(&q.code.as_str()))
        .filter(|q| {
            let valid = q.has_valid_rate();
            if !valid {
                warn!(code = %q.code, rate = q.rate_to_base, "Dropping quote with invalid rate");
            }
            valid
        })
        .collect()
}

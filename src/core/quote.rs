//! Quote and snapshot types

use crate::core::error::RateError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Currency every `rate_to_base` is expressed against.
pub const BASE_CURRENCY: &str = "ARS";
pub const BASE_DESCRIPTION: &str = "PESO ARGENTINO";

static BASE_QUOTE: LazyLock<CurrencyQuote> = LazyLock::new(|| CurrencyQuote {
    code: BASE_CURRENCY.to_string(),
    description: BASE_DESCRIPTION.to_string(),
    rate_to_base: 1.0,
});

/// How many units of the base currency equal one unit of `code`.
///
/// The serialized field names follow the upstream wire format, which is also
/// what the gateway re-exposes and what the local cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    #[serde(rename = "codigoMoneda")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipoCotizacion")]
    pub rate_to_base: f64,
}

impl CurrencyQuote {
    pub fn new(code: &str, description: &str, rate_to_base: f64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            rate_to_base,
        }
    }

    /// The implicit quote of the base currency (`rate_to_base == 1`).
    pub fn base() -> &'static CurrencyQuote {
        &BASE_QUOTE
    }

    pub fn has_valid_rate(&self) -> bool {
        self.rate_to_base.is_finite() && self.rate_to_base > 0.0
    }
}

/// Quotes as returned by a rate source, before they are stamped and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSet {
    pub as_of: NaiveDate,
    pub quotes: Vec<CurrencyQuote>,
}

/// The full set of quotes valid as of one fetch, plus when it was captured
/// locally. Immutable once built; replaced wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(rename = "fecha")]
    as_of: NaiveDate,
    #[serde(rename = "cotizaciones")]
    quotes: Vec<CurrencyQuote>,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    captured_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(
        as_of: NaiveDate,
        quotes: Vec<CurrencyQuote>,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, RateError> {
        let snapshot = Self {
            as_of,
            quotes,
            captured_at,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_rate_set(rates: RateSet, captured_at: DateTime<Utc>) -> Result<Self, RateError> {
        Self::new(rates.as_of, rates.quotes, captured_at)
    }

    /// Checks codes are unique (the base currency included) and every rate is
    /// a positive finite number.
    pub fn validate(&self) -> Result<(), RateError> {
        let mut seen = HashSet::from([BASE_CURRENCY]);
        for quote in &self.quotes {
            if !seen.insert(quote.code.as_str()) {
                return Err(RateError::InvalidSnapshot(format!(
                    "duplicate currency code {}",
                    quote.code
                )));
            }
            if !quote.has_valid_rate() {
                return Err(RateError::InvalidSnapshot(format!(
                    "rate for {} must be a positive number, got {}",
                    quote.code, quote.rate_to_base
                )));
            }
        }
        Ok(())
    }

    /// Same quotes, new capture time.
    pub fn with_captured_at(&self, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            ..self.clone()
        }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn quotes(&self) -> &[CurrencyQuote] {
        &self.quotes
    }

    /// Base quote first, then the snapshot quotes in their original order.
    pub fn quotes_with_base(&self) -> impl Iterator<Item = &CurrencyQuote> {
        std::iter::once(CurrencyQuote::base()).chain(self.quotes.iter())
    }

    pub fn find(&self, code: &str) -> Option<&CurrencyQuote> {
        self.quotes_with_base().find(|q| q.code == code)
    }
}

/// A single user conversion: an amount expressed in `source_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub source_code: String,
}

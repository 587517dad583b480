//! Converts amounts between any two quoted currencies via the base currency.
//!
//! Everything here is pure: the snapshot is borrowed, never mutated, and no
//! rounding happens before formatting.
use crate::core::error::ConversionError;
use crate::core::format::format_number;
use crate::core::quote::{BASE_CURRENCY, ConversionRequest, CurrencyQuote, RateSnapshot};
use std::fmt::Display;
use tracing::debug;

/// One entry of the display set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedQuote {
    pub code: String,
    pub description: String,
    pub converted_amount: f64,
}

/// A human readable ratio such as `1 USD = 1.065,50 ARS`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLabel {
    pub unit_code: String,
    pub ratio: f64,
    pub counter_code: String,
}

impl Display for RateLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "1 {} = {} {}",
            self.unit_code,
            format_number(self.ratio),
            self.counter_code
        )
    }
}

impl ConversionRequest {
    pub fn new(amount: f64, source_code: &str) -> Result<Self, ConversionError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConversionError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            amount,
            source_code: source_code.to_string(),
        })
    }

    /// Builds a request from raw user input.
    pub fn parse(input: &str, source_code: &str) -> Result<Self, ConversionError> {
        let amount: f64 = input
            .trim()
            .parse()
            .map_err(|_| ConversionError::InvalidAmount(input.to_string()))?;
        Self::new(amount, source_code).map_err(|_| ConversionError::InvalidAmount(input.to_string()))
    }
}

fn source_quote<'a>(
    snapshot: &'a RateSnapshot,
    code: &str,
) -> Result<&'a CurrencyQuote, ConversionError> {
    snapshot
        .find(code)
        .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
}

/// Converts `request.amount` into every other currency of the snapshot
/// (base currency included), keeping snapshot order and leaving the source out.
pub fn build_display_set(
    snapshot: &RateSnapshot,
    request: &ConversionRequest,
) -> Result<Vec<ConvertedQuote>, ConversionError> {
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(ConversionError::InvalidAmount(request.amount.to_string()));
    }
    let source = source_quote(snapshot, &request.source_code)?;
    let amount_in_base = request.amount * source.rate_to_base;
    debug!(
        "Converting {} {} ({} {BASE_CURRENCY})",
        request.amount, source.code, amount_in_base
    );

    Ok(snapshot
        .quotes_with_base()
        .filter(|q| q.code != source.code)
        .map(|q| ConvertedQuote {
            code: q.code.clone(),
            description: q.description.clone(),
            converted_amount: amount_in_base / q.rate_to_base,
        })
        .collect())
}

/// Describes the rate between the source currency and `target`.
///
/// When the source is the base currency the target is the unit side
/// (`1 USD = 1.000,00 ARS`); otherwise the source is (`1 USD = 5,56 BRL`).
pub fn build_rate_label(
    snapshot: &RateSnapshot,
    source_code: &str,
    target: &CurrencyQuote,
) -> Result<RateLabel, ConversionError> {
    let source = source_quote(snapshot, source_code)?;
    if source.code == BASE_CURRENCY {
        return Ok(RateLabel {
            unit_code: target.code.clone(),
            ratio: target.rate_to_base,
            counter_code: source.code.clone(),
        });
    }
    Ok(RateLabel {
        unit_code: source.code.clone(),
        ratio: source.rate_to_base / target.rate_to_base,
        counter_code: target.code.clone(),
    })
}

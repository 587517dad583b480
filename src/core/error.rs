//! Error taxonomy shared by the gateway, the cache and the conversion engine

use thiserror::Error;

/// Failures while obtaining or storing a rate set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateError {
    /// Network, timeout or TLS failure while calling a rate endpoint.
    #[error("could not reach the rate service: {0}")]
    UpstreamUnreachable(String),

    /// The endpoint answered, but with a status other than the expected one.
    #[error("the rate service responded with an unexpected status ({0})")]
    UpstreamBadStatus(i64),

    /// The endpoint answered with a body we could not make sense of.
    #[error("the rate service returned malformed data: {0}")]
    UpstreamMalformed(String),

    /// The gateway reported `success: false`.
    #[error("the rate gateway reported a failure: {0}")]
    GatewayFailure(String),

    /// Local storage could not be read or written. Never fatal.
    #[error("local storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A quote set violated the snapshot invariants.
    #[error("invalid rate snapshot: {0}")]
    InvalidSnapshot(String),

    /// The live fetch failed and there was nothing cached to fall back to.
    #[error("could not load rates and no saved rates are available: {0}")]
    Unavailable(String),
}

/// Validation failures for a single conversion. These never touch the
/// currently loaded rate set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("invalid amount '{0}': enter a number greater than 0")]
    InvalidAmount(String),
}

//! Rate source abstraction

use crate::core::error::RateError;
use crate::core::quote::RateSet;
use async_trait::async_trait;

/// Anything that can produce the current set of quotes with a single
/// request. Implementations never retry.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSet, RateError>;
}

//! Consumer side rate loading: one live fetch, cache fallback on failure.

use crate::cache::RateCache;
use crate::core::error::RateError;
use crate::core::quote::RateSnapshot;
use crate::core::source::RateSource;
use chrono::Utc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Freshness {
    Live,
    /// Served from the local cache because the live fetch failed.
    Stale { cause: String },
}

#[derive(Debug, Clone)]
pub struct LoadedRates {
    pub snapshot: RateSnapshot,
    pub freshness: Freshness,
}

impl LoadedRates {
    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }
}

pub struct RateLoader<'a> {
    source: &'a dyn RateSource,
    cache: &'a RateCache,
}

impl<'a> RateLoader<'a> {
    pub fn new(source: &'a dyn RateSource, cache: &'a RateCache) -> Self {
        Self { source, cache }
    }

    pub async fn load(&self) -> Result<LoadedRates, RateError> {
        let live = self
            .source
            .fetch_rates()
            .await
            .and_then(|rates| RateSnapshot::from_rate_set(rates, Utc::now()));

        match live {
            Ok(snapshot) => {
                let snapshot = self.cache.save(&snapshot).await;
                info!("Loaded live rates as of {}", snapshot.as_of());
                Ok(LoadedRates {
                    snapshot,
                    freshness: Freshness::Live,
                })
            }
            Err(e) => {
                warn!(error = %e, "Live rate fetch failed, trying saved rates");
                match self.cache.load().await {
                    Some(snapshot) => {
                        debug!("Falling back to rates captured at {}", snapshot.captured_at());
                        Ok(LoadedRates {
                            snapshot,
                            freshness: Freshness::Stale {
                                cause: e.to_string(),
                            },
                        })
                    }
                    None => Err(RateError::Unavailable(e.to_string())),
                }
            }
        }
    }
}

//! Write-through cache of the last successfully fetched rates.
//!
//! Only ever read as a fallback after a live fetch fails, never to skip one.
use crate::core::error::RateError;
use crate::core::quote::RateSnapshot;
use crate::core::store::{LocalStore, RATES_KEY};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn LocalStore>,
}

impl RateCache {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Stamps the snapshot with the current time and persists it, replacing
    /// any previous one. Storage errors are logged, never returned.
    pub async fn save(&self, snapshot: &RateSnapshot) -> RateSnapshot {
        self.save_captured_at(snapshot, Utc::now()).await
    }

    pub async fn save_captured_at(
        &self,
        snapshot: &RateSnapshot,
        captured_at: DateTime<Utc>,
    ) -> RateSnapshot {
        let stamped = snapshot.with_captured_at(captured_at);
        if let Err(e) = self.try_save(&stamped).await {
            error!(error = %e, "Failed to save rates to local storage");
        } else {
            debug!("Saved rates as of {} to local storage", stamped.as_of());
        }
        stamped
    }

    async fn try_save(&self, snapshot: &RateSnapshot) -> Result<(), RateError> {
        let json = serde_json::to_string(snapshot)
            .map_err(|e| RateError::StorageUnavailable(e.to_string()))?;
        self.store
            .set(RATES_KEY, &json)
            .await
            .map_err(|e| RateError::StorageUnavailable(e.to_string()))
    }

    /// The last saved snapshot, or `None` when nothing usable is stored.
    pub async fn load(&self) -> Option<RateSnapshot> {
        match self.try_load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Ignoring saved rates");
                None
            }
        }
    }

    async fn try_load(&self) -> Result<Option<RateSnapshot>, RateError> {
        let Some(json) = self
            .store
            .get(RATES_KEY)
            .await
            .map_err(|e| RateError::StorageUnavailable(e.to_string()))?
        else {
            debug!("No saved rates in local storage");
            return Ok(None);
        };

        let snapshot: RateSnapshot = serde_json::from_str(&json)
            .map_err(|e| RateError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        debug!(
            "Loaded rates as of {} captured at {}",
            snapshot.as_of(),
            snapshot.captured_at()
        );
        Ok(Some(snapshot))
    }
}

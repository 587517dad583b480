//! Durable string key/value storage, the local equivalent of browser storage

use anyhow::Result;
use async_trait::async_trait;

/// Key holding the last fetched rate snapshot.
pub const RATES_KEY: &str = "cotizaciones_bcra";
/// Key holding the last chosen display theme.
pub const THEME_KEY: &str = "theme_preference";

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites any previous value for `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

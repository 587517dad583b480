pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::LocalStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk store under the configured data path. When that fails
/// the caller still gets a working, non-persistent store so that caching
/// degrades instead of aborting the command.
pub fn open_local_store(config: &AppConfig) -> Arc<dyn LocalStore> {
    let opened = config
        .default_data_path()
        .and_then(|path| DiskStore::open(&path.join("storage")));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Local storage unavailable, saved rates will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::CatalogStore;
use crate::{config::Config, error::AppResult};

/// Loads the catalog on first use and hands out the same store afterwards
///
/// Owned by whoever starts the process; there is no global instance.
pub struct CatalogLoader {
    catalog_path: PathBuf,
    matrix_path: PathBuf,
    store: OnceCell<Arc<CatalogStore>>,
}

impl CatalogLoader {
    pub fn new(catalog_path: impl Into<PathBuf>, matrix_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            matrix_path: matrix_path.into(),
            store: OnceCell::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.catalog_path, &config.similarity_path)
    }

    /// Returns the loaded store, reading the files only on the first successful call
    pub async fn get_or_load(&self) -> AppResult<Arc<CatalogStore>> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let catalog_path = self.catalog_path.clone();
                let matrix_path = self.matrix_path.clone();
                tokio::task::spawn_blocking(move || CatalogStore::load(catalog_path, matrix_path))
                    .await
                    .map_err(|e| crate::error::AppError::Internal(e.to_string()))?
                    .map(Arc::new)
            })
            .await?;

        Ok(Arc::clone(store))
    }

    /// The store, if it has been loaded
    pub fn get(&self) -> Option<Arc<CatalogStore>> {
        self.store.get().cloned()
    }
}

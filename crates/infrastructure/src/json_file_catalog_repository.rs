use std::path::PathBuf;

use async_trait::async_trait;
use tallyhub_application::CatalogRepository;
use tallyhub_core::{AppError, AppResult};
use tallyhub_domain::NavigationCatalog;
use tracing::info;

use crate::CatalogDocument;

/// Catalog repository reading a JSON catalog file on every load.
#[derive(Debug, Clone)]
pub struct JsonFileCatalogRepository {
    path: PathBuf,
}

impl JsonFileCatalogRepository {
    /// Creates a repository for the catalog file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogRepository for JsonFileCatalogRepository {
    async fn load_catalog(&self) -> AppResult<NavigationCatalog> {
        let origin = self.path.display().to_string();
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to read navigation catalog '{origin}': {error}"
                ))
            })?;

        let catalog = CatalogDocument::parse(source.as_str(), origin.as_str())?;
        info!(
            path = %origin,
            sections = catalog.sections().len(),
            departments = catalog.departments().len(),
            "loaded navigation catalog"
        );
        Ok(catalog)
    }
}

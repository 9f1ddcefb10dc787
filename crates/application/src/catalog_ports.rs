use async_trait::async_trait;
use tallyhub_core::AppResult;
use tallyhub_domain::NavigationCatalog;

/// Source of the static navigation catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Loads the validated navigation catalog.
    async fn load_catalog(&self) -> AppResult<NavigationCatalog>;
}

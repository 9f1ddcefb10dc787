use async_trait::async_trait;
use tallyhub_application::CatalogRepository;
use tallyhub_core::AppResult;
use tallyhub_domain::NavigationCatalog;
use tracing::debug;

use crate::CatalogDocument;

const DEFAULT_CATALOG: &str = include_str!("../catalog/default_catalog.json");

/// Catalog repository serving the navigation catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogRepository;

impl EmbeddedCatalogRepository {
    /// Creates an embedded catalog repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogRepository for EmbeddedCatalogRepository {
    async fn load_catalog(&self) -> AppResult<NavigationCatalog> {
        let catalog = CatalogDocument::parse(DEFAULT_CATALOG, "embedded")?;
        debug!(
            sections = catalog.sections().len(),
            departments = catalog.departments().len(),
            "loaded embedded navigation catalog"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use tallyhub_application::CatalogRepository;
    use tallyhub_core::AppResult;

    use super::EmbeddedCatalogRepository;

    #[tokio::test]
    async fn embedded_catalog_is_valid() -> AppResult<()> {
        let catalog = EmbeddedCatalogRepository::new().load_catalog().await?;

        let section_ids: Vec<&str> = catalog
            .sections()
            .iter()
            .map(|section| section.module_id().as_str())
            .collect();
        assert_eq!(section_ids, vec!["company_hub", "administration"]);
        assert_eq!(
            catalog.sections()[0].sub_sections()[0].module_id().as_str(),
            "customer_hub"
        );

        let department_keys: Vec<&str> = catalog
            .departments()
            .iter()
            .map(|department| department.department_key().as_str())
            .collect();
        assert_eq!(
            department_keys,
            vec![
                "projects",
                "accounts",
                "sales",
                "purchase",
                "exports",
                "finance",
                "hr",
                "operations"
            ]
        );
        assert_eq!(catalog.sub_module_for_path("/hr/payroll"), Some("hr_payroll"));
        Ok(())
    }
}

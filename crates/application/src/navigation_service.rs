use std::sync::Arc;

use serde::Serialize;
use tallyhub_core::AppResult;
use tallyhub_domain::{
    DepartmentEntry, NavigationCatalog, NavigationPage, NavigationSection, NavigationSubSection,
    User,
};
use tracing::debug;

use crate::{AccessResolver, CatalogRepository};

/// Sub-section visible to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleSubSection {
    /// Gating module identifier.
    pub module_id: String,
    /// Display name.
    pub display_name: String,
    /// Pages that survived filtering.
    pub pages: Vec<NavigationPage>,
}

/// Section visible to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleSection {
    /// Gating module identifier.
    pub module_id: String,
    /// Display name.
    pub display_name: String,
    /// Pages that survived filtering.
    pub pages: Vec<NavigationPage>,
    /// Visible nested sub-sections.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_sections: Vec<VisibleSubSection>,
}

/// Department entry visible to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleDepartment {
    /// Legacy department key.
    pub department_key: String,
    /// Filtered department section.
    pub section: VisibleSection,
}

/// Navigation tree filtered for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisibleNavigation {
    /// Visible top-level sections in catalog order.
    pub sections: Vec<VisibleSection>,
    /// Whether the "Departments" header is rendered.
    pub show_departments: bool,
    /// Visible department entries in catalog order.
    pub departments: Vec<VisibleDepartment>,
}

impl VisibleNavigation {
    /// Returns whether a page routed at `path` is part of the tree.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.sections
            .iter()
            .chain(self.departments.iter().map(|department| &department.section))
            .any(|section| {
                has_path(&section.pages, path)
                    || section
                        .sub_sections
                        .iter()
                        .any(|sub_section| has_path(&sub_section.pages, path))
            })
    }
}

fn has_path(pages: &[NavigationPage], path: &str) -> bool {
    pages.iter().any(|page| page.path().as_str() == path)
}

/// Application service producing per-user navigation.
#[derive(Clone)]
pub struct NavigationService {
    resolver: AccessResolver,
    catalog_repository: Arc<dyn CatalogRepository>,
}

impl NavigationService {
    /// Creates a navigation service backed by a catalog source.
    #[must_use]
    pub fn new(catalog_repository: Arc<dyn CatalogRepository>) -> Self {
        Self {
            resolver: AccessResolver::new(),
            catalog_repository,
        }
    }

    /// Builds the navigation tree visible to `user`.
    pub async fn visible_navigation(&self, user: Option<&User>) -> AppResult<VisibleNavigation> {
        let catalog = self.catalog_repository.load_catalog().await?;
        Ok(self.filter_catalog(user, &catalog))
    }

    /// Returns whether `user` may open the page routed at `path`.
    ///
    /// Paths missing from the catalog are denied.
    pub async fn can_access_path(&self, user: Option<&User>, path: &str) -> AppResult<bool> {
        let catalog = self.catalog_repository.load_catalog().await?;
        if !catalog.contains_path(path) {
            debug!(path, "path is not part of the navigation catalog");
            return Ok(false);
        }

        let allowed = self.filter_catalog(user, &catalog).contains_path(path);
        debug!(
            path,
            sub_module_id = catalog.sub_module_for_path(path),
            allowed,
            "resolved path access"
        );
        Ok(allowed)
    }

    /// Filters an already loaded catalog for `user`.
    #[must_use]
    pub fn filter_catalog(
        &self,
        user: Option<&User>,
        catalog: &NavigationCatalog,
    ) -> VisibleNavigation {
        if user.is_none() {
            return VisibleNavigation::default();
        }

        let sections = catalog
            .sections()
            .iter()
            .filter(|section| self.resolver.can_access_section(user, section))
            .map(|section| self.visible_section(user, section))
            .collect();

        let show_departments = self
            .resolver
            .has_any_department_access(user, &catalog.department_module_ids());

        let departments = if show_departments {
            catalog
                .departments()
                .iter()
                .filter(|department| self.resolver.can_access_department_entry(user, department))
                .map(|department| self.visible_department(user, department))
                .collect()
        } else {
            Vec::new()
        };

        VisibleNavigation {
            sections,
            show_departments,
            departments,
        }
    }

    fn visible_section(&self, user: Option<&User>, section: &NavigationSection) -> VisibleSection {
        let module_id = section.module_id().as_str();

        VisibleSection {
            module_id: module_id.to_owned(),
            display_name: section.display_name().as_str().to_owned(),
            pages: self.resolver.filter_pages(user, section.pages(), module_id),
            sub_sections: section
                .sub_sections()
                .iter()
                .filter(|sub_section| {
                    self.resolver
                        .can_access_module(user, sub_section.module_id().as_str())
                })
                .map(|sub_section| self.visible_sub_section(user, sub_section))
                .collect(),
        }
    }

    fn visible_sub_section(
        &self,
        user: Option<&User>,
        sub_section: &NavigationSubSection,
    ) -> VisibleSubSection {
        let module_id = sub_section.module_id().as_str();

        VisibleSubSection {
            module_id: module_id.to_owned(),
            display_name: sub_section.display_name().as_str().to_owned(),
            pages: self
                .resolver
                .filter_pages(user, sub_section.pages(), module_id),
        }
    }

    fn visible_department(
        &self,
        user: Option<&User>,
        department: &DepartmentEntry,
    ) -> VisibleDepartment {
        VisibleDepartment {
            department_key: department.department_key().as_str().to_owned(),
            section: self.visible_section(user, department.section()),
        }
    }
}

use std::collections::BTreeSet;

use serde::Serialize;
use tallyhub_core::{AppError, AppResult, NonEmptyString};

/// Leaf navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationPage {
    path: NonEmptyString,
    label: NonEmptyString,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_module_id: Option<String>,
}

impl NavigationPage {
    /// Creates a validated page link.
    ///
    /// Blank sub-module identifiers are treated as unmapped.
    pub fn new(
        path: impl Into<String>,
        label: impl Into<String>,
        sub_module_id: Option<String>,
    ) -> AppResult<Self> {
        let path = NonEmptyString::new(path)?;
        if !path.as_str().starts_with('/') {
            return Err(AppError::Validation(format!(
                "page path '{}' must start with '/'",
                path.as_str()
            )));
        }

        let sub_module_id = sub_module_id.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            path,
            label: NonEmptyString::new(label)?,
            sub_module_id,
        })
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &NonEmptyString {
        &self.path
    }

    /// Returns the link label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the mapped sub-module, if any.
    #[must_use]
    pub fn sub_module_id(&self) -> Option<&str> {
        self.sub_module_id.as_deref()
    }
}

/// Section nested one level inside a top-level section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationSubSection {
    module_id: NonEmptyString,
    display_name: NonEmptyString,
    pages: Vec<NavigationPage>,
}

impl NavigationSubSection {
    /// Creates a validated sub-section.
    pub fn new(
        module_id: impl Into<String>,
        display_name: impl Into<String>,
        pages: Vec<NavigationPage>,
    ) -> AppResult<Self> {
        Ok(Self {
            module_id: NonEmptyString::new(module_id)?,
            display_name: NonEmptyString::new(display_name)?,
            pages,
        })
    }

    /// Returns the gating module identifier.
    #[must_use]
    pub fn module_id(&self) -> &NonEmptyString {
        &self.module_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the ordered pages.
    #[must_use]
    pub fn pages(&self) -> &[NavigationPage] {
        self.pages.as_slice()
    }
}

/// Top-level navigation section gated by one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationSection {
    module_id: NonEmptyString,
    display_name: NonEmptyString,
    pages: Vec<NavigationPage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sub_sections: Vec<NavigationSubSection>,
}

impl NavigationSection {
    /// Creates a validated section.
    pub fn new(
        module_id: impl Into<String>,
        display_name: impl Into<String>,
        pages: Vec<NavigationPage>,
        sub_sections: Vec<NavigationSubSection>,
    ) -> AppResult<Self> {
        Ok(Self {
            module_id: NonEmptyString::new(module_id)?,
            display_name: NonEmptyString::new(display_name)?,
            pages,
            sub_sections,
        })
    }

    /// Returns the gating module identifier.
    #[must_use]
    pub fn module_id(&self) -> &NonEmptyString {
        &self.module_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the ordered pages.
    #[must_use]
    pub fn pages(&self) -> &[NavigationPage] {
        self.pages.as_slice()
    }

    /// Returns nested sub-sections.
    #[must_use]
    pub fn sub_sections(&self) -> &[NavigationSubSection] {
        self.sub_sections.as_slice()
    }
}

/// Department section listed under the "Departments" header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentEntry {
    department_key: NonEmptyString,
    section: NavigationSection,
}

impl DepartmentEntry {
    /// Creates a department entry keyed for legacy department matching.
    pub fn new(department_key: impl Into<String>, section: NavigationSection) -> AppResult<Self> {
        Ok(Self {
            department_key: NonEmptyString::new(department_key)?,
            section,
        })
    }

    /// Returns the legacy department key.
    #[must_use]
    pub fn department_key(&self) -> &NonEmptyString {
        &self.department_key
    }

    /// Returns the department section.
    #[must_use]
    pub fn section(&self) -> &NavigationSection {
        &self.section
    }
}

/// Static navigation tree compiled into or shipped with the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationCatalog {
    sections: Vec<NavigationSection>,
    departments: Vec<DepartmentEntry>,
}

impl NavigationCatalog {
    /// Creates a validated catalog.
    ///
    /// Module identifiers and page paths must be unique across the whole
    /// tree, and department keys must be unique ignoring case.
    pub fn new(
        sections: Vec<NavigationSection>,
        departments: Vec<DepartmentEntry>,
    ) -> AppResult<Self> {
        let mut module_ids = BTreeSet::new();
        let mut paths = BTreeSet::new();
        let mut department_keys = BTreeSet::new();

        let all_sections = sections
            .iter()
            .chain(departments.iter().map(DepartmentEntry::section));
        for section in all_sections {
            register_module(&mut module_ids, section.module_id())?;
            register_paths(&mut paths, section.pages())?;

            for sub_section in section.sub_sections() {
                register_module(&mut module_ids, sub_section.module_id())?;
                register_paths(&mut paths, sub_section.pages())?;
            }
        }

        for department in &departments {
            let key = department.department_key().as_str().to_lowercase();
            if !department_keys.insert(key) {
                return Err(AppError::Validation(format!(
                    "duplicate department key '{}'",
                    department.department_key()
                )));
            }
        }

        Ok(Self {
            sections,
            departments,
        })
    }

    /// Returns top-level sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[NavigationSection] {
        self.sections.as_slice()
    }

    /// Returns department entries in display order.
    #[must_use]
    pub fn departments(&self) -> &[DepartmentEntry] {
        self.departments.as_slice()
    }

    /// Returns the module identifiers of every department entry.
    #[must_use]
    pub fn department_module_ids(&self) -> Vec<&str> {
        self.departments
            .iter()
            .map(|department| department.section().module_id().as_str())
            .collect()
    }

    /// Returns whether any page in the catalog is routed at `path`.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.pages().any(|page| page.path().as_str() == path)
    }

    /// Resolves the sub-module mapped to a route path.
    #[must_use]
    pub fn sub_module_for_path(&self, path: &str) -> Option<&str> {
        self.pages()
            .find(|page| page.path().as_str() == path)
            .and_then(NavigationPage::sub_module_id)
    }

    fn pages(&self) -> impl Iterator<Item = &NavigationPage> {
        self.sections
            .iter()
            .chain(self.departments.iter().map(DepartmentEntry::section))
            .flat_map(|section| {
                section.pages().iter().chain(
                    section
                        .sub_sections()
                        .iter()
                        .flat_map(|sub_section| sub_section.pages().iter()),
                )
            })
    }
}

fn register_module(seen: &mut BTreeSet<String>, module_id: &NonEmptyString) -> AppResult<()> {
    if !seen.insert(module_id.as_str().to_owned()) {
        return Err(AppError::Validation(format!(
            "duplicate module id '{module_id}'"
        )));
    }

    Ok(())
}

fn register_paths(seen: &mut BTreeSet<String>, pages: &[NavigationPage]) -> AppResult<()> {
    for page in pages {
        if !seen.insert(page.path().as_str().to_owned()) {
            return Err(AppError::Validation(format!(
                "duplicate page path '{}'",
                page.path()
            )));
        }
    }

    Ok(())
}

use serde::Deserialize;
use tallyhub_core::{AppError, AppResult};
use tallyhub_domain::{
    DepartmentEntry, NavigationCatalog, NavigationPage, NavigationSection, NavigationSubSection,
};

/// JSON document describing a navigation catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogDocument {
    sections: Vec<SectionDocument>,
    #[serde(default)]
    departments: Vec<DepartmentDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PageDocument {
    path: String,
    label: String,
    #[serde(default)]
    sub_module_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SubSectionDocument {
    module_id: String,
    display_name: String,
    #[serde(default)]
    pages: Vec<PageDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SectionDocument {
    module_id: String,
    display_name: String,
    #[serde(default)]
    pages: Vec<PageDocument>,
    #[serde(default)]
    sub_sections: Vec<SubSectionDocument>,
}

// Spelled out rather than flattening `SectionDocument`: serde cannot reject
// unknown keys through `flatten`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DepartmentDocument {
    department_key: String,
    module_id: String,
    display_name: String,
    #[serde(default)]
    pages: Vec<PageDocument>,
    #[serde(default)]
    sub_sections: Vec<SubSectionDocument>,
}

impl DepartmentDocument {
    fn into_parts(self) -> (String, SectionDocument) {
        (
            self.department_key,
            SectionDocument {
                module_id: self.module_id,
                display_name: self.display_name,
                pages: self.pages,
                sub_sections: self.sub_sections,
            },
        )
    }
}

impl CatalogDocument {
    /// Parses and validates a catalog from JSON text.
    pub fn parse(source: &str, origin: &str) -> AppResult<NavigationCatalog> {
        let document = serde_json::from_str::<Self>(source).map_err(|error| {
            AppError::Validation(format!("invalid navigation catalog '{origin}': {error}"))
        })?;

        NavigationCatalog::try_from(document)
    }
}

impl TryFrom<CatalogDocument> for NavigationCatalog {
    type Error = AppError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        let sections = document
            .sections
            .into_iter()
            .map(section_from_document)
            .collect::<AppResult<Vec<_>>>()?;
        let departments = document
            .departments
            .into_iter()
            .map(|department| {
                let (department_key, section) = department.into_parts();
                DepartmentEntry::new(department_key, section_from_document(section)?)
            })
            .collect::<AppResult<Vec<_>>>()?;

        NavigationCatalog::new(sections, departments)
    }
}

fn section_from_document(section: SectionDocument) -> AppResult<NavigationSection> {
    let sub_sections = section
        .sub_sections
        .into_iter()
        .map(|sub_section| {
            NavigationSubSection::new(
                sub_section.module_id,
                sub_section.display_name,
                pages_from_documents(sub_section.pages)?,
            )
        })
        .collect::<AppResult<Vec<_>>>()?;

    NavigationSection::new(
        section.module_id,
        section.display_name,
        pages_from_documents(section.pages)?,
        sub_sections,
    )
}

fn pages_from_documents(pages: Vec<PageDocument>) -> AppResult<Vec<NavigationPage>> {
    pages
        .into_iter()
        .map(|page| NavigationPage::new(page.path, page.label, page.sub_module_id))
        .collect()
}

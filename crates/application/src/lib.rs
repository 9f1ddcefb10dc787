//! Application services and ports.

#![forbid(unsafe_code)]

mod access_resolver;
mod catalog_ports;
mod navigation_service;

pub use access_resolver::{AccessDecision, AccessResolver, AccessRule};
pub use catalog_ports::CatalogRepository;
pub use navigation_service::{
    NavigationService, VisibleDepartment, VisibleNavigation, VisibleSection, VisibleSubSection,
};

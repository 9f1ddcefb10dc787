//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod navigation;
mod user;

pub use navigation::{
    DepartmentEntry, NavigationCatalog, NavigationPage, NavigationSection, NavigationSubSection,
};
pub use user::{GrantFlag, ModuleSettings, PermissionGrant, Role, SUPER_ADMIN_ROLE, User};

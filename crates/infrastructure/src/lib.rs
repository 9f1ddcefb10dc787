//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod catalog_document;
mod embedded_catalog_repository;
mod json_file_catalog_repository;
mod user_snapshot;

pub use catalog_document::CatalogDocument;
pub use embedded_catalog_repository::EmbeddedCatalogRepository;
pub use json_file_catalog_repository::JsonFileCatalogRepository;
pub use user_snapshot::{load_user_snapshot, parse_user_snapshot};

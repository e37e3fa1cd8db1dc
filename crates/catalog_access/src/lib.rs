//! Catalog level access control for SQL text.
//!
//! Catalog references are found with a textual scan of the query rather than
//! a full parse. The scan can miss catalogs hidden behind constructs it doesn't
//! recognize and can pick up catalog-like tokens from comments or string
//! literals. Extra matches only ever cause denials.
pub mod enforce;
pub mod errors;
pub mod permission;
pub mod references;

pub use enforce::{check_catalog_access, enforce_catalog_access, is_show_catalogs};
pub use errors::{AccessError, Result};
pub use permission::{AllowedCatalogs, CatalogPermissionSource, PermissionContext, StaticPermissionSource};
pub use references::{CatalogSet, extract_catalog_references};

/// Boxed error returned by a permission source.
pub type BoxedLookupError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Messages stay generic so a denial doesn't reveal which catalogs exist
    /// or which one tripped the check.
    #[error("access denied to one or more catalogs referenced by the query")]
    CatalogAccessDenied,

    #[error("SHOW CATALOGS is not permitted for restricted users, use the catalog listing instead")]
    ShowCatalogsForbidden,

    #[error("failed to look up catalog permissions: {0}")]
    PermissionLookup(#[source] BoxedLookupError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AccessError {
    /// Whether this error means the caller isn't authorized, as opposed to a
    /// failure to decide.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AccessError::CatalogAccessDenied | AccessError::ShowCatalogsForbidden
        )
    }
}

pub type Result<T, E = AccessError> = std::result::Result<T, E>;

use std::collections::{HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;

use crate::errors::Result;

/// Catalogs a caller may query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedCatalogs {
    /// No catalog restrictions.
    Unrestricted,
    /// Only these catalogs.
    Restricted(HashSet<String>),
}

impl AllowedCatalogs {
    pub fn restricted<I, S>(catalogs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedCatalogs::Restricted(catalogs.into_iter().map(Into::into).collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AllowedCatalogs::Unrestricted)
    }

    pub fn allows(&self, catalog: &str) -> bool {
        match self {
            AllowedCatalogs::Unrestricted => true,
            AllowedCatalogs::Restricted(set) => set.contains(catalog),
        }
    }
}

/// An absent set means unrestricted.
impl From<Option<HashSet<String>>> for AllowedCatalogs {
    fn from(set: Option<HashSet<String>>) -> Self {
        match set {
            Some(set) => AllowedCatalogs::Restricted(set),
            None => AllowedCatalogs::Unrestricted,
        }
    }
}

/// Who is asking, and what they're allowed to do.
#[derive(Debug, Clone)]
pub struct PermissionContext {
    pub caller_id: String,
    pub allowed: AllowedCatalogs,
    /// Edit capability. Callers that can edit a query may pass arbitrary text
    /// through `raw` parameters.
    pub can_edit: bool,
}

impl PermissionContext {
    pub fn new(caller_id: impl Into<String>, allowed: AllowedCatalogs, can_edit: bool) -> Self {
        PermissionContext {
            caller_id: caller_id.into(),
            allowed,
            can_edit,
        }
    }
}

/// Source of per-caller catalog permissions, typically a role service.
#[async_trait]
pub trait CatalogPermissionSource: Sync + Send + fmt::Debug {
    /// Catalogs the caller may access.
    ///
    /// Errors must be treated as a denial by the caller.
    async fn allowed_catalogs(&self, caller_id: &str) -> Result<AllowedCatalogs>;
}

/// Permissions from a fixed table. Callers missing from the table get no
/// catalogs at all.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionSource {
    callers: HashMap<String, AllowedCatalogs>,
}

impl StaticPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caller(mut self, caller_id: impl Into<String>, allowed: AllowedCatalogs) -> Self {
        self.callers.insert(caller_id.into(), allowed);
        self
    }

    /// Load from a JSON object mapping caller ids to a list of catalogs, or
    /// `null` for unrestricted.
    ///
    /// ```json
    /// {"admin": null, "analyst": ["memory", "tpch"]}
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Option<HashSet<String>>> = serde_json::from_str(json)?;
        Ok(StaticPermissionSource {
            callers: raw.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
    }
}

#[async_trait]
impl CatalogPermissionSource for StaticPermissionSource {
    async fn allowed_catalogs(&self, caller_id: &str) -> Result<AllowedCatalogs> {
        Ok(self
            .callers
            .get(caller_id)
            .cloned()
            .unwrap_or_else(|| AllowedCatalogs::Restricted(HashSet::new())))
    }
}

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::errors::{AccessError, Result};
use crate::permission::{AllowedCatalogs, CatalogPermissionSource, PermissionContext};
use crate::references::{CatalogSet, strip_comments};

static SHOW_CATALOGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bSHOW\s+CATALOGS\b").unwrap());

/// Whether the query enumerates catalogs, also looking through comments
/// between the keywords.
pub fn is_show_catalogs(text: &str) -> bool {
    SHOW_CATALOGS_RE.is_match(text) || SHOW_CATALOGS_RE.is_match(&strip_comments(text))
}

/// Check a resolved query against a caller's permissions.
///
/// The effective catalog is always required alongside any catalogs the query
/// references explicitly. Nothing is rewritten; a query touching any
/// catalog outside the allowed set is rejected whole.
pub fn check_catalog_access(ctx: &PermissionContext, text: &str, effective_catalog: &str) -> Result<()> {
    check_allowed(&ctx.caller_id, &ctx.allowed, text, effective_catalog)
}

/// Look up the caller's allowed catalogs and check the query against them.
///
/// Lookup failures are returned as is and must be treated as a denial.
#[tracing::instrument(level = "debug", skip(source, text))]
pub async fn enforce_catalog_access<S>(
    source: &S,
    caller_id: &str,
    text: &str,
    effective_catalog: &str,
) -> Result<()>
where
    S: CatalogPermissionSource + ?Sized,
{
    let allowed = source.allowed_catalogs(caller_id).await?;
    check_allowed(caller_id, &allowed, text, effective_catalog)
}

fn check_allowed(caller_id: &str, allowed: &AllowedCatalogs, text: &str, effective_catalog: &str) -> Result<()> {
    let allowed = match allowed {
        AllowedCatalogs::Unrestricted => return Ok(()),
        AllowedCatalogs::Restricted(set) => set,
    };

    if is_show_catalogs(text) {
        warn!(%caller_id, "restricted caller attempted to enumerate catalogs");
        return Err(AccessError::ShowCatalogsForbidden);
    }

    let catalogs = CatalogSet::from_query(text, effective_catalog);
    let denied: Vec<_> = catalogs
        .required()
        .into_iter()
        .filter(|catalog| !allowed.contains(*catalog))
        .collect();

    if !denied.is_empty() {
        debug!(%caller_id, ?denied, "catalogs outside allowed set");
        warn!(%caller_id, "catalog access denied");
        return Err(AccessError::CatalogAccessDenied);
    }

    Ok(())
}

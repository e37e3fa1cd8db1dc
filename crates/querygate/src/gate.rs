use std::sync::Arc;

use catalog_access::{CatalogPermissionSource, PermissionContext, check_catalog_access};
use serde::Serialize;
use sqlparams::{apply_defaults, resolve, validate_definitions};
use tracing::{debug, info};

use crate::errors::Result;
use crate::executor::{QueryExecutor, QueryResult};
use crate::request::{Caller, ExecutionRequest, QueryRequest};

/// Result of running a request through the gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateOutcome<T> {
    /// Parameters without a usable value. The caller should prompt for these
    /// and try again.
    NeedsInput { missing: Vec<String> },
    Ready(T),
}

#[derive(Debug, Clone)]
pub struct QueryGate {
    permissions: Arc<dyn CatalogPermissionSource>,
    apply_defaults: bool,
}

impl QueryGate {
    pub fn new(permissions: Arc<dyn CatalogPermissionSource>) -> Self {
        QueryGate {
            permissions,
            apply_defaults: false,
        }
    }

    /// Fill empty parameters from their declared defaults before resolving.
    pub fn with_defaults(mut self, apply_defaults: bool) -> Self {
        self.apply_defaults = apply_defaults;
        self
    }

    /// Resolve and authorize a request.
    ///
    /// Permissions are only looked up once every parameter resolved. Invalid
    /// definitions, denials and lookup failures are errors.
    #[tracing::instrument(level = "debug", skip_all, fields(caller = %caller.id))]
    pub async fn prepare(&self, caller: &Caller, request: &QueryRequest) -> Result<GateOutcome<ExecutionRequest>> {
        validate_definitions(&request.definitions)?;

        let resolved = if self.apply_defaults {
            let values = apply_defaults(&request.values, &request.definitions);
            resolve(&request.query, &values, &request.definitions, caller.can_edit)
        } else {
            resolve(&request.query, &request.values, &request.definitions, caller.can_edit)
        };

        if !resolved.is_complete() {
            debug!(missing = ?resolved.missing, "request needs input");
            return Ok(GateOutcome::NeedsInput {
                missing: resolved.missing,
            });
        }

        let allowed = self.permissions.allowed_catalogs(&caller.id).await?;
        let ctx = PermissionContext::new(caller.id.clone(), allowed, caller.can_edit);
        check_catalog_access(&ctx, &resolved.sql, &request.catalog)?;

        Ok(GateOutcome::Ready(ExecutionRequest {
            sql: resolved.sql,
            catalog: request.catalog.clone(),
            schema: request.schema.clone(),
            priority: request.priority,
            query_id: request.query_id,
        }))
    }

    /// Prepare a request and run it if it's authorized.
    pub async fn execute<E>(
        &self,
        executor: &E,
        caller: &Caller,
        request: &QueryRequest,
    ) -> Result<GateOutcome<QueryResult>>
    where
        E: QueryExecutor + ?Sized,
    {
        match self.prepare(caller, request).await? {
            GateOutcome::NeedsInput { missing } => Ok(GateOutcome::NeedsInput { missing }),
            GateOutcome::Ready(exec) => {
                info!(caller = %caller.id, catalog = %exec.catalog, "executing query");
                let result = executor.execute(exec).await?;
                Ok(GateOutcome::Ready(result))
            }
        }
    }
}

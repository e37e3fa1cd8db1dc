use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;
use crate::request::ExecutionRequest;

/// Tabular result returned by an executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// The engine that actually runs queries.
///
/// Only ever sees fully resolved, authorized SQL.
#[async_trait]
pub trait QueryExecutor: Sync + Send + fmt::Debug {
    async fn execute(&self, request: ExecutionRequest) -> Result<QueryResult>;
}

use serde::{Deserialize, Serialize};
use sqlparams::{ParameterDefinition, ParameterValues};

/// The identity a request runs as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Caller {
    pub id: String,
    /// Edit capability on the query. Relaxes validation of `raw` parameters.
    #[serde(default)]
    pub can_edit: bool,
}

impl Caller {
    pub fn viewer(id: impl Into<String>) -> Self {
        Caller {
            id: id.into(),
            can_edit: false,
        }
    }

    pub fn editor(id: impl Into<String>) -> Self {
        Caller {
            id: id.into(),
            can_edit: true,
        }
    }
}

/// A query template with the values to run it with.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// SQL template text.
    pub query: String,
    #[serde(default)]
    pub values: ParameterValues,
    #[serde(default)]
    pub definitions: Vec<ParameterDefinition>,
    /// Catalog the query runs against.
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub priority: i32,
    /// Saved query this request belongs to, if any.
    #[serde(default)]
    pub query_id: Option<i64>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, catalog: impl Into<String>) -> Self {
        QueryRequest {
            query: query.into(),
            values: ParameterValues::new(),
            definitions: Vec::new(),
            catalog: catalog.into(),
            schema: String::new(),
            priority: 0,
            query_id: None,
        }
    }
}

/// An authorized query, ready for the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    pub sql: String,
    pub catalog: String,
    pub schema: String,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<i64>,
}

//! Request level gate in front of a query executor.
//!
//! A request's template is resolved first. Only a fully resolved query has its
//! catalogs checked against the caller's permissions, and only an authorized
//! query is handed to the executor.
pub mod errors;
pub mod executor;
pub mod gate;
pub mod request;

pub use errors::{GateError, Result};
pub use executor::{QueryExecutor, QueryResult};
pub use gate::{GateOutcome, QueryGate};
pub use request::{Caller, ExecutionRequest, QueryRequest};

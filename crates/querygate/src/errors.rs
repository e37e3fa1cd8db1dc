use catalog_access::AccessError;
use sqlparams::errors::ParamsError;

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GateError {
    /// Whether the request was rejected for authorization reasons.
    pub fn is_denial(&self) -> bool {
        matches!(self, GateError::Access(e) if e.is_denial())
    }
}

impl From<sqlparams::errors::DefinitionError> for GateError {
    fn from(e: sqlparams::errors::DefinitionError) -> Self {
        GateError::Params(e.into())
    }
}

pub type Result<T, E = GateError> = std::result::Result<T, E>;

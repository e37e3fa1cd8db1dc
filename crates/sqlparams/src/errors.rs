/// Failure to turn a single value into a SQL fragment.
///
/// These never escape a resolution pass. The resolver reports the owning
/// parameter as missing instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("value is not a valid number")]
    InvalidNumber,

    #[error("value is not a valid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("value is not a valid identifier")]
    InvalidIdentifier,

    #[error("raw value contains characters outside the allowed token set")]
    UnsafeRawValue,

    #[error("list value has no elements")]
    EmptyList,

    #[error("value of kind '{0}' cannot be formatted as '{1}'")]
    UnsupportedValue(&'static str, &'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("invalid parameter name: '{0}'")]
    InvalidName(String),

    #[error("parameter '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("parameter '{name}' depends on undeclared parameter '{depends_on}'")]
    UnknownDependency { name: String, depends_on: String },

    #[error("parameter '{0}' depends on itself")]
    SelfDependency(String),

    #[error("dependency cycle between parameters: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("parameter '{0}' declares range targets but is not a daterange")]
    TargetsOnNonRange(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

pub type Result<T, E = ParamsError> = std::result::Result<T, E>;

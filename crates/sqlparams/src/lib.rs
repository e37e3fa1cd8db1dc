//! Parameterized SQL templates.
//!
//! Templates reference parameters with `{{name}}` placeholders. Resolution
//! turns caller supplied values into SQL fragments according to each
//! parameter's declared format, failing closed: a value that can't be
//! formatted safely is reported as missing and never interpolated.
pub mod definition;
pub mod errors;
pub mod extract;
pub mod format;
pub mod resolve;
pub mod validate;
pub mod value;

pub use definition::{
    EmptyBehavior, ParameterDefinition, ParameterType, RangePart, RangeTargets, SqlFormat,
    resolve_definition,
};
pub use extract::extract_placeholders;
pub use format::{format_scalar, format_value};
pub use resolve::{ResolvedQuery, resolve};
pub use validate::{apply_defaults, dependency_order, validate_definitions};
pub use value::{ParameterValue, ParameterValues, RangeValue};

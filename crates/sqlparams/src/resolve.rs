use std::collections::HashMap;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::definition::{EmptyBehavior, ParameterDefinition, RangePart, SqlFormat, resolve_definition};
use crate::extract::{extract_placeholders, substitute};
use crate::format::{format_scalar, format_value};
use crate::value::{ParameterValue, ParameterValues};

/// Output of resolving a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedQuery {
    /// SQL with every resolvable placeholder substituted. Placeholders for
    /// missing parameters are left as written.
    pub sql: String,
    /// Logical names of parameters without a usable value, in the order they
    /// were first encountered.
    pub missing: Vec<String>,
}

impl ResolvedQuery {
    /// Whether the query can be executed.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve all placeholders in `text`.
///
/// `trusted` should only be set for callers with edit capability. It relaxes
/// validation of `raw` formatted values.
///
/// Never errors. Values that are absent or fail to format are reported in
/// `missing`, and the caller must not execute a query with missing
/// parameters.
#[tracing::instrument(level = "debug", skip_all, fields(trusted = trusted))]
pub fn resolve(
    text: &str,
    values: &ParameterValues,
    definitions: &[ParameterDefinition],
    trusted: bool,
) -> ResolvedQuery {
    let placeholders = extract_placeholders(text);

    let mut substitutions = HashMap::with_capacity(placeholders.len());
    let mut missing = IndexSet::new();

    for token in placeholders {
        let site = PlaceholderSite::new(&token, definitions);
        match site.substitution(values, trusted) {
            Some(sub) => {
                substitutions.insert(token, sub);
            }
            None => {
                debug!(placeholder = %token, parameter = %site.logical_name, "parameter missing");
                missing.insert(site.logical_name.to_string());
            }
        }
    }

    ResolvedQuery {
        sql: substitute(text, &substitutions),
        missing: missing.into_iter().collect(),
    }
}

/// A single placeholder along with the definition it refers to.
struct PlaceholderSite<'a> {
    token: &'a str,
    definition: Option<&'a ParameterDefinition>,
    part: RangePart,
    /// Definition name if one matched, otherwise the placeholder itself.
    logical_name: &'a str,
}

impl<'a> PlaceholderSite<'a> {
    fn new(token: &'a str, definitions: &'a [ParameterDefinition]) -> Self {
        match resolve_definition(token, definitions) {
            Some((definition, part)) => PlaceholderSite {
                token,
                definition: Some(definition),
                part,
                logical_name: &definition.name,
            },
            None => PlaceholderSite {
                token,
                definition: None,
                part: RangePart::Whole,
                logical_name: token,
            },
        }
    }

    /// Find the value for this site. A value under the logical name wins over
    /// one under the literal placeholder.
    ///
    /// The returned flag is true when the value was found under the logical
    /// name.
    fn lookup<'v>(&self, values: &'v ParameterValues) -> Option<(&'v ParameterValue, bool)> {
        if let Some(value) = values.get(self.logical_name) {
            return Some((value, true));
        }
        if self.token != self.logical_name {
            if let Some(value) = values.get(self.token) {
                return Some((value, false));
            }
        }
        None
    }

    /// Compute the text to substitute, `None` if the parameter is missing.
    fn substitution(&self, values: &ParameterValues, trusted: bool) -> Option<String> {
        let value = match self.lookup(values) {
            Some((value, by_logical)) if !value.is_empty() => (value, by_logical),
            _ => return self.empty_substitution(),
        };

        match self.definition {
            Some(def) if def.is_range() => self.range_substitution(def, value, trusted),
            _ => {
                let format = self
                    .definition
                    .map(|def| def.effective_format())
                    .unwrap_or(SqlFormat::Raw);
                match format_value(value.0, format, trusted) {
                    Ok(sub) => Some(sub),
                    Err(e) => {
                        debug!(parameter = %self.logical_name, format = format.as_str(), %e, "failed to format value");
                        None
                    }
                }
            }
        }
    }

    fn empty_substitution(&self) -> Option<String> {
        let behavior = self
            .definition
            .map(|def| def.empty_behavior)
            .unwrap_or_default();
        match behavior {
            EmptyBehavior::Null => Some("NULL".to_string()),
            EmptyBehavior::MatchNone => Some("1=0".to_string()),
            EmptyBehavior::Missing => None,
        }
    }

    fn range_substitution(
        &self,
        def: &ParameterDefinition,
        (value, by_logical): (&ParameterValue, bool),
        trusted: bool,
    ) -> Option<String> {
        let format = def.effective_format();
        let format_half = |half: Option<String>| {
            let half = half?;
            match format_scalar(&half, format, trusted) {
                Ok(sub) => Some(sub),
                Err(e) => {
                    debug!(parameter = %def.name, format = format.as_str(), %e, "failed to format range bound");
                    None
                }
            }
        };

        // A value keyed by the start/end placeholder itself is just that half.
        if !by_logical && self.part != RangePart::Whole {
            let half = value
                .scalar_text()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            return format_half(half);
        }

        let (start, end) = value.range_bounds();
        match self.part {
            RangePart::Start => format_half(start),
            RangePart::End => format_half(end),
            RangePart::Whole => {
                let start = format_half(start)?;
                let end = format_half(end)?;
                Some(format!("{start} AND {end}"))
            }
        }
    }
}

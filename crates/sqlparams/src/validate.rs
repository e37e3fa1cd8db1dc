//! Checks on declared parameter definitions.
use std::collections::HashSet;

use tracing::debug;

use crate::definition::ParameterDefinition;
use crate::errors::DefinitionError;
use crate::value::ParameterValues;

type Result<T, E = DefinitionError> = std::result::Result<T, E>;

/// Validate a set of definitions before they're stored or used.
///
/// Rejects invalid and duplicate names, range targets on non-range
/// parameters, and `depends_on` entries that are unknown, self referencing or
/// cyclic.
pub fn validate_definitions(definitions: &[ParameterDefinition]) -> Result<()> {
    let mut seen = HashSet::with_capacity(definitions.len());
    for def in definitions {
        if !is_identifier(&def.name) {
            return Err(DefinitionError::InvalidName(def.name.clone()));
        }
        if !seen.insert(def.name.as_str()) {
            return Err(DefinitionError::DuplicateName(def.name.clone()));
        }
        if def.targets.is_some() && !def.is_range() {
            return Err(DefinitionError::TargetsOnNonRange(def.name.clone()));
        }
    }

    for def in definitions {
        for dep in &def.depends_on {
            if dep == &def.name {
                return Err(DefinitionError::SelfDependency(def.name.clone()));
            }
            if !seen.contains(dep.as_str()) {
                return Err(DefinitionError::UnknownDependency {
                    name: def.name.clone(),
                    depends_on: dep.clone(),
                });
            }
        }
    }

    dependency_order(definitions)?;
    Ok(())
}

/// Names ordered so that every parameter comes after the parameters it depends
/// on. Ties keep declaration order.
///
/// Dependencies on undeclared names are ignored here, `validate_definitions`
/// reports those.
pub fn dependency_order(definitions: &[ParameterDefinition]) -> Result<Vec<&str>> {
    let declared: HashSet<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::with_capacity(definitions.len());
    let mut order = Vec::with_capacity(definitions.len());

    while order.len() < definitions.len() {
        let next = definitions.iter().find(|def| {
            !emitted.contains(def.name.as_str())
                && def
                    .depends_on
                    .iter()
                    .all(|dep| emitted.contains(dep.as_str()) || !declared.contains(dep.as_str()))
        });

        match next {
            Some(def) => {
                emitted.insert(def.name.as_str());
                order.push(def.name.as_str());
            }
            None => {
                let remaining = definitions
                    .iter()
                    .filter(|def| !emitted.contains(def.name.as_str()))
                    .map(|def| def.name.clone())
                    .collect();
                return Err(DefinitionError::DependencyCycle(remaining));
            }
        }
    }

    Ok(order)
}

/// Fill in declared default values for parameters the caller left empty.
///
/// A parameter counts as provided if any of its placeholder names (the
/// logical name, or a range's start/end site) holds a non-empty value.
pub fn apply_defaults(values: &ParameterValues, definitions: &[ParameterDefinition]) -> ParameterValues {
    let mut out = values.clone();
    for def in definitions {
        let default = match &def.default_value {
            Some(default) if !default.is_empty() => default,
            _ => continue,
        };

        let provided = def
            .site_names()
            .iter()
            .any(|name| values.get(name).is_some_and(|v| !v.is_empty()));
        if !provided {
            debug!(parameter = %def.name, "using default value");
            out.insert(def.name.clone(), default.clone());
        }
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

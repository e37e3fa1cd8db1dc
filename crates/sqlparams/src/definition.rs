use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::errors::Result;
use crate::value::ParameterValue;

/// What kind of input a parameter collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Text,
    Number,
    Date,
    DateRange,
    Select,
    MultiSelect,
}

/// How a value is rendered into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlFormat {
    Raw,
    String,
    Number,
    Date,
    Identifier,
    StringList,
    NumberList,
}

impl SqlFormat {
    pub fn from_name(name: &str) -> Option<SqlFormat> {
        Some(match name {
            "raw" => SqlFormat::Raw,
            "string" => SqlFormat::String,
            "number" => SqlFormat::Number,
            "date" => SqlFormat::Date,
            "identifier" => SqlFormat::Identifier,
            "string_list" => SqlFormat::StringList,
            "number_list" => SqlFormat::NumberList,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SqlFormat::Raw => "raw",
            SqlFormat::String => "string",
            SqlFormat::Number => "number",
            SqlFormat::Date => "date",
            SqlFormat::Identifier => "identifier",
            SqlFormat::StringList => "string_list",
            SqlFormat::NumberList => "number_list",
        }
    }
}

/// Unknown formats decode as `raw`, which stays trust-gated.
impl<'de> Deserialize<'de> for SqlFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(SqlFormat::from_name(&name).unwrap_or_else(|| {
            warn!(%name, "unknown sql format, using raw");
            SqlFormat::Raw
        }))
    }
}

/// What to substitute when a parameter has no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBehavior {
    /// Report the parameter as missing.
    #[default]
    Missing,
    /// Substitute `NULL`.
    Null,
    /// Substitute `1=0`, a predicate matching no rows.
    MatchNone,
}

impl EmptyBehavior {
    pub fn from_name(name: &str) -> Option<EmptyBehavior> {
        Some(match name {
            "missing" => EmptyBehavior::Missing,
            "null" => EmptyBehavior::Null,
            "match_none" => EmptyBehavior::MatchNone,
            _ => return None,
        })
    }
}

/// Unknown behaviors decode as `missing`.
impl<'de> Deserialize<'de> for EmptyBehavior {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(EmptyBehavior::from_name(&name).unwrap_or_else(|| {
            warn!(%name, "unknown empty behavior, using missing");
            EmptyBehavior::Missing
        }))
    }
}

/// Explicit placeholder names for the two ends of a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A declared template parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_format: Option<SqlFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
    #[serde(default)]
    pub empty_behavior: EmptyBehavior,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_query_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<RangeTargets>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        ParameterDefinition {
            name: name.into(),
            param_type,
            label: String::new(),
            required: false,
            sql_format: None,
            default_value: None,
            empty_behavior: EmptyBehavior::Missing,
            depends_on: Vec::new(),
            options_query_id: None,
            targets: None,
        }
    }

    pub fn with_format(mut self, format: SqlFormat) -> Self {
        self.sql_format = Some(format);
        self
    }

    pub fn with_empty_behavior(mut self, behavior: EmptyBehavior) -> Self {
        self.empty_behavior = behavior;
        self
    }

    pub fn with_default(mut self, value: ParameterValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_targets(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.targets = Some(RangeTargets {
            start: Some(start.into()),
            end: Some(end.into()),
        });
        self
    }

    pub fn with_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_range(&self) -> bool {
        self.param_type == ParameterType::DateRange
    }

    /// The declared format, or the format implied by the parameter type.
    pub fn effective_format(&self) -> SqlFormat {
        self.sql_format.unwrap_or(match self.param_type {
            ParameterType::Text | ParameterType::Select => SqlFormat::String,
            ParameterType::Number => SqlFormat::Number,
            ParameterType::Date | ParameterType::DateRange => SqlFormat::Date,
            ParameterType::MultiSelect => SqlFormat::StringList,
        })
    }

    /// Placeholder name for one end of a range. Explicit targets win over the
    /// `{name}_start` / `{name}_end` convention.
    pub fn range_site(&self, part: RangePart) -> Option<String> {
        let explicit = self.targets.as_ref().and_then(|t| match part {
            RangePart::Start => t.start.clone(),
            RangePart::End => t.end.clone(),
            RangePart::Whole => None,
        });
        match part {
            RangePart::Whole => None,
            _ => Some(explicit.unwrap_or_else(|| format!("{}_{}", self.name, part.as_str()))),
        }
    }

    /// Every placeholder name that resolves to this definition.
    pub fn site_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        if self.is_range() {
            names.extend(self.range_site(RangePart::Start));
            names.extend(self.range_site(RangePart::End));
        }
        names
    }
}

/// Which part of a date range a placeholder refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePart {
    /// The placeholder is the parameter itself.
    Whole,
    Start,
    End,
}

impl RangePart {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePart::Whole => "",
            RangePart::Start => "start",
            RangePart::End => "end",
        }
    }
}

/// Find the definition a placeholder refers to.
///
/// Exact name matches win. Otherwise daterange definitions are checked for
/// explicit start/end targets, then for the `{name}_start` / `{name}_end`
/// convention. `None` means the placeholder is an untyped legacy parameter.
pub fn resolve_definition<'a>(
    token: &str,
    definitions: &'a [ParameterDefinition],
) -> Option<(&'a ParameterDefinition, RangePart)> {
    if let Some(def) = definitions.iter().find(|d| d.name == token) {
        return Some((def, RangePart::Whole));
    }

    let ranges = || definitions.iter().filter(|d| d.is_range());

    for def in ranges() {
        if let Some(targets) = &def.targets {
            if targets.start.as_deref() == Some(token) {
                return Some((def, RangePart::Start));
            }
            if targets.end.as_deref() == Some(token) {
                return Some((def, RangePart::End));
            }
        }
    }

    for def in ranges() {
        if let Some(base) = token.strip_suffix("_start") {
            if base == def.name {
                return Some((def, RangePart::Start));
            }
        }
        if let Some(base) = token.strip_suffix("_end") {
            if base == def.name {
                return Some((def, RangePart::End));
            }
        }
    }

    None
}

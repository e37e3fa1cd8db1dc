//! Rendering of parameter values into SQL fragments.
//!
//! Everything here fails closed. A value that doesn't pass validation for its
//! format produces an error and the caller must not interpolate anything.
use std::sync::LazyLock;

use regex::Regex;

use crate::definition::SqlFormat;
use crate::errors::FormatError;
use crate::value::ParameterValue;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());
/// Characters an untrusted caller may pass through a raw parameter.
static RAW_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.,:@/-]+$").unwrap());

type Result<T, E = FormatError> = std::result::Result<T, E>;

/// Format a value according to `format`.
///
/// `trusted` only relaxes validation for `raw`. Lists are accepted for the
/// list formats; every other format needs a scalar.
pub fn format_value(value: &ParameterValue, format: SqlFormat, trusted: bool) -> Result<String> {
    if let Some(items) = value.list_texts() {
        return match format {
            SqlFormat::StringList => format_string_list(items.iter().map(|s| s.as_ref())),
            SqlFormat::NumberList => format_number_list(items.iter().map(|s| s.as_ref())),
            other => Err(FormatError::UnsupportedValue(value.kind(), other.as_str())),
        };
    }

    match value.scalar_text() {
        Some(text) => format_scalar(&text, format, trusted),
        None => Err(FormatError::UnsupportedValue(value.kind(), format.as_str())),
    }
}

/// Format a single piece of text according to `format`.
///
/// List formats split the text on commas.
pub fn format_scalar(text: &str, format: SqlFormat, trusted: bool) -> Result<String> {
    match format {
        SqlFormat::String => Ok(quote_string(text)),
        SqlFormat::Number => validate_number(text).map(str::to_string),
        SqlFormat::Date => {
            let text = text.trim();
            if !DATE_RE.is_match(text) {
                return Err(FormatError::InvalidDate);
            }
            Ok(format!("DATE '{text}'"))
        }
        SqlFormat::Identifier => {
            let text = text.trim();
            if !IDENTIFIER_RE.is_match(text) {
                return Err(FormatError::InvalidIdentifier);
            }
            Ok(format!("\"{text}\""))
        }
        SqlFormat::StringList => format_string_list(split_list(text)),
        SqlFormat::NumberList => format_number_list(split_list(text)),
        SqlFormat::Raw => {
            if !trusted && !RAW_TOKEN_RE.is_match(text) {
                return Err(FormatError::UnsafeRawValue);
            }
            Ok(escape_quotes(text))
        }
    }
}

fn validate_number(text: &str) -> Result<&str> {
    let text = text.trim();
    if !NUMBER_RE.is_match(text) {
        return Err(FormatError::InvalidNumber);
    }
    Ok(text)
}

fn format_string_list<'a>(items: impl Iterator<Item = &'a str>) -> Result<String> {
    let quoted: Vec<_> = items.map(quote_string).collect();
    if quoted.is_empty() {
        return Err(FormatError::EmptyList);
    }
    Ok(quoted.join(","))
}

fn format_number_list<'a>(items: impl Iterator<Item = &'a str>) -> Result<String> {
    let numbers = items.map(validate_number).collect::<Result<Vec<_>>>()?;
    if numbers.is_empty() {
        return Err(FormatError::EmptyList);
    }
    Ok(numbers.join(","))
}

/// Comma separated elements, trimmed, blanks dropped.
fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn escape_quotes(text: &str) -> String {
    text.replace('\'', "''")
}

fn quote_string(text: &str) -> String {
    format!("'{}'", escape_quotes(text))
}

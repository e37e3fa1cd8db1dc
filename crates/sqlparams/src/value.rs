use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Values keyed by logical parameter name or literal placeholder text.
pub type ParameterValues = HashMap<String, ParameterValue>;

/// A caller supplied parameter value, decoded once from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    /// Kept as decoded so 64-bit integers render exactly.
    Number(Number),
    String(String),
    List(Vec<ParameterValue>),
    Range(RangeValue),
}

/// Object form of a date range value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeValue {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl ParameterValue {
    pub fn string(s: impl Into<String>) -> Self {
        ParameterValue::String(s.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Null => "null",
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Number(_) => "number",
            ParameterValue::String(_) => "string",
            ParameterValue::List(_) => "list",
            ParameterValue::Range(_) => "range",
        }
    }

    /// Null, empty strings, empty lists and ranges with neither end set all
    /// count as "no value".
    pub fn is_empty(&self) -> bool {
        match self {
            ParameterValue::Null => true,
            ParameterValue::String(s) => s.is_empty(),
            ParameterValue::List(items) => items.is_empty(),
            ParameterValue::Range(range) => {
                non_empty(range.start.as_deref()).is_none() && non_empty(range.end.as_deref()).is_none()
            }
            ParameterValue::Bool(_) | ParameterValue::Number(_) => false,
        }
    }

    /// Text form of a scalar value. Returns `None` for null, lists and ranges.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ParameterValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            ParameterValue::Number(n) => Some(Cow::Owned(format_number(n))),
            ParameterValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            ParameterValue::Null | ParameterValue::List(_) | ParameterValue::Range(_) => None,
        }
    }

    /// Elements of a native list in text form. `None` if this isn't a list or
    /// any element isn't a scalar.
    pub fn list_texts(&self) -> Option<Vec<Cow<'_, str>>> {
        match self {
            ParameterValue::List(items) => items.iter().map(|item| item.scalar_text()).collect(),
            _ => None,
        }
    }

    /// Split a date range value into its start and end.
    ///
    /// Accepts `"start,end"` strings, `{"start": .., "end": ..}` objects and two
    /// element lists. Blank ends come back as `None`.
    pub fn range_bounds(&self) -> (Option<String>, Option<String>) {
        match self {
            ParameterValue::String(s) => match s.split_once(',') {
                Some((start, end)) => (owned(non_empty(Some(start))), owned(non_empty(Some(end)))),
                None => (owned(non_empty(Some(s))), None),
            },
            ParameterValue::Range(range) => (
                owned(non_empty(range.start.as_deref())),
                owned(non_empty(range.end.as_deref())),
            ),
            ParameterValue::List(items) if items.len() == 2 => {
                let text = |v: &ParameterValue| {
                    v.scalar_text()
                        .and_then(|t| non_empty(Some(t.as_ref())).map(str::to_string))
                };
                (text(&items[0]), text(&items[1]))
            }
            _ => (None, None),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::String(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::String(s)
    }
}

/// NaN and infinities have no JSON form and become `Null`.
impl From<f64> for ParameterValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(ParameterValue::Null, ParameterValue::Number)
    }
}

impl From<i64> for ParameterValue {
    fn from(n: i64) -> Self {
        ParameterValue::Number(n.into())
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

impl<T: Into<ParameterValue>> From<Vec<T>> for ParameterValue {
    fn from(items: Vec<T>) -> Self {
        ParameterValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Render a number the way it was most likely typed.
///
/// Integers render exactly. Integral floats drop the fractional part (`42.0`
/// -> `42`), everything else uses the shortest representation that round
/// trips. Never uses exponent notation.
pub fn format_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    } else {
        n.to_string()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tagged_variants() {
        let values = serde_json::from_str::<ParameterValues>(
            r#"{
                "s": "hello",
                "n": 42,
                "f": 42.5,
                "b": true,
                "l": ["a", 1],
                "r": {"start": "2024-01-01", "end": "2024-01-31"},
                "z": null
            }"#,
        )
        .unwrap();

        assert_eq!(ParameterValue::string("hello"), values["s"]);
        assert_eq!(ParameterValue::from(42), values["n"]);
        assert_eq!(ParameterValue::from(42.5), values["f"]);
        assert_eq!(ParameterValue::Bool(true), values["b"]);
        assert_eq!(
            ParameterValue::List(vec![ParameterValue::string("a"), ParameterValue::from(1)]),
            values["l"]
        );
        assert_eq!(
            ParameterValue::Range(RangeValue {
                start: Some("2024-01-01".to_string()),
                end: Some("2024-01-31".to_string()),
            }),
            values["r"]
        );
        assert_eq!(ParameterValue::Null, values["z"]);
    }

    #[test]
    fn decode_rejects_unknown_objects() {
        serde_json::from_str::<ParameterValues>(r#"{"x": {"from": "2024-01-01"}}"#).unwrap_err();
    }

    #[test]
    fn number_normalization() {
        let float = |f: f64| Number::from_f64(f).unwrap();
        assert_eq!("42", format_number(&float(42.0)));
        assert_eq!("42.5", format_number(&float(42.5)));
        assert_eq!("-3", format_number(&float(-3.0)));
        assert_eq!("0.1", format_number(&float(0.1)));
        assert_eq!("100000000000000000000", format_number(&float(1e20)));
    }

    #[test]
    fn large_integers_render_exactly() {
        let values = serde_json::from_str::<ParameterValues>(r#"{"id": 9007199254740993, "neg": -9007199254740993, "max": 18446744073709551615}"#).unwrap();
        assert_eq!(Some("9007199254740993"), values["id"].scalar_text().as_deref());
        assert_eq!(Some("-9007199254740993"), values["neg"].scalar_text().as_deref());
        assert_eq!(Some("18446744073709551615"), values["max"].scalar_text().as_deref());
    }

    #[test]
    fn emptiness() {
        assert!(ParameterValue::Null.is_empty());
        assert!(ParameterValue::string("").is_empty());
        assert!(ParameterValue::List(Vec::new()).is_empty());
        assert!(ParameterValue::Range(RangeValue::default()).is_empty());
        assert!(!ParameterValue::string(" ").is_empty());
        assert!(!ParameterValue::from(0).is_empty());
        assert!(ParameterValue::from(f64::NAN).is_empty());
        assert!(!ParameterValue::Bool(false).is_empty());
    }

    #[test]
    fn range_bounds() {
        struct Test {
            value: ParameterValue,
            expected: (Option<&'static str>, Option<&'static str>),
        }

        let tests = vec![
            Test {
                value: "2024-01-01,2024-01-31".into(),
                expected: (Some("2024-01-01"), Some("2024-01-31")),
            },
            Test {
                value: " 2024-01-01 , 2024-01-31 ".into(),
                expected: (Some("2024-01-01"), Some("2024-01-31")),
            },
            Test {
                value: "2024-01-01,".into(),
                expected: (Some("2024-01-01"), None),
            },
            Test {
                value: ",2024-01-31".into(),
                expected: (None, Some("2024-01-31")),
            },
            Test {
                value: "2024-01-01".into(),
                expected: (Some("2024-01-01"), None),
            },
            Test {
                value: ParameterValue::Range(RangeValue {
                    start: None,
                    end: Some("2024-01-31".to_string()),
                }),
                expected: (None, Some("2024-01-31")),
            },
            Test {
                value: vec!["2024-01-01", "2024-01-31"].into(),
                expected: (Some("2024-01-01"), Some("2024-01-31")),
            },
            Test {
                value: ParameterValue::from(3),
                expected: (None, None),
            },
        ];

        for test in tests {
            let (start, end) = test.value.range_bounds();
            assert_eq!(
                test.expected,
                (start.as_deref(), end.as_deref()),
                "value: {:?}",
                test.value
            );
        }
    }
}

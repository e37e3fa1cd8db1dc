use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::{Captures, Regex};

/// Matches `{{name}}` where name is an identifier. No whitespace is allowed
/// inside the braces.
const PLACEHOLDER_PATTERN: &str = r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).unwrap());

/// Placeholder names in the order they first appear, without duplicates.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Replace every placeholder that has an entry in `substitutions`, leaving the
/// others as they are.
///
/// Single pass. Substituted text is never scanned for placeholders again.
pub(crate) fn substitute(text: &str, substitutions: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| match substitutions.get(&caps[1]) {
            Some(sub) => sub.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract() {
        struct Test {
            input: &'static str,
            expected: Vec<&'static str>,
        }

        let tests = vec![
            Test {
                input: "",
                expected: Vec::new(),
            },
            Test {
                input: "select 1",
                expected: Vec::new(),
            },
            Test {
                input: "select * from t where a = {{a}}",
                expected: vec!["a"],
            },
            Test {
                input: "where b = {{b}} and a = {{a}} or b = {{b}}",
                expected: vec!["b", "a"],
            },
            Test {
                input: "where d between {{range_start}} and {{range_end}}",
                expected: vec!["range_start", "range_end"],
            },
            Test {
                input: "{{_private}} {{x1}}",
                expected: vec!["_private", "x1"],
            },
            // Not identifiers.
            Test {
                input: "{{ a }} {{a-b}} {{1abc}} {{}} {{a.b}}",
                expected: Vec::new(),
            },
            Test {
                input: "{{{a}}}",
                expected: vec!["a"],
            },
        ];

        for test in tests {
            let got = extract_placeholders(test.input);
            assert_eq!(test.expected, got, "input: {}", test.input);
        }
    }

    #[test]
    fn substitute_known_only() {
        let subs: HashMap<String, String> = [("a".to_string(), "'x'".to_string())].into();
        let out = substitute("a = {{a}} and b = {{b}} and {{a}}", &subs);
        assert_eq!("a = 'x' and b = {{b}} and 'x'", out);
    }

    #[test]
    fn substitute_is_single_pass() {
        let subs: HashMap<String, String> = [
            ("a".to_string(), "'{{b}}'".to_string()),
            ("b".to_string(), "'boom'".to_string()),
        ]
        .into();
        let out = substitute("{{a}}", &subs);
        assert_eq!("'{{b}}'", out);
    }
}

use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

/// Double quoted identifier with `""` escapes.
const QUOTED: &str = r#""(?:[^"]|"")+""#;
const BARE: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// Patterns whose first capture group is a catalog name.
///
/// A quoted identifier needs no whitespace after a keyword (`FROM"hive"`), a
/// bare one does.
static CATALOG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let segment = format!("(?:{QUOTED}|{BARE})");
    let keyword_segment = format!(r"(?:{QUOTED}|\b{BARE})");
    [
        // catalog.schema.table, not preceded by something that would make it
        // part of a longer reference.
        format!(r#"(?:^|[^A-Za-z0-9_."])({BARE})\.{segment}\.{segment}"#),
        format!(r#"(?:^|[^."])({QUOTED})\.{segment}\.{segment}"#),
        format!(r"(?i)\bSHOW\s+SCHEMAS\s+(?:FROM|IN)\s*({keyword_segment})"),
        format!(r"(?i)\bSHOW\s+TABLES\s+(?:FROM|IN)\s*({keyword_segment})\."),
        format!(r"(?i)\bUSE\s*({keyword_segment})\."),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|--[^\r\n]*").unwrap());

/// Replace `/* */` and `--` comments with a single space.
///
/// Comment markers inside string literals are not recognized, so callers
/// should check both the original and the stripped text.
pub(crate) fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(text, " ")
}

/// Catalogs a query touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSet {
    /// Catalogs referenced in the query text, in order of first appearance.
    pub referenced: Vec<String>,
    /// Catalog the query runs against when nothing else is specified.
    pub effective: Option<String>,
}

impl CatalogSet {
    pub fn from_query(text: &str, effective_catalog: &str) -> Self {
        CatalogSet {
            referenced: extract_catalog_references(text),
            effective: Some(effective_catalog)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    /// Every catalog the caller needs access to.
    pub fn required(&self) -> IndexSet<&str> {
        self.referenced
            .iter()
            .map(String::as_str)
            .chain(self.effective.as_deref())
            .collect()
    }
}

/// Catalog names referenced in `text`, deduplicated, in order of first
/// appearance. Quoted names are returned unquoted.
///
/// References only visible once comments are removed (`USE/**/hive.s`) come
/// after those found in the original text.
pub fn extract_catalog_references(text: &str) -> Vec<String> {
    let mut names = IndexSet::new();
    names.extend(references_in(text));
    if let Cow::Owned(stripped) = strip_comments(text) {
        names.extend(references_in(&stripped));
    }
    names.into_iter().collect()
}

fn references_in(text: &str) -> Vec<String> {
    let mut matches: Vec<(usize, String)> = Vec::new();
    for pattern in CATALOG_PATTERNS.iter() {
        for name in pattern.captures_iter(text).filter_map(|caps| caps.get(1)) {
            matches.push((name.start(), unquote(name.as_str())));
        }
    }
    matches.sort_by_key(|(pos, _)| *pos);
    matches.into_iter().map(|(_, name)| name).collect()
}

fn unquote(ident: &str) -> String {
    match ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => ident.to_string(),
    }
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
                input: "SELECT 1",
                expected: Vec::new(),
            },
            Test {
                input: "SELECT * FROM t",
                expected: Vec::new(),
            },
            Test {
                input: "SELECT * FROM default.t",
                expected: Vec::new(),
            },
            Test {
                input: "SELECT * FROM hive.default.t",
                expected: vec!["hive"],
            },
            Test {
                input: r#"SELECT * FROM "hive"."default"."t""#,
                expected: vec!["hive"],
            },
            Test {
                input: r#"SELECT * FROM "my ""odd"" catalog".s.t"#,
                expected: vec![r#"my "odd" catalog"#],
            },
            Test {
                input: "SELECT * FROM hive.a.t JOIN memory.b.u ON 1=1 JOIN hive.c.v ON 1=1",
                expected: vec!["hive", "memory"],
            },
            Test {
                input: "select * from hive.a.t,memory.b.u",
                expected: vec!["hive", "memory"],
            },
            Test {
                input: "SHOW SCHEMAS FROM tpch",
                expected: vec!["tpch"],
            },
            Test {
                input: "show schemas in \"tpch\"",
                expected: vec!["tpch"],
            },
            Test {
                input: "SHOW TABLES FROM tpch.sf1",
                expected: vec!["tpch"],
            },
            Test {
                input: "SHOW TABLES IN sf1",
                expected: Vec::new(),
            },
            Test {
                input: "USE hive.default",
                expected: vec!["hive"],
            },
            Test {
                input: "USE default",
                expected: Vec::new(),
            },
            // Order is by position in the text, not by pattern.
            Test {
                input: "USE system.runtime; SELECT * FROM hive.a.t",
                expected: vec!["system", "hive"],
            },
            // Keyword directly followed by a quoted identifier.
            Test {
                input: r#"SELECT * FROM"hive"."default"."t""#,
                expected: vec!["hive"],
            },
            Test {
                input: r#"SELECT * FROM memory.a.t JOIN"hive".a.t ON 1=1"#,
                expected: vec!["memory", "hive"],
            },
            Test {
                input: r#"USE"hive".default"#,
                expected: vec!["hive"],
            },
            Test {
                input: r#"SHOW SCHEMAS FROM"hive""#,
                expected: vec!["hive"],
            },
            Test {
                input: r#"SHOW TABLES IN"hive".sf1"#,
                expected: vec!["hive"],
            },
            // Punctuation and whitespace before the catalog.
            Test {
                input: r#"SELECT * FROM ("hive".a.t)"#,
                expected: vec!["hive"],
            },
            Test {
                input: "SELECT * FROM(hive.a.t)",
                expected: vec!["hive"],
            },
            Test {
                input: r#"SELECT * FROM memory.a.t,"hive".b.u"#,
                expected: vec!["memory", "hive"],
            },
            Test {
                input: "SELECT *\nFROM\nhive.a.t",
                expected: vec!["hive"],
            },
            Test {
                input: "SELECT * FROM\thive.a.t",
                expected: vec!["hive"],
            },
            // Not catalog references.
            Test {
                input: r#"SELECT * FROM"default"."t""#,
                expected: Vec::new(),
            },
            Test {
                input: r#"USE"default""#,
                expected: Vec::new(),
            },
            Test {
                input: r#"SHOW TABLES FROM"sf1""#,
                expected: Vec::new(),
            },
            Test {
                input: "SHOW SCHEMAS INFORMATION",
                expected: Vec::new(),
            },
            // Comments between tokens.
            Test {
                input: "USE/* x */hive.default",
                expected: vec!["hive"],
            },
            Test {
                input: "USE--x\nhive.default",
                expected: vec!["hive"],
            },
            Test {
                input: "SELECT '--' AS x, hive.a.t",
                expected: vec!["hive"],
            },
            // Heuristic: string literals still match.
            Test {
                input: "SELECT 'x.y.z'",
                expected: vec!["x"],
            },
        ];

        for test in tests {
            let got = extract_catalog_references(test.input);
            assert_eq!(test.expected, got, "input: {}", test.input);
        }
    }

    #[test]
    fn required_set() {
        let set = CatalogSet::from_query("SELECT * FROM hive.default.t JOIN memory.s.u ON 1=1", "memory");
        assert_eq!(vec!["hive", "memory"], set.required().into_iter().collect::<Vec<_>>());

        let set = CatalogSet::from_query("SELECT 1", "");
        assert!(set.required().is_empty());
        assert_eq!(None, set.effective);
    }
}

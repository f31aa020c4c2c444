//! Backend-neutral predicate tree.
//!
//! The query compiler builds a small tree of leaf comparisons plus `And`,
//! `Or`, and `Not` nodes instead of backend-specific query objects. A storage
//! adapter translates the tree into its native query language; the bundled
//! [`MemoryStore`](crate::store::MemoryStore) evaluates it directly against
//! `serde_json::Value` documents, which also makes the compiler testable
//! against an in-memory record set.

use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

/// Ordering comparison carried by a [`Predicate::Compare`] leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// One node of the compiled filter tree.
///
/// Leaf values are kept as the raw request strings; type coercion is the
/// backend's concern (the in-memory evaluator coerces against the document
/// field's type, mirroring a document store's native comparison).
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `field <op> value`.
    Compare {
        field: String,
        op: CompareOp,
        value: String,
    },
    /// Field matches a case-insensitive regular expression. Produced by the
    /// `contains`/`startsWith`/`endsWith`/`similar` operators (escaped) and
    /// the `regex` operator (caller-supplied pattern).
    Matches { field: String, pattern: Regex },
    /// Field equals one member of the value set.
    In { field: String, values: Vec<String> },
    /// Field within `[min, max]`, both ends inclusive.
    Between {
        field: String,
        min: String,
        max: String,
    },
    /// Field is present on the document.
    Exists { field: String },
    /// Logical negation.
    Not(Box<Predicate>),
    /// Conjunction; empty is vacuously true (the compiler never emits it).
    And(Vec<Predicate>),
    /// Disjunction; empty is vacuously false (the compiler never emits it).
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate this predicate against a document.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::Compare { field, op, value } => {
                let Some(actual) = resolve_path(doc, field) else {
                    return false;
                };
                match op {
                    CompareOp::Eq => value_eq(actual, value),
                    CompareOp::Gt => {
                        matches!(compare_raw(actual, value), Some(Ordering::Greater))
                    }
                    CompareOp::Gte => matches!(
                        compare_raw(actual, value),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    CompareOp::Lt => matches!(compare_raw(actual, value), Some(Ordering::Less)),
                    CompareOp::Lte => matches!(
                        compare_raw(actual, value),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                }
            }
            Self::Matches { field, pattern } => {
                resolve_path(doc, field).is_some_and(|actual| match actual {
                    Value::String(s) => pattern.is_match(s),
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|s| pattern.is_match(s)),
                    _ => false,
                })
            }
            Self::In { field, values } => resolve_path(doc, field)
                .is_some_and(|actual| values.iter().any(|value| value_eq(actual, value))),
            Self::Between { field, min, max } => {
                resolve_path(doc, field).is_some_and(|actual| {
                    let ge_min = matches!(
                        compare_raw(actual, min),
                        Some(Ordering::Greater | Ordering::Equal)
                    );
                    let le_max = matches!(
                        compare_raw(actual, max),
                        Some(Ordering::Less | Ordering::Equal)
                    );
                    ge_min && le_max
                })
            }
            Self::Exists { field } => resolve_path(doc, field).is_some(),
            Self::Not(inner) => !inner.matches(doc),
            Self::And(preds) => preds.iter().all(|p| p.matches(doc)),
            Self::Or(preds) => preds.iter().any(|p| p.matches(doc)),
        }
    }
}

/// Resolve a dot-separated field path on a document.
///
/// Returns `None` if any segment is missing; a field explicitly set to `null`
/// still resolves (it is present, so `exists` matches it).
#[must_use]
pub fn resolve_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

/// Compare a document value against a raw request string, coercing the string
/// to the document value's type.
///
/// - Numbers: the raw string is parsed as f64
/// - Strings: lexicographic comparison
/// - Booleans: `"true"`/`"false"`, false < true
/// - Anything else (null, arrays, objects): incomparable, returns `None`
#[must_use]
pub fn compare_raw(actual: &Value, raw: &str) -> Option<Ordering> {
    match actual {
        Value::Number(n) => {
            let lhs = n.as_f64()?;
            let rhs: f64 = raw.trim().parse().ok()?;
            lhs.partial_cmp(&rhs)
        }
        Value::String(s) => Some(s.as_str().cmp(raw)),
        Value::Bool(b) => {
            let rhs: bool = raw.parse().ok()?;
            Some(b.cmp(&rhs))
        }
        _ => None,
    }
}

/// Equality between a document value and a raw request string.
///
/// An array field equals the value when any element does, matching the
/// membership semantics of document stores.
#[must_use]
pub fn value_eq(actual: &Value, raw: &str) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| value_eq(item, raw)),
        _ => compare_raw(actual, raw) == Some(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;
    use serde_json::json;

    fn sample_doc() -> Value {
        json!({
            "name": "Alice",
            "age": 30,
            "active": true,
            "score": 95.5,
            "address": {
                "city": "Portland",
                "zip": "97201"
            },
            "tags": ["admin", "user"],
            "metadata": null
        })
    }

    fn compare(field: &str, op: CompareOp, value: &str) -> Predicate {
        Predicate::Compare {
            field: field.to_string(),
            op,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_eq_string_and_number() {
        let doc = sample_doc();
        assert!(compare("name", CompareOp::Eq, "Alice").matches(&doc));
        assert!(!compare("name", CompareOp::Eq, "Bob").matches(&doc));
        assert!(compare("age", CompareOp::Eq, "30").matches(&doc));
        assert!(compare("score", CompareOp::Eq, "95.5").matches(&doc));
        assert!(compare("active", CompareOp::Eq, "true").matches(&doc));
    }

    #[test]
    fn test_eq_on_array_field_is_membership() {
        let doc = sample_doc();
        assert!(compare("tags", CompareOp::Eq, "admin").matches(&doc));
        assert!(!compare("tags", CompareOp::Eq, "guest").matches(&doc));
    }

    #[test]
    fn test_numeric_ordering() {
        let doc = sample_doc();
        assert!(compare("age", CompareOp::Gt, "29").matches(&doc));
        assert!(!compare("age", CompareOp::Gt, "30").matches(&doc));
        assert!(compare("age", CompareOp::Gte, "30").matches(&doc));
        assert!(compare("age", CompareOp::Lt, "31").matches(&doc));
        assert!(compare("age", CompareOp::Lte, "30").matches(&doc));
    }

    #[test]
    fn test_nested_path_resolution() {
        let doc = sample_doc();
        assert!(compare("address.city", CompareOp::Eq, "Portland").matches(&doc));
        assert!(!compare("address.country", CompareOp::Eq, "US").matches(&doc));
    }

    #[test]
    fn test_missing_field_fails_comparisons() {
        let doc = sample_doc();
        assert!(!compare("missing", CompareOp::Eq, "x").matches(&doc));
        assert!(!compare("missing", CompareOp::Gt, "0").matches(&doc));
    }

    #[test]
    fn test_between_is_inclusive() {
        let between = |value: i64| {
            let doc = json!({ "n": value });
            Predicate::Between {
                field: "n".to_string(),
                min: "5".to_string(),
                max: "10".to_string(),
            }
            .matches(&doc)
        };
        assert!(between(5));
        assert!(between(7));
        assert!(between(10));
        assert!(!between(4));
        assert!(!between(11));
    }

    #[test]
    fn test_exists_distinguishes_missing_from_null() {
        let doc = sample_doc();
        let exists = |field: &str| {
            Predicate::Exists {
                field: field.to_string(),
            }
            .matches(&doc)
        };
        assert!(exists("name"));
        assert!(exists("metadata")); // present, even though null
        assert!(exists("address.zip"));
        assert!(!exists("missing"));
        assert!(!exists("address.country"));
    }

    #[test]
    fn test_in_membership() {
        let doc = sample_doc();
        let member = Predicate::In {
            field: "name".to_string(),
            values: vec!["Alice".to_string(), "Bob".to_string()],
        };
        assert!(member.matches(&doc));

        let non_member = Predicate::In {
            field: "name".to_string(),
            values: vec!["Carol".to_string()],
        };
        assert!(!non_member.matches(&doc));
    }

    #[test]
    fn test_matches_only_applies_to_strings() {
        let doc = sample_doc();
        let pattern = RegexBuilder::new("3")
            .case_insensitive(true)
            .build()
            .unwrap();
        let matches = Predicate::Matches {
            field: "age".to_string(),
            pattern,
        };
        assert!(!matches.matches(&doc));
    }

    #[test]
    fn test_matches_on_string_arrays() {
        let doc = sample_doc();
        let pattern = RegexBuilder::new("^adm")
            .case_insensitive(true)
            .build()
            .unwrap();
        let matches = Predicate::Matches {
            field: "tags".to_string(),
            pattern,
        };
        assert!(matches.matches(&doc));
    }

    #[test]
    fn test_and_or_not_composition() {
        let doc = sample_doc();
        let tree = Predicate::And(vec![
            compare("age", CompareOp::Gte, "18"),
            Predicate::Or(vec![
                compare("name", CompareOp::Eq, "Bob"),
                compare("address.city", CompareOp::Eq, "Portland"),
            ]),
            Predicate::Not(Box::new(compare("active", CompareOp::Eq, "false"))),
        ]);
        assert!(tree.matches(&doc));
    }
}

//! Operator translation: one [`FilterCondition`] to one backend-neutral
//! [`Predicate`] leaf.
//!
//! All string-matching operators are case-insensitive. The literal-matching
//! operators (`contains`, `notContains`, `startsWith`, `endsWith`, `similar`)
//! escape regex metacharacters in the value before building a pattern, so a
//! client cannot inject an arbitrary pattern through what is meant to be
//! substring matching. Only the `regex` operator passes the value through
//! unescaped - a documented trust boundary for callers who want to supply
//! their own patterns.

use regex::{Regex, RegexBuilder};

use crate::errors::ApiError;
use crate::filtering::conditions::{FilterCondition, FilterOperator};
use crate::filtering::predicate::{CompareOp, Predicate};

/// Regex metacharacters escaped when a value is matched literally.
const ESCAPED_CHARS: &[char] = &[
    '-', '/', '\\', '^', '$', '*', '+', '?', '.', '(', ')', '|', '[', ']', '{', '}',
];

/// Escape a value for literal use inside a regular expression.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if ESCAPED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Translate a filter condition into a predicate leaf.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when a `between`/`notBetween` value has
/// no comma, or when a `regex` value is not a valid pattern. Both are
/// malformed-parameter failures raised before any storage call.
pub fn translate(condition: &FilterCondition) -> Result<Predicate, ApiError> {
    let field = condition.field.clone();
    let value = condition.value.as_str();

    let predicate = match condition.operator {
        FilterOperator::Eq => compare(field, CompareOp::Eq, value),
        FilterOperator::Neq => negate(compare(field, CompareOp::Eq, value)),
        FilterOperator::Gt => compare(field, CompareOp::Gt, value),
        FilterOperator::Gte => compare(field, CompareOp::Gte, value),
        FilterOperator::Lt => compare(field, CompareOp::Lt, value),
        FilterOperator::Lte => compare(field, CompareOp::Lte, value),
        FilterOperator::Contains => matches(field, &escape_literal(value), condition)?,
        FilterOperator::NotContains => {
            negate(matches(field, &escape_literal(value), condition)?)
        }
        FilterOperator::StartsWith | FilterOperator::Similar => {
            matches(field, &format!("^{}", escape_literal(value)), condition)?
        }
        FilterOperator::EndsWith => {
            matches(field, &format!("{}$", escape_literal(value)), condition)?
        }
        FilterOperator::Regex => matches(field, value, condition)?,
        FilterOperator::In => Predicate::In {
            field,
            values: split_list(value),
        },
        FilterOperator::Nin => negate(Predicate::In {
            field,
            values: split_list(value),
        }),
        FilterOperator::Exists => Predicate::Exists { field },
        FilterOperator::NotExists => negate(Predicate::Exists { field }),
        FilterOperator::Between => between(field, condition)?,
        FilterOperator::NotBetween => negate(between(field, condition)?),
    };

    Ok(predicate)
}

fn compare(field: String, op: CompareOp, value: &str) -> Predicate {
    Predicate::Compare {
        field,
        op,
        value: value.to_string(),
    }
}

fn negate(inner: Predicate) -> Predicate {
    Predicate::Not(Box::new(inner))
}

fn matches(
    field: String,
    pattern: &str,
    condition: &FilterCondition,
) -> Result<Predicate, ApiError> {
    let pattern = build_case_insensitive(pattern).map_err(|err| {
        ApiError::bad_request(format!(
            "invalid pattern for `{}:{}`: {err}",
            condition.field,
            condition.operator.as_str()
        ))
    })?;
    Ok(Predicate::Matches { field, pattern })
}

fn build_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

fn between(field: String, condition: &FilterCondition) -> Result<Predicate, ApiError> {
    // Split on the first comma only: `5,10` -> [5, 10] inclusive.
    let (min, max) = condition.value.split_once(',').ok_or_else(|| {
        ApiError::bad_request(format!(
            "parameter `{}:{}` expects a `min,max` value, got `{}`",
            condition.field,
            condition.operator.as_str(),
            condition.value
        ))
    })?;

    Ok(Predicate::Between {
        field,
        min: min.to_string(),
        max: max.to_string(),
    })
}

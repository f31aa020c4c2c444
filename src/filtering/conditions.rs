//! Condition parsing: raw key/value parameter pairs to typed filter
//! conditions.
//!
//! Parameter names use the syntax `field` or `field:operator`; anything not
//! in [`RESERVED_PARAMS`] becomes one AND-group condition. The `or` parameter
//! holds comma-separated `field:operator:value` triples for the OR-group.
//!
//! Parsing is pure and order-preserving. Duplicate field names are allowed
//! and each produces an independent condition; nothing is merged or
//! deduplicated. Unknown operator tokens are rejected rather than silently
//! defaulted, so a typo cannot quietly change filter semantics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::filtering::sort::parse_sort;
use crate::models::QueryRequest;

/// Parameter names consumed by pagination, sorting, and the OR-group.
pub const RESERVED_PARAMS: [&str; 4] = ["start", "limit", "sort", "or"];

/// Closed set of filter operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Similar,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Nin,
    Exists,
    NotExists,
    Between,
    NotBetween,
    Regex,
}

impl FilterOperator {
    /// Parse an operator token as it appears in a parameter name.
    #[must_use]
    pub fn parse_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "contains" => Some(Self::Contains),
            "notContains" => Some(Self::NotContains),
            "startsWith" => Some(Self::StartsWith),
            "endsWith" => Some(Self::EndsWith),
            "similar" => Some(Self::Similar),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            "nin" => Some(Self::Nin),
            "exists" => Some(Self::Exists),
            "notExists" => Some(Self::NotExists),
            "between" => Some(Self::Between),
            "notBetween" => Some(Self::NotBetween),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// The token for this operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Similar => "similar",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Exists => "exists",
            Self::NotExists => "notExists",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
            Self::Regex => "regex",
        }
    }
}

/// A single field/operator/value filter test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterCondition {
    /// Field to filter on, dot notation allowed for nested fields.
    pub field: String,
    pub operator: FilterOperator,
    /// Raw value as received; list-valued operators split it themselves.
    pub value: String,
}

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Parse an ordered sequence of raw query parameter pairs into a
/// [`QueryRequest`].
///
/// Reserved parameters (`start`, `limit`, `sort`, `or`) configure the window,
/// sort spec, and OR-group; every other pair becomes one AND-group condition,
/// in input order. If a reserved parameter appears more than once the last
/// occurrence wins.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for a non-numeric `start`/`limit`, a zero
/// `limit`, an empty field name, an unknown operator token, or a malformed
/// `or` triple.
pub fn parse_query(params: &[(String, String)]) -> Result<QueryRequest, ApiError> {
    let mut request = QueryRequest::default();

    for (key, value) in params {
        match key.as_str() {
            "start" => request.start = parse_window_param("start", value)?,
            "limit" => {
                let limit = parse_window_param("limit", value)?;
                if limit == 0 {
                    return Err(ApiError::bad_request("parameter `limit` must be at least 1"));
                }
                request.limit = limit;
            }
            "sort" => request.sort = parse_sort(value),
            "or" => request.or_conditions = parse_or_conditions(value)?,
            _ => request.and_conditions.push(parse_condition(key, value)?),
        }
    }

    Ok(request)
}

/// Parse one `field` or `field:operator` parameter into an AND-group
/// condition. A missing operator suffix defaults to `eq`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for an empty field name or an unknown
/// operator token.
pub fn parse_condition(key: &str, value: &str) -> Result<FilterCondition, ApiError> {
    let (field, operator) = match key.split_once(':') {
        Some((field, token)) => {
            let operator = FilterOperator::parse_token(token).ok_or_else(|| {
                ApiError::bad_request(format!(
                    "unknown filter operator `{token}` in parameter `{key}`"
                ))
            })?;
            (field, operator)
        }
        None => (key, FilterOperator::Eq),
    };

    if field.is_empty() {
        return Err(ApiError::bad_request(format!(
            "filter parameter `{key}` has an empty field name"
        )));
    }

    Ok(FilterCondition::new(field, operator, value))
}

/// Parse the `or` parameter: comma-separated `field:operator:value` triples.
///
/// A two-segment entry `field:value` defaults the operator to `eq`. An empty
/// string yields an empty OR-group (which contributes no constraint).
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for an entry with fewer than two colon
/// segments, an empty field name, or an unknown operator token.
pub fn parse_or_conditions(raw: &str) -> Result<Vec<FilterCondition>, ApiError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',').map(parse_or_triple).collect()
}

fn parse_or_triple(triple: &str) -> Result<FilterCondition, ApiError> {
    let segments: Vec<&str> = triple.splitn(3, ':').collect();

    let (field, operator, value) = match segments.as_slice() {
        [field, token, value] => {
            let operator = FilterOperator::parse_token(token).ok_or_else(|| {
                ApiError::bad_request(format!(
                    "unknown filter operator `{token}` in `or` condition `{triple}`"
                ))
            })?;
            (*field, operator, *value)
        }
        [field, value] => (*field, FilterOperator::Eq, *value),
        _ => {
            return Err(ApiError::bad_request(format!(
                "malformed `or` condition `{triple}`: expected `field:operator:value`"
            )));
        }
    };

    if field.is_empty() {
        return Err(ApiError::bad_request(format!(
            "`or` condition `{triple}` has an empty field name"
        )));
    }

    Ok(FilterCondition::new(field, operator, value))
}

fn parse_window_param(name: &str, value: &str) -> Result<u64, ApiError> {
    value.trim().parse().map_err(|_| {
        ApiError::bad_request(format!(
            "parameter `{name}` must be a non-negative integer, got `{value}`"
        ))
    })
}

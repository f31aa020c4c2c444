use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::filtering::conditions::FilterCondition;

/// Default page size when no `limit` parameter is supplied.
pub const DEFAULT_LIMIT: u64 = 20;

/// Reserved query parameters for pagination, sorting, and OR-group filtering.
///
/// Every parameter *not* listed here is treated as a filter condition with the
/// syntax `field` or `field:operator` (see
/// [`parse_query`](crate::filtering::conditions::parse_query)):
///
/// - `price:gte=10` — price greater than or equal to 10
/// - `name:contains=smith` — case-insensitive substring match
/// - `status:in=active,pending` — membership test
///
/// This struct exists for OpenAPI documentation; handlers should extract the
/// raw parameter pairs (e.g. `Query<Vec<(String, String)>>`) so that ordering
/// and duplicate fields survive.
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Starting index for pagination (default 0).
    #[param(example = 0)]
    pub start: Option<u64>,
    /// Number of items per page, at least 1 (default 20).
    #[param(example = 20)]
    pub limit: Option<u64>,
    /// Comma-separated sort fields; prefix a field with `-` for descending.
    ///
    /// Example: `-price,createdAt`
    #[param(example = "-price,createdAt")]
    pub sort: Option<String>,
    /// OR-group conditions as comma-separated `field:operator:value` triples.
    ///
    /// Example: `status:eq:completed,status:eq:shipped`
    #[param(example = "status:eq:completed,status:eq:shipped")]
    pub or: Option<String>,
}

/// Sort direction for a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort key; the order of keys in a sort spec is significant
/// (primary, secondary, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortField {
    /// Field name, dot notation allowed for nested fields.
    pub field: String,
    pub order: SortOrder,
}

impl SortField {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// A fully parsed query: pagination window, sort spec, and both filter groups.
///
/// Built fresh per request from untrusted parameters, compiled into a
/// [`QueryPlan`](crate::filtering::pagination::QueryPlan), executed once, and
/// discarded. Never persisted or shared across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Number of records to skip.
    pub start: u64,
    /// Maximum number of records to return, at least 1.
    pub limit: u64,
    /// Ordered sort keys; empty means backend default ordering.
    pub sort: Vec<SortField>,
    /// Conditions combined conjunctively.
    pub and_conditions: Vec<FilterCondition>,
    /// Conditions combined disjunctively, then conjoined with the AND-group.
    pub or_conditions: Vec<FilterCondition>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            start: 0,
            limit: DEFAULT_LIMIT,
            sort: Vec::new(),
            and_conditions: Vec::new(),
            or_conditions: Vec::new(),
        }
    }
}

/// One windowed result page plus pagination metadata.
///
/// Invariants: `data.len() <= limit`, `filtered_total_records >= data.len()`,
/// and `total_records >= filtered_total_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records matching the filter, sorted and windowed.
    pub data: Vec<T>,
    /// Echo of the requested starting index.
    pub start: u64,
    /// Echo of the requested page size.
    pub limit: u64,
    /// Number of records matching the filter, ignoring the window.
    pub filtered_total_records: u64,
    /// Number of records in the collection, ignoring filters entirely.
    pub total_records: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_request_window() {
        let request = QueryRequest::default();
        assert_eq!(request.start, 0);
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert!(request.sort.is_empty());
        assert!(request.and_conditions.is_empty());
        assert!(request.or_conditions.is_empty());
    }

    #[test]
    fn test_page_serializes_with_camel_case_keys() {
        let page = Page {
            data: vec![json!({"id": 1})],
            start: 0,
            limit: 20,
            filtered_total_records: 1,
            total_records: 25,
        };

        let serialized = serde_json::to_value(&page).unwrap();
        assert_eq!(serialized["filteredTotalRecords"], 1);
        assert_eq!(serialized["totalRecords"], 25);
        assert_eq!(serialized["start"], 0);
        assert_eq!(serialized["limit"], 20);
        assert_eq!(serialized["data"], json!([{"id": 1}]));
    }

    #[test]
    fn test_sort_order_round_trips_lowercase() {
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("asc"));
        assert_eq!(
            serde_json::from_value::<SortOrder>(json!("desc")).unwrap(),
            SortOrder::Desc
        );
    }
}

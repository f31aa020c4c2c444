//! Query compilation and paginated execution.
//!
//! [`compile_plan`] composes the translated AND-group and OR-group into one
//! predicate tree: `(AND of all andConditions) AND (OR of all orConditions)`.
//! An empty group contributes no constraint - in particular an empty OR-group
//! must not suppress the AND-group's results.
//!
//! [`paginate`] runs a plan against a [`DocumentStore`]: unfiltered count,
//! filtered count, then the sorted and windowed fetch. The same compiled
//! predicate instance backs the filtered count and the fetch, so the criteria
//! are identical within one call; snapshot isolation across the three reads
//! is the collaborator's policy (a momentarily stale count against a mutating
//! collection is an accepted staleness window, not an engine bug).

use serde_json::Value;

use crate::errors::ApiError;
use crate::filtering::operators::translate;
use crate::filtering::predicate::Predicate;
use crate::models::{Page, QueryRequest, SortField};
use crate::store::DocumentStore;

/// A compiled, backend-neutral query: filter tree plus sort spec. The window
/// stays on the [`QueryRequest`] since it is applied at fetch time.
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    /// `None` when no condition was supplied (match everything).
    pub filter: Option<Predicate>,
    /// Ordered sort keys; empty means backend default ordering.
    pub sort: Vec<SortField>,
}

/// Compile a request's conditions and sort spec into one executable plan.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when any condition fails to translate
/// (malformed `between` value, invalid `regex` pattern).
pub fn compile_plan(request: &QueryRequest) -> Result<QueryPlan, ApiError> {
    let and_group: Vec<Predicate> = request
        .and_conditions
        .iter()
        .map(translate)
        .collect::<Result<_, _>>()?;
    let or_group: Vec<Predicate> = request
        .or_conditions
        .iter()
        .map(translate)
        .collect::<Result<_, _>>()?;

    let mut groups = Vec::new();
    if !and_group.is_empty() {
        groups.push(Predicate::And(and_group));
    }
    if !or_group.is_empty() {
        groups.push(Predicate::Or(or_group));
    }

    let filter = if groups.len() > 1 {
        Some(Predicate::And(groups))
    } else {
        groups.pop()
    };

    Ok(QueryPlan {
        filter,
        sort: request.sort.clone(),
    })
}

/// Execute a query request against a storage collaborator, producing one
/// result page with dual counts.
///
/// Issues three reads: `totalRecords` ignores filters entirely,
/// `filteredTotalRecords` applies the filter without the window, and the data
/// fetch applies filter, sort, skip, and limit. No retries; an empty result
/// set is a valid, successful page.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the request fails to compile, or
/// [`ApiError::Storage`] if the collaborator fails during a count or fetch.
pub async fn paginate<S>(store: &S, request: &QueryRequest) -> Result<Page<Value>, ApiError>
where
    S: DocumentStore + ?Sized,
{
    let plan = compile_plan(request)?;

    let total_records = store.count(None).await.map_err(ApiError::storage)?;
    let filtered_total_records = store
        .count(plan.filter.as_ref())
        .await
        .map_err(ApiError::storage)?;
    let data = store
        .find(plan.filter.as_ref(), &plan.sort, request.start, request.limit)
        .await
        .map_err(ApiError::storage)?;

    Ok(Page {
        data,
        start: request.start,
        limit: request.limit,
        filtered_total_records,
        total_records,
    })
}

/// Convenience wrapper: parse raw parameter pairs, then paginate.
///
/// # Errors
///
/// As [`paginate`], plus [`ApiError::BadRequest`] for malformed parameters.
pub async fn paginate_params<S>(
    store: &S,
    params: &[(String, String)],
) -> Result<Page<Value>, ApiError>
where
    S: DocumentStore + ?Sized,
{
    let request = crate::filtering::conditions::parse_query(params)?;
    paginate(store, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::conditions::{FilterCondition, FilterOperator};
    use serde_json::json;

    fn condition(field: &str, operator: FilterOperator, value: &str) -> FilterCondition {
        FilterCondition::new(field, operator, value)
    }

    #[test]
    fn test_no_conditions_compiles_to_no_filter() {
        let plan = compile_plan(&QueryRequest::default()).unwrap();
        assert!(plan.filter.is_none());
    }

    #[test]
    fn test_and_group_alone_has_no_or_wrapper() {
        let request = QueryRequest {
            and_conditions: vec![
                condition("status", FilterOperator::Eq, "active"),
                condition("age", FilterOperator::Gte, "18"),
            ],
            ..Default::default()
        };
        let plan = compile_plan(&request).unwrap();

        let doc = json!({"status": "active", "age": 30});
        let filter = plan.filter.unwrap();
        assert!(filter.matches(&doc));
        assert!(!filter.matches(&json!({"status": "active", "age": 10})));
    }

    #[test]
    fn test_empty_or_group_does_not_nullify_and_group() {
        let request = QueryRequest {
            and_conditions: vec![condition("status", FilterOperator::Eq, "active")],
            or_conditions: Vec::new(),
            ..Default::default()
        };
        let filter = compile_plan(&request).unwrap().filter.unwrap();
        assert!(filter.matches(&json!({"status": "active"})));
    }

    #[test]
    fn test_or_group_is_conjoined_with_and_group() {
        let request = QueryRequest {
            and_conditions: vec![condition("kind", FilterOperator::Eq, "order")],
            or_conditions: vec![
                condition("status", FilterOperator::Eq, "completed"),
                condition("status", FilterOperator::Eq, "shipped"),
            ],
            ..Default::default()
        };
        let filter = compile_plan(&request).unwrap().filter.unwrap();

        assert!(filter.matches(&json!({"kind": "order", "status": "completed"})));
        assert!(filter.matches(&json!({"kind": "order", "status": "shipped"})));
        assert!(!filter.matches(&json!({"kind": "order", "status": "pending"})));
        assert!(!filter.matches(&json!({"kind": "invoice", "status": "shipped"})));
    }

    #[test]
    fn test_condition_order_is_commutative() {
        let forward = QueryRequest {
            and_conditions: vec![
                condition("a", FilterOperator::Eq, "1"),
                condition("b", FilterOperator::Eq, "2"),
            ],
            ..Default::default()
        };
        let reversed = QueryRequest {
            and_conditions: vec![
                condition("b", FilterOperator::Eq, "2"),
                condition("a", FilterOperator::Eq, "1"),
            ],
            ..Default::default()
        };

        for doc in [
            json!({"a": "1", "b": "2"}),
            json!({"a": "1", "b": "3"}),
            json!({"a": "0", "b": "2"}),
        ] {
            let lhs = compile_plan(&forward).unwrap().filter.unwrap().matches(&doc);
            let rhs = compile_plan(&reversed).unwrap().filter.unwrap().matches(&doc);
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn test_bad_condition_fails_compilation() {
        let request = QueryRequest {
            and_conditions: vec![condition("price", FilterOperator::Between, "no-comma")],
            ..Default::default()
        };
        assert!(compile_plan(&request).is_err());
    }
}

//! # Query, Filter & Pagination Engine
//!
//! Translates loosely-typed request parameters into a typed, backend-neutral
//! query plan and executes it with bounded pagination and dual counting.
//!
//! ## Components
//!
//! - **[`conditions`]**: parameter pairs -> typed [`FilterCondition`]s
//!   (AND-group from open-ended keys, OR-group from the `or` parameter)
//! - **[`sort`]**: `-price,createdAt` -> ordered sort spec
//! - **[`operators`]**: one condition -> one [`Predicate`] leaf, covering
//!   `eq, neq, contains, notContains, startsWith, endsWith, similar, gt, lt,
//!   gte, lte, in, nin, exists, notExists, between, notBetween, regex`
//! - **[`predicate`]**: the composable filter tree, evaluatable against
//!   in-memory documents
//! - **[`pagination`]**: plan compilation and the count / filtered-count /
//!   windowed-fetch execution cycle
//!
//! ## Query parameter examples
//!
//! ```rust,ignore
//! // Simple equality (operator defaults to eq)
//! GET /orders?status=active
//!
//! // Case-insensitive substring match, value matched literally
//! GET /orders?customer.name:contains=smith
//!
//! // Numeric comparisons and ranges
//! GET /orders?total:gte=100
//! GET /orders?total:between=5,10
//!
//! // Membership
//! GET /orders?status:in=active,pending
//!
//! // OR-group, conjoined with the other filters
//! GET /orders?kind=order&or=status:eq:completed,status:eq:shipped
//!
//! // Sorting and pagination
//! GET /orders?sort=-price,createdAt&start=20&limit=20
//! ```
//!
//! [`FilterCondition`]: conditions::FilterCondition
//! [`Predicate`]: predicate::Predicate

pub mod conditions;
pub mod operators;
pub mod pagination;
pub mod predicate;
pub mod sort;

// Re-export commonly used items
pub use conditions::{FilterCondition, FilterOperator, parse_condition, parse_or_conditions, parse_query};
pub use operators::translate;
pub use pagination::{QueryPlan, compile_plan, paginate, paginate_params};
pub use predicate::{CompareOp, Predicate};
pub use sort::parse_sort;

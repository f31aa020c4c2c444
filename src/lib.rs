//! # querycrate
//!
//! A generic query, filter, and pagination engine for CRUD APIs backed by a
//! document store. Turns loosely-typed request parameters into a typed,
//! backend-neutral query plan, then executes it against a storage collaborator
//! with bounded pagination and dual counting (collection total vs. filtered
//! total).
//!
//! The flow: raw parameter pairs are parsed into filter conditions
//! ([`filtering::conditions`]), each condition is translated into a
//! [`Predicate`](filtering::predicate::Predicate) leaf
//! ([`filtering::operators`]), the AND-group and OR-group are composed into
//! one plan, and [`paginate`](filtering::pagination::paginate) runs the plan
//! against any [`DocumentStore`](store::DocumentStore).

pub mod errors;
pub mod filtering;
pub mod models;
pub mod store;

pub use errors::ApiError;
pub use filtering::conditions::{FilterCondition, FilterOperator, parse_query};
pub use filtering::pagination::{QueryPlan, compile_plan, paginate, paginate_params};
pub use filtering::predicate::Predicate;
pub use models::{Page, PageParams, QueryRequest, SortField, SortOrder};
pub use store::{DocumentStore, MemoryStore, StoreError};

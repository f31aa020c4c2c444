//! Storage collaborator interface and the in-memory reference backend.
//!
//! The engine only requires two primitives from storage: counting (with or
//! without a filter) and a sorted, windowed fetch. Transactions, joins, and
//! aggregation are deliberately not part of the contract, and snapshot
//! isolation across the three reads of one paginated call is the
//! implementation's policy choice.
//!
//! [`MemoryStore`] keeps documents as `serde_json::Value` in insertion order
//! and evaluates predicates directly. It backs the engine's tests and serves
//! as the reference for how a real adapter should interpret a
//! [`Predicate`] tree.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::RwLock;

use crate::filtering::predicate::{Predicate, resolve_path};
use crate::models::{SortField, SortOrder};

/// Failure reported by a storage collaborator.
///
/// Kept deliberately coarse: the engine does not retry and does not inspect
/// the cause, it only propagates it (logged server-side, sanitized for
/// clients).
#[derive(Debug)]
pub enum StoreError {
    /// The backend failed or was unreachable.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A document collection the engine can paginate over.
///
/// `filter = None` means "match everything"; an empty `sort` slice means the
/// backend's own default ordering.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Count documents, optionally restricted to those matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn count(&self, filter: Option<&Predicate>) -> Result<u64, StoreError>;

    /// Fetch matching documents, sorted per `sort`, skipping `skip` and
    /// returning at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn find(
        &self,
        filter: Option<&Predicate>,
        sort: &[SortField],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Value>, StoreError>;
}

/// In-memory document collection, preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded with the given documents.
    #[must_use]
    pub fn from_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Append a document to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection lock is poisoned.
    pub fn insert(&self, document: Value) -> Result<(), StoreError> {
        self.documents
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?
            .push(document);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Value>>, StoreError> {
        self.documents
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn count(&self, filter: Option<&Predicate>) -> Result<u64, StoreError> {
        let documents = self.read()?;
        let count = match filter {
            Some(predicate) => documents.iter().filter(|doc| predicate.matches(doc)).count(),
            None => documents.len(),
        };
        Ok(count as u64)
    }

    async fn find(
        &self,
        filter: Option<&Predicate>,
        sort: &[SortField],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Value>, StoreError> {
        let documents = self.read()?;

        let mut matching: Vec<&Value> = documents
            .iter()
            .filter(|doc| filter.is_none_or(|predicate| predicate.matches(doc)))
            .collect();

        // Stable sort: documents equal under the sort spec keep their
        // insertion order, as does an empty spec.
        matching.sort_by(|a, b| compare_documents(a, b, sort));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(limit).cloned().collect())
    }
}

/// Multi-key document comparison for sorting.
fn compare_documents(a: &Value, b: &Value, sort: &[SortField]) -> Ordering {
    for key in sort {
        let ordering = compare_sort_values(resolve_path(a, &key.field), resolve_path(b, &key.field));
        let ordering = match key.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Compare two optional field values for sorting.
///
/// Same-type values compare natively; otherwise a fixed type rank applies
/// (missing < null < bool < number < string < array < object) so the ordering
/// stays total and deterministic for heterogeneous collections.
fn compare_sort_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

//! The narrow document-store interface the board is written against.
//!
//! Documents are JSON objects addressed by `(collection, id)`. Queries support
//! equality constraints, a single order-by field, a limit and a `start_after`
//! cursor. Ordering is total: ties on the order field fall back to the document
//! id in the same direction, so cursors never skip or repeat documents.

use std::cmp::Ordering;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DbError;

/// A stored JSON object, without its id.
pub type Document = Map<String, Value>;

/// Collection names used by the board.
pub mod collections {
    pub const JOBS: &str = "jobs";
    pub const APPLICATIONS: &str = "applications";
    /// Every profile, keyed by principal id.
    pub const USERS: &str = "users";
    /// Company profiles again, keyed by principal id.
    pub const COMPANIES: &str = "companies";
}

/// A document together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

/// Equality predicate pushed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: String,
    pub value: Value,
}

impl Constraint {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// Position just after a document in a query's ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub value: Value,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub constraints: Vec<Constraint>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub start_after: Option<Cursor>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, cursor: Option<Cursor>) -> Self {
        self.start_after = cursor;
        self
    }

    /// Cursor pointing just after `doc` under this query's ordering.
    pub fn cursor_for(&self, doc: &StoredDocument) -> Cursor {
        let value = self
            .order_by
            .as_ref()
            .and_then(|order| doc.data.get(&order.field).cloned())
            .unwrap_or(Value::Null);
        Cursor {
            value,
            id: doc.id.clone(),
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub documents: Vec<StoredDocument>,
    /// Cursor after the last returned document, `None` when the page is empty.
    pub next: Option<Cursor>,
}

/// Remote document store.
///
/// Every method suspends until the store answers; implementations perform no retries.
pub trait DocumentStore: Send + Sync + 'static {
    /// Create a document under a freshly generated id and return the id.
    fn create(
        &self,
        collection: &str,
        data: Document,
    ) -> impl Future<Output = Result<String, DbError>> + Send;

    /// Create a document under `id`, failing with `AlreadyExists` if one is there.
    fn create_with_id(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Create or replace the document under `id`.
    fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<StoredDocument>, DbError>> + Send;

    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Page, DbError>> + Send;

    /// Merge `patch` into an existing document, failing with `NotFound` if absent.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Delete a document. Deleting an absent document is not an error.
    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Atomically add `delta` to a numeric field and return the new value.
    fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> impl Future<Output = Result<i64, DbError>> + Send;
}

/// Reject field names that are not plain identifiers.
pub(crate) fn check_field(field: &str) -> Result<(), DbError> {
    let mut chars = field.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidField(field.to_string()))
    }
}

/// Total order over JSON scalars: null < bool < number < string < other.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Compare two documents under `order`, breaking ties by id.
pub(crate) fn compare_documents(
    order: Option<&OrderBy>,
    a: &StoredDocument,
    b: &StoredDocument,
) -> Ordering {
    let Some(order) = order else {
        return a.id.cmp(&b.id);
    };
    let null = Value::Null;
    let x = a.data.get(&order.field).unwrap_or(&null);
    let y = b.data.get(&order.field).unwrap_or(&null);
    let ordering = compare_values(x, y).then_with(|| a.id.cmp(&b.id));
    match order.direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

/// Serialize a typed record into a document, dropping its `id` field.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, DbError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(DbError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a typed record from a stored document, restoring its `id` field.
pub fn from_document<T: for<'de> Deserialize<'de>>(doc: StoredDocument) -> Result<T, DbError> {
    let mut data = doc.data;
    data.insert("id".to_string(), Value::String(doc.id));
    Ok(serde_json::from_value(Value::Object(data))?)
}

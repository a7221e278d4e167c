//! In-process document store for tests and offline development.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use ulid::Ulid;

use crate::DbError;
use crate::store::{
    Cursor, Document, DocumentStore, Page, Query, StoredDocument, check_field, compare_documents,
};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store held entirely in memory.
///
/// Every call yields to the runtime once before touching state, so concurrent
/// callers interleave the way they would against a remote store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    offline: AtomicBool,
    /// Collections whose writes currently fail.
    failing: Mutex<HashSet<String>>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `DbError::Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Make writes to `collection` fail with `DbError::Unavailable`; reads still work.
    pub fn fail_writes_to(&self, collection: &str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection.to_string());
    }

    /// Undo every [`fail_writes_to`](Self::fail_writes_to).
    pub fn restore_writes(&self) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    /// Number of documents currently stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn round_trip(&self) -> Result<(), DbError> {
        tokio::task::yield_now().await;
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(DbError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    async fn write_trip(&self, collection: &str) -> Result<(), DbError> {
        self.round_trip().await?;
        let failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.contains(collection) {
            return Err(DbError::Unavailable(format!("writes to {} are failing", collection)));
        }
        Ok(())
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, data: Document) -> Result<String, DbError> {
        let id = Ulid::new().to_string();
        self.create_with_id(collection, &id, data).await?;
        Ok(id)
    }

    async fn create_with_id(&self, collection: &str, id: &str, data: Document) -> Result<(), DbError> {
        self.write_trip(collection).await?;
        let mut collections = self.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(DbError::AlreadyExists(format!("{}/{}", collection, id)));
        }
        docs.insert(id.to_string(), data);
        self.wrote();
        Ok(())
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), DbError> {
        self.write_trip(collection).await?;
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        self.wrote();
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, DbError> {
        self.round_trip().await?;
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| StoredDocument {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Page, DbError> {
        for constraint in &query.constraints {
            check_field(&constraint.field)?;
        }
        if let Some(order) = &query.order_by {
            check_field(&order.field)?;
        }
        self.round_trip().await?;

        let mut matched: Vec<StoredDocument> = {
            let collections = self.lock();
            let Some(docs) = collections.get(collection) else {
                return Ok(Page::default());
            };
            docs.iter()
                .filter(|(_, data)| {
                    query
                        .constraints
                        .iter()
                        .all(|c| data.get(&c.field) == Some(&c.value))
                })
                .map(|(id, data)| StoredDocument {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect()
        };

        let order = query.order_by.as_ref();
        matched.sort_by(|a, b| compare_documents(order, a, b));

        if let Some(cursor) = &query.start_after {
            let marker = cursor_document(query, cursor);
            matched.retain(|doc| compare_documents(order, doc, &marker).is_gt());
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        let next = matched.last().map(|doc| query.cursor_for(doc));
        Ok(Page {
            documents: matched,
            next,
        })
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), DbError> {
        self.write_trip(collection).await?;
        let mut collections = self.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DbError::not_found(collection, id))?;
        for (key, value) in patch {
            doc.insert(key, value);
        }
        self.wrote();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
        self.write_trip(collection).await?;
        if let Some(docs) = self.lock().get_mut(collection) {
            docs.remove(id);
        }
        self.wrote();
        Ok(())
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<i64, DbError> {
        check_field(field)?;
        self.write_trip(collection).await?;
        let mut collections = self.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DbError::not_found(collection, id))?;
        let current = match doc.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                DbError::Query(format!("{} on {}/{} is not an integer", field, collection, id))
            })?,
        };
        let next = current + delta;
        doc.insert(field.to_string(), Value::from(next));
        self.wrote();
        Ok(next)
    }
}

fn cursor_document(query: &Query, cursor: &Cursor) -> StoredDocument {
    let mut data = Map::new();
    if let Some(order) = &query.order_by {
        data.insert(order.field.clone(), cursor.value.clone());
    }
    StoredDocument {
        id: cursor.id.clone(),
        data,
    }
}

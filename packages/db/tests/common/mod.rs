#![allow(dead_code)]

use std::sync::{Arc, Once};

use db::{DbConfig, DbError, Document, MemoryStore, SurrealStore};
use serde_json::Value;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("db=debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn memory_store() -> Arc<MemoryStore> {
    init_tracing();
    Arc::new(MemoryStore::new())
}

/// A fresh in-memory SurrealDB per call; each `mem://` connection is its own datastore.
pub async fn surreal_store() -> Result<Arc<SurrealStore>, DbError> {
    init_tracing();
    Ok(Arc::new(SurrealStore::connect(&DbConfig::memory()).await?))
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

//! Document storage for the job board.
//!
//! The board talks to a [`DocumentStore`]: a narrow interface over JSON
//! documents grouped in collections. Two implementations ship here:
//! [`SurrealStore`] on top of SurrealDB and [`MemoryStore`] for tests.
//!
//! # Features
//!
//! - `memory` (default): Use in-memory SurrealDB storage
//! - `rocksdb`: Use RocksDB for persistent file-based storage

mod connection;
mod memory;
mod schema;
mod store;
mod surreal;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, connect};
pub use memory::MemoryStore;
pub use schema::init_schema;
pub use store::{
    Constraint, Cursor, Direction, Document, DocumentStore, OrderBy, Page, Query, StoredDocument,
    collections, compare_values, from_document, to_document,
};
pub use surreal::SurrealStore;

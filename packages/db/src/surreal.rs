//! SurrealDB-backed document store.

use serde_json::Value;
use ulid::Ulid;

use crate::store::{
    Direction, Document, DocumentStore, Page, Query, StoredDocument, check_field,
};
use crate::{Database, DbConfig, DbError, connect, init_schema};

/// Projection alias carrying the raw record key in query results.
const RECORD_KEY: &str = "record_key";

/// Document store over a SurrealDB connection.
#[derive(Clone)]
pub struct SurrealStore {
    db: Database,
}

impl SurrealStore {
    /// Wrap an existing connection. The schema is assumed to be in place.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect with `config` and make sure the schema exists.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = connect(config).await?;
        init_schema(&db).await?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, DbError> {
        Ok(self.get(collection, id).await?.is_some())
    }
}

fn map_write_error(err: surrealdb::Error, collection: &str, id: &str) -> DbError {
    let message = err.to_string();
    if message.contains("already exists") {
        DbError::AlreadyExists(format!("{}/{}", collection, id))
    } else {
        DbError::Connection(err)
    }
}

fn into_document(value: Value) -> Result<Document, DbError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DbError::Serialization(format!(
            "expected a document, got {}",
            other
        ))),
    }
}

impl DocumentStore for SurrealStore {
    async fn create(&self, collection: &str, data: Document) -> Result<String, DbError> {
        let id = Ulid::new().to_string();
        self.create_with_id(collection, &id, data).await?;
        Ok(id)
    }

    async fn create_with_id(&self, collection: &str, id: &str, data: Document) -> Result<(), DbError> {
        self.db
            .query("CREATE type::thing($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("data", Value::Object(data)))
            .await
            .and_then(|response| response.check())
            .map_err(|e| map_write_error(e, collection, id))?;
        Ok(())
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), DbError> {
        self.db
            .query("UPSERT type::thing($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("data", Value::Object(data)))
            .await?
            .check()?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, DbError> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM type::thing($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await?;

        let records: Vec<Value> = response.take(0)?;

        records
            .into_iter()
            .next()
            .map(|value| {
                Ok(StoredDocument {
                    id: id.to_string(),
                    data: into_document(value)?,
                })
            })
            .transpose()
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Page, DbError> {
        let mut conditions = Vec::new();
        let mut bindings: Vec<(String, Value)> = Vec::new();

        for (i, constraint) in query.constraints.iter().enumerate() {
            check_field(&constraint.field)?;
            conditions.push(format!("{} = $c{}", constraint.field, i));
            bindings.push((format!("c{}", i), constraint.value.clone()));
        }

        let (order_field, keyword, cmp) = match &query.order_by {
            Some(order) => {
                check_field(&order.field)?;
                match order.direction {
                    Direction::Ascending => (Some(order.field.as_str()), "ASC", ">"),
                    Direction::Descending => (Some(order.field.as_str()), "DESC", "<"),
                }
            }
            None => (None, "ASC", ">"),
        };

        if let Some(cursor) = &query.start_after {
            match order_field {
                Some(field) => conditions.push(format!(
                    "({field} {cmp} $cursor_value OR ({field} = $cursor_value AND record::id(id) {cmp} $cursor_id))"
                )),
                None => conditions.push(format!("record::id(id) {cmp} $cursor_id")),
            }
            bindings.push(("cursor_value".to_string(), cursor.value.clone()));
            bindings.push(("cursor_id".to_string(), Value::String(cursor.id.clone())));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_clause = match order_field {
            Some(field) => format!("ORDER BY {field} {keyword}, {RECORD_KEY} {keyword}"),
            None => format!("ORDER BY {RECORD_KEY} ASC"),
        };

        let limit_clause = query
            .limit
            .map(|l| format!("LIMIT {}", l))
            .unwrap_or_default();

        let statement = format!(
            "SELECT *, record::id(id) AS {RECORD_KEY} OMIT id FROM type::table($tb) {} {} {}",
            where_clause, order_clause, limit_clause
        );
        tracing::debug!("Document query on {}: {}", collection, statement);

        let mut result = self
            .db
            .query(statement)
            .bind(("tb", collection.to_string()));

        for binding in bindings {
            result = result.bind(binding);
        }

        let mut response = result.await?;
        let records: Vec<Value> = response.take(0)?;

        let mut documents = Vec::with_capacity(records.len());
        for record in records {
            let mut data = into_document(record)?;
            let id = match data.remove(RECORD_KEY) {
                Some(Value::String(id)) => id,
                Some(other) => other.to_string(),
                None => {
                    return Err(DbError::Query(format!(
                        "{} result without a record key",
                        collection
                    )));
                }
            };
            documents.push(StoredDocument { id, data });
        }

        let next = documents.last().map(|doc| query.cursor_for(doc));
        Ok(Page { documents, next })
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), DbError> {
        if !self.exists(collection, id).await? {
            return Err(DbError::not_found(collection, id));
        }
        self.db
            .query("UPDATE type::thing($tb, $id) MERGE $patch RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("patch", Value::Object(patch)))
            .await?
            .check()?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
        self.db
            .query("DELETE type::thing($tb, $id) RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await?
            .check()?;
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
        if !self.exists(collection, id).await? {
            return Err(DbError::not_found(collection, id));
        }

        // Single statement, so the read and the write happen in one transaction.
        let mut response = self
            .db
            .query(format!(
                "UPDATE type::thing($tb, $id) SET {field} += $delta RETURN AFTER"
            ))
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("delta", delta))
            .await?;

        let records: Vec<Value> = response.take(0)?;

        records
            .first()
            .and_then(|record| record.get(field))
            .and_then(Value::as_i64)
            .ok_or_else(|| DbError::not_found(collection, id))
    }
}

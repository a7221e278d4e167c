//! Posting repository for CRUD and listing queries.

use std::sync::Arc;

use board_core::{JobId, JobPosting, PostingUpdate, PrincipalId};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::DbError;
use crate::store::{
    Constraint, Cursor, DocumentStore, OrderBy, Query, collections, from_document, to_document,
};

/// Stored field names the board queries on.
pub mod fields {
    pub const COMPANY_ID: &str = "company_id";
    pub const IS_ACTIVE: &str = "is_active";
    pub const APPLICATIONS_COUNT: &str = "applications_count";
    pub const POSTED_AT: &str = "posted_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// A page of postings as fetched, before any client-side filtering.
#[derive(Debug, Clone, Default)]
pub struct PostingPage {
    pub postings: Vec<JobPosting>,
    /// Cursor after the last fetched posting.
    pub next: Option<Cursor>,
}

/// Repository for posting persistence operations.
pub struct PostingRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for PostingRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> PostingRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist a new posting under its own id.
    pub async fn create(&self, posting: &JobPosting) -> Result<(), DbError> {
        let data = to_document(posting)?;
        self.store
            .create_with_id(collections::JOBS, &posting.id.to_string(), data)
            .await
    }

    /// Get a posting by ID, `None` when absent.
    pub async fn get(&self, id: JobId) -> Result<Option<JobPosting>, DbError> {
        self.store
            .get(collections::JOBS, &id.to_string())
            .await?
            .map(from_document)
            .transpose()
    }

    /// Active postings newest first, one page at a time.
    ///
    /// `constraint` is at most one extra equality predicate pushed to the store.
    pub async fn active_page(
        &self,
        constraint: Option<Constraint>,
        start_after: Option<Cursor>,
        limit: usize,
    ) -> Result<PostingPage, DbError> {
        let query = Self::active_query(constraint)
            .limit(limit)
            .start_after(start_after);
        let page = self.store.query(collections::JOBS, &query).await?;
        let postings = page
            .documents
            .into_iter()
            .map(from_document)
            .collect::<Result<Vec<JobPosting>, _>>()?;
        Ok(PostingPage {
            postings,
            next: page.next,
        })
    }

    /// Every active posting newest first, unpaginated.
    pub async fn active(&self, constraint: Option<Constraint>) -> Result<Vec<JobPosting>, DbError> {
        let query = Self::active_query(constraint);
        self.collect(query).await
    }

    /// Every posting owned by `company_id`, newest first.
    pub async fn for_company(&self, company_id: &PrincipalId) -> Result<Vec<JobPosting>, DbError> {
        let query = Query::new()
            .filter(Constraint::eq(fields::COMPANY_ID, company_id.as_str()))
            .order_by(OrderBy::desc(fields::POSTED_AT));
        self.collect(query).await
    }

    /// Merge the present fields of `update` and stamp `updated_at`.
    pub async fn update(
        &self,
        id: JobId,
        update: &PostingUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let mut patch = to_document(update)?;
        patch.insert(
            fields::UPDATED_AT.to_string(),
            Value::from(now.timestamp_micros()),
        );
        self.store
            .update(collections::JOBS, &id.to_string(), patch)
            .await
    }

    /// Delete a posting.
    pub async fn delete(&self, id: JobId) -> Result<(), DbError> {
        self.store.delete(collections::JOBS, &id.to_string()).await
    }

    /// Atomically bump the application counter and return the new count.
    pub async fn increment_applications(&self, id: JobId) -> Result<u64, DbError> {
        let count = self
            .store
            .increment_field(collections::JOBS, &id.to_string(), fields::APPLICATIONS_COUNT, 1)
            .await?;
        Ok(count.max(0) as u64)
    }

    fn active_query(constraint: Option<Constraint>) -> Query {
        let mut query = Query::new().filter(Constraint::eq(fields::IS_ACTIVE, true));
        if let Some(constraint) = constraint {
            query = query.filter(constraint);
        }
        query.order_by(OrderBy::desc(fields::POSTED_AT))
    }

    async fn collect(&self, query: Query) -> Result<Vec<JobPosting>, DbError> {
        let page = self.store.query(collections::JOBS, &query).await?;
        page.documents.into_iter().map(from_document).collect()
    }
}

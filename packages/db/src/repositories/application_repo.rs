//! Application repository.

use std::sync::Arc;

use board_core::{Application, ApplicationId, JobId, PrincipalId};

use crate::DbError;
use crate::store::{
    Constraint, DocumentStore, OrderBy, Query, collections, from_document, to_document,
};

const JOB_ID: &str = "job_id";
const APPLICANT_ID: &str = "applicant_id";
const APPLIED_AT: &str = "applied_at";

/// Repository for application persistence operations.
pub struct ApplicationRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for ApplicationRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> ApplicationRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist an application; a second one for the same id fails with `AlreadyExists`.
    pub async fn create(&self, application: &Application) -> Result<(), DbError> {
        let data = to_document(application)?;
        self.store
            .create_with_id(collections::APPLICATIONS, application.id.as_str(), data)
            .await
    }

    /// Remove an application, e.g. to undo one whose counter update failed.
    pub async fn delete(&self, id: &ApplicationId) -> Result<(), DbError> {
        self.store
            .delete(collections::APPLICATIONS, id.as_str())
            .await
    }

    /// Applications to one posting, newest first.
    pub async fn for_job(&self, job_id: JobId) -> Result<Vec<Application>, DbError> {
        self.list(Constraint::eq(JOB_ID, job_id.to_string())).await
    }

    /// Applications submitted by one job seeker, newest first.
    pub async fn for_applicant(&self, applicant_id: &PrincipalId) -> Result<Vec<Application>, DbError> {
        self.list(Constraint::eq(APPLICANT_ID, applicant_id.as_str()))
            .await
    }

    async fn list(&self, constraint: Constraint) -> Result<Vec<Application>, DbError> {
        let query = Query::new()
            .filter(constraint)
            .order_by(OrderBy::desc(APPLIED_AT));
        let page = self.store.query(collections::APPLICATIONS, &query).await?;
        page.documents.into_iter().map(from_document).collect()
    }
}

//! Listing query engine: browse, search and role-gated posting writes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use board_core::format::is_absolute_url;
use board_core::{
    Application, ApplicationId, ApplicationStatus, FilterDimension, JobId, JobPosting,
    ListingFilters, NewApplication, NewPosting, PostingUpdate, ValidationError,
};
use db::repositories::{ApplicationRepository, PostingRepository};
use db::{Constraint, DbError, DocumentStore};
use serde::Serialize;
use session::Session;

use crate::cache::{ListingCache, PageCursor};
use crate::{BoardConfig, BoardError, access};

/// One browse page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    /// Fetched postings that pass every filter, newest first.
    pub items: Vec<JobPosting>,
    /// Continue after this page; `None` when nothing was fetched.
    pub next_cursor: Option<PageCursor>,
    /// True when the store returned a full page.
    pub has_more: bool,
}

/// Browse/search over postings, plus posting and application writes.
///
/// Results of browse and search are also kept in a listing cache. A fetch
/// that was overtaken by a newer one returns its result to the caller but
/// never overwrites the cache.
pub struct ListingEngine<S> {
    postings: PostingRepository<S>,
    applications: ApplicationRepository<S>,
    session: Session,
    page_size: usize,
    cache: Mutex<ListingCache>,
}

impl<S: DocumentStore> ListingEngine<S> {
    pub fn new(store: Arc<S>, session: Session, config: &BoardConfig) -> Self {
        Self {
            postings: PostingRepository::new(Arc::clone(&store)),
            applications: ApplicationRepository::new(store),
            session,
            page_size: config.page_size.max(1),
            cache: Mutex::new(ListingCache::default()),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn cache(&self) -> MutexGuard<'_, ListingCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch one page of active postings, newest first.
    ///
    /// The first constrained filter dimension in precedence order is pushed to
    /// the store; the others are applied to the fetched page. Without a
    /// cursor the page replaces the cached listing, with one it is appended.
    pub async fn list_page(
        &self,
        filters: &ListingFilters,
        cursor: Option<&PageCursor>,
    ) -> Result<ListingPage, BoardError> {
        let ticket = self.cache().begin();

        let remote = filters.remote_dimension();
        let constraint = remote.and_then(|dimension| {
            filters
                .constraint_value(dimension)
                .map(|value| Constraint::eq(dimension.field(), value))
        });
        let start_after = cursor.cloned().map(PageCursor::into_inner);

        let fetched = match self
            .postings
            .active_page(constraint, start_after, self.page_size)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                self.cache().fail(ticket);
                return Err(e.into());
            }
        };

        let has_more = fetched.postings.len() == self.page_size;
        let next_cursor = fetched.next.map(PageCursor::new);
        let items: Vec<JobPosting> = fetched
            .postings
            .into_iter()
            .filter(|posting| filters.matches_except(posting, remote))
            .collect();

        let applied = self.cache().finish(ticket, |cache| {
            if cursor.is_some() {
                cache.append_page(items.clone(), next_cursor.clone(), has_more);
            } else {
                cache.replace_page(items.clone(), next_cursor.clone(), has_more);
            }
        });
        if !applied {
            tracing::debug!("Dropping superseded listing page");
        }

        Ok(ListingPage {
            items,
            next_cursor,
            has_more,
        })
    }

    /// Fetch the page after the cached listing's cursor.
    ///
    /// Returns an empty page without a fetch when the listing is exhausted.
    pub async fn load_more(&self, filters: &ListingFilters) -> Result<ListingPage, BoardError> {
        let (cursor, has_more) = {
            let cache = self.cache();
            (cache.cursor().cloned(), cache.has_more())
        };
        if !has_more {
            return Ok(ListingPage {
                items: Vec::new(),
                next_cursor: None,
                has_more: false,
            });
        }
        self.list_page(filters, cursor.as_ref()).await
    }

    /// Every active posting matching `filters` and containing `term`.
    ///
    /// Only the location dimension is pushed to the store. `term` is matched
    /// as typed, surrounding spaces included, case-insensitively against
    /// title, company, description and skills; a blank term matches everything.
    pub async fn search(
        &self,
        term: &str,
        filters: &ListingFilters,
    ) -> Result<Vec<JobPosting>, BoardError> {
        let ticket = self.cache().begin();

        let remote = filters
            .is_constrained(FilterDimension::Location)
            .then_some(FilterDimension::Location);
        let constraint = remote.and_then(|dimension| {
            filters
                .constraint_value(dimension)
                .map(|value| Constraint::eq(dimension.field(), value))
        });

        let fetched = match self.postings.active(constraint).await {
            Ok(fetched) => fetched,
            Err(e) => {
                self.cache().fail(ticket);
                return Err(e.into());
            }
        };

        let blank = term.trim().is_empty();
        let needle = term.to_lowercase();
        let results: Vec<JobPosting> = fetched
            .into_iter()
            .filter(|posting| filters.matches_except(posting, remote))
            .filter(|posting| blank || posting.matches_term(&needle))
            .collect();

        if !self.cache().finish(ticket, |cache| {
            cache.replace_page(results.clone(), None, false)
        }) {
            tracing::debug!("Dropping superseded search results for {:?}", term);
        }
        Ok(results)
    }

    /// A posting by id, `None` when it does not exist.
    pub async fn get_by_id(&self, id: JobId) -> Result<Option<JobPosting>, BoardError> {
        Ok(self.postings.get(id).await?)
    }

    /// The signed-in company's postings, newest first.
    pub async fn get_for_company(&self) -> Result<Vec<JobPosting>, BoardError> {
        let (principal, _) = access::company(&self.session, "list their postings")?;
        Ok(self.postings.for_company(&principal.id).await?)
    }

    /// Publish a posting for the signed-in company.
    pub async fn post(&self, fields: NewPosting) -> Result<JobId, BoardError> {
        let (principal, company) = access::company(&self.session, "post jobs")?;
        let posting = fields.into_posting(JobId::new(), principal.id, &company, board_core::now())?;

        self.postings.create(&posting).await?;
        tracing::info!("Posted job {} ({})", posting.id, posting.title);
        Ok(posting.id)
    }

    /// Change fields of a posting owned by the signed-in company.
    ///
    /// Only the changed fields and `updated_at` are written, so the
    /// application counter is never overwritten.
    pub async fn update(&self, id: JobId, update: PostingUpdate) -> Result<(), BoardError> {
        let (principal, _) = access::company(&self.session, "update jobs")?;
        let mut posting = self.owned_posting(&principal, id).await?;

        let update = update.normalized();
        let now = board_core::now();
        posting.apply(&update, now)?;

        self.postings.update(id, &update, now).await?;
        self.cache().refresh(&posting);
        tracing::info!("Updated job {}", id);
        Ok(())
    }

    /// Delete a posting owned by the signed-in company.
    pub async fn withdraw(&self, id: JobId) -> Result<(), BoardError> {
        let (principal, _) = access::company(&self.session, "withdraw jobs")?;
        self.owned_posting(&principal, id).await?;

        self.postings.delete(id).await?;
        self.cache().remove(id);
        tracing::info!("Withdrew job {}", id);
        Ok(())
    }

    /// Submit an application for the signed-in job seeker.
    ///
    /// The posting's counter goes up through the store's atomic increment, so
    /// concurrent applications are all counted.
    pub async fn apply(
        &self,
        job_id: JobId,
        fields: NewApplication,
    ) -> Result<ApplicationId, BoardError> {
        let (principal, seeker) = access::job_seeker(&self.session, "apply to jobs")?;

        let cover_letter = fields.cover_letter.trim().to_string();
        if cover_letter.is_empty() {
            return Err(ValidationError::Missing {
                field: "cover_letter",
            }
            .into());
        }
        let resume_url = fields
            .resume_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .or(seeker.resume_url.clone())
            .ok_or(ValidationError::Missing {
                field: "resume_url",
            })?;
        if !is_absolute_url(&resume_url) {
            return Err(ValidationError::InvalidUrl {
                field: "resume_url",
                value: resume_url,
            }
            .into());
        }

        let posting = self
            .postings
            .get(job_id)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("job {job_id}")))?;
        if !posting.is_active {
            return Err(ValidationError::Invalid(format!(
                "job {job_id} is no longer accepting applications"
            ))
            .into());
        }

        let application = Application {
            id: ApplicationId::for_pair(job_id, &principal.id),
            job_id,
            applicant_id: principal.id.clone(),
            applicant_name: seeker.full_name(),
            applicant_email: principal.email.clone(),
            cover_letter,
            resume_url,
            additional_info: fields
                .additional_info
                .map(|info| info.trim().to_string())
                .filter(|info| !info.is_empty()),
            status: ApplicationStatus::Pending,
            applied_at: board_core::now(),
        };

        match self.applications.create(&application).await {
            Ok(()) => {}
            Err(DbError::AlreadyExists(_)) => return Err(BoardError::AlreadyApplied(job_id)),
            Err(e) => return Err(e.into()),
        }

        // Without the increment the application must not stay behind, or a
        // retry would be rejected as a duplicate and the count stay short.
        let count = match self.postings.increment_applications(job_id).await {
            Ok(count) => count,
            Err(e) => {
                if let Err(undo) = self.applications.delete(&application.id).await {
                    tracing::warn!(
                        "Application {} kept after failed count update: {}",
                        application.id,
                        undo
                    );
                }
                return Err(e.into());
            }
        };
        self.cache().set_applications_count(job_id, count);
        tracing::info!("{} applied to job {} ({} applications)", principal.id, job_id, count);
        Ok(application.id)
    }

    /// Applications to a posting owned by the signed-in company, newest first.
    pub async fn applications_for_job(&self, job_id: JobId) -> Result<Vec<Application>, BoardError> {
        let (principal, _) = access::company(&self.session, "review applications")?;
        self.owned_posting(&principal, job_id).await?;
        Ok(self.applications.for_job(job_id).await?)
    }

    /// The signed-in job seeker's applications, newest first.
    pub async fn applications_for_current_user(&self) -> Result<Vec<Application>, BoardError> {
        let (principal, _) = access::job_seeker(&self.session, "list their applications")?;
        Ok(self.applications.for_applicant(&principal.id).await?)
    }

    /// Postings currently held by the browse view.
    pub fn cached_jobs(&self) -> Vec<JobPosting> {
        self.cache().jobs().to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.cache().has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.cache().is_loading()
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn postings(&self) -> &PostingRepository<S> {
        &self.postings
    }

    async fn owned_posting(
        &self,
        principal: &board_core::Principal,
        id: JobId,
    ) -> Result<JobPosting, BoardError> {
        let posting = self
            .postings
            .get(id)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("job {id}")))?;
        access::owns(principal, &posting)?;
        Ok(posting)
    }
}

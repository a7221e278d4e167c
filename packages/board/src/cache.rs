//! In-memory listing state shown by the browse view.

use board_core::{JobId, JobPosting};
use db::Cursor;
use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Opaque position after the last posting of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(Cursor);

impl PageCursor {
    pub(crate) fn new(cursor: Cursor) -> Self {
        Self(cursor)
    }

    pub(crate) fn into_inner(self) -> Cursor {
        self.0
    }

    /// Encode as a string token, e.g. for a query parameter.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    pub fn decode(token: &str) -> Result<Self, BoardError> {
        serde_json::from_str(token)
            .map(Self)
            .map_err(|_| board_core::ValidationError::Invalid(format!("bad page cursor: {token}")).into())
    }
}

/// Marks one fetch; only the newest ticket may write its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

#[derive(Debug)]
pub(crate) struct ListingCache {
    jobs: Vec<JobPosting>,
    cursor: Option<PageCursor>,
    has_more: bool,
    loading: bool,
    generation: u64,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            cursor: None,
            has_more: true,
            loading: false,
            generation: 0,
        }
    }
}

impl ListingCache {
    pub(crate) fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub(crate) fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a fetch, superseding any still in flight.
    pub(crate) fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    /// Apply a fetch result if `ticket` is still the newest fetch.
    pub(crate) fn finish(&mut self, ticket: Ticket, apply: impl FnOnce(&mut Self)) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        apply(self);
        self.loading = false;
        true
    }

    /// A fetch failed; leave the listing as it was.
    pub(crate) fn fail(&mut self, ticket: Ticket) {
        if ticket.0 == self.generation {
            self.loading = false;
        }
    }

    pub(crate) fn replace_page(&mut self, jobs: Vec<JobPosting>, cursor: Option<PageCursor>, has_more: bool) {
        self.jobs = jobs;
        self.cursor = cursor;
        self.has_more = has_more;
    }

    /// Append a following page. An empty page keeps the previous cursor.
    pub(crate) fn append_page(&mut self, jobs: Vec<JobPosting>, cursor: Option<PageCursor>, has_more: bool) {
        self.jobs.extend(jobs);
        if cursor.is_some() {
            self.cursor = cursor;
        }
        self.has_more = has_more;
    }

    /// Swap in a fresh copy of a cached posting; closed postings leave the listing.
    pub(crate) fn refresh(&mut self, posting: &JobPosting) {
        if !posting.is_active {
            self.remove(posting.id);
            return;
        }
        if let Some(cached) = self.jobs.iter_mut().find(|job| job.id == posting.id) {
            *cached = posting.clone();
        }
    }

    pub(crate) fn remove(&mut self, id: JobId) {
        self.jobs.retain(|job| job.id != id);
    }

    pub(crate) fn set_applications_count(&mut self, id: JobId, count: u64) {
        if let Some(cached) = self.jobs.iter_mut().find(|job| job.id == id) {
            cached.applications_count = count;
        }
    }
}

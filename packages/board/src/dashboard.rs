//! Dashboard summaries for companies and job seekers.

use board_core::{Application, ApplicationStatus, JobPosting};
use db::DocumentStore;
use futures_util::future::try_join_all;
use serde::Serialize;

use crate::{BoardError, ListingEngine, access};

/// How many applications the seeker dashboard lists with their postings.
pub const RECENT_APPLICATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDashboard {
    pub total_jobs: usize,
    pub active_jobs: usize,
    /// Sum of the application counters over every posting.
    pub total_applications: u64,
    /// The company's postings, newest first.
    pub postings: Vec<JobPosting>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentApplication {
    pub application: Application,
    /// `None` once the posting has been withdrawn.
    pub posting: Option<JobPosting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeekerDashboard {
    pub submitted: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub recent: Vec<RecentApplication>,
}

impl<S: DocumentStore> ListingEngine<S> {
    pub async fn company_dashboard(&self) -> Result<CompanyDashboard, BoardError> {
        let (principal, _) = access::company(self.session(), "view the company dashboard")?;
        let postings = self.postings().for_company(&principal.id).await?;

        Ok(CompanyDashboard {
            total_jobs: postings.len(),
            active_jobs: postings.iter().filter(|p| p.is_active).count(),
            total_applications: postings.iter().map(|p| p.applications_count).sum(),
            postings,
        })
    }

    pub async fn seeker_dashboard(&self) -> Result<SeekerDashboard, BoardError> {
        access::job_seeker(self.session(), "view the job seeker dashboard")?;
        let applications = self.applications_for_current_user().await?;

        let mut dashboard = SeekerDashboard {
            submitted: applications.len(),
            ..Default::default()
        };
        for application in &applications {
            match application.status {
                ApplicationStatus::Pending => dashboard.pending += 1,
                ApplicationStatus::Reviewed => dashboard.reviewed += 1,
                ApplicationStatus::Accepted => dashboard.accepted += 1,
                ApplicationStatus::Rejected => dashboard.rejected += 1,
            }
        }

        let recent: Vec<Application> = applications.into_iter().take(RECENT_APPLICATIONS).collect();
        let postings = try_join_all(
            recent
                .iter()
                .map(|application| self.postings().get(application.job_id)),
        )
        .await?;
        dashboard.recent = recent
            .into_iter()
            .zip(postings)
            .map(|(application, posting)| RecentApplication {
                application,
                posting,
            })
            .collect();

        Ok(dashboard)
    }
}

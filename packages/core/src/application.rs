//! Job applications submitted by job seekers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, PrincipalId};

/// Application identifier.
///
/// Derived from the (posting, applicant) pair so that a second submission for
/// the same pair collides in the store instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn for_pair(job_id: JobId, applicant_id: &PrincipalId) -> Self {
        Self(format!("{}_{}", job_id, applicant_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status. Transitions are company-initiated and outside this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: PrincipalId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: String,
    pub resume_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub status: ApplicationStatus,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub applied_at: DateTime<Utc>,
}

/// Fields a job seeker fills in on the apply form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub cover_letter: String,
    /// Falls back to the applicant's profile resume when absent.
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

//! Job posting domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::validate::{self, ValidationError};
use crate::{CompanyProfile, PrincipalId};

/// Unique identifier for a posting, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Ulid);

impl JobId {
    /// Create a new unique posting ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a posting ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
    Contract,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Internship => "Internship",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ExperienceLevel {
    #[default]
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A company's job advertisement.
///
/// `company_name` and `company_logo_url` are copied from the company profile
/// when the posting is written. `applications_count` only ever moves through
/// the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: PrincipalId,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo_url: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_microseconds_option"
    )]
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(default)]
    pub applications_count: u64,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub posted_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// Case-insensitive substring match against title, company, description and skills.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_term(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.company_name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(needle))
    }

    pub fn salary_label(&self) -> String {
        crate::format::format_salary(self.salary_min, self.salary_max)
    }

    /// Apply a partial update, validating the merged record.
    pub fn apply(&mut self, update: &PostingUpdate, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update.merge_into(&mut next);
        next.updated_at = now;
        validate_posting(&next)?;
        *self = next;
        Ok(())
    }
}

/// Fields a company supplies when posting a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPosting {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub industry: String,
    #[serde(default)]
    pub salary_min: Option<u64>,
    #[serde(default)]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

impl NewPosting {
    /// Build the stored record for `company`, active with no applications.
    pub fn into_posting(
        self,
        id: JobId,
        company_id: PrincipalId,
        company: &CompanyProfile,
        now: DateTime<Utc>,
    ) -> Result<JobPosting, ValidationError> {
        let posting = JobPosting {
            id,
            company_id,
            company_name: company.company_name.clone(),
            company_logo_url: company.logo_url.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: non_blank(self.requirements),
            benefits: non_blank(self.benefits),
            location: self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            industry: self.industry,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            skills: normalize_skills(self.skills),
            application_deadline: self.application_deadline,
            is_active: true,
            applications_count: 0,
            posted_at: now,
            updated_at: now,
        };
        validate_posting(&posting)?;
        Ok(posting)
    }
}

/// Partial posting fields. Absent fields are left as stored.
///
/// Serializes to exactly the present fields, which is the patch sent to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A blank value clears the field.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "blank_as_null"
    )]
    pub requirements: Option<String>,
    /// A blank value clears the field.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "blank_as_null"
    )]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_microseconds_option"
    )]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl PostingUpdate {
    /// Close the posting to new applications.
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Default::default()
        }
    }

    /// Trim text fields the same way a new posting is normalized.
    ///
    /// Blank `requirements` or `benefits` become empty strings, which the
    /// patch writes as an explicit clear.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        self.requirements = self.requirements.map(|r| r.trim().to_string());
        self.benefits = self.benefits.map(|b| b.trim().to_string());
        self.skills = self.skills.map(normalize_skills);
        self
    }

    fn merge_into(&self, posting: &mut JobPosting) {
        if let Some(title) = &self.title {
            posting.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            posting.description = description.trim().to_string();
        }
        if let Some(requirements) = &self.requirements {
            posting.requirements = non_blank(Some(requirements.clone()));
        }
        if let Some(benefits) = &self.benefits {
            posting.benefits = non_blank(Some(benefits.clone()));
        }
        if let Some(location) = &self.location {
            posting.location = location.clone();
        }
        if let Some(job_type) = self.job_type {
            posting.job_type = job_type;
        }
        if let Some(level) = self.experience_level {
            posting.experience_level = level;
        }
        if let Some(industry) = &self.industry {
            posting.industry = industry.clone();
        }
        if self.salary_min.is_some() {
            posting.salary_min = self.salary_min;
        }
        if self.salary_max.is_some() {
            posting.salary_max = self.salary_max;
        }
        if let Some(skills) = &self.skills {
            posting.skills = normalize_skills(skills.clone());
        }
        if self.application_deadline.is_some() {
            posting.application_deadline = self.application_deadline;
        }
        if let Some(active) = self.is_active {
            posting.is_active = active;
        }
    }
}

fn validate_posting(posting: &JobPosting) -> Result<(), ValidationError> {
    validate::require("title", &posting.title)?;
    validate::require("description", &posting.description)?;
    validate::require("location", &posting.location)?;
    validate::require("industry", &posting.industry)?;
    validate::salary_range(posting.salary_min, posting.salary_max)
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if !skill.is_empty() && !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }
    out
}

fn blank_as_null<S: serde::Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => serializer.serialize_some(text),
        _ => serializer.serialize_none(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

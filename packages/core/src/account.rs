//! Account domain types: principals, roles and role-tagged profiles.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ExperienceLevel;
use crate::validate::{self, ValidationError};

/// Identifier issued by the auth collaborator for a signed-up account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated identity handle. Owned by the auth collaborator; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Account role. Every role-gated operation matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Company => "company",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub location: String,
    pub industry: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}

impl JobSeekerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub contact_person: String,
    pub contact_phone: String,
    /// Set by an administrator out of band; always false at registration.
    #[serde(default)]
    pub verified: bool,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
}

/// Role-tagged extended account data, keyed 1:1 by principal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum Profile {
    JobSeeker(JobSeekerProfile),
    Company(CompanyProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::JobSeeker(_) => Role::JobSeeker,
            Profile::Company(_) => Role::Company,
        }
    }

    pub fn as_company(&self) -> Option<&CompanyProfile> {
        match self {
            Profile::Company(company) => Some(company),
            Profile::JobSeeker(_) => None,
        }
    }

    pub fn as_job_seeker(&self) -> Option<&JobSeekerProfile> {
        match self {
            Profile::JobSeeker(seeker) => Some(seeker),
            Profile::Company(_) => None,
        }
    }

    /// Name shown in navigation and stored as the auth display name.
    pub fn display_name(&self) -> String {
        match self {
            Profile::JobSeeker(seeker) => seeker.full_name(),
            Profile::Company(company) => company.company_name.trim().to_string(),
        }
    }

    /// Merge a partial update into this profile.
    ///
    /// The update must target the same role; the merged result is validated
    /// before it replaces `self`, so a rejected update leaves the profile untouched.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ValidationError> {
        let merged = match (&*self, update) {
            (Profile::JobSeeker(current), ProfileUpdate::JobSeeker(update)) => {
                let mut next = current.clone();
                update.merge_into(&mut next);
                validate_seeker(&next)?;
                Profile::JobSeeker(next)
            }
            (Profile::Company(current), ProfileUpdate::Company(update)) => {
                let mut next = current.clone();
                update.merge_into(&mut next);
                validate_company(&next)?;
                Profile::Company(next)
            }
            (current, _) => return Err(ValidationError::RoleMismatch(current.role())),
        };
        *self = merged;
        Ok(())
    }
}

/// Fields collected by the job seeker sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobSeeker {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub location: String,
    pub industry: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

impl NewJobSeeker {
    pub fn into_profile(self, created_at: DateTime<Utc>) -> Result<JobSeekerProfile, ValidationError> {
        let profile = JobSeekerProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location,
            industry: self.industry,
            experience_level: self.experience_level,
            skills: normalize_skills(self.skills),
            resume_url: non_blank(self.resume_url),
            created_at,
        };
        validate_seeker(&profile)?;
        Ok(profile)
    }
}

/// Fields collected by the company sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub company_name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub contact_person: String,
    pub contact_phone: String,
}

impl NewCompany {
    pub fn into_profile(self, created_at: DateTime<Utc>) -> Result<CompanyProfile, ValidationError> {
        let profile = CompanyProfile {
            company_name: self.company_name.trim().to_string(),
            website: non_blank(self.website),
            industry: self.industry,
            company_size: self.company_size,
            location: self.location,
            description: self.description.trim().to_string(),
            logo_url: non_blank(self.logo_url),
            contact_person: self.contact_person.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            verified: false,
            created_at,
        };
        validate_company(&profile)?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSeekerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Option<BTreeSet<String>>,
    pub resume_url: Option<String>,
}

impl JobSeekerUpdate {
    fn merge_into(self, profile: &mut JobSeekerProfile) {
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            profile.phone = phone.trim().to_string();
        }
        if let Some(location) = self.location {
            profile.location = location;
        }
        if let Some(industry) = self.industry {
            profile.industry = industry;
        }
        if let Some(level) = self.experience_level {
            profile.experience_level = level;
        }
        if let Some(skills) = self.skills {
            profile.skills = normalize_skills(skills);
        }
        if let Some(resume_url) = self.resume_url {
            profile.resume_url = non_blank(Some(resume_url));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
}

impl CompanyUpdate {
    fn merge_into(self, profile: &mut CompanyProfile) {
        if let Some(name) = self.company_name {
            profile.company_name = name.trim().to_string();
        }
        if let Some(website) = self.website {
            profile.website = non_blank(Some(website));
        }
        if let Some(industry) = self.industry {
            profile.industry = industry;
        }
        if let Some(size) = self.company_size {
            profile.company_size = size;
        }
        if let Some(location) = self.location {
            profile.location = location;
        }
        if let Some(description) = self.description {
            profile.description = description.trim().to_string();
        }
        if let Some(logo_url) = self.logo_url {
            profile.logo_url = non_blank(Some(logo_url));
        }
        if let Some(person) = self.contact_person {
            profile.contact_person = person.trim().to_string();
        }
        if let Some(phone) = self.contact_phone {
            profile.contact_phone = phone.trim().to_string();
        }
    }
}

/// Partial profile fields; the variant must match the stored profile's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum ProfileUpdate {
    JobSeeker(JobSeekerUpdate),
    Company(CompanyUpdate),
}

fn validate_seeker(profile: &JobSeekerProfile) -> Result<(), ValidationError> {
    validate::require("first_name", &profile.first_name)?;
    validate::require("last_name", &profile.last_name)?;
    validate::require("phone", &profile.phone)?;
    validate::require("location", &profile.location)?;
    validate::require("industry", &profile.industry)?;
    validate::optional_url("resume_url", profile.resume_url.as_deref())
}

fn validate_company(profile: &CompanyProfile) -> Result<(), ValidationError> {
    validate::require("company_name", &profile.company_name)?;
    validate::require("industry", &profile.industry)?;
    validate::require("location", &profile.location)?;
    validate::require("contact_person", &profile.contact_person)?;
    validate::optional_url("website", profile.website.as_deref())?;
    validate::optional_url("logo_url", profile.logo_url.as_deref())
}

fn normalize_skills(skills: BTreeSet<String>) -> BTreeSet<String> {
    skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Core domain types for the job board.
//!
//! This crate contains shared types used across all packages:
//! - Principal and Profile for accounts
//! - JobPosting for company listings
//! - Application for job seeker submissions
//! - ListingFilters for browse and search
//! - Validation and formatting helpers

mod account;
mod application;
pub mod catalog;
mod clock;
mod filter;
pub mod format;
mod posting;
mod validate;

pub use account::{
    CompanyProfile, CompanyUpdate, JobSeekerProfile, JobSeekerUpdate, NewCompany, NewJobSeeker,
    Principal, PrincipalId, Profile, ProfileUpdate, Role,
};
pub use application::{Application, ApplicationId, ApplicationStatus, NewApplication};
pub use clock::now;
pub use filter::{Filter, FilterDimension, ListingFilters};
pub use posting::{ExperienceLevel, JobId, JobPosting, JobType, NewPosting, PostingUpdate};
pub use validate::ValidationError;

//! Job board logic layer.
//!
//! Two components share one explicit [`Session`]:
//! - [`IdentityStore`] registers, signs in and updates profiles
//! - [`ListingEngine`] browses, searches and writes postings and applications
//!
//! [`JobBoard`] wires both to an auth provider and a document store.

mod access;
mod cache;
mod config;
mod dashboard;
mod error;
mod identity;
mod init;
mod listings;

pub use cache::PageCursor;
pub use config::{BoardConfig, ConfigError, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_PAGE_SIZE};
pub use dashboard::{CompanyDashboard, RECENT_APPLICATIONS, RecentApplication, SeekerDashboard};
pub use error::BoardError;
pub use identity::IdentityStore;
pub use init::{JobBoard, connect_store};
pub use listings::{ListingEngine, ListingPage};

// Re-export core types for convenience
pub use board_core::{
    Application, ApplicationId, ApplicationStatus, CompanyProfile, CompanyUpdate, ExperienceLevel,
    Filter, FilterDimension, JobId, JobPosting, JobSeekerProfile, JobSeekerUpdate, JobType,
    ListingFilters, NewApplication, NewCompany, NewJobSeeker, NewPosting, PostingUpdate,
    Principal, PrincipalId, Profile, ProfileUpdate, Role, ValidationError,
};
pub use session::{Session, SessionPhase, SessionSnapshot};

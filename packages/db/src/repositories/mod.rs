//! Typed repositories over a [`DocumentStore`](crate::DocumentStore).

mod application_repo;
mod posting_repo;
mod profile_repo;

pub use application_repo::ApplicationRepository;
pub use posting_repo::{PostingPage, PostingRepository, fields};
pub use profile_repo::ProfileRepository;

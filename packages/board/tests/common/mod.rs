#![allow(dead_code)]

use std::sync::{Arc, Once};

use auth::{AccountDirectory, MemoryAuthProvider};
use board::{
    BoardConfig, CompanyProfile, ExperienceLevel, JobBoard, JobId, JobPosting, JobType, NewCompany,
    NewJobSeeker, NewPosting, PrincipalId, Profile,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use db::MemoryStore;
use db::repositories::PostingRepository;

pub type Board = JobBoard<MemoryAuthProvider, MemoryStore>;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("board=debug,session=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Shared backend: one account directory and one document store.
pub struct World {
    pub directory: Arc<AccountDirectory>,
    pub store: Arc<MemoryStore>,
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        Self {
            directory: AccountDirectory::new(),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// A new client with its own auth session against the shared backend.
    pub async fn client(&self) -> Board {
        let auth = Arc::new(MemoryAuthProvider::new(Arc::clone(&self.directory)));
        JobBoard::start(auth, Arc::clone(&self.store), &BoardConfig::default())
            .await
            .expect("board starts")
    }

    pub fn postings(&self) -> PostingRepository<MemoryStore> {
        PostingRepository::new(Arc::clone(&self.store))
    }
}

pub fn company_fields(name: &str) -> NewCompany {
    NewCompany {
        company_name: name.to_string(),
        website: Some(format!("https://{}.lk", name.to_lowercase())),
        industry: "Technology".to_string(),
        company_size: "11-50".to_string(),
        location: "Colombo".to_string(),
        description: format!("{name} builds software"),
        logo_url: None,
        contact_person: "Nimal Silva".to_string(),
        contact_phone: "0771234567".to_string(),
    }
}

pub fn seeker_fields(first_name: &str) -> NewJobSeeker {
    NewJobSeeker {
        first_name: first_name.to_string(),
        last_name: "Perera".to_string(),
        phone: "0711111111".to_string(),
        location: "Kandy".to_string(),
        industry: "Technology".to_string(),
        experience_level: ExperienceLevel::Mid,
        skills: ["Rust".to_string(), "React".to_string()].into(),
        resume_url: Some(format!(
            "https://cv.example.com/{}.pdf",
            first_name.to_lowercase()
        )),
    }
}

/// Client signed in as a freshly registered company.
pub async fn company_client(world: &World, name: &str) -> Board {
    let board = world.client().await;
    board
        .identity()
        .register_company(
            &format!("hr@{}.lk", name.to_lowercase()),
            "secret1",
            company_fields(name),
        )
        .await
        .expect("company registers");
    board
}

/// Client signed in as a freshly registered job seeker.
pub async fn seeker_client(world: &World, first_name: &str) -> Board {
    let board = world.client().await;
    board
        .identity()
        .register_job_seeker(
            &format!("{}@example.com", first_name.to_lowercase()),
            "secret1",
            seeker_fields(first_name),
        )
        .await
        .expect("job seeker registers");
    board
}

pub fn job(title: &str, location: &str, job_type: JobType, industry: &str) -> NewPosting {
    NewPosting {
        title: title.to_string(),
        description: format!("{title} wanted"),
        location: location.to_string(),
        job_type,
        experience_level: ExperienceLevel::Mid,
        industry: industry.to_string(),
        ..Default::default()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// Write postings for `board`'s company directly, the i-th posted i minutes after the base time.
pub async fn seed(world: &World, board: &Board, jobs: Vec<(NewPosting, bool)>) -> Vec<JobPosting> {
    let principal = board.identity().current_principal().expect("signed in");
    let company = match board.identity().current_profile() {
        Some(Profile::Company(company)) => company,
        other => panic!("expected a company profile, got {other:?}"),
    };
    let repo = world.postings();
    let mut seeded = Vec::with_capacity(jobs.len());
    for (i, (fields, active)) in jobs.into_iter().enumerate() {
        let posted_at = base_time() + Duration::minutes(i as i64);
        let mut posting = posting_for(&principal.id, &company, fields, posted_at);
        posting.is_active = active;
        repo.create(&posting).await.expect("seed posting");
        seeded.push(posting);
    }
    seeded
}

fn posting_for(
    company_id: &PrincipalId,
    company: &CompanyProfile,
    fields: NewPosting,
    posted_at: DateTime<Utc>,
) -> JobPosting {
    fields
        .into_posting(JobId::new(), company_id.clone(), company, posted_at)
        .expect("valid posting")
}

pub fn ids(postings: &[JobPosting]) -> Vec<JobId> {
    postings.iter().map(|p| p.id).collect()
}

/// Assert newest-first order.
pub fn assert_newest_first(postings: &[JobPosting]) {
    for pair in postings.windows(2) {
        assert!(
            pair[0].posted_at >= pair[1].posted_at,
            "{} posted before {}",
            pair[0].title,
            pair[1].title
        );
    }
}

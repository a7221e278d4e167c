//! Database schema definitions using SurrealQL.

use crate::{Database, DbError};

/// Initialize the database schema.
///
/// Tables are schemaless document collections; only the fields the board
/// queries or counts on are typed, and those carry indexes.
pub async fn init_schema(db: &Database) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    db.query(JOBS_SCHEMA).await?.check()?;
    db.query(APPLICATIONS_SCHEMA).await?.check()?;
    db.query(PROFILES_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Job posting collection.
const JOBS_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS jobs SCHEMALESS;

DEFINE FIELD IF NOT EXISTS company_id ON jobs TYPE string;
DEFINE FIELD IF NOT EXISTS is_active ON jobs TYPE bool DEFAULT true;
DEFINE FIELD IF NOT EXISTS applications_count ON jobs TYPE int DEFAULT 0 ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS posted_at ON jobs TYPE int;
DEFINE FIELD IF NOT EXISTS updated_at ON jobs TYPE int;

-- Browse: active postings newest first, optionally narrowed by one dimension
DEFINE INDEX IF NOT EXISTS jobs_active_posted ON jobs FIELDS is_active, posted_at;
DEFINE INDEX IF NOT EXISTS jobs_location ON jobs FIELDS location;
DEFINE INDEX IF NOT EXISTS jobs_job_type ON jobs FIELDS job_type;
DEFINE INDEX IF NOT EXISTS jobs_experience ON jobs FIELDS experience_level;
DEFINE INDEX IF NOT EXISTS jobs_industry ON jobs FIELDS industry;
DEFINE INDEX IF NOT EXISTS jobs_company ON jobs FIELDS company_id;
"#;

/// Application collection.
const APPLICATIONS_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS applications SCHEMALESS;

DEFINE FIELD IF NOT EXISTS job_id ON applications TYPE string;
DEFINE FIELD IF NOT EXISTS applicant_id ON applications TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON applications TYPE int;

DEFINE INDEX IF NOT EXISTS applications_job ON applications FIELDS job_id;
DEFINE INDEX IF NOT EXISTS applications_applicant ON applications FIELDS applicant_id;
"#;

/// Profile collections, keyed by principal id.
const PROFILES_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS users SCHEMALESS;
DEFINE FIELD IF NOT EXISTS user_type ON users TYPE string;
DEFINE INDEX IF NOT EXISTS users_type ON users FIELDS user_type;

DEFINE TABLE IF NOT EXISTS companies SCHEMALESS;
"#;

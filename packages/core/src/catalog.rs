//! Fixed option lists offered by the posting and registration forms.

use crate::{ExperienceLevel, JobType};

pub const JOB_TYPES: [JobType; 5] = [
    JobType::FullTime,
    JobType::PartTime,
    JobType::Internship,
    JobType::Contract,
    JobType::Freelance,
];

pub const EXPERIENCE_LEVELS: [ExperienceLevel; 4] = [
    ExperienceLevel::Entry,
    ExperienceLevel::Mid,
    ExperienceLevel::Senior,
    ExperienceLevel::Executive,
];

pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "Marketing",
    "Sales",
    "Design",
    "Engineering",
    "Human Resources",
    "Operations",
    "Customer Service",
    "Other",
];

pub const LOCATIONS: &[&str] = &[
    "Remote",
    "Colombo",
    "Kandy",
    "Gampaha",
    "Jaffna",
    "Galle",
    "Hambantota",
];

pub const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-500", "500+"];

/// Salary bands shown as quick picks, as `(min, max)` in rupees.
pub const SALARY_BANDS: [(u64, u64); 4] = [
    (0, 25_000),
    (25_000, 50_000),
    (50_000, 75_000),
    (75_000, 100_000),
];

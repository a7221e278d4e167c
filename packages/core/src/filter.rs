//! Browse/search filter configuration.

use serde_json::Value;

use crate::{ExperienceLevel, JobPosting, JobType};

/// A single filter dimension: either unconstrained (`All`) or one concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn only(value: T) -> Self {
        Filter::Only(value)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(value) => Some(value),
        }
    }

    pub fn accepts(&self, candidate: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(value) => value == candidate,
        }
    }
}

impl Filter<String> {
    /// Parse a form value where `"all"` (any case) or blank means no constraint.
    pub fn from_param(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Filter::All
        } else {
            Filter::Only(value.to_string())
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Filter::Only(value),
            None => Filter::All,
        }
    }
}

/// The filterable posting fields, in remote-constraint precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterDimension {
    Location,
    JobType,
    ExperienceLevel,
    Industry,
}

impl FilterDimension {
    /// Precedence used to pick the single dimension pushed to the store.
    pub const PRECEDENCE: [FilterDimension; 4] = [
        FilterDimension::Location,
        FilterDimension::JobType,
        FilterDimension::ExperienceLevel,
        FilterDimension::Industry,
    ];

    /// Stored document field for this dimension.
    pub fn field(&self) -> &'static str {
        match self {
            FilterDimension::Location => "location",
            FilterDimension::JobType => "job_type",
            FilterDimension::ExperienceLevel => "experience_level",
            FilterDimension::Industry => "industry",
        }
    }
}

/// Filters applied to browse and search.
///
/// Active-only is implied and not represented here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    pub location: Filter<String>,
    pub job_type: Filter<JobType>,
    pub experience_level: Filter<ExperienceLevel>,
    pub industry: Filter<String>,
}

impl ListingFilters {
    /// Every dimension set to "all".
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Filter::Only(location.into());
        self
    }

    pub fn with_job_type(mut self, job_type: JobType) -> Self {
        self.job_type = Filter::Only(job_type);
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Filter::Only(level);
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Filter::Only(industry.into());
        self
    }

    pub fn is_constrained(&self, dimension: FilterDimension) -> bool {
        match dimension {
            FilterDimension::Location => !self.location.is_all(),
            FilterDimension::JobType => !self.job_type.is_all(),
            FilterDimension::ExperienceLevel => !self.experience_level.is_all(),
            FilterDimension::Industry => !self.industry.is_all(),
        }
    }

    /// First constrained dimension in precedence order, if any.
    pub fn remote_dimension(&self) -> Option<FilterDimension> {
        FilterDimension::PRECEDENCE
            .into_iter()
            .find(|dimension| self.is_constrained(*dimension))
    }

    /// Stored-document value a dimension is constrained to.
    pub fn constraint_value(&self, dimension: FilterDimension) -> Option<Value> {
        match dimension {
            FilterDimension::Location => self.location.value().map(|v| Value::from(v.as_str())),
            FilterDimension::JobType => self.job_type.value().map(|v| Value::from(v.as_str())),
            FilterDimension::ExperienceLevel => {
                self.experience_level.value().map(|v| Value::from(v.as_str()))
            }
            FilterDimension::Industry => self.industry.value().map(|v| Value::from(v.as_str())),
        }
    }

    pub fn accepts(&self, dimension: FilterDimension, posting: &JobPosting) -> bool {
        match dimension {
            FilterDimension::Location => self.location.accepts(&posting.location),
            FilterDimension::JobType => self.job_type.accepts(&posting.job_type),
            FilterDimension::ExperienceLevel => {
                self.experience_level.accepts(&posting.experience_level)
            }
            FilterDimension::Industry => self.industry.accepts(&posting.industry),
        }
    }

    /// Client-side post-filter over every dimension except the one already applied remotely.
    pub fn matches_except(&self, posting: &JobPosting, remote: Option<FilterDimension>) -> bool {
        FilterDimension::PRECEDENCE
            .into_iter()
            .filter(|dimension| Some(*dimension) != remote)
            .all(|dimension| self.accepts(dimension, posting))
    }

    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.matches_except(posting, None)
    }
}

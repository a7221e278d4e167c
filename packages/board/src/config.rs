//! Board configuration.

use db::DbConfig;
use thiserror::Error;

/// Postings fetched per browse page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Shortest password accepted at registration.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub page_size: usize,
    pub min_password_length: usize,
    pub db: DbConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            db: DbConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Build a config from environment variables.
    ///
    /// - `JOBBOARD_PAGE_SIZE` (default: 10)
    /// - the `JOBBOARD_DB_*` variables read by [`DbConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            db: DbConfig::from_env(),
            ..Default::default()
        };
        if let Ok(value) = std::env::var("JOBBOARD_PAGE_SIZE") {
            config.page_size = parse_positive("JOBBOARD_PAGE_SIZE", &value)?;
        }
        Ok(config)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_db(mut self, db: DbConfig) -> Self {
        self.db = db;
        self
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_must_be_positive() {
        assert_eq!(parse_positive("JOBBOARD_PAGE_SIZE", " 25 "), Ok(25));
        assert!(parse_positive("JOBBOARD_PAGE_SIZE", "0").is_err());
        assert!(parse_positive("JOBBOARD_PAGE_SIZE", "ten").is_err());
    }

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.min_password_length, 6);
        assert_eq!(config.db.endpoint, "mem://");
    }
}

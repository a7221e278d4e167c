//! Error taxonomy surfaced to callers of the board.

use auth::AuthError;
use board_core::{JobId, ValidationError};
use db::DbError;
use session::SessionError;
use thiserror::Error;

/// Every failure an identity or listing operation can report.
///
/// Validation and authorization failures are raised before any remote call.
/// Remote failures are passed through without retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("an account already exists for {0}")]
    DuplicateAccount(String),

    #[error("already applied to job {0}")]
    AlreadyApplied(JobId),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BoardError {
    pub fn authorization(reason: impl Into<String>) -> Self {
        BoardError::Authorization(reason.into())
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        BoardError::NotFound(what.to_string())
    }

    /// Whether the same call might succeed if simply repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BoardError::RemoteUnavailable(_))
    }
}

impl From<DbError> for BoardError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => BoardError::NotFound(what),
            DbError::Connection(_) | DbError::Unavailable(_) => {
                BoardError::RemoteUnavailable(err.to_string())
            }
            // Repeating the call would fail the same way.
            DbError::Query(_)
            | DbError::AlreadyExists(_)
            | DbError::InvalidField(_)
            | DbError::Serialization(_) => BoardError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for BoardError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => BoardError::Authentication(err.to_string()),
            AuthError::EmailInUse(email) => BoardError::DuplicateAccount(email),
            AuthError::InvalidEmail(email) => ValidationError::InvalidEmail(email).into(),
            AuthError::WeakPassword { min } => ValidationError::PasswordTooShort { min }.into(),
            AuthError::UnknownPrincipal(id) => BoardError::not_found(format!("principal {id}")),
            AuthError::Unavailable(reason) => BoardError::RemoteUnavailable(reason),
        }
    }
}

impl From<SessionError> for BoardError {
    fn from(err: SessionError) -> Self {
        BoardError::Internal(err.to_string())
    }
}

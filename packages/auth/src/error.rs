use board_core::PrincipalId;
use thiserror::Error;

/// Auth collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account already exists for {0}")]
    EmailInUse(String),
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("unknown principal: {0}")]
    UnknownPrincipal(PrincipalId),
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

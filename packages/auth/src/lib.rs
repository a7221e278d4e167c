//! Auth collaborator for the job board.
//!
//! The board only needs account creation, sign-in/out, a session-change
//! feed and display-name updates. [`AuthProvider`] is that surface;
//! [`MemoryAuthProvider`] implements it in-process over a shared
//! [`AccountDirectory`].

mod error;
mod memory;
mod provider;
mod subscription;

pub use error::AuthError;
pub use memory::{AccountDirectory, MIN_PASSWORD_LENGTH, MemoryAuthProvider};
pub use provider::AuthProvider;
pub use subscription::{SessionCallback, SessionSubscription};

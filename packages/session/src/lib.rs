//! Explicit session state for one job board client.
//!
//! [`Session`] is the single source of truth for who is signed in and which
//! profile they carry. It is passed to every component that needs it instead
//! of living in a global. [`attach_session`] wires it to an auth provider
//! through the [`SessionListener`] actor; the returned [`AttachedSession`]
//! detaches it again.
//!
//! # Usage
//!
//! ```ignore
//! let session = Session::new();
//! let attached = attach_session(&auth, store, session.clone()).await?;
//! // ... use the board ...
//! attached.dispose().await;
//! ```

mod attach;
mod listener;
mod state;

pub use attach::{AttachedSession, SessionError, attach_session};
pub use listener::{SessionListener, SessionMessage};
pub use state::{Session, SessionPhase, SessionSnapshot};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef};

//! Session lifecycle: attach to an auth provider, dispose when done.

use std::sync::Arc;

use auth::{AuthProvider, SessionSubscription};
use db::DocumentStore;
use db::repositories::ProfileRepository;
use ractor::{Actor, ActorRef};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::listener::SessionListenerState;
use crate::{Session, SessionListener, SessionMessage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start session listener: {0}")]
    Spawn(#[from] ractor::SpawnErr),
    #[error("session listener unavailable: {0}")]
    Unavailable(String),
}

/// A session wired to an auth provider.
///
/// Dropping it without [`dispose`](Self::dispose) still detaches the callback
/// and stops the listener, without waiting for it.
pub struct AttachedSession {
    session: Session,
    actor: ActorRef<SessionMessage>,
    handle: Option<JoinHandle<()>>,
    subscription: Option<SessionSubscription>,
}

/// Attach `session` to `auth`'s session-change feed.
///
/// The current auth state is delivered right away and applied before this
/// returns, so a provider that is already signed in has its profile load
/// under way.
pub async fn attach_session<A, S>(
    auth: &A,
    store: Arc<S>,
    session: Session,
) -> Result<AttachedSession, SessionError>
where
    A: AuthProvider,
    S: DocumentStore,
{
    let args = SessionListenerState::new(session.clone(), ProfileRepository::new(store));
    let (actor, handle) = Actor::spawn(None, SessionListener::<S>::new(), args).await?;

    let forward = actor.clone();
    let subscription = auth.on_session_change(move |principal| {
        if let Err(e) = forward.send_message(SessionMessage::PrincipalChanged(principal)) {
            tracing::debug!("Session listener gone, dropping transition: {}", e);
        }
    });

    // The initial auth state is already queued; have it applied before returning.
    let (tx, rx) = ractor::concurrency::oneshot();
    actor
        .send_message(SessionMessage::Sync { reply: tx.into() })
        .map_err(|e| SessionError::Unavailable(e.to_string()))?;
    rx.await
        .map_err(|_| SessionError::Unavailable("listener stopped during attach".into()))?;

    tracing::info!("Session attached");
    Ok(AttachedSession {
        session,
        actor,
        handle: Some(handle),
        subscription: Some(subscription),
    })
}

impl AttachedSession {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Detach from the auth provider and wait for the listener to stop.
    ///
    /// Transitions already delivered are applied first; later ones are not seen.
    pub async fn dispose(mut self) {
        drop(self.subscription.take());
        let _ = self.actor.send_message(SessionMessage::Shutdown);
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::warn!("Session listener ended abnormally: {}", e);
        }
        tracing::info!("Session disposed");
    }
}

impl Drop for AttachedSession {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.actor.stop(None);
        }
    }
}

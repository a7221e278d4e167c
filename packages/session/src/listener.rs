//! Actor that follows auth transitions and keeps the session in step.

use std::marker::PhantomData;

use board_core::{Principal, Profile};
use db::DocumentStore;
use db::repositories::ProfileRepository;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};

use crate::Session;

/// Messages for the SessionListener.
#[derive(Debug)]
pub enum SessionMessage {
    /// The auth provider reported a new signed-in principal, or none.
    PrincipalChanged(Option<Principal>),

    /// A profile load started at `generation` finished.
    ProfileLoaded {
        generation: u64,
        profile: Option<Profile>,
    },

    /// Reply once every message queued before this one has been handled.
    Sync { reply: RpcReplyPort<()> },

    /// Stop after the messages already queued.
    Shutdown,
}

/// State for the session listener.
pub struct SessionListenerState<S> {
    session: Session,
    profiles: ProfileRepository<S>,
}

impl<S> SessionListenerState<S> {
    pub fn new(session: Session, profiles: ProfileRepository<S>) -> Self {
        Self { session, profiles }
    }
}

/// Listener actor attached to one auth provider.
///
/// Profile loads run off the actor so a sign-out queued behind a slow load is
/// handled at once; the load's result is applied only if no transition
/// happened in between.
pub struct SessionListener<S> {
    _store: PhantomData<fn() -> S>,
}

impl<S> SessionListener<S> {
    pub fn new() -> Self {
        Self {
            _store: PhantomData,
        }
    }
}

impl<S> Default for SessionListener<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentStore> Actor for SessionListener<S> {
    type Msg = SessionMessage;
    type State = SessionListenerState<S>;
    type Arguments = SessionListenerState<S>;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::debug!("Starting session listener");
        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SessionMessage::PrincipalChanged(None) => {
                state.session.clear();
            }

            SessionMessage::PrincipalChanged(Some(principal)) => {
                // Registration and login install the profile themselves.
                if state.session.is_ready_for(&principal.id) {
                    return Ok(());
                }

                let principal_id = principal.id.clone();
                let generation = state.session.begin(principal);
                let profiles = state.profiles.clone();
                tokio::spawn(async move {
                    let profile = match profiles.get(&principal_id).await {
                        Ok(profile) => profile,
                        Err(e) => {
                            tracing::warn!("Failed to load profile for {}: {}", principal_id, e);
                            None
                        }
                    };
                    // The listener may already be gone; the load is then moot.
                    let _ = myself.send_message(SessionMessage::ProfileLoaded {
                        generation,
                        profile,
                    });
                });
            }

            SessionMessage::ProfileLoaded {
                generation,
                profile,
            } => {
                if !state.session.complete(generation, profile) {
                    tracing::debug!("Dropping superseded profile load (generation {})", generation);
                }
            }

            SessionMessage::Sync { reply } => {
                let _ = reply.send(());
            }

            SessionMessage::Shutdown => {
                tracing::debug!("Session listener shutting down");
                myself.stop(None);
            }
        }

        Ok(())
    }
}

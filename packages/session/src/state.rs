//! Shared session state.

use std::sync::Arc;

use board_core::{Principal, PrincipalId, Profile};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    SignedOut,
    /// Signed in, profile not loaded yet.
    Loading,
    Ready,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub principal: Option<Principal>,
    pub profile: Option<Profile>,
    pub phase: SessionPhase,
    generation: u64,
}

impl SessionSnapshot {
    /// Bumped on every sign-in, sign-out or establish.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn principal_id(&self) -> Option<&PrincipalId> {
        self.principal.as_ref().map(|p| &p.id)
    }
}

/// Handle to one client's session. Clones share the same state.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// True when `id` is signed in and its profile load has finished.
    pub fn is_ready_for(&self, id: &PrincipalId) -> bool {
        let state = self.state.borrow();
        state.phase == SessionPhase::Ready && state.principal_id() == Some(id)
    }

    /// Start loading the profile for `principal`. Returns the load's generation.
    pub fn begin(&self, principal: Principal) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.principal = Some(principal);
            state.profile = None;
            state.phase = SessionPhase::Loading;
            generation = state.generation;
        });
        generation
    }

    /// Finish the load started at `generation`.
    ///
    /// Returns false, leaving the session untouched, when the load was
    /// superseded by a later transition.
    pub fn complete(&self, generation: u64, profile: Option<Profile>) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation != generation || state.phase != SessionPhase::Loading {
                return false;
            }
            state.profile = profile;
            state.phase = SessionPhase::Ready;
            true
        })
    }

    /// Install a principal together with its already known profile.
    pub fn establish(&self, principal: Principal, profile: Option<Profile>) {
        self.state.send_modify(|state| {
            state.generation += 1;
            state.principal = Some(principal);
            state.profile = profile;
            state.phase = SessionPhase::Ready;
        });
    }

    /// Return to signed out. Idempotent.
    pub fn clear(&self) {
        self.state.send_if_modified(|state| {
            if state.phase == SessionPhase::SignedOut {
                return false;
            }
            state.generation += 1;
            state.principal = None;
            state.profile = None;
            state.phase = SessionPhase::SignedOut;
            true
        });
    }

    /// Swap in an updated profile, provided `id` is still the signed-in principal.
    pub fn replace_profile(&self, id: &PrincipalId, profile: Profile) -> bool {
        self.state.send_if_modified(|state| {
            if state.principal_id() != Some(id) {
                return false;
            }
            state.profile = Some(profile);
            true
        })
    }

    /// Receiver notified on every session change.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Wait until the session satisfies `predicate`, returning that state.
    pub async fn wait_for<F>(&self, mut predicate: F) -> SessionSnapshot
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| predicate(state)).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.snapshot(),
        }
    }
}

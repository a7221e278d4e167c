//! Board bootstrap.

use std::sync::Arc;

use auth::AuthProvider;
use db::{DocumentStore, SurrealStore};
use session::{AttachedSession, Session, attach_session};

use crate::{BoardConfig, BoardError, IdentityStore, ListingEngine};

/// One client's job board: identity store and listing engine sharing a session.
pub struct JobBoard<A, S> {
    identity: IdentityStore<A, S>,
    listings: ListingEngine<S>,
    attached: AttachedSession,
}

impl<A: AuthProvider, S: DocumentStore> JobBoard<A, S> {
    /// Create a session, attach it to `auth` and build both components on it.
    pub async fn start(auth: Arc<A>, store: Arc<S>, config: &BoardConfig) -> Result<Self, BoardError> {
        tracing::info!("Starting job board...");

        let session = Session::new();
        let attached = attach_session(auth.as_ref(), Arc::clone(&store), session.clone()).await?;
        let identity = IdentityStore::new(auth, Arc::clone(&store), session.clone(), config);
        let listings = ListingEngine::new(store, session, config);

        tracing::info!("Job board started");
        Ok(Self {
            identity,
            listings,
            attached,
        })
    }

    pub fn identity(&self) -> &IdentityStore<A, S> {
        &self.identity
    }

    pub fn listings(&self) -> &ListingEngine<S> {
        &self.listings
    }

    pub fn session(&self) -> &Session {
        self.attached.session()
    }

    /// Detach the session from the auth provider.
    pub async fn shutdown(self) {
        self.attached.dispose().await;
    }
}

/// Connect to the SurrealDB store named by `config`, creating the schema if needed.
pub async fn connect_store(config: &BoardConfig) -> Result<Arc<SurrealStore>, BoardError> {
    let store = SurrealStore::connect(&config.db).await?;
    Ok(Arc::new(store))
}

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use auth::{AccountDirectory, MemoryAuthProvider};
use db::MemoryStore;
use session::{Session, SessionSnapshot};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("session=debug")
            .with_test_writer()
            .try_init();
    });
}

pub struct Harness {
    pub auth: MemoryAuthProvider,
    pub store: Arc<MemoryStore>,
    pub session: Session,
}

pub fn harness() -> Harness {
    init_tracing();
    Harness {
        auth: MemoryAuthProvider::new(AccountDirectory::new()),
        store: Arc::new(MemoryStore::new()),
        session: Session::new(),
    }
}

/// Wait for the session to reach a state, failing the test after a second.
pub async fn settle<F>(session: &Session, predicate: F) -> SessionSnapshot
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), session.wait_for(predicate))
        .await
        .expect("session did not settle")
}

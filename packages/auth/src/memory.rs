//! In-process auth service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use board_core::format::is_valid_email;
use board_core::{Principal, PrincipalId};
use sha2::{Digest, Sha256};
use ulid::Ulid;

use crate::subscription::Listeners;
use crate::{AuthError, AuthProvider, SessionSubscription};

/// Shortest password the service accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    principal: Principal,
    salt: String,
    digest: String,
}

impl Account {
    fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.digest
    }
}

#[derive(Default)]
struct Accounts {
    by_id: HashMap<PrincipalId, Account>,
    /// Lowercased email to principal id.
    by_email: HashMap<String, PrincipalId>,
}

/// Account registry shared by every client of one auth service.
#[derive(Default)]
pub struct AccountDirectory {
    accounts: Mutex<Accounts>,
    offline: AtomicBool,
}

impl AccountDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call fail with `AuthError::Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.lock().by_id.len()
    }

    /// Look up the stored principal for an id.
    pub fn principal(&self, id: &PrincipalId) -> Option<Principal> {
        self.lock().by_id.get(id).map(|account| account.principal.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn round_trip(&self) -> Result<(), AuthError> {
        tokio::task::yield_now().await;
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("auth service is offline".into()));
        }
        Ok(())
    }

    fn create(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let key = email.to_lowercase();
        let mut accounts = self.lock();
        if accounts.by_email.contains_key(&key) {
            return Err(AuthError::EmailInUse(email.to_string()));
        }

        let principal = Principal {
            id: PrincipalId::new(Ulid::new().to_string()),
            email: email.to_string(),
            email_verified: false,
            display_name: None,
        };
        let salt = Ulid::new().to_string();
        let digest = hash_password(&salt, password);
        accounts.by_email.insert(key, principal.id.clone());
        accounts.by_id.insert(
            principal.id.clone(),
            Account {
                principal: principal.clone(),
                salt,
                digest,
            },
        );
        Ok(principal)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let accounts = self.lock();
        accounts
            .by_email
            .get(&email.trim().to_lowercase())
            .and_then(|id| accounts.by_id.get(id))
            .filter(|account| account.verify(password))
            .map(|account| account.principal.clone())
            .ok_or(AuthError::InvalidCredentials)
    }

    fn rename(&self, id: &PrincipalId, name: &str) -> Result<Principal, AuthError> {
        let mut accounts = self.lock();
        let account = accounts
            .by_id
            .get_mut(id)
            .ok_or_else(|| AuthError::UnknownPrincipal(id.clone()))?;
        account.principal.display_name = Some(name.trim().to_string());
        Ok(account.principal.clone())
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// One client of the in-process auth service.
pub struct MemoryAuthProvider {
    directory: Arc<AccountDirectory>,
    current: Mutex<Option<Principal>>,
    listeners: Arc<Listeners>,
}

impl MemoryAuthProvider {
    pub fn new(directory: Arc<AccountDirectory>) -> Self {
        Self {
            directory,
            current: Mutex::new(None),
            listeners: Arc::new(Listeners::default()),
        }
    }

    pub fn directory(&self) -> &Arc<AccountDirectory> {
        &self.directory
    }

    fn current_lock(&self) -> MutexGuard<'_, Option<Principal>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the signed-in principal and notify listeners.
    ///
    /// The lock is held across notification so listeners see transitions in order.
    fn transition(&self, next: Option<Principal>) {
        let mut current = self.current_lock();
        *current = next;
        self.listeners.notify(current.as_ref());
    }
}

impl AuthProvider for MemoryAuthProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        self.directory.round_trip().await?;
        let principal = self.directory.create(email, password)?;
        tracing::info!("Created account {}", principal.id);
        self.transition(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        self.directory.round_trip().await?;
        let principal = self.directory.authenticate(email, password)?;
        tracing::debug!("Signed in {}", principal.id);
        self.transition(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.directory.round_trip().await?;
        if self.current_lock().is_some() {
            self.transition(None);
        }
        Ok(())
    }

    async fn update_display_name(&self, principal_id: &PrincipalId, name: &str) -> Result<(), AuthError> {
        self.directory.round_trip().await?;
        let principal = self.directory.rename(principal_id, name)?;
        let mut current = self.current_lock();
        if let Some(signed_in) = current.as_mut()
            && signed_in.id == principal.id
        {
            *signed_in = principal;
        }
        Ok(())
    }

    fn current(&self) -> Option<Principal> {
        self.current_lock().clone()
    }

    fn on_session_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(Option<Principal>) + Send + Sync + 'static,
    {
        let current = self.current_lock();
        let callback: crate::SessionCallback = Arc::new(callback);
        let subscription = self.listeners.register(Arc::clone(&callback));
        callback(current.clone());
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryAuthProvider {
        MemoryAuthProvider::new(AccountDirectory::new())
    }

    #[tokio::test]
    async fn accounts_sign_in_case_insensitively() {
        let auth = provider();
        let created = auth.create_account("Nimal@Example.com", "secret1").await.unwrap();
        assert_eq!(auth.current(), Some(created.clone()));

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current(), None);

        let signed_in = auth.sign_in("nimal@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.id, created.id);
        assert_eq!(
            auth.sign_in("nimal@example.com", "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn duplicate_and_weak_accounts_are_rejected() {
        let auth = provider();
        auth.create_account("hr@acme.lk", "secret1").await.unwrap();
        assert!(matches!(
            auth.create_account("HR@acme.lk", "secret2").await,
            Err(AuthError::EmailInUse(_))
        ));
        assert_eq!(
            auth.create_account("new@acme.lk", "12345").await,
            Err(AuthError::WeakPassword { min: 6 })
        );
        assert!(matches!(
            auth.create_account("not-an-email", "secret1").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert_eq!(auth.directory().account_count(), 1);
    }

    #[tokio::test]
    async fn clients_share_one_directory() {
        let directory = AccountDirectory::new();
        let first = MemoryAuthProvider::new(Arc::clone(&directory));
        let second = MemoryAuthProvider::new(directory);

        let principal = first.create_account("a@b.lk", "secret1").await.unwrap();
        first
            .update_display_name(&principal.id, " Kamal Perera ")
            .await
            .unwrap();
        assert_eq!(
            first.current().and_then(|p| p.display_name).as_deref(),
            Some("Kamal Perera")
        );

        let other = second.sign_in("a@b.lk", "secret1").await.unwrap();
        assert_eq!(other.display_name.as_deref(), Some("Kamal Perera"));
        assert!(first.current().is_some());
    }

    #[tokio::test]
    async fn session_callbacks_fire_until_unsubscribed() {
        let auth = provider();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = auth.on_session_change(move |principal| {
            sink.lock().unwrap().push(principal.map(|p| p.email));
        });

        auth.create_account("a@b.lk", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();
        auth.sign_out().await.unwrap();
        subscription.unsubscribe();
        assert_eq!(auth.listeners.len(), 0);
        auth.sign_in("a@b.lk", "secret1").await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("a@b.lk".to_string()), None]
        );
    }

    #[tokio::test]
    async fn offline_service_reports_unavailable() {
        let auth = provider();
        auth.directory().set_offline(true);
        assert!(matches!(
            auth.create_account("a@b.lk", "secret1").await,
            Err(AuthError::Unavailable(_))
        ));
        assert_eq!(auth.directory().account_count(), 0);
    }
}

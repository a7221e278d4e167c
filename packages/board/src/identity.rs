//! Identity store: registration, sign-in and the signed-in profile.

use std::sync::Arc;

use auth::AuthProvider;
use board_core::format::is_valid_email;
use board_core::{
    NewCompany, NewJobSeeker, Principal, PrincipalId, Profile, ProfileUpdate, ValidationError,
};
use db::DocumentStore;
use db::repositories::ProfileRepository;
use session::Session;

use crate::{BoardConfig, BoardError};

/// Tracks who is signed in and gates profile writes to that principal.
pub struct IdentityStore<A, S> {
    auth: Arc<A>,
    profiles: ProfileRepository<S>,
    session: Session,
    min_password_length: usize,
}

impl<A: AuthProvider, S: DocumentStore> IdentityStore<A, S> {
    pub fn new(auth: Arc<A>, store: Arc<S>, session: Session, config: &BoardConfig) -> Self {
        Self {
            auth,
            profiles: ProfileRepository::new(store),
            session,
            min_password_length: config.min_password_length,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Create a job seeker account and its profile, and sign it in.
    pub async fn register_job_seeker(
        &self,
        email: &str,
        password: &str,
        fields: NewJobSeeker,
    ) -> Result<Principal, BoardError> {
        self.check_credentials(email, password)?;
        let profile = Profile::JobSeeker(fields.into_profile(board_core::now())?);
        self.register(email, password, profile).await
    }

    /// Create a company account and its unverified profile, and sign it in.
    pub async fn register_company(
        &self,
        email: &str,
        password: &str,
        fields: NewCompany,
    ) -> Result<Principal, BoardError> {
        self.check_credentials(email, password)?;
        let profile = Profile::Company(fields.into_profile(board_core::now())?);
        self.register(email, password, profile).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, BoardError> {
        let principal = self.auth.sign_in(email, password).await?;
        let profile = self.profiles.get(&principal.id).await?;
        if profile.is_none() {
            tracing::warn!("Principal {} has no profile", principal.id);
        }
        self.session.establish(principal.clone(), profile);
        tracing::info!("Logged in {}", principal.id);
        Ok(principal)
    }

    /// Sign out. The session is cleared even if the auth service cannot be reached.
    pub async fn logout(&self) -> Result<(), BoardError> {
        self.session.clear();
        self.auth.sign_out().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.session.principal()
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.session.profile()
    }

    /// Merge `update` into the signed-in principal's profile and store it.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, BoardError> {
        let snapshot = self.session.snapshot();
        let principal = snapshot.principal.ok_or(BoardError::NotAuthenticated)?;

        let mut profile = match snapshot.profile {
            Some(profile) => profile,
            None => self
                .profiles
                .get(&principal.id)
                .await?
                .ok_or_else(|| BoardError::not_found(format!("profile {}", principal.id)))?,
        };
        let previous_name = profile.display_name();
        profile.apply(update)?;

        self.profiles.save(&principal.id, &profile).await?;
        let name = profile.display_name();
        if name != previous_name {
            self.auth.update_display_name(&principal.id, &name).await?;
        }

        self.session.replace_profile(&principal.id, profile.clone());
        tracing::info!("Updated {} profile for {}", profile.role(), principal.id);
        Ok(profile)
    }

    /// Stored profile for any principal, e.g. the company behind a posting.
    pub async fn profile_of(&self, id: &PrincipalId) -> Result<Option<Profile>, BoardError> {
        Ok(self.profiles.get(id).await?)
    }

    fn check_credentials(&self, email: &str, password: &str) -> Result<(), ValidationError> {
        if email.trim().is_empty() {
            return Err(ValidationError::Missing { field: "email" });
        }
        if !is_valid_email(email.trim()) {
            return Err(ValidationError::InvalidEmail(email.trim().to_string()));
        }
        if password.chars().count() < self.min_password_length {
            return Err(ValidationError::PasswordTooShort {
                min: self.min_password_length,
            });
        }
        Ok(())
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        profile: Profile,
    ) -> Result<Principal, BoardError> {
        let mut principal = self.auth.create_account(email.trim(), password).await?;
        let name = profile.display_name();

        let written = async {
            self.profiles.save(&principal.id, &profile).await?;
            self.auth.update_display_name(&principal.id, &name).await?;
            Ok::<(), BoardError>(())
        }
        .await;
        if let Err(e) = written {
            tracing::warn!(
                "Account {} ({}) created without a complete {} profile: {}",
                principal.id,
                principal.email,
                profile.role(),
                e
            );
            return Err(e);
        }
        principal.display_name = Some(name);
        tracing::info!("Registered {} {}", profile.role(), principal.id);

        self.session.establish(principal.clone(), Some(profile));
        Ok(principal)
    }
}

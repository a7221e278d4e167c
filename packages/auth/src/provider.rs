use std::future::Future;

use board_core::{Principal, PrincipalId};

use crate::{AuthError, SessionSubscription};

/// Account and session operations delegated to the auth service.
///
/// One provider is one client: it holds at most one signed-in principal.
pub trait AuthProvider: Send + Sync + 'static {
    /// Create an account and sign it in.
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Principal, AuthError>> + Send;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Principal, AuthError>> + Send;

    /// Sign out. Signing out with nobody signed in is a no-op.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    fn update_display_name(
        &self,
        principal_id: &PrincipalId,
        name: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// The signed-in principal, if any.
    fn current(&self) -> Option<Principal>;

    /// Register `callback` for session transitions.
    ///
    /// The callback is invoked once right away with the current principal and
    /// then after every sign-in or sign-out, until the subscription goes away.
    /// It runs on the notifying task and must not call back into the provider.
    fn on_session_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(Option<Principal>) + Send + Sync + 'static;
}

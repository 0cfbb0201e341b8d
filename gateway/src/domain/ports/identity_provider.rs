//! Driven port for the external identity provider.
//!
//! The provider verifies credentials and owns the session. Adapters report
//! failures as [`IdentityProviderError`]; coded rejections keep the
//! provider's machine-readable code so the domain can map it.

use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider answered and refused the request with a code.
        Rejected { code: String, message: String } =>
            "identity provider rejected the request ({code}): {message}",
        /// The request never produced a provider answer.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider answered with a payload the adapter could not read.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
    }
}

impl IdentityProviderError {
    /// Provider code of a [`Self::Rejected`] error.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => Some(code.as_str()),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Port for the identity provider client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate and make the account the current session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), IdentityProviderError>;

    /// Create an account, sign it in, and return its identifier.
    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError>;

    /// Drop the current session.
    async fn sign_out(&self) -> Result<(), IdentityProviderError>;

    /// Send the out-of-band password reset email.
    async fn send_password_reset_email(&self, email: &str) -> Result<(), IdentityProviderError>;

    /// Apply a new password using a reset code.
    async fn confirm_password_reset(
        &self,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityProviderError>;

    /// Identifier of the signed-in account, if any.
    fn current_user(&self) -> Option<String>;

    /// Open a secondary client context sharing this provider's configuration
    /// but holding its own session.
    async fn open_isolated_context(
        &self,
        name: &str,
    ) -> Result<Arc<dyn IsolatedProviderContext>, IdentityProviderError>;
}

/// Secondary provider context whose session never touches the primary one.
///
/// The holder must call [`Self::release`] once it is done; a released
/// context rejects further use.
#[async_trait]
pub trait IsolatedProviderContext: Send + Sync {
    /// Name the context was opened with.
    fn name(&self) -> &str;

    /// Create an account inside this context and return its identifier.
    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError>;

    /// Tear the context down.
    async fn release(&self) -> Result<(), IdentityProviderError>;
}

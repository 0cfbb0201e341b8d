//! Driving port for authentication use-cases.
//!
//! Application code depends on [`AuthenticationGateway`] only. It never sees
//! provider types: every operation resolves to an [`AuthResult`] whose error
//! branch is the closed [`crate::domain::AuthenticationError`] taxonomy.

use async_trait::async_trait;

use crate::domain::{AuthResult, Credentials};

/// Account identifier returned by [`FixtureAuthenticationGateway::signup`].
pub const FIXTURE_ACCOUNT_ID: &str = "uid";

/// Names of the gateway operations, used as a structured logging field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    /// [`AuthenticationGateway::login`].
    Login,
    /// [`AuthenticationGateway::signup`].
    Signup,
    /// [`AuthenticationGateway::logout`].
    Logout,
    /// [`AuthenticationGateway::request_password_reset`].
    RequestPasswordReset,
    /// [`AuthenticationGateway::reset_password`].
    ResetPassword,
    /// [`AuthenticationGateway::authenticated`].
    Authenticated,
}

impl GatewayOperation {
    /// Stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Logout => "logout",
            Self::RequestPasswordReset => "request_password_reset",
            Self::ResetPassword => "reset_password",
            Self::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait AuthenticationGateway: Send + Sync {
    /// Sign in with username and password.
    async fn login(&self, credentials: &Credentials) -> AuthResult<()>;

    /// Create an account and return its identifier.
    ///
    /// With `prevent_automatic_login` set, the account is created in an
    /// isolated provider context so the current session stays on whichever
    /// account (if any) was signed in before the call.
    async fn signup(
        &self,
        credentials: &Credentials,
        prevent_automatic_login: bool,
    ) -> AuthResult<String>;

    /// End the current session.
    async fn logout(&self) -> AuthResult<()>;

    /// Ask the provider to send a password-reset email.
    async fn request_password_reset(&self, email: &str) -> AuthResult<()>;

    /// Complete a password reset with the out-of-band confirmation code.
    async fn reset_password(&self, new_password: &str, confirmation_code: &str)
    -> AuthResult<()>;

    /// Report whether a session is currently active. Never fails.
    async fn authenticated(&self) -> AuthResult<bool>;
}

/// Deterministic gateway for tests and local tooling.
///
/// Every operation succeeds immediately: `signup` yields
/// [`FIXTURE_ACCOUNT_ID`] and `authenticated` yields `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthenticationGateway;

#[async_trait]
impl AuthenticationGateway for FixtureAuthenticationGateway {
    async fn login(&self, _credentials: &Credentials) -> AuthResult<()> {
        Ok(())
    }

    async fn signup(
        &self,
        _credentials: &Credentials,
        _prevent_automatic_login: bool,
    ) -> AuthResult<String> {
        Ok(FIXTURE_ACCOUNT_ID.to_owned())
    }

    async fn logout(&self) -> AuthResult<()> {
        Ok(())
    }

    async fn request_password_reset(&self, _email: &str) -> AuthResult<()> {
        Ok(())
    }

    async fn reset_password(
        &self,
        _new_password: &str,
        _confirmation_code: &str,
    ) -> AuthResult<()> {
        Ok(())
    }

    async fn authenticated(&self) -> AuthResult<bool> {
        Ok(false)
    }
}

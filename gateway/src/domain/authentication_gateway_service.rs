//! Live authentication gateway backed by an identity provider port.
//!
//! Each operation runs in two layers: provider failures are mapped into the
//! taxonomy and logged where they are returned, and the whole body is
//! wrapped in [`safe_call`] to convert anything unexpected into
//! [`AuthenticationError::Unknown`]. Logout maps no provider codes; all of
//! its failures are `Unknown`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::isolated_context::with_isolated_context;
use crate::domain::ports::{
    AuthenticationGateway, FaultLogger, GatewayOperation, IdentityProvider, IdentityProviderError,
    TracingFaultLogger,
};
use crate::domain::{AuthResult, AuthenticationError, Credentials, safe_call};

/// Gateway implementation delegating to an [`IdentityProvider`].
pub struct ProviderAuthenticationGateway<P, L = TracingFaultLogger> {
    provider: Arc<P>,
    fault_logger: Arc<L>,
}

impl<P> ProviderAuthenticationGateway<P, TracingFaultLogger> {
    /// Create a gateway that logs faults through `tracing`.
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_fault_logger(provider, Arc::new(TracingFaultLogger))
    }
}

impl<P, L> ProviderAuthenticationGateway<P, L> {
    /// Create a gateway with an explicit fault sink.
    pub const fn with_fault_logger(provider: Arc<P>, fault_logger: Arc<L>) -> Self {
        Self {
            provider,
            fault_logger,
        }
    }
}

impl<P, L> Clone for ProviderAuthenticationGateway<P, L> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            fault_logger: Arc::clone(&self.fault_logger),
        }
    }
}

impl<P, L> ProviderAuthenticationGateway<P, L>
where
    P: IdentityProvider,
    L: FaultLogger,
{
    fn map_fault(
        &self,
        operation: GatewayOperation,
        error: &IdentityProviderError,
    ) -> AuthenticationError {
        let mapped = AuthenticationError::from_error(error);
        self.fault_logger.log_fault(operation, error, &mapped);
        mapped
    }

    fn upcast_fault(
        &self,
        operation: GatewayOperation,
        error: &IdentityProviderError,
    ) -> AuthenticationError {
        let upcast = AuthenticationError::unknown(error.to_string());
        self.fault_logger.log_fault(operation, error, &upcast);
        upcast
    }

    async fn guarded<T, Fut>(&self, operation: GatewayOperation, fut: Fut) -> AuthResult<T>
    where
        Fut: Future<Output = AuthResult<T>>,
    {
        safe_call(self.fault_logger.as_ref(), operation, fut).await
    }

    async fn create_isolated_account(
        &self,
        credentials: &Credentials,
    ) -> Result<String, IdentityProviderError> {
        with_isolated_context(self.provider.as_ref(), |context| async move {
            context
                .create_account_with_password(credentials.username(), credentials.password())
                .await
        })
        .await
    }
}

#[async_trait]
impl<P, L> AuthenticationGateway for ProviderAuthenticationGateway<P, L>
where
    P: IdentityProvider + 'static,
    L: FaultLogger + 'static,
{
    async fn login(&self, credentials: &Credentials) -> AuthResult<()> {
        let operation = GatewayOperation::Login;
        self.guarded(operation, async {
            self.provider
                .sign_in_with_password(credentials.username(), credentials.password())
                .await
                .map_err(|error| self.map_fault(operation, &error))
        })
        .await
    }

    async fn signup(
        &self,
        credentials: &Credentials,
        prevent_automatic_login: bool,
    ) -> AuthResult<String> {
        let operation = GatewayOperation::Signup;
        self.guarded(operation, async {
            let created = if prevent_automatic_login {
                self.create_isolated_account(credentials).await
            } else {
                self.provider
                    .create_account_with_password(credentials.username(), credentials.password())
                    .await
            };
            created.map_err(|error| self.map_fault(operation, &error))
        })
        .await
    }

    async fn logout(&self) -> AuthResult<()> {
        let operation = GatewayOperation::Logout;
        self.guarded(operation, async {
            self.provider
                .sign_out()
                .await
                .map_err(|error| self.upcast_fault(operation, &error))
        })
        .await
    }

    async fn request_password_reset(&self, email: &str) -> AuthResult<()> {
        let operation = GatewayOperation::RequestPasswordReset;
        self.guarded(operation, async {
            self.provider
                .send_password_reset_email(email)
                .await
                .map_err(|error| self.map_fault(operation, &error))
        })
        .await
    }

    async fn reset_password(
        &self,
        new_password: &str,
        confirmation_code: &str,
    ) -> AuthResult<()> {
        let operation = GatewayOperation::ResetPassword;
        self.guarded(operation, async {
            self.provider
                .confirm_password_reset(confirmation_code, new_password)
                .await
                .map_err(|error| self.map_fault(operation, &error))
        })
        .await
    }

    async fn authenticated(&self) -> AuthResult<bool> {
        self.guarded(GatewayOperation::Authenticated, async {
            Ok(self.provider.current_user().is_some())
        })
        .await
    }
}

#[cfg(test)]
#[path = "authentication_gateway_service_tests.rs"]
mod tests;

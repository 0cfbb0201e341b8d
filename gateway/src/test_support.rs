//! Test utilities for the gateway crate.
//!
//! Shared doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.

use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{AuthenticationError, AuthenticationErrorKind};
use crate::domain::ports::{
    FaultLogger, GatewayOperation, IdentityProvider, IdentityProviderError,
    IsolatedProviderContext,
};

/// Account identifier the stub assigns to signed-in and created accounts.
pub const STUB_ACCOUNT_ID: &str = "stub-uid";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted outcome for one provider operation.
#[derive(Debug, Clone)]
pub enum StubBehaviour {
    /// Fail with `IdentityProviderError::Rejected` carrying this code.
    Reject(String),
    /// Fail with `IdentityProviderError::Transport`.
    Transport(String),
    /// Panic with this message.
    Panic(String),
}

impl StubBehaviour {
    fn failure(&self) -> Option<IdentityProviderError> {
        match self {
            Self::Reject(code) => Some(IdentityProviderError::rejected(
                code.as_str(),
                "rejected by stub",
            )),
            Self::Transport(message) => Some(IdentityProviderError::transport(message.as_str())),
            Self::Panic(message) => panic!("{message}"),
        }
    }
}

#[derive(Default)]
struct StubState {
    behaviours: Mutex<HashMap<GatewayOperation, StubBehaviour>>,
    session: Mutex<Option<String>>,
    opened: AtomicUsize,
    released: Arc<AtomicUsize>,
    fail_open: Mutex<Option<IdentityProviderError>>,
}

/// In-memory identity provider with scriptable failures.
///
/// Operations succeed by default. Signing in or signing up sets the
/// session to [`STUB_ACCOUNT_ID`]. Isolated contexts share the scripted
/// `Signup` behaviour but never touch the session.
#[derive(Default)]
pub struct StubIdentityProvider {
    state: StubState,
}

impl StubIdentityProvider {
    /// Create a stub where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `behaviour` for the provider call behind `operation`.
    #[must_use]
    pub fn with_behaviour(self, operation: GatewayOperation, behaviour: StubBehaviour) -> Self {
        lock(&self.state.behaviours).insert(operation, behaviour);
        self
    }

    /// Make `open_isolated_context` fail with `error`.
    #[must_use]
    pub fn failing_open(self, error: IdentityProviderError) -> Self {
        *lock(&self.state.fail_open) = Some(error);
        self
    }

    /// Start with `account_id` already signed in.
    #[must_use]
    pub fn signed_in_as(self, account_id: &str) -> Self {
        *lock(&self.state.session) = Some(account_id.to_owned());
        self
    }

    /// Number of isolated contexts opened so far.
    #[must_use]
    pub fn opened_contexts(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    /// Number of isolated contexts released so far.
    #[must_use]
    pub fn released_contexts(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }

    fn run(&self, operation: GatewayOperation) -> Result<(), IdentityProviderError> {
        let behaviour = lock(&self.state.behaviours).get(&operation).cloned();
        behaviour
            .and_then(|scripted| scripted.failure())
            .map_or(Ok(()), Err)
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<(), IdentityProviderError> {
        self.run(GatewayOperation::Login)?;
        *lock(&self.state.session) = Some(STUB_ACCOUNT_ID.to_owned());
        Ok(())
    }

    async fn create_account_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<String, IdentityProviderError> {
        self.run(GatewayOperation::Signup)?;
        *lock(&self.state.session) = Some(STUB_ACCOUNT_ID.to_owned());
        Ok(STUB_ACCOUNT_ID.to_owned())
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.run(GatewayOperation::Logout)?;
        *lock(&self.state.session) = None;
        Ok(())
    }

    async fn send_password_reset_email(&self, _email: &str) -> Result<(), IdentityProviderError> {
        self.run(GatewayOperation::RequestPasswordReset)
    }

    async fn confirm_password_reset(
        &self,
        _code: &str,
        _new_password: &str,
    ) -> Result<(), IdentityProviderError> {
        self.run(GatewayOperation::ResetPassword)
    }

    fn current_user(&self) -> Option<String> {
        lock(&self.state.session).clone()
    }

    async fn open_isolated_context(
        &self,
        name: &str,
    ) -> Result<Arc<dyn IsolatedProviderContext>, IdentityProviderError> {
        if let Some(error) = lock(&self.state.fail_open).clone() {
            return Err(error);
        }
        let index = self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StubIsolatedContext {
            name: name.to_owned(),
            account_id: format!("isolated-uid-{index}"),
            signup: lock(&self.state.behaviours)
                .get(&GatewayOperation::Signup)
                .cloned(),
            released: Arc::clone(&self.state.released),
        }))
    }
}

struct StubIsolatedContext {
    name: String,
    account_id: String,
    signup: Option<StubBehaviour>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl IsolatedProviderContext for StubIsolatedContext {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    async fn create_account_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<String, IdentityProviderError> {
        if let Some(error) = self.signup.as_ref().and_then(StubBehaviour::failure) {
            return Err(error);
        }
        Ok(self.account_id.clone())
    }

    async fn release(&self) -> Result<(), IdentityProviderError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fault logger that keeps every fault it receives.
#[derive(Debug, Default)]
pub struct RecordingFaultLogger {
    faults: Mutex<Vec<(GatewayOperation, String, AuthenticationErrorKind)>>,
}

impl RecordingFaultLogger {
    /// Operation and display text of each recorded fault, in arrival order.
    #[must_use]
    pub fn faults(&self) -> Vec<(GatewayOperation, String)> {
        lock(&self.faults)
            .iter()
            .map(|(operation, fault, _)| (*operation, fault.clone()))
            .collect()
    }

    /// Kind of the error returned alongside each recorded fault.
    #[must_use]
    pub fn kinds(&self) -> Vec<AuthenticationErrorKind> {
        lock(&self.faults).iter().map(|(_, _, kind)| *kind).collect()
    }
}

impl FaultLogger for RecordingFaultLogger {
    fn log_fault(
        &self,
        operation: GatewayOperation,
        fault: &(dyn Error + 'static),
        error: &AuthenticationError,
    ) {
        lock(&self.faults).push((operation, fault.to_string(), error.kind()));
    }
}

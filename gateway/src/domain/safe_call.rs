//! Outermost fault boundary shared by every gateway operation.
//!
//! Operations already map the failures they expect. [`safe_call`] covers the
//! rest: a panic raised while the operation is polled is caught, logged, and
//! returned as [`AuthenticationError::Unknown`].

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use crate::domain::ports::{FaultLogger, GatewayOperation};
use crate::domain::{AuthResult, AuthenticationError, FailureContext};

const OPAQUE_PANIC_DESCRIPTION: &str = "operation panicked";

/// An unexpected fault caught at the boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{description}")]
pub struct Fault {
    description: String,
    context: FailureContext,
}

impl Fault {
    /// Build a fault with the given description, capturing the current context.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: FailureContext::capture(),
        }
    }

    /// Build a fault from a panic payload.
    ///
    /// `&str` and `String` payloads become the description; any other
    /// payload is reported as an opaque panic.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let description = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| OPAQUE_PANIC_DESCRIPTION.to_owned());
        Self::new(description)
    }

    /// Description of the fault.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Context captured when the fault was caught.
    #[must_use]
    pub const fn context(&self) -> &FailureContext {
        &self.context
    }

    pub(crate) fn into_parts(self) -> (String, FailureContext) {
        (self.description, self.context)
    }
}

/// Run `operation`, converting any panic into [`AuthenticationError::Unknown`].
///
/// Normal completion, success or typed failure, passes through unchanged.
/// This function never panics on behalf of `operation`.
///
/// # Examples
/// ```
/// use auth_gateway::domain::ports::{GatewayOperation, TracingFaultLogger};
/// use auth_gateway::domain::{AuthResult, AuthenticationErrorKind, safe_call};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let result: AuthResult<()> = safe_call(&TracingFaultLogger, GatewayOperation::Logout, async {
///     panic!("client state corrupted")
/// })
/// .await;
/// let err = result.expect_err("panic becomes an error");
/// assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
/// assert_eq!(err.cause(), "client state corrupted");
/// # });
/// ```
pub async fn safe_call<T, Fut>(
    logger: &dyn FaultLogger,
    operation: GatewayOperation,
    fut: Fut,
) -> AuthResult<T>
where
    Fut: Future<Output = AuthResult<T>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let fault = Fault::from_panic(payload.as_ref());
            let error = AuthenticationError::from(fault.clone());
            logger.log_fault(operation, &fault, &error);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the fault boundary.
    use std::sync::Mutex;

    use super::*;
    use crate::domain::AuthenticationErrorKind;
    use rstest::{fixture, rstest};

    #[derive(Default)]
    struct CapturingLogger {
        entries: Mutex<Vec<(GatewayOperation, String, AuthenticationErrorKind)>>,
    }

    impl CapturingLogger {
        fn entries(&self) -> Vec<(GatewayOperation, String, AuthenticationErrorKind)> {
            self.entries.lock().expect("logger lock").clone()
        }
    }

    impl FaultLogger for CapturingLogger {
        fn log_fault(
            &self,
            operation: GatewayOperation,
            fault: &(dyn std::error::Error + 'static),
            error: &AuthenticationError,
        ) {
            self.entries.lock().expect("logger lock").push((
                operation,
                fault.to_string(),
                error.kind(),
            ));
        }
    }

    #[fixture]
    fn logger() -> CapturingLogger {
        CapturingLogger::default()
    }

    #[rstest]
    #[tokio::test]
    async fn success_passes_through_without_logging(logger: CapturingLogger) {
        let result: AuthResult<u8> =
            safe_call(&logger, GatewayOperation::Authenticated, async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
        assert!(logger.entries().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn typed_failures_pass_through_unchanged(logger: CapturingLogger) {
        let result: AuthResult<()> = safe_call(&logger, GatewayOperation::Login, async {
            Err(AuthenticationError::wrong_password())
        })
        .await;
        assert_eq!(result, Err(AuthenticationError::wrong_password()));
        assert!(logger.entries().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn panics_become_unknown_and_are_logged(logger: CapturingLogger) {
        let result: AuthResult<()> = safe_call(&logger, GatewayOperation::Signup, async {
            panic!("isolated client vanished")
        })
        .await;

        let err = result.expect_err("panic must not escape");
        assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
        assert_eq!(err.cause(), "isolated client vanished");
        assert_eq!(
            logger.entries(),
            vec![(
                GatewayOperation::Signup,
                "isolated client vanished".to_owned(),
                AuthenticationErrorKind::Unknown
            )]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn formatted_panic_messages_are_preserved(logger: CapturingLogger) {
        let attempt = 3;
        let result: AuthResult<()> = safe_call(&logger, GatewayOperation::Logout, async move {
            panic!("attempt {attempt} failed")
        })
        .await;
        assert_eq!(
            result.expect_err("panic must not escape").cause(),
            "attempt 3 failed"
        );
    }

    #[rstest]
    fn opaque_payloads_get_a_generic_description() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        let fault = Fault::from_panic(payload.as_ref());
        assert_eq!(fault.description(), OPAQUE_PANIC_DESCRIPTION);
    }
}

//! Acquire/use/release scope for isolated provider contexts.
//!
//! Signups that must not switch the caller's session run inside a
//! throwaway provider context. [`with_isolated_context`] releases that
//! context exactly once on every exit path, including a panic in the body;
//! the panic is resumed afterwards so the outer fault boundary reports it.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, IdentityProviderError, IsolatedProviderContext};

/// Prefix of the generated context names.
pub const ISOLATED_CONTEXT_PREFIX: &str = "isolated-signup";

/// Run `use_context` against a freshly opened isolated context.
///
/// Failing to open the context returns the error without a release call,
/// since nothing was acquired. A failed release is logged and does not
/// replace the body's result.
pub async fn with_isolated_context<P, T, F, Fut>(
    provider: &P,
    use_context: F,
) -> Result<T, IdentityProviderError>
where
    P: IdentityProvider + ?Sized,
    F: FnOnce(Arc<dyn IsolatedProviderContext>) -> Fut,
    Fut: Future<Output = Result<T, IdentityProviderError>>,
{
    let name = format!("{ISOLATED_CONTEXT_PREFIX}-{}", Uuid::new_v4());
    let context = provider.open_isolated_context(&name).await?;
    debug!(context = context.name(), "opened isolated provider context");

    // The body runs inside the guarded future, so a panic raised before it
    // yields a future is caught too.
    let scoped = Arc::clone(&context);
    let outcome = AssertUnwindSafe(async move { use_context(scoped).await })
        .catch_unwind()
        .await;

    match context.release().await {
        Ok(()) => debug!(context = context.name(), "released isolated provider context"),
        Err(error) => warn!(
            context = context.name(),
            error = %error,
            "failed to release isolated provider context"
        ),
    }

    match outcome {
        Ok(result) => result,
        Err(payload) => panic::resume_unwind(payload),
    }
}

//! Authentication domain: credentials, the error taxonomy, and the gateway.
//!
//! Purpose: give application code one provider-agnostic authentication
//! surface. Provider vocabularies stop at this boundary; callers only ever
//! see [`AuthenticationError`].
//!
//! Public surface:
//! - Credentials (alias to `auth::Credentials`) — username/password input.
//! - AuthenticationError / AuthenticationErrorKind — the closed failure set.
//! - map_provider_error — provider code to taxonomy translation.
//! - safe_call / Fault — outermost fault boundary.
//! - ProviderAuthenticationGateway — live gateway over an identity provider.
//! - TraceId — request-scoped correlation identifier.

pub mod auth;
pub mod authentication_gateway_service;
pub mod error;
pub mod isolated_context;
pub mod ports;
pub mod provider_error_mapping;
pub mod safe_call;
pub mod trace_id;

pub use self::auth::Credentials;
pub use self::authentication_gateway_service::ProviderAuthenticationGateway;
pub use self::error::{AuthenticationError, AuthenticationErrorKind, FailureContext};
pub use self::isolated_context::{ISOLATED_CONTEXT_PREFIX, with_isolated_context};
pub use self::provider_error_mapping::{codes, map_provider_error};
pub use self::safe_call::{Fault, safe_call};
pub use self::trace_id::TraceId;

/// Result alias returned by every gateway operation.
///
/// # Examples
/// ```
/// use auth_gateway::domain::{AuthResult, AuthenticationError};
///
/// fn check(ok: bool) -> AuthResult<()> {
///     if ok { Ok(()) } else { Err(AuthenticationError::user_disabled()) }
/// }
///
/// assert_eq!(check(false).unwrap_err().cause(), "User Disabled");
/// ```
pub type AuthResult<T> = Result<T, AuthenticationError>;

//! Authentication error taxonomy.
//!
//! [`AuthenticationError`] is the closed set of failures the gateway hands to
//! application code. Provider vocabularies are folded into it by
//! [`crate::domain::map_provider_error`]; anything the gateway cannot name
//! lands in [`AuthenticationError::Unknown`] with the raw cause preserved.
//!
//! Every variant carries a [`FailureContext`] captured where the error was
//! built. Equality ignores the context so callers and tests can compare
//! errors by meaning.

use std::backtrace::Backtrace;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::TraceId;
use crate::domain::map_provider_error;
use crate::domain::ports::IdentityProviderError;
use crate::domain::safe_call::Fault;

/// Diagnostic context captured at the failure site.
///
/// Holds the ambient [`TraceId`] (if the failure happened inside a
/// [`TraceId::scope`]) and a backtrace. Backtrace capture follows the usual
/// `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE` switches, so it costs nothing when
/// disabled.
#[derive(Debug, Clone)]
pub struct FailureContext {
    trace_id: Option<TraceId>,
    backtrace: Arc<Backtrace>,
}

impl FailureContext {
    /// Capture the context of the current call site.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            trace_id: TraceId::current(),
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Trace identifier in scope when the failure was captured.
    #[must_use]
    pub const fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Backtrace captured with the failure.
    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        self.backtrace.as_ref()
    }
}

/// Fieldless discriminant of [`AuthenticationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationErrorKind {
    /// See [`AuthenticationError::InvalidCredentials`].
    InvalidCredentials,
    /// See [`AuthenticationError::InvalidEmail`].
    InvalidEmail,
    /// See [`AuthenticationError::EmailAlreadyInUse`].
    EmailAlreadyInUse,
    /// See [`AuthenticationError::WeakPassword`].
    WeakPassword,
    /// See [`AuthenticationError::UserDisabled`].
    UserDisabled,
    /// See [`AuthenticationError::UserNotFound`].
    UserNotFound,
    /// See [`AuthenticationError::WrongPassword`].
    WrongPassword,
    /// See [`AuthenticationError::ExpiredConfirmationCode`].
    ExpiredConfirmationCode,
    /// See [`AuthenticationError::InvalidConfirmationCode`].
    InvalidConfirmationCode,
    /// See [`AuthenticationError::OperationNotAllowed`].
    OperationNotAllowed,
    /// See [`AuthenticationError::Unknown`].
    Unknown,
}

impl AuthenticationErrorKind {
    /// Stable snake-case label used in structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidEmail => "invalid_email",
            Self::EmailAlreadyInUse => "email_already_in_use",
            Self::WeakPassword => "weak_password",
            Self::UserDisabled => "user_disabled",
            Self::UserNotFound => "user_not_found",
            Self::WrongPassword => "wrong_password",
            Self::ExpiredConfirmationCode => "expired_confirmation_code",
            Self::InvalidConfirmationCode => "invalid_confirmation_code",
            Self::OperationNotAllowed => "operation_not_allowed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AuthenticationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by every gateway operation.
///
/// ## Invariants
/// - Only [`Self::Unknown`] accepts a free-form cause; every other variant
///   reports its fixed cause text via [`Self::cause`].
/// - Each variant owns a [`FailureContext`] captured by its constructor.
///
/// # Examples
/// ```
/// use auth_gateway::domain::{AuthenticationError, AuthenticationErrorKind};
///
/// let err = AuthenticationError::wrong_password();
/// assert_eq!(err.kind(), AuthenticationErrorKind::WrongPassword);
/// assert_eq!(err.cause(), "Wrong Password");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    /// The supplied credentials were rejected as a pair.
    #[error("Invalid Credentials")]
    InvalidCredentials {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The email address is malformed.
    #[error("Invalid Email")]
    InvalidEmail {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// An account already exists for the email address.
    #[error("Email Already In Use")]
    EmailAlreadyInUse {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The password does not meet the provider's strength policy.
    #[error("Weak Password")]
    WeakPassword {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The account has been disabled by an administrator.
    #[error("User Disabled")]
    UserDisabled {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// No account matches the identifier.
    #[error("User Not Found")]
    UserNotFound {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The password does not match the account.
    #[error("Wrong Password")]
    WrongPassword {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The out-of-band confirmation code has expired.
    #[error("Expired Confirmation Code")]
    ExpiredConfirmationCode {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The out-of-band confirmation code is malformed or already used.
    #[error("Invalid Confirmation Code")]
    InvalidConfirmationCode {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// The sign-in method is disabled for this project.
    #[error("Operation Not Allowed")]
    OperationNotAllowed {
        /// Context captured where the error was built.
        context: FailureContext,
    },
    /// Any failure the taxonomy does not name.
    #[error("{cause}")]
    Unknown {
        /// Raw description of the failure.
        cause: String,
        /// Context captured where the error was built.
        context: FailureContext,
    },
}

impl AuthenticationError {
    /// Build the fixed-cause variant for `kind`, or an `Unknown` error whose
    /// cause is the kind label.
    #[must_use]
    pub fn from_kind(kind: AuthenticationErrorKind) -> Self {
        let context = FailureContext::capture();
        match kind {
            AuthenticationErrorKind::InvalidCredentials => Self::InvalidCredentials { context },
            AuthenticationErrorKind::InvalidEmail => Self::InvalidEmail { context },
            AuthenticationErrorKind::EmailAlreadyInUse => Self::EmailAlreadyInUse { context },
            AuthenticationErrorKind::WeakPassword => Self::WeakPassword { context },
            AuthenticationErrorKind::UserDisabled => Self::UserDisabled { context },
            AuthenticationErrorKind::UserNotFound => Self::UserNotFound { context },
            AuthenticationErrorKind::WrongPassword => Self::WrongPassword { context },
            AuthenticationErrorKind::ExpiredConfirmationCode => {
                Self::ExpiredConfirmationCode { context }
            }
            AuthenticationErrorKind::InvalidConfirmationCode => {
                Self::InvalidConfirmationCode { context }
            }
            AuthenticationErrorKind::OperationNotAllowed => Self::OperationNotAllowed { context },
            AuthenticationErrorKind::Unknown => Self::Unknown {
                cause: kind.as_str().to_owned(),
                context,
            },
        }
    }

    /// Convenience constructor for [`Self::InvalidCredentials`].
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::from_kind(AuthenticationErrorKind::InvalidCredentials)
    }

    /// Convenience constructor for [`Self::InvalidEmail`].
    #[must_use]
    pub fn invalid_email() -> Self {
        Self::from_kind(AuthenticationErrorKind::InvalidEmail)
    }

    /// Convenience constructor for [`Self::EmailAlreadyInUse`].
    #[must_use]
    pub fn email_already_in_use() -> Self {
        Self::from_kind(AuthenticationErrorKind::EmailAlreadyInUse)
    }

    /// Convenience constructor for [`Self::WeakPassword`].
    #[must_use]
    pub fn weak_password() -> Self {
        Self::from_kind(AuthenticationErrorKind::WeakPassword)
    }

    /// Convenience constructor for [`Self::UserDisabled`].
    #[must_use]
    pub fn user_disabled() -> Self {
        Self::from_kind(AuthenticationErrorKind::UserDisabled)
    }

    /// Convenience constructor for [`Self::UserNotFound`].
    #[must_use]
    pub fn user_not_found() -> Self {
        Self::from_kind(AuthenticationErrorKind::UserNotFound)
    }

    /// Convenience constructor for [`Self::WrongPassword`].
    #[must_use]
    pub fn wrong_password() -> Self {
        Self::from_kind(AuthenticationErrorKind::WrongPassword)
    }

    /// Convenience constructor for [`Self::ExpiredConfirmationCode`].
    #[must_use]
    pub fn expired_confirmation_code() -> Self {
        Self::from_kind(AuthenticationErrorKind::ExpiredConfirmationCode)
    }

    /// Convenience constructor for [`Self::InvalidConfirmationCode`].
    #[must_use]
    pub fn invalid_confirmation_code() -> Self {
        Self::from_kind(AuthenticationErrorKind::InvalidConfirmationCode)
    }

    /// Convenience constructor for [`Self::OperationNotAllowed`].
    #[must_use]
    pub fn operation_not_allowed() -> Self {
        Self::from_kind(AuthenticationErrorKind::OperationNotAllowed)
    }

    /// Convenience constructor for [`Self::Unknown`].
    pub fn unknown(cause: impl Into<String>) -> Self {
        Self::Unknown {
            cause: cause.into(),
            context: FailureContext::capture(),
        }
    }

    /// Widen an arbitrary error into the taxonomy.
    ///
    /// Gateway errors are returned unchanged, coded provider rejections go
    /// through the provider mapping, and everything else becomes
    /// [`Self::Unknown`] carrying the error's display text.
    ///
    /// # Examples
    /// ```
    /// use auth_gateway::domain::{AuthenticationError, AuthenticationErrorKind};
    ///
    /// let io = std::io::Error::other("socket closed");
    /// let err = AuthenticationError::from_error(&io);
    /// assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    /// assert_eq!(err.cause(), "socket closed");
    /// ```
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(existing) = error.downcast_ref::<Self>() {
            return existing.clone();
        }
        if let Some(provider) = error.downcast_ref::<IdentityProviderError>() {
            return Self::from(provider.clone());
        }
        Self::unknown(error.to_string())
    }

    /// Discriminant of this error.
    #[must_use]
    pub const fn kind(&self) -> AuthenticationErrorKind {
        match self {
            Self::InvalidCredentials { .. } => AuthenticationErrorKind::InvalidCredentials,
            Self::InvalidEmail { .. } => AuthenticationErrorKind::InvalidEmail,
            Self::EmailAlreadyInUse { .. } => AuthenticationErrorKind::EmailAlreadyInUse,
            Self::WeakPassword { .. } => AuthenticationErrorKind::WeakPassword,
            Self::UserDisabled { .. } => AuthenticationErrorKind::UserDisabled,
            Self::UserNotFound { .. } => AuthenticationErrorKind::UserNotFound,
            Self::WrongPassword { .. } => AuthenticationErrorKind::WrongPassword,
            Self::ExpiredConfirmationCode { .. } => {
                AuthenticationErrorKind::ExpiredConfirmationCode
            }
            Self::InvalidConfirmationCode { .. } => {
                AuthenticationErrorKind::InvalidConfirmationCode
            }
            Self::OperationNotAllowed { .. } => AuthenticationErrorKind::OperationNotAllowed,
            Self::Unknown { .. } => AuthenticationErrorKind::Unknown,
        }
    }

    /// Human-readable cause.
    #[must_use]
    pub fn cause(&self) -> &str {
        match self {
            Self::InvalidCredentials { .. } => "Invalid Credentials",
            Self::InvalidEmail { .. } => "Invalid Email",
            Self::EmailAlreadyInUse { .. } => "Email Already In Use",
            Self::WeakPassword { .. } => "Weak Password",
            Self::UserDisabled { .. } => "User Disabled",
            Self::UserNotFound { .. } => "User Not Found",
            Self::WrongPassword { .. } => "Wrong Password",
            Self::ExpiredConfirmationCode { .. } => "Expired Confirmation Code",
            Self::InvalidConfirmationCode { .. } => "Invalid Confirmation Code",
            Self::OperationNotAllowed { .. } => "Operation Not Allowed",
            Self::Unknown { cause, .. } => cause.as_str(),
        }
    }

    /// Diagnostic context captured with the error.
    #[must_use]
    pub const fn context(&self) -> &FailureContext {
        match self {
            Self::InvalidCredentials { context }
            | Self::InvalidEmail { context }
            | Self::EmailAlreadyInUse { context }
            | Self::WeakPassword { context }
            | Self::UserDisabled { context }
            | Self::UserNotFound { context }
            | Self::WrongPassword { context }
            | Self::ExpiredConfirmationCode { context }
            | Self::InvalidConfirmationCode { context }
            | Self::OperationNotAllowed { context }
            | Self::Unknown { context, .. } => context,
        }
    }
}

impl PartialEq for AuthenticationError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.cause() == other.cause()
    }
}

impl Eq for AuthenticationError {}

impl From<IdentityProviderError> for AuthenticationError {
    fn from(error: IdentityProviderError) -> Self {
        match error {
            IdentityProviderError::Rejected { code, .. } => map_provider_error(&code),
            other @ (IdentityProviderError::Transport { .. }
            | IdentityProviderError::Decode { .. }) => Self::unknown(other.to_string()),
        }
    }
}

impl From<Fault> for AuthenticationError {
    fn from(fault: Fault) -> Self {
        let (cause, context) = fault.into_parts();
        Self::Unknown { cause, context }
    }
}

#[cfg(test)]
mod tests;

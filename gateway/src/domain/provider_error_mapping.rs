//! Translation from identity-provider failure codes to the gateway taxonomy.
//!
//! The provider's code vocabulary is versioned independently of this crate.
//! Codes that are not listed here fall through to
//! [`AuthenticationError::Unknown`] with the raw code as the cause, so new
//! provider codes never break callers.

use crate::domain::AuthenticationError;

/// Provider codes recognised by [`map_provider_error`].
pub mod codes {
    /// An account already exists for the email.
    pub const EMAIL_ALREADY_IN_USE: &str = "email-already-in-use";
    /// The email address is malformed.
    pub const INVALID_EMAIL: &str = "invalid-email";
    /// The sign-in method is disabled.
    pub const OPERATION_NOT_ALLOWED: &str = "operation-not-allowed";
    /// The password fails the strength policy.
    pub const WEAK_PASSWORD: &str = "weak-password";
    /// The account is disabled.
    pub const USER_DISABLED: &str = "user-disabled";
    /// No account matches.
    pub const USER_NOT_FOUND: &str = "user-not-found";
    /// The password does not match.
    pub const WRONG_PASSWORD: &str = "wrong-password";
    /// The action code has expired.
    pub const EXPIRED_ACTION_CODE: &str = "expired-action-code";
    /// The action code is malformed or already used.
    pub const INVALID_ACTION_CODE: &str = "invalid-action-code";
}

/// Map a provider failure code onto the taxonomy.
///
/// Total: every input yields exactly one variant. Matching is exact.
///
/// # Examples
/// ```
/// use auth_gateway::domain::{AuthenticationErrorKind, map_provider_error};
///
/// assert_eq!(
///     map_provider_error("wrong-password").kind(),
///     AuthenticationErrorKind::WrongPassword
/// );
/// assert_eq!(map_provider_error("quota-exceeded").cause(), "quota-exceeded");
/// ```
#[must_use]
pub fn map_provider_error(code: &str) -> AuthenticationError {
    match code {
        codes::EMAIL_ALREADY_IN_USE => AuthenticationError::email_already_in_use(),
        codes::INVALID_EMAIL => AuthenticationError::invalid_email(),
        codes::OPERATION_NOT_ALLOWED => AuthenticationError::operation_not_allowed(),
        codes::WEAK_PASSWORD => AuthenticationError::weak_password(),
        codes::USER_DISABLED => AuthenticationError::user_disabled(),
        codes::USER_NOT_FOUND => AuthenticationError::user_not_found(),
        codes::WRONG_PASSWORD => AuthenticationError::wrong_password(),
        codes::EXPIRED_ACTION_CODE => AuthenticationError::expired_confirmation_code(),
        codes::INVALID_ACTION_CODE => AuthenticationError::invalid_confirmation_code(),
        other => AuthenticationError::unknown(other),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the provider code table.
    use super::*;
    use crate::domain::AuthenticationErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("email-already-in-use", AuthenticationErrorKind::EmailAlreadyInUse)]
    #[case("invalid-email", AuthenticationErrorKind::InvalidEmail)]
    #[case("operation-not-allowed", AuthenticationErrorKind::OperationNotAllowed)]
    #[case("weak-password", AuthenticationErrorKind::WeakPassword)]
    #[case("user-disabled", AuthenticationErrorKind::UserDisabled)]
    #[case("user-not-found", AuthenticationErrorKind::UserNotFound)]
    #[case("wrong-password", AuthenticationErrorKind::WrongPassword)]
    #[case("expired-action-code", AuthenticationErrorKind::ExpiredConfirmationCode)]
    #[case("invalid-action-code", AuthenticationErrorKind::InvalidConfirmationCode)]
    fn named_codes_map_to_their_variant(
        #[case] code: &str,
        #[case] expected: AuthenticationErrorKind,
    ) {
        assert_eq!(map_provider_error(code).kind(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("invalid-credential")]
    #[case("network-request-failed")]
    #[case("WRONG-PASSWORD")]
    #[case("auth/wrong-password")]
    #[case(" wrong-password")]
    fn unrecognised_codes_fall_back_to_unknown(#[case] code: &str) {
        let err = map_provider_error(code);
        assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
        assert_eq!(err.cause(), code);
    }
}

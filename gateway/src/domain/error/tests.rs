//! Tests for the authentication error taxonomy and its widening rules.

use super::*;
use rstest::rstest;

#[rstest]
#[case(AuthenticationErrorKind::InvalidCredentials, "Invalid Credentials")]
#[case(AuthenticationErrorKind::InvalidEmail, "Invalid Email")]
#[case(AuthenticationErrorKind::EmailAlreadyInUse, "Email Already In Use")]
#[case(AuthenticationErrorKind::WeakPassword, "Weak Password")]
#[case(AuthenticationErrorKind::UserDisabled, "User Disabled")]
#[case(AuthenticationErrorKind::UserNotFound, "User Not Found")]
#[case(AuthenticationErrorKind::WrongPassword, "Wrong Password")]
#[case(AuthenticationErrorKind::ExpiredConfirmationCode, "Expired Confirmation Code")]
#[case(AuthenticationErrorKind::InvalidConfirmationCode, "Invalid Confirmation Code")]
#[case(AuthenticationErrorKind::OperationNotAllowed, "Operation Not Allowed")]
fn fixed_variants_report_their_cause(
    #[case] kind: AuthenticationErrorKind,
    #[case] expected_cause: &str,
) {
    let err = AuthenticationError::from_kind(kind);
    assert_eq!(err.kind(), kind);
    assert_eq!(err.cause(), expected_cause);
    assert_eq!(err.to_string(), expected_cause);
}

#[rstest]
fn weak_password_and_user_disabled_have_distinct_causes() {
    assert_ne!(
        AuthenticationError::weak_password().cause(),
        AuthenticationError::user_disabled().cause()
    );
}

#[rstest]
fn unknown_keeps_free_form_cause() {
    let err = AuthenticationError::unknown("quota-exceeded");
    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_eq!(err.cause(), "quota-exceeded");
    assert_eq!(err.to_string(), "quota-exceeded");
}

#[rstest]
fn equality_ignores_failure_context() {
    let outside = AuthenticationError::user_not_found();
    let inside = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime builds")
        .block_on(TraceId::scope(TraceId::generate(), async {
            AuthenticationError::user_not_found()
        }));
    assert!(outside.context().trace_id().is_none());
    assert!(inside.context().trace_id().is_some());
    assert_eq!(outside, inside);
}

#[rstest]
fn equality_distinguishes_unknown_causes() {
    assert_ne!(
        AuthenticationError::unknown("a"),
        AuthenticationError::unknown("b")
    );
}

#[rstest]
#[tokio::test]
async fn context_captures_trace_id_in_scope() {
    let trace_id = TraceId::generate();
    let err = TraceId::scope(trace_id, async { AuthenticationError::weak_password() }).await;
    assert_eq!(err.context().trace_id(), Some(trace_id));
}

#[rstest]
fn from_error_returns_gateway_errors_unchanged() {
    let original = AuthenticationError::email_already_in_use();
    let widened = AuthenticationError::from_error(&original);
    assert_eq!(widened, original);
}

#[rstest]
fn from_error_maps_coded_provider_rejections() {
    let provider = IdentityProviderError::rejected("user-disabled", "account locked");
    let widened = AuthenticationError::from_error(&provider);
    assert_eq!(widened.kind(), AuthenticationErrorKind::UserDisabled);
}

#[rstest]
fn from_error_defaults_to_unknown() {
    let err = std::io::Error::other("connection reset");
    let widened = AuthenticationError::from_error(&err);
    assert_eq!(widened, AuthenticationError::unknown("connection reset"));
}

#[rstest]
fn provider_transport_faults_become_unknown() {
    let err = AuthenticationError::from(IdentityProviderError::transport("dns failure"));
    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_eq!(
        err.cause(),
        "identity provider transport failed: dns failure"
    );
}

#[rstest]
fn unmapped_provider_codes_keep_the_code_as_cause() {
    let err = AuthenticationError::from(IdentityProviderError::rejected(
        "too-many-requests",
        "slow down",
    ));
    assert_eq!(err, AuthenticationError::unknown("too-many-requests"));
}

#[rstest]
fn faults_become_unknown_with_their_description() {
    let err = AuthenticationError::from(Fault::new("provider client panicked"));
    assert_eq!(err, AuthenticationError::unknown("provider client panicked"));
}

#[rstest]
fn kind_labels_are_snake_case() {
    assert_eq!(
        AuthenticationErrorKind::ExpiredConfirmationCode.to_string(),
        "expired_confirmation_code"
    );
    let json = serde_json::to_string(&AuthenticationErrorKind::EmailAlreadyInUse)
        .expect("kind serialises");
    assert_eq!(json, "\"email_already_in_use\"");
}

//! Behavioural contract of the authentication gateways.
//!
//! Runs the live gateway against the in-memory stub provider and checks the
//! fixture gateway's fixed answers.

use std::sync::Arc;

use auth_gateway::TraceId;
use auth_gateway::domain::ports::{
    AuthenticationGateway, FIXTURE_ACCOUNT_ID, FixtureAuthenticationGateway, GatewayOperation,
    IdentityProviderError, NoOpFaultLogger,
};
use auth_gateway::domain::{AuthenticationErrorKind, Credentials, ProviderAuthenticationGateway};
use auth_gateway::test_support::{
    RecordingFaultLogger, STUB_ACCOUNT_ID, StubBehaviour, StubIdentityProvider,
};
use rstest::rstest;

struct Harness {
    provider: Arc<StubIdentityProvider>,
    logger: Arc<RecordingFaultLogger>,
    gateway: ProviderAuthenticationGateway<StubIdentityProvider, RecordingFaultLogger>,
}

fn harness(provider: StubIdentityProvider) -> Harness {
    let provider = Arc::new(provider);
    let logger = Arc::new(RecordingFaultLogger::default());
    let gateway =
        ProviderAuthenticationGateway::with_fault_logger(Arc::clone(&provider), Arc::clone(&logger));
    Harness {
        provider,
        logger,
        gateway,
    }
}

fn credentials(password: &str) -> Credentials {
    Credentials::new("a@b.com", password)
}

#[tokio::test]
async fn wrong_password_login_surfaces_the_taxonomy_variant() {
    let h = harness(StubIdentityProvider::new().with_behaviour(
        GatewayOperation::Login,
        StubBehaviour::Reject("wrong-password".to_owned()),
    ));

    let err = h
        .gateway
        .login(&credentials("wrong"))
        .await
        .expect_err("login must fail");

    assert_eq!(err.kind(), AuthenticationErrorKind::WrongPassword);
    assert_eq!(err.cause(), "Wrong Password");
    assert_eq!(h.gateway.authenticated().await, Ok(false));
    assert_eq!(h.logger.faults().len(), 1);
}

#[tokio::test]
async fn successful_login_opens_a_session() {
    let h = harness(StubIdentityProvider::new());

    h.gateway
        .login(&credentials("right"))
        .await
        .expect("login succeeds");
    assert_eq!(h.gateway.authenticated().await, Ok(true));

    h.gateway.logout().await.expect("logout succeeds");
    assert_eq!(h.gateway.authenticated().await, Ok(false));
    assert!(h.logger.faults().is_empty());
}

#[tokio::test]
async fn plain_signup_signs_the_new_account_in() {
    let h = harness(StubIdentityProvider::new());

    let id = h
        .gateway
        .signup(&credentials("pw123456"), false)
        .await
        .expect("signup succeeds");

    assert_eq!(id, STUB_ACCOUNT_ID);
    assert_eq!(h.gateway.authenticated().await, Ok(true));
    assert_eq!(h.provider.opened_contexts(), 0);
}

#[tokio::test]
async fn isolated_signup_leaves_the_current_session_alone() {
    let h = harness(StubIdentityProvider::new().signed_in_as("admin-uid"));

    let id = h
        .gateway
        .signup(&credentials("pw123456"), true)
        .await
        .expect("signup succeeds");

    assert_eq!(id, "isolated-uid-0");
    assert_eq!(h.provider.opened_contexts(), 1);
    assert_eq!(h.provider.released_contexts(), 1);
    assert_eq!(h.gateway.authenticated().await, Ok(true));
}

#[tokio::test]
async fn isolated_signup_keeps_an_anonymous_caller_anonymous() {
    let h = harness(StubIdentityProvider::new());

    h.gateway
        .signup(&credentials("pw123456"), true)
        .await
        .expect("signup succeeds");

    assert_eq!(h.gateway.authenticated().await, Ok(false));
}

#[rstest]
#[case::rejected(
    StubBehaviour::Reject("email-already-in-use".to_owned()),
    AuthenticationErrorKind::EmailAlreadyInUse
)]
#[case::panicked(
    StubBehaviour::Panic("isolated sdk crashed".to_owned()),
    AuthenticationErrorKind::Unknown
)]
#[tokio::test]
async fn isolated_context_is_released_exactly_once_on_failure(
    #[case] behaviour: StubBehaviour,
    #[case] expected: AuthenticationErrorKind,
) {
    let h = harness(
        StubIdentityProvider::new()
            .signed_in_as("admin-uid")
            .with_behaviour(GatewayOperation::Signup, behaviour),
    );

    let err = h
        .gateway
        .signup(&credentials("pw123456"), true)
        .await
        .expect_err("signup must fail");

    assert_eq!(err.kind(), expected);
    assert_eq!(h.provider.opened_contexts(), 1);
    assert_eq!(h.provider.released_contexts(), 1);
    assert_eq!(h.gateway.authenticated().await, Ok(true));
    assert_eq!(h.logger.faults().len(), 1);
}

#[tokio::test]
async fn failing_to_open_an_isolated_context_releases_nothing() {
    let h = harness(
        StubIdentityProvider::new().failing_open(IdentityProviderError::transport("no app slot")),
    );

    let err = h
        .gateway
        .signup(&credentials("pw123456"), true)
        .await
        .expect_err("signup must fail");

    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_eq!(h.provider.released_contexts(), 0);
}

#[rstest]
#[case(GatewayOperation::Login)]
#[case(GatewayOperation::Logout)]
#[case(GatewayOperation::RequestPasswordReset)]
#[case(GatewayOperation::ResetPassword)]
#[tokio::test]
async fn provider_panics_never_escape(#[case] operation: GatewayOperation) {
    let h = harness(
        StubIdentityProvider::new()
            .with_behaviour(operation, StubBehaviour::Panic("provider bug".to_owned())),
    );

    let result = match operation {
        GatewayOperation::Login => h.gateway.login(&credentials("pw")).await,
        GatewayOperation::Logout => h.gateway.logout().await,
        GatewayOperation::RequestPasswordReset => {
            h.gateway.request_password_reset("a@b.com").await
        }
        _ => h.gateway.reset_password("n3w-password", "oob").await,
    };

    let err = result.expect_err("panic becomes an error");
    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_eq!(err.cause(), "provider bug");
    assert_eq!(h.logger.faults(), vec![(operation, "provider bug".to_owned())]);
}

#[tokio::test]
async fn transport_failures_become_unknown_with_the_raw_cause() {
    let h = harness(StubIdentityProvider::new().with_behaviour(
        GatewayOperation::RequestPasswordReset,
        StubBehaviour::Transport("connection reset".to_owned()),
    ));

    let err = h
        .gateway
        .request_password_reset("a@b.com")
        .await
        .expect_err("transport failure surfaces");

    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_eq!(
        err.cause(),
        "identity provider transport failed: connection reset"
    );
}

#[tokio::test]
async fn coded_logout_failures_stay_unknown() {
    let h = harness(StubIdentityProvider::new().with_behaviour(
        GatewayOperation::Logout,
        StubBehaviour::Reject("user-disabled".to_owned()),
    ));

    let err = h.gateway.logout().await.expect_err("logout must fail");

    assert_eq!(err.kind(), AuthenticationErrorKind::Unknown);
    assert_ne!(err.cause(), "User Disabled");
    assert_eq!(h.logger.kinds(), vec![AuthenticationErrorKind::Unknown]);
}

#[tokio::test]
async fn errors_carry_the_ambient_trace_id() {
    let h = harness(StubIdentityProvider::new().with_behaviour(
        GatewayOperation::ResetPassword,
        StubBehaviour::Reject("expired-action-code".to_owned()),
    ));
    let trace_id = TraceId::generate();

    let err = TraceId::scope(trace_id, h.gateway.reset_password("n3w-password", "oob"))
        .await
        .expect_err("expired code surfaces");

    assert_eq!(err.kind(), AuthenticationErrorKind::ExpiredConfirmationCode);
    assert_eq!(err.context().trace_id(), Some(trace_id));
}

#[tokio::test]
async fn silent_fault_logger_does_not_change_results() {
    let provider = Arc::new(StubIdentityProvider::new().with_behaviour(
        GatewayOperation::Login,
        StubBehaviour::Reject("user-disabled".to_owned()),
    ));
    let gateway =
        ProviderAuthenticationGateway::with_fault_logger(provider, Arc::new(NoOpFaultLogger));

    let err = gateway
        .login(&credentials("pw"))
        .await
        .expect_err("disabled user is rejected");
    assert_eq!(err.cause(), "User Disabled");
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn fixture_gateway_answers_deterministically(#[case] prevent_automatic_login: bool) {
    let gateway: &dyn AuthenticationGateway = &FixtureAuthenticationGateway;

    assert_eq!(
        gateway
            .signup(&credentials("pw"), prevent_automatic_login)
            .await,
        Ok(FIXTURE_ACCOUNT_ID.to_owned())
    );
    assert_eq!(gateway.login(&credentials("pw")).await, Ok(()));
    assert_eq!(gateway.authenticated().await, Ok(false));
}

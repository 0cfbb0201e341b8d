//! Reqwest-backed Identity Toolkit provider adapter.
//!
//! This adapter owns transport details only: request serialisation, REST
//! error translation into provider codes, and the local session slot. It
//! does not interpret codes; the domain mapping does that.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use super::config::{IdentityToolkitSettings, IdentityToolkitSettingsError};
use super::dto::{
    ErrorEnvelopeDto, PasswordCredentialsRequest, ResetPasswordRequest, SendOobCodeRequest,
    SessionResponseDto,
};
use crate::domain::codes;
use crate::domain::ports::{IdentityProvider, IdentityProviderError, IsolatedProviderContext};

/// Code reported for any call on a released isolated context.
pub const APP_DELETED_CODE: &str = "app-deleted";

const SIGN_IN_METHOD: &str = "signInWithPassword";
const SIGN_UP_METHOD: &str = "signUp";
const SEND_OOB_CODE_METHOD: &str = "sendOobCode";
const RESET_PASSWORD_METHOD: &str = "resetPassword";

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum IdentityToolkitError {
    /// The settings are incomplete or malformed.
    #[error(transparent)]
    Settings(#[from] IdentityToolkitSettingsError),
    /// The HTTP client could not be constructed.
    #[error("failed to build identity toolkit HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

struct Session {
    local_id: String,
}

#[derive(Default)]
enum SlotState {
    #[default]
    SignedOut,
    SignedIn(Session),
    Released,
}

/// Session storage for one client context.
///
/// The lock is only ever held for synchronous reads and writes.
#[derive(Default)]
struct SessionSlot {
    state: RwLock<SlotState>,
}

impl SessionSlot {
    fn current_user(&self) -> Option<String> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SlotState::SignedIn(session) => Some(session.local_id.clone()),
            SlotState::SignedOut | SlotState::Released => None,
        }
    }

    fn is_released(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            SlotState::Released
        )
    }

    fn store(&self, response: SessionResponseDto) -> String {
        let local_id = response.local_id;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, SlotState::Released) {
            *state = SlotState::SignedIn(Session {
                local_id: local_id.clone(),
            });
        }
        local_id
    }

    fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*state, SlotState::Released) {
            *state = SlotState::SignedOut;
        }
    }

    /// Mark the slot released; returns `false` if it already was.
    fn release(&self) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let was_released = matches!(*state, SlotState::Released);
        *state = SlotState::Released;
        !was_released
    }
}

/// Client and configuration shared by the primary and isolated contexts.
#[derive(Clone)]
struct RestClient {
    client: Client,
    endpoint: Url,
    api_key: Arc<Zeroizing<String>>,
}

impl RestClient {
    fn method_url(&self, method: &str) -> Result<Url, IdentityProviderError> {
        self.endpoint
            .join(&format!("./accounts:{method}"))
            .map_err(|error| IdentityProviderError::transport(error.to_string()))
    }

    async fn post<B>(&self, method: &str, body: &B) -> Result<Vec<u8>, IdentityProviderError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.method_url(method)?;
        debug!(method, "calling identity toolkit");
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|error| map_transport_error(&error))?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }

    async fn post_for_session(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionResponseDto, IdentityProviderError> {
        let body = self
            .post(method, &PasswordCredentialsRequest::new(email, password))
            .await?;
        parse_session(&body)
    }
}

/// Identity provider adapter speaking the Identity Toolkit REST API.
pub struct IdentityToolkitProvider {
    rest: RestClient,
    session: SessionSlot,
}

impl IdentityToolkitProvider {
    /// Build an adapter from loaded settings.
    ///
    /// The reqwest client is built without a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the API key is missing, the endpoint does not
    /// parse, or the reqwest client cannot be constructed.
    pub fn new(settings: &IdentityToolkitSettings) -> Result<Self, IdentityToolkitError> {
        let api_key = settings.api_key()?;
        let endpoint = settings.endpoint()?;
        let client = Client::builder().build()?;
        Ok(Self {
            rest: RestClient {
                client,
                endpoint,
                api_key: Arc::new(api_key),
            },
            session: SessionSlot::default(),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), IdentityProviderError> {
        let response = self
            .rest
            .post_for_session(SIGN_IN_METHOD, email, password)
            .await?;
        self.session.store(response);
        Ok(())
    }

    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        let response = self
            .rest
            .post_for_session(SIGN_UP_METHOD, email, password)
            .await?;
        Ok(self.session.store(response))
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.session.clear();
        Ok(())
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), IdentityProviderError> {
        self.rest
            .post(
                SEND_OOB_CODE_METHOD,
                &SendOobCodeRequest::password_reset(email),
            )
            .await
            .map(drop)
    }

    async fn confirm_password_reset(
        &self,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityProviderError> {
        self.rest
            .post(
                RESET_PASSWORD_METHOD,
                &ResetPasswordRequest {
                    oob_code: code,
                    new_password,
                },
            )
            .await
            .map(drop)
    }

    fn current_user(&self) -> Option<String> {
        self.session.current_user()
    }

    async fn open_isolated_context(
        &self,
        name: &str,
    ) -> Result<Arc<dyn IsolatedProviderContext>, IdentityProviderError> {
        Ok(Arc::new(IsolatedToolkitContext {
            name: name.to_owned(),
            rest: self.rest.clone(),
            session: SessionSlot::default(),
        }))
    }
}

/// Secondary context sharing the primary client but holding its own session.
struct IsolatedToolkitContext {
    name: String,
    rest: RestClient,
    session: SessionSlot,
}

impl IsolatedToolkitContext {
    fn deleted_error(&self) -> IdentityProviderError {
        IdentityProviderError::rejected(
            APP_DELETED_CODE,
            format!("isolated context {} has been released", self.name),
        )
    }
}

#[async_trait]
impl IsolatedProviderContext for IsolatedToolkitContext {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityProviderError> {
        if self.session.is_released() {
            return Err(self.deleted_error());
        }
        let response = self
            .rest
            .post_for_session(SIGN_UP_METHOD, email, password)
            .await?;
        Ok(self.session.store(response))
    }

    async fn release(&self) -> Result<(), IdentityProviderError> {
        if self.session.release() {
            Ok(())
        } else {
            Err(self.deleted_error())
        }
    }
}

fn parse_session(body: &[u8]) -> Result<SessionResponseDto, IdentityProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid identity toolkit session payload: {error}"))
    })
}

/// Translate a REST reason such as `EMAIL_EXISTS` into a provider code.
fn provider_code(reason: &str) -> String {
    let known = match reason {
        "EMAIL_EXISTS" => Some(codes::EMAIL_ALREADY_IN_USE),
        "INVALID_EMAIL" => Some(codes::INVALID_EMAIL),
        "OPERATION_NOT_ALLOWED" => Some(codes::OPERATION_NOT_ALLOWED),
        "WEAK_PASSWORD" => Some(codes::WEAK_PASSWORD),
        "USER_DISABLED" => Some(codes::USER_DISABLED),
        "EMAIL_NOT_FOUND" => Some(codes::USER_NOT_FOUND),
        "INVALID_PASSWORD" => Some(codes::WRONG_PASSWORD),
        "EXPIRED_OOB_CODE" => Some(codes::EXPIRED_ACTION_CODE),
        "INVALID_OOB_CODE" => Some(codes::INVALID_ACTION_CODE),
        "INVALID_LOGIN_CREDENTIALS" => Some("invalid-credential"),
        _ => None,
    };
    known.map_or_else(
        || reason.to_ascii_lowercase().replace('_', "-"),
        str::to_owned,
    )
}

fn map_transport_error(error: &reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => {
            let code = provider_code(envelope.error.reason());
            IdentityProviderError::rejected(code, envelope.error.message)
        }
        Err(_) => {
            let preview = body_preview(body);
            let message = if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {preview}", status.as_u16())
            };
            IdentityProviderError::rejected(format!("http-{}", status.as_u16()), message)
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

//! DTOs for the Identity Toolkit REST API.
//!
//! Request bodies serialise in the API's camelCase. Responses decode into
//! transport DTOs first; the adapter then keeps only what the session needs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordCredentialsRequest<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

impl<'a> PasswordCredentialsRequest<'a> {
    pub(super) const fn new(email: &'a str, password: &'a str) -> Self {
        Self {
            email,
            password,
            return_secure_token: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SendOobCodeRequest<'a> {
    pub(super) request_type: &'static str,
    pub(super) email: &'a str,
}

impl<'a> SendOobCodeRequest<'a> {
    pub(super) const fn password_reset(email: &'a str) -> Self {
        Self {
            request_type: "PASSWORD_RESET",
            email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResetPasswordRequest<'a> {
    pub(super) oob_code: &'a str,
    pub(super) new_password: &'a str,
}

/// Body returned by `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SessionResponseDto {
    pub(super) local_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) message: String,
}

impl ErrorBodyDto {
    /// Leading REST code of the message, e.g. `WEAK_PASSWORD` in
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub(super) fn reason(&self) -> &str {
        self.message
            .split_once(" : ")
            .map_or(self.message.as_str(), |(reason, _)| reason)
            .trim()
    }
}

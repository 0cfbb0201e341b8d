//! Credentials handed to the gateway.
//!
//! The gateway does not validate credential content; the provider decides
//! what a malformed email or a weak password is.

use std::fmt;

use zeroize::Zeroizing;

/// Username/password pair for one gateway call.
///
/// ## Invariants
/// - Both fields are always present; values are stored exactly as given.
/// - The password is wiped from memory on drop and redacted from `Debug`.
///
/// # Examples
/// ```
/// use auth_gateway::domain::Credentials;
///
/// let creds = Credentials::new("a@b.com", "hunter2");
/// assert_eq!(creds.username(), "a@b.com");
/// assert_eq!(creds.password(), "hunter2");
/// assert!(!format!("{creds:?}").contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Username (usually an email address) sent to the provider.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent to the provider.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

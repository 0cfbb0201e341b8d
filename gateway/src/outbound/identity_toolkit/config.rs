//! Identity Toolkit settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

/// Endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1/";

/// Errors raised while turning settings into adapter inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityToolkitSettingsError {
    /// No API key was configured.
    #[error("IDENTITY_TOOLKIT_API_KEY must be set")]
    MissingApiKey,
    /// The endpoint override is not an absolute URL.
    #[error("invalid identity toolkit endpoint {endpoint:?}: {message}")]
    InvalidEndpoint {
        /// Raw configured value.
        endpoint: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Configuration values for the Identity Toolkit adapter.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDENTITY_TOOLKIT")]
pub struct IdentityToolkitSettings {
    /// Web API key of the project.
    pub api_key: Option<String>,
    /// Base URL of the REST API.
    #[ortho_config(default = DEFAULT_ENDPOINT.to_owned())]
    pub endpoint: Option<String>,
}

impl IdentityToolkitSettings {
    /// Return the configured API key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityToolkitSettingsError::MissingApiKey`] when the key is
    /// absent or blank.
    pub fn api_key(&self) -> Result<Zeroizing<String>, IdentityToolkitSettingsError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Zeroizing::new(key.to_owned()))
            .ok_or(IdentityToolkitSettingsError::MissingApiKey)
    }

    /// Return the REST base URL, falling back to [`DEFAULT_ENDPOINT`].
    ///
    /// A trailing slash is added when missing so endpoint paths join below
    /// the configured base rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityToolkitSettingsError::InvalidEndpoint`] when the
    /// override does not parse.
    pub fn endpoint(&self) -> Result<Url, IdentityToolkitSettingsError> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let normalised = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalised).map_err(|error| IdentityToolkitSettingsError::InvalidEndpoint {
            endpoint: raw.to_owned(),
            message: error.to_string(),
        })
    }
}

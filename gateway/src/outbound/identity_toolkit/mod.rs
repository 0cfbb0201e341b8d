//! Identity Toolkit outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `IdentityProvider` port plus the settings it is built from.

mod config;
mod dto;
mod http_provider;

pub use config::{DEFAULT_ENDPOINT, IdentityToolkitSettings, IdentityToolkitSettingsError};
pub use http_provider::{APP_DELETED_CODE, IdentityToolkitError, IdentityToolkitProvider};

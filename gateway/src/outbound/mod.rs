//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **identity_toolkit**: reqwest-backed client for the Identity Toolkit
//!   REST API implementing `IdentityProvider`.
//!
//! Adapters are thin translators between domain types and wire formats.
//! They contain no business logic.

pub mod identity_toolkit;

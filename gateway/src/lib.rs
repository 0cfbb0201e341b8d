//! Provider-agnostic authentication gateway.
//!
//! `domain` holds the gateway port, the error taxonomy, and the live and
//! fixture gateways. `outbound` holds the Identity Toolkit adapter that
//! implements the identity provider port.

pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::TraceId;

//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authentication_gateway;
mod fault_logger;
mod identity_provider;

pub use authentication_gateway::{
    AuthenticationGateway, FIXTURE_ACCOUNT_ID, FixtureAuthenticationGateway, GatewayOperation,
};
pub use fault_logger::{FaultLogger, NoOpFaultLogger, TracingFaultLogger};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError, IsolatedProviderContext};

//! Port for recording faults caught by the gateway.
//!
//! Logging is observational: implementations must not block and cannot
//! influence the result returned to the caller.

use tracing::{debug, error};

use super::GatewayOperation;
use crate::domain::AuthenticationError;

/// Sink invoked for every fault the gateway catches.
pub trait FaultLogger: Send + Sync {
    /// Record `fault` raised while running `operation`, together with the
    /// `error` the caller is about to receive.
    fn log_fault(
        &self,
        operation: GatewayOperation,
        fault: &(dyn std::error::Error + 'static),
        error: &AuthenticationError,
    );
}

/// Default sink emitting `tracing` events.
///
/// The fault is logged at `error`; the captured backtrace follows at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFaultLogger;

impl FaultLogger for TracingFaultLogger {
    fn log_fault(
        &self,
        operation: GatewayOperation,
        fault: &(dyn std::error::Error + 'static),
        error: &AuthenticationError,
    ) {
        let context = error.context();
        let trace_id = context.trace_id().map(|id| id.to_string());
        error!(
            operation = operation.as_str(),
            fault = %fault,
            kind = %error.kind(),
            cause = error.cause(),
            trace_id = trace_id.as_deref(),
            "authentication gateway caught fault"
        );
        debug!(
            operation = operation.as_str(),
            backtrace = %context.backtrace(),
            "fault backtrace"
        );
    }
}

/// Sink that drops every fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpFaultLogger;

impl FaultLogger for NoOpFaultLogger {
    fn log_fault(
        &self,
        _operation: GatewayOperation,
        _fault: &(dyn std::error::Error + 'static),
        _error: &AuthenticationError,
    ) {
    }
}

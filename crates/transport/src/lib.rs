//! Command transport: one network round trip per device command.
//!
//! The transfer crate only depends on the [`CommandTransport`] trait;
//! [`HttpTransport`] is the production implementation for the device's
//! HTTP `/command` endpoint.

pub mod http;

pub use http::HttpTransport;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use devlink_protocol::{CommandRequest, CommandResponse};

/// Errors at the command-send boundary.
///
/// Every variant means "no usable response": the caller cannot tell
/// whether the device applied the command, and all variants are
/// retryable under the transfer crate's retry policy.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("device returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unparsable response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// One network round trip per command.
///
/// Implemented by [`HttpTransport`] for real devices and by scripted
/// mocks in tests. Cancellation is dropping the returned future; the
/// scheduler races it against a cancellation token.
pub trait CommandTransport: Send + Sync {
    /// Sends `request` and waits up to `timeout` for the response body.
    fn send(
        &self,
        request: &CommandRequest,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<CommandResponse, TransportError>> + Send + '_>>;
}

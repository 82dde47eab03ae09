//! Resilient chunked file transfer to the device.
//!
//! Uploading a file is two protocol phases: an `fcr` open negotiating a
//! stream token ([`FileCreate`]), then one `write` command per chunk
//! driven by [`StreamWriter`]. Both phases retry failed round trips up
//! to a configured bound, report progress at chunk granularity, and can
//! be aborted between chunks via a cancellation token.
//!
//! A transfer is strictly sequential: at most one request in flight,
//! and chunk N+1 is never dispatched before chunk N is confirmed (the
//! device's stream state is ordering-sensitive). Independent transfers
//! may run concurrently; each owns its session state exclusively.

mod config;
mod outcome;
mod plan;
mod progress;
mod session;
mod writer;

pub use config::TransferConfig;
pub use outcome::TransferOutcome;
pub use plan::ChunkPlan;
pub use progress::ProgressHandle;
pub use session::FileCreate;
pub use writer::StreamWriter;

use devlink_transport::TransportError;

/// Errors produced by the transfer crate.
///
/// All variants are retried locally up to the configured bound; a
/// transfer only surfaces the last one inside
/// [`TransferOutcome::Failed`] once its budget is exhausted.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// No usable response at the command-send boundary.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device answered with its rejection sentinel.
    #[error("device rejected the command")]
    CommandFailed,

    /// A well-formed reply whose body has neither a `response` field
    /// nor a bare string. Retried like an application failure.
    #[error("malformed device response")]
    BadResponse,

    /// The open response carried no numeric stream token.
    #[error("malformed session token in open response")]
    BadSessionToken,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::Duration;

    use devlink_protocol::{CommandRequest, CommandResponse};
    use devlink_transport::{CommandTransport, TransportError};

    /// One scripted round trip.
    pub(crate) enum Step {
        /// Respond with this JSON body.
        Ok(serde_json::Value),
        /// Fail at the transport level.
        NetworkError,
        /// Never resolve, for abort-in-flight tests.
        Hang,
    }

    /// Scripted transport: pops one step per round trip and records
    /// every request. An exhausted script fails like a dead network.
    pub(crate) struct MockTransport {
        steps: Mutex<Vec<Step>>,
        pub(crate) requests: Mutex<Vec<CommandRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A step answering `{"response": "<text>\r\n"}`.
        pub(crate) fn reply(text: &str) -> Step {
            Step::Ok(serde_json::json!({ "response": format!("{text}\r\n") }))
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn command(&self, index: usize) -> String {
            self.requests.lock().unwrap()[index].command.clone()
        }
    }

    impl CommandTransport for MockTransport {
        fn send(
            &self,
            request: &CommandRequest,
            _timeout: Duration,
        ) -> Pin<Box<dyn Future<Output = Result<CommandResponse, TransportError>> + Send + '_>>
        {
            self.requests.lock().unwrap().push(request.clone());
            let step = {
                let mut steps = self.steps.lock().unwrap();
                if steps.is_empty() {
                    None
                } else {
                    Some(steps.remove(0))
                }
            };
            Box::pin(async move {
                match step {
                    Some(Step::Ok(body)) => Ok(CommandResponse::from_body(body)),
                    Some(Step::NetworkError) | None => {
                        Err(TransportError::Timeout(Duration::ZERO))
                    }
                    Some(Step::Hang) => std::future::pending().await,
                }
            })
        }
    }
}

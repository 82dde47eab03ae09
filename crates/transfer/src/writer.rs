//! Chunk scheduler: one `write` command per chunk, strictly in order,
//! with a bounded retry loop per chunk.

use devlink_protocol::{CommandRequest, CommandResponse, command, encoding};
use devlink_transport::CommandTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::plan::ChunkPlan;
use crate::progress::ProgressHandle;
use crate::{TransferConfig, TransferError, TransferOutcome};

/// Streams a payload into an open device stream.
///
/// At most one request is in flight at any instant; a chunk is only
/// advanced past once the device confirms it. Failed attempts (network,
/// timeout, or an explicit device rejection) retry the same chunk until
/// the per-chunk budget runs out, and the attempt counter resets when a
/// new chunk begins.
pub struct StreamWriter<'a> {
    transport: &'a dyn CommandTransport,
    token: u32,
    config: TransferConfig,
    progress: ProgressHandle,
    cancel: CancellationToken,
}

/// Result of driving a single chunk through its retry budget.
enum ChunkResult {
    Confirmed(CommandResponse),
    Exhausted {
        error: TransferError,
        response: Option<CommandResponse>,
    },
    Aborted,
}

impl<'a> StreamWriter<'a> {
    /// Creates a writer targeting stream `token` on the device.
    pub fn new(transport: &'a dyn CommandTransport, token: u32, config: TransferConfig) -> Self {
        Self {
            transport,
            token,
            config,
            progress: ProgressHandle::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token (shared with the
    /// open phase when the writer runs under
    /// [`FileCreate`](crate::FileCreate)).
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Uses an externally owned progress handle.
    pub fn with_progress(mut self, progress: ProgressHandle) -> Self {
        self.progress = progress;
        self
    }

    /// Handle observing (confirmed, total) chunks at any time.
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Token aborting this transfer. Effective before the next dispatch
    /// or by dropping the in-flight request.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Sends every chunk of `payload` and resolves to exactly one
    /// terminal outcome.
    ///
    /// An empty payload issues no writes and succeeds immediately.
    pub async fn run(&self, payload: &[u8]) -> TransferOutcome {
        let plan = ChunkPlan::new(payload.len(), self.config.chunk_size);
        let total = plan.count();
        self.progress.set_total(total);

        debug!(
            token = self.token,
            chunks = total,
            bytes = payload.len(),
            "starting chunked write"
        );

        let mut last_response: Option<CommandResponse> = None;

        for (index, range) in plan.ranges().enumerate() {
            let request = CommandRequest::with_data(
                command::stream_write(self.token, range.len()),
                encoding::encode_chunk(&payload[range]),
            );

            match self.send_chunk(index, &request).await {
                ChunkResult::Confirmed(response) => {
                    self.progress.confirm();
                    debug!(token = self.token, chunk = index + 1, total, "chunk confirmed");
                    last_response = Some(response);
                }
                ChunkResult::Exhausted { error, response } => {
                    return TransferOutcome::Failed { error, response };
                }
                ChunkResult::Aborted => return TransferOutcome::Aborted,
            }
        }

        TransferOutcome::Success {
            response: last_response,
        }
    }

    /// Drives one chunk: at most `chunk_retries` attempts, counting
    /// transport failures, device rejections and malformed replies
    /// alike.
    async fn send_chunk(&self, index: usize, request: &CommandRequest) -> ChunkResult {
        let mut attempt = 0u32;
        let mut last: (TransferError, Option<CommandResponse>);

        loop {
            if self.cancel.is_cancelled() {
                return ChunkResult::Aborted;
            }
            attempt += 1;

            let sent = tokio::select! {
                _ = self.cancel.cancelled() => return ChunkResult::Aborted,
                result = self.transport.send(request, self.config.timeout) => result,
            };

            match sent {
                Ok(response) => {
                    if response.response_text().is_none() {
                        warn!(chunk = index + 1, attempt, "malformed chunk response");
                        last = (TransferError::BadResponse, Some(response));
                    } else if response.is_command_failed() {
                        warn!(chunk = index + 1, attempt, "device rejected chunk write");
                        last = (TransferError::CommandFailed, Some(response));
                    } else {
                        return ChunkResult::Confirmed(response);
                    }
                }
                Err(e) => {
                    warn!(chunk = index + 1, attempt, error = %e, "chunk round trip failed");
                    last = (e.into(), None);
                }
            }

            if attempt >= self.config.chunk_retries {
                let (error, response) = last;
                return ChunkResult::Exhausted { error, response };
            }
        }
    }
}

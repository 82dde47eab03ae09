//! File-session negotiation: the `fcr` open phase.

use devlink_protocol::{CommandRequest, CommandResponse, command, file_checksum};
use devlink_transport::CommandTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::progress::ProgressHandle;
use crate::writer::StreamWriter;
use crate::{TransferConfig, TransferError, TransferOutcome};

/// Creates a file on the device and streams its contents.
///
/// The open command declares the target path, total byte length, format
/// version, type tag and CRC-32 checksum; the device answers with a
/// numeric stream token that every subsequent write names. The write
/// phase never starts unless the open succeeds.
pub struct FileCreate<'a> {
    transport: &'a dyn CommandTransport,
    config: TransferConfig,
    progress: ProgressHandle,
    cancel: CancellationToken,
}

/// Result of driving the open command through its retry budget.
enum OpenResult {
    Opened(u32),
    Exhausted {
        error: TransferError,
        response: Option<CommandResponse>,
    },
    Aborted,
}

impl<'a> FileCreate<'a> {
    pub fn new(transport: &'a dyn CommandTransport, config: TransferConfig) -> Self {
        Self {
            transport,
            config,
            progress: ProgressHandle::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Handle observing chunk progress once the write phase begins.
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Token aborting the whole transfer: a pending open (and any
    /// still-pending open retry) before the session exists, the chunk
    /// writer afterwards.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Creates `path` holding `payload` on the device and resolves to
    /// exactly one terminal outcome.
    pub async fn run(&self, path: &str, payload: &[u8]) -> TransferOutcome {
        let checksum = file_checksum(payload);
        let request =
            CommandRequest::bare(command::file_create(path, payload.len(), &checksum));

        debug!(path, bytes = payload.len(), %checksum, "opening file stream");

        let token = match self.open(&request).await {
            OpenResult::Opened(token) => token,
            OpenResult::Exhausted { error, response } => {
                return TransferOutcome::Failed { error, response };
            }
            OpenResult::Aborted => return TransferOutcome::Aborted,
        };

        debug!(path, token, "file stream open");

        let writer = StreamWriter::new(self.transport, token, self.config.clone())
            .with_cancel(self.cancel.clone())
            .with_progress(self.progress.clone());
        writer.run(payload).await
    }

    /// Drives the open command: at most `open_retries` attempts.
    /// Transport failures, device rejections and malformed tokens all
    /// retry the same way; the device may recover between attempts.
    async fn open(&self, request: &CommandRequest) -> OpenResult {
        let mut attempt = 0u32;
        let mut last: (TransferError, Option<CommandResponse>);

        loop {
            if self.cancel.is_cancelled() {
                return OpenResult::Aborted;
            }
            attempt += 1;

            let sent = tokio::select! {
                _ = self.cancel.cancelled() => return OpenResult::Aborted,
                result = self.transport.send(request, self.config.timeout) => result,
            };

            match sent {
                Ok(response) => {
                    if response.is_command_failed() {
                        warn!(attempt, "device rejected file open");
                        last = (TransferError::CommandFailed, Some(response));
                    } else if let Some(token) = response.session_token() {
                        return OpenResult::Opened(token);
                    } else {
                        warn!(attempt, "open response carried no usable stream token");
                        last = (TransferError::BadSessionToken, Some(response));
                    }
                }
                Err(e) => {
                    warn!(attempt, error = %e, "open round trip failed");
                    last = (e.into(), None);
                }
            }

            if attempt >= self.config.open_retries {
                let (error, response) = last;
                return OpenResult::Exhausted { error, response };
            }
        }
    }
}

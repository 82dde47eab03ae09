//! Per-transfer configuration.

use std::time::Duration;

use devlink_protocol::{DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT};

/// Knobs for one transfer. Immutable once the transfer starts.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Raw bytes per write command.
    pub chunk_size: usize,
    /// Per-request timeout; a timed-out request counts as one failed
    /// attempt.
    pub timeout: Duration,
    /// Total attempts allowed per chunk before the transfer fails.
    pub chunk_retries: u32,
    /// Total attempts allowed for the open command.
    pub open_retries: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: DEFAULT_TIMEOUT,
            chunk_retries: 3,
            open_retries: 3,
        }
    }
}

impl TransferConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_chunk_retries(mut self, retries: u32) -> Self {
        self.chunk_retries = retries;
        self
    }

    pub fn with_open_retries(mut self, retries: u32) -> Self {
        self.open_retries = retries;
        self
    }
}

//! Terminal transfer results.

use devlink_protocol::CommandResponse;

use crate::TransferError;

/// Terminal result of a transfer. Exactly one is produced per transfer.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Every chunk was confirmed. Carries the final write response, or
    /// `None` when the payload was empty and no writes were issued.
    Success { response: Option<CommandResponse> },
    /// A retry budget was exhausted. Carries the last error and the
    /// last device response, if any attempt produced one.
    Failed {
        error: TransferError,
        response: Option<CommandResponse>,
    },
    /// The caller cancelled the transfer. Distinct from `Failed`: no
    /// retry budget was exhausted and no further requests were sent.
    Aborted,
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

//! Wire-level types and pure helpers for the device command protocol.
//!
//! The device accepts one command per HTTP request as a JSON envelope
//! (`{"flags": .., "command": .., "data": ..}`) and answers with a JSON
//! body. This crate holds the envelope types, the command-string builders
//! used by the file-transfer protocol, and the stateless checksum and
//! encoding functions the transfer crate builds on.

pub mod checksum;
pub mod command;
pub mod encoding;
pub mod envelope;

pub use checksum::file_checksum;
pub use encoding::encode_chunk;
pub use envelope::{CommandRequest, CommandResponse};

use std::time::Duration;

/// Raw bytes per chunk. Device requests cap at 4 KiB; 2560 payload bytes
/// come out to roughly 3.5 KiB once base64-encoded.
pub const DEFAULT_CHUNK_SIZE: usize = 2560;

/// Envelope flag bit telling the device the `data` field is base64.
pub const FLAG_BASE64_DATA: u32 = 4;

/// File format version declared on every open command.
pub const FILE_VERSION: &str = "1.0.0";

/// File type tag declared on every open command.
pub const FILE_TYPE_TAG: &str = "0xFE";

/// Sentinel the device returns when it rejects a command.
pub const COMMAND_FAILED: &str = "Command failed";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

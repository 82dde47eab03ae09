//! Base64 chunk encoding.
//!
//! The command channel is JSON-only, so chunk bodies travel as text in
//! the envelope's `data` field with [`crate::FLAG_BASE64_DATA`] set.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Encodes a chunk for the `data` field of a write command.
///
/// Standard RFC 4648 alphabet with `=` padding. Accepts any contiguous
/// slice; the scheduler passes chunk-sized sub-ranges of the payload.
pub fn encode_chunk(data: &[u8]) -> String {
    STANDARD.encode(data)
}

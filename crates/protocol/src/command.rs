//! Command-string builders for the file-transfer protocol.
//!
//! Commands are single-line strings carried in the `command` field of
//! the JSON envelope. Only the two commands the transfer protocol needs
//! live here; one-shot device commands are out of scope for this crate.

use crate::{FILE_TYPE_TAG, FILE_VERSION};

/// Builds the open command creating `path` with `len` total bytes.
///
/// `-o` opens the file as a write stream; version and type tag are
/// fixed by the device's file format. `checksum` is the rendered CRC-32
/// from [`crate::file_checksum`], verified device-side once the last
/// chunk lands.
pub fn file_create(path: &str, len: usize, checksum: &str) -> String {
    format!("fcr {path} {len} -o -v {FILE_VERSION} -t {FILE_TYPE_TAG} -c {checksum}")
}

/// Builds the write command sending `len` bytes into stream `token`.
///
/// `len` is the raw byte count of the chunk, not the base64 length.
pub fn stream_write(token: u32, len: usize) -> String {
    format!("write {token} {len}")
}

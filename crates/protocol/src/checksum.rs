//! File integrity checksum.

/// Computes the reflected CRC-32 (polynomial `0xEDB88320`, all-ones
/// init, final invert) of `data` and renders it the way the device
/// expects on the open command: `0x` followed by uppercase hex digits,
/// no zero padding.
///
/// Total over any buffer; the empty buffer hashes to `0x0` (the
/// init/final steps alone).
pub fn file_checksum(data: &[u8]) -> String {
    format!("0x{:X}", crc32fast::hash(data))
}

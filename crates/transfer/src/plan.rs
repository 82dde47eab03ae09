//! Chunk-boundary arithmetic.

use std::ops::Range;

use devlink_protocol::DEFAULT_CHUNK_SIZE;

/// Deterministic split of a payload into contiguous, non-overlapping
/// chunks, dispatched strictly in ascending order.
///
/// Chunks are full-sized except possibly the last. A payload whose
/// length is an exact multiple of the chunk size has no undersized
/// tail, and the empty payload has no chunks at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    payload_len: usize,
    chunk_size: usize,
}

impl ChunkPlan {
    /// Plans `payload_len` bytes in chunks of `chunk_size`.
    ///
    /// A zero `chunk_size` falls back to [`DEFAULT_CHUNK_SIZE`].
    pub fn new(payload_len: usize, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            payload_len,
            chunk_size,
        }
    }

    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks. Zero for the empty payload.
    pub fn count(&self) -> usize {
        self.payload_len.div_ceil(self.chunk_size)
    }

    /// Byte range of chunk `index` (zero-based), or `None` past the
    /// end.
    pub fn bounds(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.count() {
            return None;
        }
        let start = index * self.chunk_size;
        let end = usize::min(start + self.chunk_size, self.payload_len);
        Some(start..end)
    }

    /// Length in bytes of chunk `index`.
    pub fn len_of(&self, index: usize) -> Option<usize> {
        self.bounds(index).map(|r| r.len())
    }

    /// Iterates chunk byte ranges in dispatch order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + use<> {
        let plan = *self;
        (0..plan.count()).filter_map(move |i| plan.bounds(i))
    }
}

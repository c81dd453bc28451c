use serde::{Deserialize, Serialize};

/// Emitted exactly once per worker after its partition is fully written.
/// `buffer_offset` is the base offset of the output region inside the
/// shared buffer; the buffer is singular so every rank reports the same
/// well-known value, carried for API symmetry and cross-checked by the
/// coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSignal {
    pub source_rank: usize,
    pub buffer_offset: usize,
}

impl CompletionSignal {
    pub fn new(source_rank: usize, buffer_offset: usize) -> Self {
        Self {
            source_rank,
            buffer_offset,
        }
    }
}

//! Batch drawer: one round of hardware draws with per-word accounting.

use crate::error::TapError;
use crate::source::WordSource;

/// Largest number of words drawn in one round.
pub const MAX_ROUND_SIZE: usize = 16;

/// One round of draws.
///
/// Stack-allocated and fixed-capacity. `successes` counts the invocations
/// that reported a delivered word; slots whose draw failed hold whatever the
/// instruction left there, so the words are only handed out when every draw
/// in the round succeeded.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    words: [u64; MAX_ROUND_SIZE],
    len: usize,
    successes: usize,
}

impl DrawBatch {
    /// Number of draws requested for this round.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of draws that delivered a word (`0 ..= len`).
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// True when every requested draw delivered.
    pub fn is_complete(&self) -> bool {
        self.successes == self.len
    }

    /// The drawn words, in draw order, iff the round is complete.
    pub fn complete(&self) -> Option<&[u64]> {
        self.is_complete().then(|| &self.words[..self.len])
    }
}

/// Issue `count` draws against `source`.
///
/// Exactly one invocation per slot, no intra-call retry: a failed draw is
/// not counted and the loop moves on. `count == 0` touches nothing.
pub fn draw_batch<S: WordSource + ?Sized>(source: &S, count: usize) -> Result<DrawBatch, TapError> {
    if count > MAX_ROUND_SIZE {
        return Err(TapError::RoundTooLarge {
            requested: count,
            max: MAX_ROUND_SIZE,
        });
    }

    let mut batch = DrawBatch {
        words: [0; MAX_ROUND_SIZE],
        len: count,
        successes: 0,
    };
    for slot in &mut batch.words[..count] {
        batch.successes += usize::from(source.try_fill(slot));
    }
    Ok(batch)
}

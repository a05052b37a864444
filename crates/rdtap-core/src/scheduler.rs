//! Round scheduler: turns a requested total into fixed-size rounds.
//!
//! The total is split into rounds of at most [`MAX_ROUND_SIZE`] words. A
//! round reaches the sink only if every draw in it delivered. A short round
//! is reported and then re-issued at the same size; it never counts towards
//! progress and its words are dropped.
//!
//! With the default [`ShortfallPolicy::Unbounded`] a source that never
//! completes a round keeps the scheduler re-issuing that round forever.
//! [`ShortfallPolicy::Bounded`] caps the number of consecutive re-issues.

use std::time::Instant;

use crate::batch::{MAX_ROUND_SIZE, draw_batch};
use crate::error::TapError;
use crate::report::{RunReport, Shortfall};
use crate::sink::WordSink;
use crate::source::WordSource;

/// What to do when a round comes back short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortfallPolicy {
    /// Re-issue the round until it completes.
    #[default]
    Unbounded,
    /// Re-issue a short round at most `n` times in a row. The `n + 1`th
    /// consecutive short round fails the run, so `Bounded(0)` gives up on
    /// the first one.
    Bounded(u32),
}

impl ShortfallPolicy {
    /// True once `consecutive` short rounds exceed what the policy tolerates.
    pub fn exhausted(self, consecutive: u32) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(max_retries) => consecutive > max_retries,
        }
    }
}

/// Number of rounds a fully successful run of `total` words takes.
pub fn round_count(total: u64) -> u64 {
    total.div_ceil(MAX_ROUND_SIZE as u64)
}

/// Drives a [`WordSource`] round by round into a [`WordSink`].
pub struct RoundScheduler<S> {
    source: S,
    policy: ShortfallPolicy,
}

impl<S: WordSource> RoundScheduler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: ShortfallPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ShortfallPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Draw `total` words into `sink`.
    ///
    /// The sink is not flushed here; whoever opened it closes it.
    pub fn run<K: WordSink + ?Sized>(&self, total: u64, sink: &mut K) -> Result<RunReport, TapError> {
        let started = Instant::now();
        let name = self.source.name();
        let mut report = RunReport::new(name, total);
        let mut remaining = total;
        let mut consecutive_short = 0u32;
        let mut attempt = 0u64;

        log::debug!(
            "{name}: {total} words in {} round(s), policy {:?}",
            round_count(total),
            self.policy
        );

        while remaining > 0 {
            let round_size = remaining.min(MAX_ROUND_SIZE as u64) as usize;
            let batch = draw_batch(&self.source, round_size)?;

            match batch.complete() {
                Some(words) => {
                    sink.accept(words).map_err(TapError::Sink)?;
                    remaining -= round_size as u64;
                    report.rounds += 1;
                    report.words_written += round_size as u64;
                    consecutive_short = 0;
                    log::trace!("{name}: round {attempt} ok, {remaining} words left");
                }
                None => {
                    log::warn!(
                        "{name} round unsuccessful: {} != {round_size}!",
                        batch.successes()
                    );
                    report.record_shortfall(Shortfall {
                        attempt,
                        requested: round_size,
                        delivered: batch.successes(),
                    });
                    consecutive_short += 1;
                    if self.policy.exhausted(consecutive_short) {
                        report.elapsed_ms = started.elapsed().as_millis() as u64;
                        return Err(TapError::RetriesExhausted {
                            requested: round_size,
                            delivered: batch.successes(),
                            attempts: consecutive_short,
                            report: Box::new(report),
                        });
                    }
                }
            }
            attempt += 1;
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "{name}: wrote {} words in {} round(s), {} short round(s), {}ms",
            report.words_written,
            report.rounds,
            report.short_rounds,
            report.elapsed_ms
        );
        Ok(report)
    }
}

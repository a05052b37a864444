//! Error taxonomy for a sampling run.
//!
//! Setup failures (`Unsupported`, `OpenOutput`) are detected at the boundary
//! where they occur and abort the run before any word is drawn. Round
//! shortfalls are not errors: they are reported and re-attempted by the
//! scheduler unless a bounded [`ShortfallPolicy`](crate::ShortfallPolicy)
//! turns a run of them into [`TapError::RetriesExhausted`].

use std::path::PathBuf;

use crate::report::RunReport;

/// Errors produced by the sampling core.
#[derive(Debug, thiserror::Error)]
pub enum TapError {
    /// The CPU does not implement the requested hardware instruction.
    #[error("Your CPU does not support {instruction}.")]
    Unsupported { instruction: &'static str },

    /// The binary output file could not be created.
    #[error("Error opening file '{}', terminating early.", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing accepted words to the sink failed mid-run.
    #[error("sink write failed: {0}")]
    Sink(#[source] std::io::Error),

    /// A batch was requested with more slots than a round can hold.
    #[error("round of {requested} words exceeds the maximum of {max}")]
    RoundTooLarge { requested: usize, max: usize },

    /// A bounded shortfall policy gave up on a round. `report` covers the
    /// run up to that point.
    #[error(
        "giving up after {attempts} consecutive short rounds (last: {delivered} != {requested})"
    )]
    RetriesExhausted {
        requested: usize,
        delivered: usize,
        attempts: u32,
        report: Box<RunReport>,
    },

    /// The run report could not be written.
    #[error("failed to write run report to '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TapError {
    /// True for errors raised before the first draw was attempted.
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::OpenOutput { .. })
    }

    /// The report of a run that stopped part way, if the error carries one.
    pub fn partial_report(&self) -> Option<&RunReport> {
        match self {
            Self::RetriesExhausted { report, .. } => Some(report),
            _ => None,
        }
    }
}

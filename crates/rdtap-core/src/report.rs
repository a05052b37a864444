//! Run summaries.
//!
//! A [`RunReport`] is what the scheduler hands back after a run: how many
//! rounds went through, how many words reached the sink, and how many short
//! rounds it saw on the way. Only the first [`SHORTFALL_LOG_LIMIT`] short
//! rounds are kept in detail. It serializes to JSON for `rdtap --report`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TapError;

/// Short rounds recorded in detail per report; later ones are only counted.
pub const SHORTFALL_LOG_LIMIT: usize = 64;

/// Machine information captured with a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    pub os: String,
    pub arch: String,
    pub cpu_vendor: String,
    pub cores: usize,
}

/// Detect machine information (best-effort).
pub fn detect_machine_info() -> MachineInfo {
    MachineInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_vendor: crate::cpu::cpu_features().vendor.clone(),
        cores: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    }
}

/// One round that came back short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Zero-based attempt index within the run.
    pub attempt: u64,
    /// Words the round asked for.
    pub requested: usize,
    /// Draws that delivered.
    pub delivered: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub source: String,
    pub requested_words: u64,
    pub words_written: u64,
    pub rounds: u64,
    /// Every short round seen, including those past the detail limit.
    pub short_rounds: u64,
    /// The first [`SHORTFALL_LOG_LIMIT`] short rounds.
    pub shortfalls: Vec<Shortfall>,
    pub elapsed_ms: u64,
    pub machine: MachineInfo,
    pub rdtap_version: String,
}

impl RunReport {
    pub(crate) fn new(source: &str, requested_words: u64) -> Self {
        Self {
            source: source.to_string(),
            requested_words,
            words_written: 0,
            rounds: 0,
            short_rounds: 0,
            shortfalls: Vec::new(),
            elapsed_ms: 0,
            machine: detect_machine_info(),
            rdtap_version: crate::VERSION.to_string(),
        }
    }

    /// Count a short round, keeping its details while there is room.
    pub(crate) fn record_shortfall(&mut self, shortfall: Shortfall) {
        self.short_rounds += 1;
        if self.shortfalls.len() < SHORTFALL_LOG_LIMIT {
            self.shortfalls.push(shortfall);
        }
    }

    /// Total attempts, successful or not.
    pub fn attempts(&self) -> u64 {
        self.rounds + self.short_rounds
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), TapError> {
        let to_report_err = |source| TapError::Report {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| to_report_err(std::io::Error::other(e)))?;
        fs::write(path, json).map_err(to_report_err)
    }
}

//! Hardware word source trait and source selection.
//!
//! Every hardware instruction the tap can sample implements [`WordSource`].
//! One call to [`WordSource::try_fill`] is one invocation of the instruction:
//! it writes the slot and reports per-call success, it never retries.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TapError;
use crate::rdrand::{RdRand, RdSeed};

/// Metadata about a word source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Unique identifier (e.g. `"rdrand"`).
    pub name: &'static str,
    /// Instruction mnemonic used in diagnostics (e.g. `"RDRAND"`).
    pub instruction: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
}

/// A source of 64-bit hardware entropy words.
pub trait WordSource {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Issue one draw into `slot`.
    ///
    /// Returns `false` when the hardware could not deliver a word for this
    /// invocation (e.g. the on-die conditioner is transiently drained). The
    /// slot contents are unspecified in that case.
    fn try_fill(&self, slot: &mut u64) -> bool;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

impl<S: WordSource + ?Sized> WordSource for &S {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn try_fill(&self, slot: &mut u64) -> bool {
        (**self).try_fill(slot)
    }
}

impl<S: WordSource + ?Sized> WordSource for Box<S> {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn try_fill(&self, slot: &mut u64) -> bool {
        (**self).try_fill(slot)
    }
}

/// Which hardware instruction to sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `RDRAND`: DRBG output reseeded from the on-die entropy source.
    #[default]
    RdRand,
    /// `RDSEED`: conditioned entropy straight from the on-die source.
    RdSeed,
}

impl SourceKind {
    /// Instruction mnemonic for diagnostics.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::RdRand => "RDRAND",
            Self::RdSeed => "RDSEED",
        }
    }

    /// Gate on CPU capability and hand out the matching source.
    ///
    /// Fails with [`TapError::Unsupported`] when CPUID does not report the
    /// instruction. There is no software fallback.
    pub fn open(self) -> Result<Box<dyn WordSource>, TapError> {
        let source: Option<Box<dyn WordSource>> = match self {
            Self::RdRand => RdRand::detect().map(|s| Box::new(s) as Box<dyn WordSource>),
            Self::RdSeed => RdSeed::detect().map(|s| Box::new(s) as Box<dyn WordSource>),
        };
        source.ok_or(TapError::Unsupported {
            instruction: self.instruction(),
        })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdRand => write!(f, "rdrand"),
            Self::RdSeed => write!(f, "rdseed"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rdrand" => Ok(Self::RdRand),
            "rdseed" => Ok(Self::RdSeed),
            other => Err(format!("unknown source '{other}' (expected rdrand or rdseed)")),
        }
    }
}

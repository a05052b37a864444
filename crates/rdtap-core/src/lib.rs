//! # rdtap-core
//!
//! **A raw tap on the CPU's hardware random-number instructions.**
//!
//! `rdtap-core` detects `RDRAND` / `RDSEED` through CPUID, draws 64-bit words
//! in fixed-size rounds, and forwards only complete rounds to a sink: a raw
//! binary file or hex on the console.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rdtap_core::{Request, run_request};
//!
//! // 20 words of RDRAND output as hex on stdout (two rounds: 16 + 4).
//! let request = Request { total: 20, ..Request::default() };
//! let report = run_request(&request, std::io::stdout().lock())?;
//! assert_eq!(report.words_written, 20);
//! # Ok::<(), rdtap_core::TapError>(())
//! ```
//!
//! ## Architecture
//!
//! CPUID gate → Round scheduler → Batch drawer → Sink
//!
//! - The **capability gate** ([`cpu`]) reads CPUID once per process. A
//!   [`WordSource`] for an instruction can only be built if CPUID reports it.
//! - The **batch drawer** ([`draw_batch`]) issues exactly one instruction
//!   invocation per slot and counts the ones that delivered. It never
//!   retries.
//! - The **round scheduler** ([`RoundScheduler`]) splits the request into
//!   rounds of at most [`MAX_ROUND_SIZE`] words. Short rounds are reported
//!   and re-issued; their words never reach the sink.
//!
//! No whitening, extraction or DRBG seeding happens anywhere. What the
//! instruction returns is what gets written.
//!
//! ## Non-termination
//!
//! Under the default [`ShortfallPolicy::Unbounded`], a source that can never
//! complete a round keeps the scheduler re-issuing that round indefinitely.
//! Use [`ShortfallPolicy::Bounded`] to fail instead.

pub mod affinity;
pub mod batch;
pub mod cpu;
pub mod error;
pub mod rdrand;
pub mod report;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod tap;

pub use affinity::{AffinityError, pin_to_core};
pub use batch::{DrawBatch, MAX_ROUND_SIZE, draw_batch};
pub use cpu::{CpuFeatures, cpu_features, supports_hardware_rng, supports_rdseed};
pub use error::TapError;
pub use rdrand::{RdRand, RdSeed};
pub use report::{MachineInfo, RunReport, SHORTFALL_LOG_LIMIT, Shortfall, detect_machine_info};
pub use scheduler::{RoundScheduler, ShortfallPolicy, round_count};
pub use sink::{BinarySink, ConsoleSink, WordSink, read_binary_words};
pub use source::{SourceInfo, SourceKind, WordSource};
pub use tap::{DEFAULT_WORD_COUNT, Request, run_request, run_with};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

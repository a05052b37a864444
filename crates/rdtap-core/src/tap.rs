//! End-to-end run: capability gate, sink setup, rounds, sink close.
//!
//! Ordering guarantees:
//! 1. No sink is touched unless a source passed the capability check.
//! 2. No draw is attempted unless the sink opened.
//! 3. The sink is flushed once after the last round, and dropped (closed)
//!    on every exit path.

use std::io::Write;
use std::path::PathBuf;

use crate::error::TapError;
use crate::report::RunReport;
use crate::scheduler::{RoundScheduler, ShortfallPolicy};
use crate::sink::{BinarySink, ConsoleSink, WordSink};
use crate::source::{SourceKind, WordSource};

/// Words drawn when the caller does not say otherwise.
pub const DEFAULT_WORD_COUNT: u64 = 16;

/// A resolved sampling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Total words to deliver.
    pub total: u64,
    /// Binary output file; `None` writes hex to the console.
    pub output: Option<PathBuf>,
    /// Instruction to sample.
    pub source: SourceKind,
    /// Reaction to short rounds.
    pub policy: ShortfallPolicy,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            total: DEFAULT_WORD_COUNT,
            output: None,
            source: SourceKind::default(),
            policy: ShortfallPolicy::default(),
        }
    }
}

/// Detect the requested source and run. Console output goes to `console`.
pub fn run_request<W: Write>(request: &Request, console: W) -> Result<RunReport, TapError> {
    let source = request.source.open()?;
    run_with(request, Some(source), console)
}

/// Run against an already-detected source.
///
/// `source` is the capability token: `None` means the instruction is absent
/// and the run fails before any sink is opened.
pub fn run_with<S: WordSource, W: Write>(
    request: &Request,
    source: Option<S>,
    console: W,
) -> Result<RunReport, TapError> {
    let source = source.ok_or(TapError::Unsupported {
        instruction: request.source.instruction(),
    })?;

    match &request.output {
        Some(path) => {
            let mut sink = BinarySink::create(path)?;
            drive(request, &source, &mut sink)
        }
        None => {
            let mut sink = ConsoleSink::new(console, source.name());
            drive(request, &source, &mut sink)
        }
    }
}

fn drive<S: WordSource, K: WordSink>(
    request: &Request,
    source: &S,
    sink: &mut K,
) -> Result<RunReport, TapError> {
    let report = RoundScheduler::new(source)
        .with_policy(request.policy)
        .run(request.total, sink)?;
    sink.finish().map_err(TapError::Sink)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceInfo;
    use std::cell::Cell;

    static COUNTING_INFO: SourceInfo = SourceInfo {
        name: "rdrand",
        instruction: "RDRAND",
        description: "always delivers, counts invocations",
    };

    #[derive(Default)]
    struct CountingSource {
        calls: Cell<u64>,
    }

    impl WordSource for CountingSource {
        fn info(&self) -> &SourceInfo {
            &COUNTING_INFO
        }

        fn try_fill(&self, slot: &mut u64) -> bool {
            let n = self.calls.get();
            self.calls.set(n + 1);
            *slot = 0xabc0 + n;
            true
        }
    }

    #[test]
    fn default_request() {
        let r = Request::default();
        assert_eq!(r.total, 16);
        assert!(r.output.is_none());
        assert_eq!(r.source, SourceKind::RdRand);
        assert_eq!(r.policy, ShortfallPolicy::Unbounded);
    }

    #[test]
    fn console_run_prints_hex() {
        let request = Request {
            total: 3,
            ..Request::default()
        };
        let mut out = Vec::new();
        let report = run_with(&request, Some(CountingSource::default()), &mut out).unwrap();
        assert_eq!(report.words_written, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "rdrand successful: 3\nabc0\nabc1\nabc2\n"
        );
    }

    #[test]
    fn missing_capability_fails_before_sink() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.bin");
        let request = Request {
            output: Some(path.clone()),
            ..Request::default()
        };
        let mut out = Vec::new();
        let err = run_with(&request, None::<CountingSource>, &mut out).unwrap_err();

        assert!(matches!(err, TapError::Unsupported { instruction: "RDRAND" }));
        assert!(!path.exists(), "sink must not be opened");
        assert!(out.is_empty());
    }

    #[test]
    fn unwritable_output_fails_before_draw() {
        let tmp = tempfile::tempdir().unwrap();
        let request = Request {
            output: Some(tmp.path().join("missing/out.bin")),
            ..Request::default()
        };
        let source = CountingSource::default();
        let err = run_with(&request, Some(&source), Vec::new()).unwrap_err();

        assert!(matches!(err, TapError::OpenOutput { .. }));
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn file_run_writes_nothing_to_console() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.bin");
        let request = Request {
            total: 20,
            output: Some(path.clone()),
            ..Request::default()
        };
        let mut out = Vec::new();
        run_with(&request, Some(CountingSource::default()), &mut out).unwrap();

        assert!(out.is_empty());
        let words = crate::sink::read_binary_words(&path).unwrap();
        assert_eq!(words, (0..20).map(|n| 0xabc0 + n).collect::<Vec<u64>>());
    }
}

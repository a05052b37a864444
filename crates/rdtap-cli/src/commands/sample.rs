use std::path::Path;
use std::process::ExitCode;

use rdtap_core::{Request, RunReport, SourceKind, pin_to_core, run_with};

pub struct SampleCommandConfig<'a> {
    pub count: u64,
    pub output_path: Option<&'a Path>,
    pub core: Option<usize>,
    pub source: SourceKind,
    pub max_retries: Option<u32>,
    pub report_path: Option<&'a Path>,
    pub quiet: bool,
}

pub fn run(config: SampleCommandConfig<'_>) -> ExitCode {
    let request = Request {
        total: config.count,
        output: config.output_path.map(Path::to_path_buf),
        source: config.source,
        policy: super::parse_policy(config.max_retries),
    };
    log::debug!("resolved request: {request:?}");

    // Capability first: nothing else happens on a CPU without the instruction.
    let source = match request.source.open() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", super::diagnostic(&e));
            return ExitCode::FAILURE;
        }
    };

    if let Some(core) = config.core {
        pin(core, config.quiet);
    }

    let outcome = run_with(&request, Some(source), std::io::stdout().lock());

    // A run that gave up part way still leaves a report behind.
    let report = match &outcome {
        Ok(report) => Some(report),
        Err(e) => {
            eprintln!("{}", super::diagnostic(e));
            e.partial_report()
        }
    };
    if let (Some(path), Some(report)) = (config.report_path, report) {
        if !write_report(report, path, config.quiet) {
            return ExitCode::FAILURE;
        }
    }

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn write_report(report: &RunReport, path: &Path, quiet: bool) -> bool {
    match report.write_json(path) {
        Ok(()) => {
            if !quiet {
                eprintln!("Report written to {}", path.display());
            }
            true
        }
        Err(e) => {
            eprintln!("{}", super::diagnostic(&e));
            false
        }
    }
}

/// Affinity failures are reported and otherwise ignored.
fn pin(core: usize, quiet: bool) {
    match pin_to_core(core) {
        Ok(()) => {
            if !quiet {
                eprintln!("Processor affinity set to {core}.");
            }
        }
        Err(e) => eprintln!("Core affinity setting failed: {e}"),
    }
}

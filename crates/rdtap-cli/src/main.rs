//! CLI for rdtap: raw words straight from the CPU's hardware RNG.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use rdtap_core::{DEFAULT_WORD_COUNT, SourceKind};

#[derive(Parser)]
#[command(name = "rdtap")]
#[command(about = "rdtap: raw words straight from the CPU's hardware RNG")]
#[command(version = rdtap_core::VERSION)]
struct Cli {
    /// Number of 64-bit words to draw
    #[arg(short = 'n', long, default_value_t = DEFAULT_WORD_COUNT)]
    count: u64,

    /// Write raw native-endian words to this file instead of hex to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pin the process to this CPU core before drawing
    #[arg(short, long)]
    core: Option<usize>,

    /// Hardware instruction to sample
    #[arg(
        long,
        default_value = "rdrand",
        value_parser = PossibleValuesParser::new(["rdrand", "rdseed"])
            .try_map(|s| s.parse::<SourceKind>())
    )]
    source: SourceKind,

    /// Re-issue a short round at most N times in a row, then fail (default: retry forever)
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the CPU's hardware RNG capabilities and exit
    #[arg(long)]
    probe: bool,

    /// Suppress status messages (diagnostics are still printed)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if cli.probe {
        return commands::probe::run();
    }

    commands::sample::run(commands::sample::SampleCommandConfig {
        count: cli.count,
        output_path: cli.output.as_deref(),
        core: cli.core,
        source: cli.source,
        max_retries: cli.max_retries,
        report_path: cli.report.as_deref(),
        quiet: cli.quiet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["rdtap"]).unwrap();
        assert_eq!(cli.count, 16);
        assert!(cli.output.is_none());
        assert!(cli.core.is_none());
        assert_eq!(cli.source, SourceKind::RdRand);
        assert!(cli.max_retries.is_none());
        assert!(!cli.probe);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["rdtap", "-n", "20", "-o", "out.bin", "-c", "3"]).unwrap();
        assert_eq!(cli.count, 20);
        assert_eq!(cli.output, Some(PathBuf::from("out.bin")));
        assert_eq!(cli.core, Some(3));
    }

    #[test]
    fn source_parses_to_kind() {
        let cli = Cli::try_parse_from(["rdtap", "--source", "rdseed"]).unwrap();
        assert_eq!(cli.source, SourceKind::RdSeed);
    }

    #[test]
    fn max_retries_is_optional_count() {
        let cli = Cli::try_parse_from(["rdtap", "--max-retries", "0"]).unwrap();
        assert_eq!(cli.max_retries, Some(0));
        assert!(Cli::try_parse_from(["rdtap", "--max-retries", "-1"]).is_err());
    }

    #[test]
    fn rejects_unknown_source() {
        assert!(Cli::try_parse_from(["rdtap", "--source", "urandom"]).is_err());
    }

    #[test]
    fn rejects_negative_count() {
        assert!(Cli::try_parse_from(["rdtap", "-n", "-1"]).is_err());
    }
}

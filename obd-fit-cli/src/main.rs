//! OBD FIT Transcoder CLI Application
//!
//! This is the command-line interface for the OBD/GPS telemetry transcoder.
//! It uses the obd-fit-encoder library and adds:
//! - Argument parsing and validation
//! - Logging setup with verbosity mapping
//! - Summary reporting (text or JSON)
//! - Exit-code mapping per fatal error kind

use anyhow::Result;
use clap::Parser;
use obd_fit_encoder::{EncodeError, Transcoder, TranscoderConfig};
use std::path::PathBuf;

mod report;

/// OBD FIT Transcoder - Convert telemetry CSV logs into FIT activity files
#[derive(Parser, Debug)]
#[command(name = "obd-fit-cli")]
#[command(about = "Convert OBD/GPS telemetry CSV logs into FIT activity files", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the telemetry CSV export
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output FIT file (default: <input stem>_.fit beside the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of rows to transcode (for testing)
    #[arg(long, value_name = "COUNT")]
    max_rows: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

// Exit statuses, one per fatal error kind. Usage errors exit with 2 (clap).
const EXIT_INPUT_FORMAT: i32 = 3;
const EXIT_OUTPUT_OPEN: i32 = 4;
const EXIT_OUTPUT_WRITE: i32 = 5;
const EXIT_OTHER: i32 = 1;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("OBD FIT Transcoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using encoder library v{}", obd_fit_encoder::VERSION);

    if let Err(error) = run(&args) {
        log::error!("{error:#}");
        std::process::exit(exit_code(&error));
    }
}

/// Transcode one file and print the summary
fn run(args: &Args) -> Result<()> {
    let mut config = TranscoderConfig::new();
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }
    if let Some(max_rows) = args.max_rows {
        config = config.with_max_rows(max_rows);
    }

    let summary = Transcoder::new().transcode_file(&args.input, &config)?;

    if args.json {
        println!("{}", report::render_json(&summary)?);
    } else if !args.quiet {
        print!("{}", report::render_text(&summary));
    }

    Ok(())
}

/// Map a fatal error to its process exit status
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<EncodeError>() {
        Some(EncodeError::InputFormat(_)) => EXIT_INPUT_FORMAT,
        Some(EncodeError::OutputOpen(_)) => EXIT_OUTPUT_OPEN,
        Some(EncodeError::RecordWrite(_)) | Some(EncodeError::OutputFinalize(_)) => {
            EXIT_OUTPUT_WRITE
        }
        _ => EXIT_OTHER,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_minimal() {
        let args = Args::try_parse_from(["obd-fit-cli", "session.csv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("session.csv"));
        assert!(args.output.is_none());
        assert!(!args.json);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_parse_full() {
        let args = Args::try_parse_from([
            "obd-fit-cli",
            "session.csv",
            "-o",
            "out.fit",
            "--max-rows",
            "10",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.fit")));
        assert_eq!(args.max_rows, Some(10));
        assert!(args.json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_missing_input_is_a_usage_error() {
        assert!(Args::try_parse_from(["obd-fit-cli"]).is_err());
    }

    #[test]
    fn test_exit_codes_per_error_kind() {
        let cases = [
            (EncodeError::InputFormat("bad row".into()), EXIT_INPUT_FORMAT),
            (EncodeError::OutputOpen("denied".into()), EXIT_OUTPUT_OPEN),
            (EncodeError::RecordWrite("short write".into()), EXIT_OUTPUT_WRITE),
            (EncodeError::OutputFinalize("flush".into()), EXIT_OUTPUT_WRITE),
            (EncodeError::InvalidState("closed".into()), EXIT_OTHER),
        ];
        for (error, expected) in cases {
            assert_eq!(exit_code(&anyhow::Error::new(error)), expected);
        }
        assert_eq!(exit_code(&anyhow::anyhow!("unexpected")), EXIT_OTHER);
    }
}

//! Standalone telemetry transcoder tool
//!
//! Converts a telemetry CSV export into a FIT activity file and prints a
//! short summary of what was written.
//!
//! Usage:
//!   transcode_log <session.csv> [--max-rows <count>]

use obd_fit_encoder::{Transcoder, TranscoderConfig};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: transcode_log <session.csv> [--max-rows <count>]");
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let mut config = TranscoderConfig::new();
    if let Some(position) = args.iter().position(|arg| arg == "--max-rows") {
        if let Some(count) = args.get(position + 1).and_then(|v| v.parse().ok()) {
            config = config.with_max_rows(count);
        }
    }

    match Transcoder::new().transcode_file(&input, &config) {
        Ok(summary) => {
            println!("=== TRANSCODE SUMMARY ===");
            println!("Rows translated: {}", summary.rows);
            println!("OBD-II records: {}", summary.obdii_records);
            println!("GPS records: {}", summary.gps_records);
            println!("Total records: {}", summary.records_written);
            if let Some(output) = &summary.output {
                println!("Output: {:?}", output);
            }
        }
        Err(e) => {
            eprintln!("Transcode failed: {}", e);
            std::process::exit(1);
        }
    }
}

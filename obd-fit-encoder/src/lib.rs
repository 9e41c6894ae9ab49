//! OBD FIT Encoder Library
//!
//! A stateless, reusable library for converting tabular telemetry logs
//! (timestamped GPS and OBD-II engine readings) into FIT activity files.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on transcoding:
//! - Parses the telemetry CSV into typed rows
//! - Translates each row into synthetic OBD-II records and a GPS record
//! - Serializes records into the FIT container (framing, definitions, CRC)
//!
//! The library does NOT:
//! - Validate input data ranges (out-of-range values wrap like the device
//!   fields they feed)
//! - Batch multiple input files
//! - Recover from malformed rows or write failures
//!
//! Argument handling, exit codes and reporting live in the application
//! layer (obd-fit-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use obd_fit_encoder::{Transcoder, TranscoderConfig};
//! use std::path::Path;
//!
//! let transcoder = Transcoder::new();
//! let config = TranscoderConfig::new();
//!
//! let summary = transcoder
//!     .transcode_file(Path::new("session.csv"), &config)
//!     .unwrap();
//!
//! println!(
//!     "translated {} rows into {} records",
//!     summary.rows, summary.records_written
//! );
//! ```

// Public modules
pub mod channels;
pub mod config;
pub mod convert;
pub mod encoder;
pub mod fit;
pub mod formats;
pub mod session;
pub mod translate;
pub mod types;

// Re-export main types for convenience
pub use channels::ObdChannel;
pub use config::TranscoderConfig;
pub use encoder::{output_path_for, TranscodeSummary, Transcoder};
pub use fit::FitEncoder;
pub use formats::{CsvParser, CsvRowIterator, TelemetryLogParser};
pub use session::{Session, SessionPhase};
pub use translate::RowTranslator;
pub use types::{
    EncodeError, FileIdRecord, GpsRecord, InputRow, ObdiiRecord, RawData, Record, Result,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh transcoder with default config
        let _transcoder = Transcoder::new();
        let config = TranscoderConfig::new();
        assert!(config.max_rows.is_none());
    }
}

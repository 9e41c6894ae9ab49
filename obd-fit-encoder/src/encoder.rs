//! Main transcoder API
//!
//! This module provides the primary interface for the encoder library.
//! The Transcoder struct is the entry point: it parses the telemetry CSV,
//! drives an encoding session over the output file, and reports what was
//! written.

use crate::config::TranscoderConfig;
use crate::formats::CsvParser;
use crate::session::Session;
use crate::types::{EncodeError, InputRow, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Summary of one transcode run
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscodeSummary {
    /// Input rows translated
    pub rows: usize,
    /// Synthetic OBD-II records written
    pub obdii_records: usize,
    /// GPS positioning records written
    pub gps_records: usize,
    /// Total records written, including the file identification record
    pub records_written: usize,
    /// Where the container was written (file runs only)
    pub output: Option<PathBuf>,
}

/// The main transcoder struct - entry point for all encoding operations
pub struct Transcoder;

impl Transcoder {
    /// Create a new transcoder instance
    pub fn new() -> Self {
        Self
    }

    /// Transcode a telemetry CSV file into a FIT activity file
    ///
    /// The output path defaults to `<input stem>_.fit` next to the input
    /// and can be overridden through the configuration. On an output-open
    /// failure no output file is created.
    ///
    /// # Example
    /// ```no_run
    /// use obd_fit_encoder::{Transcoder, TranscoderConfig};
    /// use std::path::Path;
    ///
    /// let transcoder = Transcoder::new();
    /// let summary = transcoder
    ///     .transcode_file(Path::new("session.csv"), &TranscoderConfig::new())
    ///     .unwrap();
    /// println!("{} rows written to {:?}", summary.rows, summary.output);
    /// ```
    pub fn transcode_file(
        &self,
        input: &Path,
        config: &TranscoderConfig,
    ) -> Result<TranscodeSummary> {
        log::info!("Transcoding telemetry log: {:?}", input);

        let rows = CsvParser::parse(input)?;

        let output_path = config
            .output
            .clone()
            .unwrap_or_else(|| output_path_for(input));
        let file = File::create(&output_path).map_err(|e| {
            EncodeError::OutputOpen(format!("{:?}: {}", output_path, e))
        })?;

        let mut summary = self.transcode(rows, file, config)?;
        summary.output = Some(output_path);
        log::info!(
            "Transcode finished: {} rows, {} records",
            summary.rows,
            summary.records_written
        );
        Ok(summary)
    }

    /// Transcode an already-parsed row stream into any writer
    ///
    /// This is the row-order-preserving core loop: open the session (which
    /// writes the file identification record), translate rows one at a time
    /// in source order, then finalize the container. A malformed row aborts
    /// the whole run; there is no per-row skip policy.
    pub fn transcode<W: Write>(
        &self,
        rows: impl Iterator<Item = Result<InputRow>>,
        writer: W,
        config: &TranscoderConfig,
    ) -> Result<TranscodeSummary> {
        let mut session = Session::new(writer);
        session.open()?;

        let mut summary = TranscodeSummary {
            records_written: 1, // the file identification record
            ..Default::default()
        };

        for row in rows {
            if let Some(max_rows) = config.max_rows {
                if summary.rows >= max_rows {
                    log::debug!("row limit {} reached, stopping", max_rows);
                    break;
                }
            }

            let row = row?;
            let written = session.write_row(&row)?;
            summary.rows += 1;
            summary.records_written += written;
            summary.obdii_records += written - 1;
            summary.gps_records += 1;
        }

        session.close()?;
        Ok(summary)
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the default output path: `<input stem>_.fit` beside the input
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("out"));
    name.push("_.fit");
    input.with_file_name(name)
}

//! CSV telemetry log parser
//!
//! Parses the delimited telemetry export using the `csv` crate. The file
//! carries a header row; columns are matched by name, so order does not
//! matter and extra columns are ignored. Comment lines starting with `#`
//! are skipped, and cell values may carry surrounding whitespace or quotes.
//!
//! A missing required column or a cell that does not parse as a number is a
//! fatal input-format condition - there is no per-row skip policy.

use crate::formats::TelemetryLogParser;
use crate::types::{EncodeError, InputRow, Result};
use csv::{DeserializeRecordsIntoIter, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV telemetry parser
pub struct CsvParser;

impl CsvParser {
    /// Parse a telemetry CSV file and return an iterator over input rows
    ///
    /// Opens the file and validates the header contract up front. Row
    /// decoding itself is lazy; decode failures surface from the iterator.
    pub fn parse(path: &Path) -> Result<CsvRowIterator<File>> {
        log::info!("Parsing telemetry CSV: {:?}", path);

        if !path.exists() {
            return Err(EncodeError::InputFormat(format!(
                "CSV file not found: {:?}",
                path
            )));
        }

        let reader = Self::builder().from_path(path).map_err(|e| {
            EncodeError::InputFormat(format!("failed to open CSV file: {}", e))
        })?;

        Self::into_rows(reader)
    }

    /// Parse telemetry CSV from any reader (used by tests and embedders)
    pub fn from_reader<R: Read>(reader: R) -> Result<CsvRowIterator<R>> {
        Self::into_rows(Self::builder().from_reader(reader))
    }

    fn into_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<CsvRowIterator<R>> {
        let headers = reader
            .headers()
            .map_err(|e| EncodeError::InputFormat(format!("failed to read CSV header: {}", e)))?;
        Self::check_header(headers)?;

        log::debug!("CSV header validated, {} columns", headers.len());
        Ok(CsvRowIterator {
            rows: reader.into_deserialize(),
        })
    }

    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.comment(Some(b'#')).trim(Trim::All);
        builder
    }

    fn check_header(headers: &StringRecord) -> Result<()> {
        for required in InputRow::REQUIRED_COLUMNS {
            if !headers.iter().any(|column| column == required) {
                return Err(EncodeError::InputFormat(format!(
                    "missing required column: {:?}",
                    required
                )));
            }
        }
        Ok(())
    }
}

/// Iterator over input rows from a telemetry CSV
pub struct CsvRowIterator<R: Read> {
    rows: DeserializeRecordsIntoIter<R, InputRow>,
}

impl<R: Read> Iterator for CsvRowIterator<R> {
    type Item = Result<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| {
            row.map_err(|e| EncodeError::InputFormat(format!("failed to decode row: {}", e)))
        })
    }
}

impl TelemetryLogParser for CsvRowIterator<File> {
    fn parse(path: &Path) -> Result<Self> {
        CsvParser::parse(path)
    }
}

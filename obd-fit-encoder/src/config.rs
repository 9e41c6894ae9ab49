//! Transcoder configuration types
//!
//! This module defines the minimal configuration the transcoder needs. The
//! translation itself is fixed (channel set, record identifiers, file
//! identification are all part of the wire contract), so configuration only
//! covers where the output goes and how much input to consume.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a transcode run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Output file path; derived from the input path when not set
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Optional: maximum number of rows to transcode (for testing)
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl TranscoderConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the output file path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Builder method: limit the number of rows to transcode
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

//! Core types for the OBD FIT encoder library
//!
//! This module defines the input row contract and the record types the
//! translator emits. Records are created fresh for every input row, written
//! to the container, and discarded - the encoder carries no cross-row state.

use crate::fit::profile;
use serde::Deserialize;
use std::fmt;

/// Result type for encoder operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// One decoded row of the telemetry CSV
///
/// Deserialized by column name, so column order in the file does not matter
/// and extra columns are ignored. All ten numeric fields must be present and
/// parseable for a row to be translated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputRow {
    /// Session-relative time in fractional seconds
    #[serde(rename = "Time")]
    pub time: f64,
    /// UTC time column - part of the row contract but unused by translation
    #[serde(rename = "UTC Time")]
    pub utc: f64,
    /// Latitude in decimal degrees
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Altitude in meters
    #[serde(rename = "Altitude (m)")]
    pub altitude: f64,
    /// Vehicle speed in km/h
    #[serde(rename = "Vehicle Speed (km/h) *OBD")]
    pub vehicle_speed: f64,
    /// Engine speed in RPM, as reported (pre-scaling)
    #[serde(rename = "Engine Speed (RPM) *OBD")]
    pub engine_rpm: f64,
    /// Throttle position in percent (0-100)
    #[serde(rename = "Throttle Position (%) *OBD")]
    pub throttle_position: f64,
    /// Engine coolant temperature in degrees Celsius
    #[serde(rename = "Engine Coolant Temp (C) *OBD")]
    pub engine_coolant_temp: f64,
    /// Intake air temperature in degrees Celsius
    #[serde(rename = "Intake Air Temp (C) *OBD")]
    pub intake_air_temp: f64,
    /// Intake manifold pressure in kPa
    #[serde(rename = "Intake Manifold Pressure (kPa) *OBD")]
    pub intake_manifold_pressure: f64,
}

impl InputRow {
    /// Column names the CSV header must provide, in no particular order
    pub const REQUIRED_COLUMNS: [&'static str; 11] = [
        "Time",
        "UTC Time",
        "Latitude",
        "Longitude",
        "Altitude (m)",
        "Vehicle Speed (km/h) *OBD",
        "Engine Speed (RPM) *OBD",
        "Throttle Position (%) *OBD",
        "Engine Coolant Temp (C) *OBD",
        "Intake Air Temp (C) *OBD",
        "Intake Manifold Pressure (kPa) *OBD",
    ];
}

/// Errors that can occur while transcoding
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to decode input row: {0}")]
    InputFormat(String),

    #[error("cannot open output: {0}")]
    OutputOpen(String),

    #[error("failed to write record: {0}")]
    RecordWrite(String),

    #[error("cannot finalize output: {0}")]
    OutputFinalize(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Raw payload of a synthetic OBD-II record (one or two bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawData {
    /// Single-byte parameter value
    Single([u8; 1]),
    /// Two-byte parameter value, most significant byte first
    Pair([u8; 2]),
}

impl RawData {
    /// Wrap a single-byte payload
    pub fn single(byte: u8) -> Self {
        RawData::Single([byte])
    }

    /// Wrap a two-byte payload
    pub fn pair(high: u8, low: u8) -> Self {
        RawData::Pair([high, low])
    }

    /// Payload bytes in wire order
    pub fn as_slice(&self) -> &[u8] {
        match self {
            RawData::Single(bytes) => bytes,
            RawData::Pair(bytes) => bytes,
        }
    }

    /// Number of payload bytes (1 or 2)
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Always false - a payload has at least one byte
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// One synthetic OBD-II parameter record
///
/// Engine channels are transmitted using this generic record shape (PID plus
/// raw byte payload) rather than a dedicated schema per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ObdiiRecord {
    /// OBD-II parameter ID, fixed per channel
    pub pid: u8,
    /// Whole seconds of the row time, truncated
    pub timestamp: u32,
    /// Milliseconds from the fractional part of the row time
    pub timestamp_ms: u16,
    /// Row time in milliseconds, truncated
    pub system_time_ms: u32,
    /// Encoded parameter value
    pub raw: RawData,
    /// Local message slot carrying this channel's record stream
    ///
    /// Channels sharing a timestamp within a row stay distinct because each
    /// one writes into its own slot.
    pub channel_slot: u8,
}

/// One positioning record per input row
#[derive(Debug, Clone, PartialEq)]
pub struct GpsRecord {
    /// Whole seconds of the row time, truncated
    pub timestamp: u32,
    /// Milliseconds from the fractional part of the row time
    pub timestamp_ms: u16,
    /// Latitude in semicircle units
    pub latitude_semicircles: i32,
    /// Longitude in semicircle units
    pub longitude_semicircles: i32,
    /// Speed in m/s
    pub enhanced_speed: f32,
    /// Altitude in meters
    pub enhanced_altitude: f32,
}

/// The file identification record, written once before any row records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdRecord {
    /// FIT file type
    pub file_type: u8,
    /// Originator (manufacturer) identifier
    pub manufacturer: u16,
    /// Product identifier
    pub product: u16,
    /// Device serial number
    pub serial_number: u32,
}

impl FileIdRecord {
    /// The fixed identification this transcoder stamps on every output file
    pub fn activity() -> Self {
        Self {
            file_type: profile::FILE_TYPE_ACTIVITY,
            manufacturer: profile::MANUFACTURER_DYNASTREAM,
            product: profile::PRODUCT_ID,
            serial_number: profile::SERIAL_NUMBER,
        }
    }
}

/// A typed record accepted by the container writer
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// File identification header record
    FileId(FileIdRecord),
    /// Synthetic OBD-II parameter record
    Obdii(ObdiiRecord),
    /// GPS positioning record
    Gps(GpsRecord),
}

impl Record {
    /// The local message slot this record is written into
    pub fn local_slot(&self) -> u8 {
        match self {
            Record::FileId(_) => profile::FILE_ID_LOCAL_MESG,
            Record::Obdii(record) => record.channel_slot,
            Record::Gps(_) => profile::GPS_LOCAL_MESG,
        }
    }

    /// The timestamp of this record, if it carries one
    pub fn timestamp(&self) -> Option<u32> {
        match self {
            Record::FileId(_) => None,
            Record::Obdii(record) => Some(record.timestamp),
            Record::Gps(record) => Some(record.timestamp),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::FileId(_) => write!(f, "FileId"),
            Record::Obdii(record) => write!(f, "Obdii(pid=0x{:02X})", record.pid),
            Record::Gps(_) => write!(f, "Gps"),
        }
    }
}

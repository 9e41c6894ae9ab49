//! FIT profile constants used by this encoder
//!
//! Global message numbers, field numbers, base types and scaling factors
//! follow the FIT profile convention for the three message kinds this
//! transcoder emits. Local message slots are this encoder's fixed assignment
//! of record streams within a container session.

// File header
pub const HEADER_SIZE: u8 = 14;
pub const PROTOCOL_VERSION: u8 = 0x20; // protocol 2.0, major version in the high nibble
pub const PROFILE_VERSION: u16 = 2132;
pub const DATA_TYPE: [u8; 4] = *b".FIT";

// Message header bits
pub const DEFINITION_HEADER_BIT: u8 = 0x40;
pub const ARCH_LITTLE_ENDIAN: u8 = 0;

// Global message numbers
pub const FILE_ID_MESG_NUM: u16 = 0;
pub const GPS_METADATA_MESG_NUM: u16 = 160;
pub const OBDII_DATA_MESG_NUM: u16 = 174;

// Local message slots
//
// Each record stream gets its own slot so simultaneous records sharing a
// timestamp stay distinct within the session. OBD-II channels are assigned
// consecutive slots starting at the base.
pub const FILE_ID_LOCAL_MESG: u8 = 0;
pub const GPS_LOCAL_MESG: u8 = 6;
pub const OBDII_LOCAL_MESG_BASE: u8 = 8;

// File identification values, fixed for every output of this transcoder
pub const FILE_TYPE_ACTIVITY: u8 = 4;
pub const MANUFACTURER_DYNASTREAM: u16 = 15;
pub const PRODUCT_ID: u16 = 1337;
pub const SERIAL_NUMBER: u32 = 1337;

// Base types
pub const BASE_TYPE_ENUM: u8 = 0x00;
pub const BASE_TYPE_UINT16: u8 = 0x84;
pub const BASE_TYPE_SINT32: u8 = 0x85;
pub const BASE_TYPE_UINT32: u8 = 0x86;
pub const BASE_TYPE_UINT32Z: u8 = 0x8C;
pub const BASE_TYPE_BYTE: u8 = 0x0D;

/// Field numbers of the file_id message
pub mod file_id {
    pub const FILE_TYPE: u8 = 0;
    pub const MANUFACTURER: u8 = 1;
    pub const PRODUCT: u8 = 2;
    pub const SERIAL_NUMBER: u8 = 3;
}

/// Field numbers of the gps_metadata message
pub mod gps_metadata {
    pub const TIMESTAMP: u8 = 253;
    pub const TIMESTAMP_MS: u8 = 0;
    pub const POSITION_LAT: u8 = 1;
    pub const POSITION_LONG: u8 = 2;
    pub const ENHANCED_ALTITUDE: u8 = 3;
    pub const ENHANCED_SPEED: u8 = 4;
}

/// Field numbers of the obdii_data message
pub mod obdii_data {
    pub const TIMESTAMP: u8 = 253;
    pub const TIMESTAMP_MS: u8 = 0;
    pub const PID: u8 = 2;
    pub const RAW_DATA: u8 = 3;
    pub const SYSTEM_TIME: u8 = 5;
}

// Profile scaling for gps_metadata fields. The record model keeps physical
// units (meters, m/s); scaling applies only at serialization.
pub const ENHANCED_ALTITUDE_SCALE: f64 = 5.0;
pub const ENHANCED_ALTITUDE_OFFSET: f64 = 500.0;
pub const ENHANCED_SPEED_SCALE: f64 = 1000.0;

//! FIT container encoder
//!
//! Buffers data messages in memory and assembles the complete container
//! (header, messages, trailing CRC) when the encoder is closed. Input logs
//! are small session files, so buffering the data section keeps the CRC and
//! header bookkeeping in one place instead of patching the file in two
//! passes.
//!
//! A definition message is emitted for a local slot before its first data
//! message, and again whenever the record layout written to that slot
//! changes. With every record stream on its own slot, each definition is
//! written exactly once per file in practice.

use crate::fit::{crc, profile};
use crate::types::{FileIdRecord, GpsRecord, ObdiiRecord, Record, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashMap;
use std::io::Write;

/// One field of a definition message: number, size, base type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldDefinition {
    number: u8,
    size: u8,
    base_type: u8,
}

/// Layout of the data messages written to one local slot
#[derive(Debug, Clone, PartialEq, Eq)]
struct MessageDefinition {
    global_mesg_num: u16,
    fields: Vec<FieldDefinition>,
}

impl MessageDefinition {
    fn new(global_mesg_num: u16, fields: Vec<FieldDefinition>) -> Self {
        Self {
            global_mesg_num,
            fields,
        }
    }
}

/// FIT container encoder over any writer
///
/// Created with [`FitEncoder::open`], fed with [`FitEncoder::write_record`],
/// finalized with [`FitEncoder::close`]. Nothing reaches the underlying
/// writer until close, so an encoder that is dropped early leaves it
/// untouched.
pub struct FitEncoder<W: Write> {
    writer: W,
    data: Vec<u8>,
    definitions: HashMap<u8, MessageDefinition>,
}

impl<W: Write> FitEncoder<W> {
    /// Open an encoder over the given writer.
    pub fn open(writer: W) -> Self {
        log::debug!("FIT encoder opened");
        Self {
            writer,
            data: Vec::new(),
            definitions: HashMap::new(),
        }
    }

    /// Append one typed record to the container.
    ///
    /// Emits a definition message first if this record's layout is not the
    /// one currently bound to its local slot.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let local = record.local_slot();
        let definition = Self::definition_for(record);

        if self.definitions.get(&local) != Some(&definition) {
            self.write_definition(local, &definition)?;
            self.definitions.insert(local, definition);
        }

        self.write_data_message(local, record)?;
        log::trace!("wrote record {} to slot {}", record, local);
        Ok(())
    }

    /// Finalize the container: header, data section, trailing CRC.
    ///
    /// Returns the underlying writer on success.
    pub fn close(mut self) -> Result<W> {
        let mut header = Vec::with_capacity(profile::HEADER_SIZE as usize);
        header.push(profile::HEADER_SIZE);
        header.push(profile::PROTOCOL_VERSION);
        header.write_u16::<LittleEndian>(profile::PROFILE_VERSION)?;
        header.write_u32::<LittleEndian>(self.data.len() as u32)?;
        header.extend_from_slice(&profile::DATA_TYPE);
        let header_crc = crc::checksum(&header);
        header.write_u16::<LittleEndian>(header_crc)?;

        // The trailing CRC covers the full header and the data section
        let file_crc = crc::update_slice(crc::checksum(&header), &self.data);

        self.writer.write_all(&header)?;
        self.writer.write_all(&self.data)?;
        self.writer.write_u16::<LittleEndian>(file_crc)?;
        self.writer.flush()?;

        log::debug!(
            "FIT encoder closed, {} data bytes written",
            self.data.len()
        );
        Ok(self.writer)
    }

    fn definition_for(record: &Record) -> MessageDefinition {
        match record {
            Record::FileId(_) => MessageDefinition::new(
                profile::FILE_ID_MESG_NUM,
                vec![
                    FieldDefinition {
                        number: profile::file_id::FILE_TYPE,
                        size: 1,
                        base_type: profile::BASE_TYPE_ENUM,
                    },
                    FieldDefinition {
                        number: profile::file_id::MANUFACTURER,
                        size: 2,
                        base_type: profile::BASE_TYPE_UINT16,
                    },
                    FieldDefinition {
                        number: profile::file_id::PRODUCT,
                        size: 2,
                        base_type: profile::BASE_TYPE_UINT16,
                    },
                    FieldDefinition {
                        number: profile::file_id::SERIAL_NUMBER,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32Z,
                    },
                ],
            ),
            Record::Obdii(record) => MessageDefinition::new(
                profile::OBDII_DATA_MESG_NUM,
                vec![
                    FieldDefinition {
                        number: profile::obdii_data::TIMESTAMP,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32,
                    },
                    FieldDefinition {
                        number: profile::obdii_data::TIMESTAMP_MS,
                        size: 2,
                        base_type: profile::BASE_TYPE_UINT16,
                    },
                    FieldDefinition {
                        number: profile::obdii_data::PID,
                        size: 1,
                        base_type: profile::BASE_TYPE_BYTE,
                    },
                    FieldDefinition {
                        number: profile::obdii_data::RAW_DATA,
                        size: record.raw.len() as u8,
                        base_type: profile::BASE_TYPE_BYTE,
                    },
                    FieldDefinition {
                        number: profile::obdii_data::SYSTEM_TIME,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32,
                    },
                ],
            ),
            Record::Gps(_) => MessageDefinition::new(
                profile::GPS_METADATA_MESG_NUM,
                vec![
                    FieldDefinition {
                        number: profile::gps_metadata::TIMESTAMP,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32,
                    },
                    FieldDefinition {
                        number: profile::gps_metadata::TIMESTAMP_MS,
                        size: 2,
                        base_type: profile::BASE_TYPE_UINT16,
                    },
                    FieldDefinition {
                        number: profile::gps_metadata::POSITION_LAT,
                        size: 4,
                        base_type: profile::BASE_TYPE_SINT32,
                    },
                    FieldDefinition {
                        number: profile::gps_metadata::POSITION_LONG,
                        size: 4,
                        base_type: profile::BASE_TYPE_SINT32,
                    },
                    FieldDefinition {
                        number: profile::gps_metadata::ENHANCED_ALTITUDE,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32,
                    },
                    FieldDefinition {
                        number: profile::gps_metadata::ENHANCED_SPEED,
                        size: 4,
                        base_type: profile::BASE_TYPE_UINT32,
                    },
                ],
            ),
        }
    }

    fn write_definition(&mut self, local: u8, definition: &MessageDefinition) -> Result<()> {
        self.data.push(local | profile::DEFINITION_HEADER_BIT);
        self.data.push(0); // reserved
        self.data.push(profile::ARCH_LITTLE_ENDIAN);
        self.data
            .write_u16::<LittleEndian>(definition.global_mesg_num)?;
        self.data.push(definition.fields.len() as u8);
        for field in &definition.fields {
            self.data
                .extend_from_slice(&[field.number, field.size, field.base_type]);
        }
        Ok(())
    }

    fn write_data_message(&mut self, local: u8, record: &Record) -> Result<()> {
        self.data.push(local);
        match record {
            Record::FileId(record) => self.write_file_id(record)?,
            Record::Obdii(record) => self.write_obdii(record)?,
            Record::Gps(record) => self.write_gps(record)?,
        }
        Ok(())
    }

    fn write_file_id(&mut self, record: &FileIdRecord) -> Result<()> {
        self.data.push(record.file_type);
        self.data.write_u16::<LittleEndian>(record.manufacturer)?;
        self.data.write_u16::<LittleEndian>(record.product)?;
        self.data.write_u32::<LittleEndian>(record.serial_number)?;
        Ok(())
    }

    fn write_obdii(&mut self, record: &ObdiiRecord) -> Result<()> {
        self.data.write_u32::<LittleEndian>(record.timestamp)?;
        self.data.write_u16::<LittleEndian>(record.timestamp_ms)?;
        self.data.push(record.pid);
        self.data.extend_from_slice(record.raw.as_slice());
        self.data.write_u32::<LittleEndian>(record.system_time_ms)?;
        Ok(())
    }

    fn write_gps(&mut self, record: &GpsRecord) -> Result<()> {
        self.data.write_u32::<LittleEndian>(record.timestamp)?;
        self.data.write_u16::<LittleEndian>(record.timestamp_ms)?;
        self.data
            .write_i32::<LittleEndian>(record.latitude_semicircles)?;
        self.data
            .write_i32::<LittleEndian>(record.longitude_semicircles)?;
        self.data
            .write_u32::<LittleEndian>(scale_altitude(record.enhanced_altitude))?;
        self.data
            .write_u32::<LittleEndian>(scale_speed(record.enhanced_speed))?;
        Ok(())
    }
}

/// Apply the gps_metadata enhanced_altitude profile scaling.
fn scale_altitude(meters: f32) -> u32 {
    ((meters as f64 + profile::ENHANCED_ALTITUDE_OFFSET) * profile::ENHANCED_ALTITUDE_SCALE)
        .round() as i64 as u32
}

/// Apply the gps_metadata enhanced_speed profile scaling.
fn scale_speed(meters_per_second: f32) -> u32 {
    (meters_per_second as f64 * profile::ENHANCED_SPEED_SCALE).round() as i64 as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawData;

    fn sample_obdii(slot: u8, raw: RawData) -> Record {
        Record::Obdii(ObdiiRecord {
            pid: 0x0C,
            timestamp: 10,
            timestamp_ms: 500,
            system_time_ms: 10_500,
            raw,
            channel_slot: slot,
        })
    }

    fn message_headers(data: &[u8]) -> Vec<u8> {
        // Walk the data section, returning each message header byte. Field
        // sizes come from the definitions encountered along the way.
        let mut sizes: HashMap<u8, usize> = HashMap::new();
        let mut headers = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let header = data[offset];
            headers.push(header);
            offset += 1;
            if header & profile::DEFINITION_HEADER_BIT != 0 {
                let local = header & 0x0F;
                let num_fields = data[offset + 4] as usize;
                let payload: usize = (0..num_fields)
                    .map(|i| data[offset + 5 + 3 * i + 1] as usize)
                    .sum();
                sizes.insert(local, payload);
                offset += 5 + 3 * num_fields;
            } else {
                offset += sizes[&(header & 0x0F)];
            }
        }
        headers
    }

    #[test]
    fn test_close_writes_valid_container() {
        let mut encoder = FitEncoder::open(Vec::new());
        encoder
            .write_record(&Record::FileId(FileIdRecord::activity()))
            .unwrap();
        let bytes = encoder.close().unwrap();

        // Header
        assert_eq!(bytes[0], 14);
        assert_eq!(bytes[1], 0x20);
        assert_eq!(&bytes[8..12], b".FIT");
        let data_size = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), 14 + data_size + 2);
        let header_crc = u16::from_le_bytes(bytes[12..14].try_into().unwrap());
        assert_eq!(header_crc, crc::checksum(&bytes[..12]));

        // Trailing CRC covers header and data
        let file_crc = u16::from_le_bytes(bytes[bytes.len() - 2..].try_into().unwrap());
        assert_eq!(file_crc, crc::checksum(&bytes[..bytes.len() - 2]));
    }

    #[test]
    fn test_file_id_payload_bytes() {
        let mut encoder = FitEncoder::open(Vec::new());
        encoder
            .write_record(&Record::FileId(FileIdRecord::activity()))
            .unwrap();
        let bytes = encoder.close().unwrap();

        // Definition: header, reserved, arch, global 0, 4 fields
        let data = &bytes[14..bytes.len() - 2];
        assert_eq!(data[0], 0x40); // definition on local slot 0
        assert_eq!(&data[1..6], &[0, 0, 0, 0, 4]);

        // Data message follows the 4 field triples: activity, Dynastream,
        // product 1337, serial 1337 (0x0539 little-endian)
        let message = &data[6 + 4 * 3..];
        assert_eq!(message[0], 0x00); // data on local slot 0
        assert_eq!(message[1], 4);
        assert_eq!(&message[2..4], &[15, 0]);
        assert_eq!(&message[4..6], &[0x39, 0x05]);
        assert_eq!(&message[6..10], &[0x39, 0x05, 0x00, 0x00]);
    }

    #[test]
    fn test_definition_written_once_per_slot() {
        let mut encoder = FitEncoder::open(Vec::new());
        encoder
            .write_record(&sample_obdii(8, RawData::pair(31, 64)))
            .unwrap();
        encoder
            .write_record(&sample_obdii(8, RawData::pair(32, 0)))
            .unwrap();
        let bytes = encoder.close().unwrap();

        let headers = message_headers(&bytes[14..bytes.len() - 2]);
        assert_eq!(headers, vec![0x40 | 8, 8, 8]);
    }

    #[test]
    fn test_distinct_slots_keep_distinct_definitions() {
        let mut encoder = FitEncoder::open(Vec::new());
        encoder
            .write_record(&sample_obdii(8, RawData::pair(31, 64)))
            .unwrap();
        encoder
            .write_record(&sample_obdii(9, RawData::single(127)))
            .unwrap();
        encoder
            .write_record(&sample_obdii(8, RawData::pair(31, 64)))
            .unwrap();
        encoder
            .write_record(&sample_obdii(9, RawData::single(130)))
            .unwrap();
        let bytes = encoder.close().unwrap();

        // One definition per slot, then alternating data messages
        let headers = message_headers(&bytes[14..bytes.len() - 2]);
        assert_eq!(headers, vec![0x40 | 8, 8, 0x40 | 9, 9, 8, 9]);
    }

    #[test]
    fn test_gps_profile_scaling() {
        let record = Record::Gps(GpsRecord {
            timestamp: 10,
            timestamp_ms: 500,
            latitude_semicircles: 536_870_912,
            longitude_semicircles: -1_109_533_218,
            enhanced_speed: 27.777779,
            enhanced_altitude: 300.0,
        });
        let mut encoder = FitEncoder::open(Vec::new());
        encoder.write_record(&record).unwrap();
        let bytes = encoder.close().unwrap();

        let data = &bytes[14..bytes.len() - 2];
        let payload = &data[6 + 6 * 3 + 1..]; // past definition and data header
        assert_eq!(&payload[0..4], &10u32.to_le_bytes());
        assert_eq!(&payload[4..6], &500u16.to_le_bytes());
        assert_eq!(&payload[6..10], &536_870_912i32.to_le_bytes());
        assert_eq!(&payload[10..14], &(-1_109_533_218i32).to_le_bytes());
        // (300 + 500) * 5 and 27.777779 * 1000 rounded
        assert_eq!(&payload[14..18], &4000u32.to_le_bytes());
        assert_eq!(&payload[18..22], &27778u32.to_le_bytes());
    }

    #[test]
    fn test_scaling_helpers() {
        assert_eq!(scale_altitude(0.0), 2500);
        assert_eq!(scale_altitude(-500.0), 0);
        assert_eq!(scale_speed(1.0), 1000);
        assert_eq!(scale_speed(0.0), 0);
    }
}

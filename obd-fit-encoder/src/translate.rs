//! Row translation
//!
//! Turns one decoded input row into the ordered set of records written for
//! it: one synthetic OBD-II record per active channel, then the positioning
//! record. All records of a row share the same timestamp; channels stay
//! distinct through their local message slots.

use crate::channels::ObdChannel;
use crate::convert;
use crate::types::{GpsRecord, InputRow, ObdiiRecord, Record};

/// Row translator - maps input rows to output records
pub struct RowTranslator;

impl RowTranslator {
    /// Translate one input row into its output records, in write order.
    ///
    /// Emission order is fixed: the active OBD-II channels first, then the
    /// GPS record. Output order across rows follows input order, which keeps
    /// container timestamps non-decreasing for downstream decoders.
    pub fn translate(row: &InputRow) -> Vec<Record> {
        let (timestamp, timestamp_ms) = convert::split_timestamp(row.time);
        let system_time_ms = (row.time * 1000.0) as u32;

        let mut records: Vec<Record> = ObdChannel::active()
            .map(|channel| {
                Record::Obdii(ObdiiRecord {
                    pid: channel.pid(),
                    timestamp,
                    timestamp_ms,
                    system_time_ms,
                    raw: channel.encode(row),
                    channel_slot: channel.local_slot(),
                })
            })
            .collect();

        records.push(Record::Gps(GpsRecord {
            timestamp,
            timestamp_ms,
            latitude_semicircles: convert::degrees_to_semicircles(row.latitude),
            longitude_semicircles: convert::degrees_to_semicircles(row.longitude),
            enhanced_speed: convert::kmh_to_ms(row.vehicle_speed),
            enhanced_altitude: row.altitude as f32,
        }));

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawData;

    fn sample_row() -> InputRow {
        InputRow {
            time: 10.5,
            utc: 0.0,
            latitude: 45.0,
            longitude: -93.0,
            altitude: 300.0,
            vehicle_speed: 100.0,
            engine_rpm: 2000.0,
            throttle_position: 50.0,
            engine_coolant_temp: 90.0,
            intake_air_temp: 25.0,
            intake_manifold_pressure: 101.0,
        }
    }

    #[test]
    fn test_row_produces_five_obdii_records_and_one_gps() {
        let records = RowTranslator::translate(&sample_row());
        assert_eq!(records.len(), 6); // 5 active channels + 1 GPS
    }

    #[test]
    fn test_record_order_and_values() {
        let records = RowTranslator::translate(&sample_row());

        let pids: Vec<u8> = records
            .iter()
            .filter_map(|record| match record {
                Record::Obdii(obdii) => Some(obdii.pid),
                _ => None,
            })
            .collect();
        assert_eq!(pids, vec![0x0C, 0x11, 0x05, 0x0F, 0x0B]);

        // The GPS record comes last
        assert!(matches!(records.last(), Some(Record::Gps(_))));
    }

    #[test]
    fn test_known_row_translation() {
        let records = RowTranslator::translate(&sample_row());
        assert_eq!(records.len(), 6);

        for record in &records {
            assert_eq!(record.timestamp(), Some(10));
        }

        let Record::Obdii(rpm) = &records[0] else {
            panic!("expected an OBD-II record first");
        };
        assert_eq!(rpm.pid, 0x0C);
        assert_eq!(rpm.timestamp_ms, 500);
        assert_eq!(rpm.system_time_ms, 10_500);
        assert_eq!(rpm.raw, RawData::pair(31, 64));

        let Record::Obdii(throttle) = &records[1] else {
            panic!("expected an OBD-II record");
        };
        assert_eq!(throttle.raw, RawData::single(127));

        let Record::Obdii(coolant) = &records[2] else {
            panic!("expected an OBD-II record");
        };
        assert_eq!(coolant.raw, RawData::single(130));

        let Record::Obdii(intake_air) = &records[3] else {
            panic!("expected an OBD-II record");
        };
        assert_eq!(intake_air.raw, RawData::single(65));

        let Record::Obdii(manifold) = &records[4] else {
            panic!("expected an OBD-II record");
        };
        assert_eq!(manifold.raw, RawData::single(101));

        let Record::Gps(gps) = &records[5] else {
            panic!("expected the GPS record last");
        };
        assert_eq!(gps.timestamp, 10);
        assert_eq!(gps.timestamp_ms, 500);
        assert_eq!(gps.latitude_semicircles, 536_870_912);
        assert_eq!(
            gps.longitude_semicircles,
            crate::convert::degrees_to_semicircles(-93.0)
        );
        assert!((gps.enhanced_speed - 27.7778).abs() < 1e-3);
        assert_eq!(gps.enhanced_altitude, 300.0);
    }

    #[test]
    fn test_channel_slots_are_distinct_within_a_row() {
        let records = RowTranslator::translate(&sample_row());
        let mut slots: Vec<u8> = records.iter().map(|record| record.local_slot()).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), records.len());
    }

    #[test]
    fn test_no_cross_row_state() {
        let first = RowTranslator::translate(&sample_row());
        let second = RowTranslator::translate(&sample_row());
        assert_eq!(first, second);
    }
}

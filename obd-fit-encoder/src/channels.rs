//! Monitored OBD-II engine channels
//!
//! The closed set of engine channels this transcoder knows how to encode.
//! Each channel carries its OBD-II parameter ID, its byte encoding, and a
//! fixed local message slot. A channel can exist without being active:
//! vehicle speed is fully implemented but disabled by default because its
//! single-byte field tops out at 255 km/h - speed travels in the GPS
//! record's enhanced_speed field instead.

use crate::convert;
use crate::fit::profile;
use crate::types::{InputRow, RawData};
use std::fmt;

/// One monitored engine channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObdChannel {
    /// Engine speed, PID 0x0C, two-byte encoding
    EngineRpm,
    /// Throttle position, PID 0x11
    ThrottlePosition,
    /// Engine coolant temperature, PID 0x05
    CoolantTemp,
    /// Intake air temperature, PID 0x0F
    IntakeAirTemp,
    /// Intake manifold pressure, PID 0x0B
    ManifoldPressure,
    /// Vehicle speed, PID 0x0D - implemented but disabled by default
    VehicleSpeed,
}

impl ObdChannel {
    /// Every known channel, in emission order
    pub const ALL: [ObdChannel; 6] = [
        ObdChannel::EngineRpm,
        ObdChannel::ThrottlePosition,
        ObdChannel::CoolantTemp,
        ObdChannel::IntakeAirTemp,
        ObdChannel::ManifoldPressure,
        ObdChannel::VehicleSpeed,
    ];

    /// Channels that actually emit records, in emission order
    pub fn active() -> impl Iterator<Item = ObdChannel> {
        Self::ALL.into_iter().filter(|channel| channel.is_active())
    }

    /// The OBD-II parameter ID transmitted with this channel's records
    pub fn pid(self) -> u8 {
        match self {
            ObdChannel::EngineRpm => 0x0C,
            ObdChannel::ThrottlePosition => 0x11,
            ObdChannel::CoolantTemp => 0x05,
            ObdChannel::IntakeAirTemp => 0x0F,
            ObdChannel::ManifoldPressure => 0x0B,
            ObdChannel::VehicleSpeed => 0x0D,
        }
    }

    /// Whether this channel emits records
    ///
    /// Vehicle speed is the one inactive channel: 255 km/h is not enough
    /// range, so the GPS record's enhanced_speed carries it.
    pub fn is_active(self) -> bool {
        !matches!(self, ObdChannel::VehicleSpeed)
    }

    /// The local message slot this channel's record stream writes into
    pub fn local_slot(self) -> u8 {
        let index = match self {
            ObdChannel::EngineRpm => 0,
            ObdChannel::ThrottlePosition => 1,
            ObdChannel::CoolantTemp => 2,
            ObdChannel::IntakeAirTemp => 3,
            ObdChannel::ManifoldPressure => 4,
            ObdChannel::VehicleSpeed => 5,
        };
        profile::OBDII_LOCAL_MESG_BASE + index
    }

    /// Encode this channel's value from an input row
    pub fn encode(self, row: &InputRow) -> RawData {
        match self {
            ObdChannel::EngineRpm => {
                let (high, low) = convert::rpm_to_obd_bytes(row.engine_rpm);
                RawData::pair(high, low)
            }
            ObdChannel::ThrottlePosition => {
                RawData::single(convert::percent_to_byte(row.throttle_position))
            }
            ObdChannel::CoolantTemp => {
                RawData::single(convert::celsius_to_offset_byte(row.engine_coolant_temp))
            }
            ObdChannel::IntakeAirTemp => {
                RawData::single(convert::celsius_to_offset_byte(row.intake_air_temp))
            }
            ObdChannel::ManifoldPressure => {
                RawData::single(convert::trunc_to_byte(row.intake_manifold_pressure))
            }
            ObdChannel::VehicleSpeed => {
                RawData::single(convert::trunc_to_byte(row.vehicle_speed))
            }
        }
    }
}

impl fmt::Display for ObdChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObdChannel::EngineRpm => write!(f, "EngineRpm"),
            ObdChannel::ThrottlePosition => write!(f, "ThrottlePosition"),
            ObdChannel::CoolantTemp => write!(f, "CoolantTemp"),
            ObdChannel::IntakeAirTemp => write!(f, "IntakeAirTemp"),
            ObdChannel::ManifoldPressure => write!(f, "ManifoldPressure"),
            ObdChannel::VehicleSpeed => write!(f, "VehicleSpeed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_channel_pids() {
        assert_eq!(ObdChannel::EngineRpm.pid(), 0x0C);
        assert_eq!(ObdChannel::ThrottlePosition.pid(), 0x11);
        assert_eq!(ObdChannel::CoolantTemp.pid(), 0x05);
        assert_eq!(ObdChannel::IntakeAirTemp.pid(), 0x0F);
        assert_eq!(ObdChannel::ManifoldPressure.pid(), 0x0B);
        assert_eq!(ObdChannel::VehicleSpeed.pid(), 0x0D);
    }

    #[test]
    fn test_vehicle_speed_is_the_only_inactive_channel() {
        let active: Vec<ObdChannel> = ObdChannel::active().collect();
        assert_eq!(
            active,
            vec![
                ObdChannel::EngineRpm,
                ObdChannel::ThrottlePosition,
                ObdChannel::CoolantTemp,
                ObdChannel::IntakeAirTemp,
                ObdChannel::ManifoldPressure,
            ]
        );
        assert!(!ObdChannel::VehicleSpeed.is_active());
    }

    #[test]
    fn test_local_slots_are_distinct() {
        let mut slots: Vec<u8> = ObdChannel::ALL.iter().map(|c| c.local_slot()).collect();
        assert_eq!(slots, vec![8, 9, 10, 11, 12, 13]);
        slots.dedup();
        assert_eq!(slots.len(), ObdChannel::ALL.len());
    }

    #[test]
    fn test_channel_encodings() {
        let row = sample_row();
        assert_eq!(ObdChannel::EngineRpm.encode(&row), RawData::pair(31, 64));
        assert_eq!(
            ObdChannel::ThrottlePosition.encode(&row),
            RawData::single(127)
        );
        assert_eq!(ObdChannel::CoolantTemp.encode(&row), RawData::single(130));
        assert_eq!(ObdChannel::IntakeAirTemp.encode(&row), RawData::single(65));
        assert_eq!(
            ObdChannel::ManifoldPressure.encode(&row),
            RawData::single(101)
        );
    }

    #[test]
    fn test_vehicle_speed_encodes_even_though_inactive() {
        // The channel stays implemented so re-enabling it is a one-line change
        let row = sample_row();
        assert_eq!(ObdChannel::VehicleSpeed.encode(&row), RawData::single(100));

        let mut fast = sample_row();
        fast.vehicle_speed = 300.0;
        // The single-byte field wraps above 255 km/h, which is why the
        // channel is disabled
        assert_eq!(ObdChannel::VehicleSpeed.encode(&fast), RawData::single(44));
    }
}

//! Common types used in the protocol.

use crate::constants::*;
use crate::error::{FaultCode, ProtocolError};

/// Decoded status byte of a GET STATE reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Module has been referenced.
    pub referenced: bool,
    /// A movement is in progress.
    pub moving: bool,
    /// Module is executing a stored program.
    pub program_mode: bool,
    /// A warning is pending.
    pub warning: bool,
    /// An error is pending.
    pub error: bool,
    /// The brake is engaged.
    pub brake: bool,
    /// The last movement has ended.
    pub move_end: bool,
    /// The target position has been reached.
    pub position_reached: bool,
}

impl StatusFlags {
    /// Decode a status byte.
    pub fn from_byte(status: u8) -> Self {
        StatusFlags {
            referenced: status & STATUS_REFERENCED != 0,
            moving: status & STATUS_MOVING != 0,
            program_mode: status & STATUS_PROGRAM_MODE != 0,
            warning: status & STATUS_WARNING != 0,
            error: status & STATUS_ERROR != 0,
            brake: status & STATUS_BRAKE != 0,
            move_end: status & STATUS_MOVE_END != 0,
            position_reached: status & STATUS_POSITION_REACHED != 0,
        }
    }

    /// Encode back into a status byte.
    pub fn to_byte(&self) -> u8 {
        let mut status = 0;
        if self.referenced {
            status |= STATUS_REFERENCED;
        }
        if self.moving {
            status |= STATUS_MOVING;
        }
        if self.program_mode {
            status |= STATUS_PROGRAM_MODE;
        }
        if self.warning {
            status |= STATUS_WARNING;
        }
        if self.error {
            status |= STATUS_ERROR;
        }
        if self.brake {
            status |= STATUS_BRAKE;
        }
        if self.move_end {
            status |= STATUS_MOVE_END;
        }
        if self.position_reached {
            status |= STATUS_POSITION_REACHED;
        }
        status
    }
}

/// Snapshot of the module state, as returned by GET STATE.
///
/// Position, velocity and current are in the module's configured unit
/// system (floating-point units assumed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleState {
    /// Current position.
    pub position: f32,
    /// Current velocity.
    pub velocity: f32,
    /// Motor current.
    pub current: f32,
    /// Decoded status byte.
    pub flags: StatusFlags,
    /// Pending error code (0x00 when none).
    pub error: FaultCode,
}

/// Optional motion parameters sent with MOVE POS / MOVE POS REL.
///
/// The wire format only allows trailing parameters to be omitted: a value
/// given after an omitted one cannot be encoded and is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionProfile {
    /// Target velocity override.
    pub velocity: Option<f32>,
    /// Target acceleration override.
    pub acceleration: Option<f32>,
    /// Target current override.
    pub current: Option<f32>,
    /// Target jerk override.
    pub jerk: Option<f32>,
}

impl MotionProfile {
    /// Parameter slots in wire order, after the position.
    pub(crate) fn slots(&self) -> [Option<f32>; 4] {
        [self.velocity, self.acceleration, self.current, self.jerk]
    }
}

/// Optional motion parameters sent with MOVE POS TIME / MOVE POS TIME REL.
///
/// Same trailing-omission rule as [`MotionProfile`]; the last slot is the
/// move duration instead of the jerk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimedMotionProfile {
    /// Target velocity override.
    pub velocity: Option<f32>,
    /// Target acceleration override.
    pub acceleration: Option<f32>,
    /// Target current override.
    pub current: Option<f32>,
    /// Time in which the position is to be reached.
    pub time: Option<f32>,
}

impl TimedMotionProfile {
    /// Parameter slots in wire order, after the position.
    pub(crate) fn slots(&self) -> [Option<f32>; 4] {
        [self.velocity, self.acceleration, self.current, self.time]
    }
}

/// Width and interpretation of a configuration parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// Single byte.
    Byte,
    /// 16-bit little-endian word.
    Word,
    /// 32-bit little-endian word.
    Dword,
    /// IEEE-754 binary32, little-endian.
    Float,
    /// Byte decoded as a [`CommunicationMode`].
    Mode,
    /// Byte decoded as a [`UnitSystem`].
    Units,
}

/// Scalar configuration parameters addressable via GET CONFIG / SET CONFIG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigParam {
    /// Module ID on the bus.
    ModuleId,
    /// Group ID on the bus.
    GroupId,
    /// RS232 baudrate.
    Rs232Baudrate,
    /// CAN baudrate.
    CanBaudrate,
    /// Active communication interface.
    CommunicationMode,
    /// Configured unit system.
    UnitSystem,
    /// Upper soft limit.
    SoftHigh,
    /// Lower soft limit.
    SoftLow,
    /// Maximum velocity.
    MaxVelocity,
    /// Maximum acceleration.
    MaxAcceleration,
    /// Maximum current.
    MaxCurrent,
    /// Nominal current.
    NomCurrent,
    /// Maximum jerk.
    MaxJerk,
    /// Phase A offset.
    OffsetPhaseA,
    /// Phase B offset.
    OffsetPhaseB,
    /// Data CRC enable flag.
    DataCrc,
    /// Reference offset.
    ReferenceOffset,
    /// Serial number.
    SerialNumber,
    /// Order number.
    OrderNumber,
}

impl ConfigParam {
    /// Subcommand byte used on the wire.
    pub fn subcommand(&self) -> u8 {
        match self {
            ConfigParam::ModuleId => CFG_MODULE_ID,
            ConfigParam::GroupId => CFG_GROUP_ID,
            ConfigParam::Rs232Baudrate => CFG_RS232_BAUDRATE,
            ConfigParam::CanBaudrate => CFG_CAN_BAUDRATE,
            ConfigParam::CommunicationMode => CFG_COMMUNICATION_MODE,
            ConfigParam::UnitSystem => CFG_UNIT_SYSTEM,
            ConfigParam::SoftHigh => CFG_SOFT_HIGH,
            ConfigParam::SoftLow => CFG_SOFT_LOW,
            ConfigParam::MaxVelocity => CFG_MAX_VELOCITY,
            ConfigParam::MaxAcceleration => CFG_MAX_ACCELERATION,
            ConfigParam::MaxCurrent => CFG_MAX_CURRENT,
            ConfigParam::NomCurrent => CFG_NOM_CURRENT,
            ConfigParam::MaxJerk => CFG_MAX_JERK,
            ConfigParam::OffsetPhaseA => CFG_OFFSET_PHASE_A,
            ConfigParam::OffsetPhaseB => CFG_OFFSET_PHASE_B,
            ConfigParam::DataCrc => CFG_DATA_CRC,
            ConfigParam::ReferenceOffset => CFG_REFERENCE_OFFSET,
            ConfigParam::SerialNumber => CFG_SERIAL_NUMBER,
            ConfigParam::OrderNumber => CFG_ORDER_NUMBER,
        }
    }

    /// Value width and interpretation for this parameter.
    pub fn kind(&self) -> ConfigKind {
        match self {
            ConfigParam::ModuleId | ConfigParam::GroupId => ConfigKind::Byte,
            ConfigParam::Rs232Baudrate
            | ConfigParam::CanBaudrate
            | ConfigParam::OffsetPhaseA
            | ConfigParam::OffsetPhaseB
            | ConfigParam::DataCrc => ConfigKind::Word,
            ConfigParam::CommunicationMode => ConfigKind::Mode,
            ConfigParam::UnitSystem => ConfigKind::Units,
            ConfigParam::SoftHigh
            | ConfigParam::SoftLow
            | ConfigParam::MaxVelocity
            | ConfigParam::MaxAcceleration
            | ConfigParam::MaxCurrent
            | ConfigParam::NomCurrent
            | ConfigParam::MaxJerk
            | ConfigParam::ReferenceOffset => ConfigKind::Float,
            ConfigParam::SerialNumber | ConfigParam::OrderNumber => ConfigKind::Dword,
        }
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigValue {
    /// Single-byte value.
    Byte(u8),
    /// 16-bit value.
    Word(u16),
    /// 32-bit value.
    Dword(u32),
    /// Floating-point value.
    Float(f32),
    /// Communication mode.
    Mode(CommunicationMode),
    /// Unit system.
    Units(UnitSystem),
}

impl ConfigValue {
    /// Check that this value matches the given width/interpretation.
    pub fn matches(&self, kind: ConfigKind) -> bool {
        matches!(
            (self, kind),
            (ConfigValue::Byte(_), ConfigKind::Byte)
                | (ConfigValue::Word(_), ConfigKind::Word)
                | (ConfigValue::Dword(_), ConfigKind::Dword)
                | (ConfigValue::Float(_), ConfigKind::Float)
                | (ConfigValue::Mode(_), ConfigKind::Mode)
                | (ConfigValue::Units(_), ConfigKind::Units)
        )
    }

    /// Append the wire representation to `buf`.
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ProtocolError> {
        match self {
            ConfigValue::Byte(v) => buf.push(*v),
            ConfigValue::Word(v) => buf.extend_from_slice(&v.to_le_bytes()),
            ConfigValue::Dword(v) => buf.extend_from_slice(&v.to_le_bytes()),
            ConfigValue::Float(v) => {
                if !v.is_finite() {
                    return Err(ProtocolError::InvalidParameter(format!(
                        "non-finite configuration value: {v}"
                    )));
                }
                buf.extend_from_slice(&v.to_le_bytes());
            }
            ConfigValue::Mode(mode) => buf.push((*mode).into()),
            ConfigValue::Units(units) => buf.push((*units).into()),
        }
        Ok(())
    }

    /// Decode a value of the given kind from a payload slice.
    pub(crate) fn decode(kind: ConfigKind, data: &[u8]) -> Result<Self, ProtocolError> {
        let expected = match kind {
            ConfigKind::Byte | ConfigKind::Mode | ConfigKind::Units => 1,
            ConfigKind::Word => 2,
            ConfigKind::Dword | ConfigKind::Float => 4,
        };
        if data.len() != expected {
            return Err(ProtocolError::UnexpectedPayload(format!(
                "config value: expected {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(match kind {
            ConfigKind::Byte => ConfigValue::Byte(data[0]),
            ConfigKind::Word => ConfigValue::Word(u16::from_le_bytes([data[0], data[1]])),
            ConfigKind::Dword => {
                ConfigValue::Dword(u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
            }
            ConfigKind::Float => {
                ConfigValue::Float(f32::from_le_bytes([data[0], data[1], data[2], data[3]]))
            }
            ConfigKind::Mode => ConfigValue::Mode(CommunicationMode::from(data[0])),
            ConfigKind::Units => ConfigValue::Units(UnitSystem::from(data[0])),
        })
    }
}

/// Communication interface selection of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationMode {
    /// Automatic interface selection.
    Auto,
    /// RS232.
    Rs232,
    /// CAN bus.
    Can,
    /// Profibus DPV0.
    ProfibusDpv0,
    /// RS232 without unsolicited messages.
    Rs232Silent,
    /// Mode byte not listed in the manual.
    Unknown(u8),
}

impl From<u8> for CommunicationMode {
    fn from(mode: u8) -> Self {
        match mode {
            0x00 => CommunicationMode::Auto,
            0x01 => CommunicationMode::Rs232,
            0x02 => CommunicationMode::Can,
            0x03 => CommunicationMode::ProfibusDpv0,
            0x04 => CommunicationMode::Rs232Silent,
            other => CommunicationMode::Unknown(other),
        }
    }
}

impl From<CommunicationMode> for u8 {
    fn from(mode: CommunicationMode) -> Self {
        match mode {
            CommunicationMode::Auto => 0x00,
            CommunicationMode::Rs232 => 0x01,
            CommunicationMode::Can => 0x02,
            CommunicationMode::ProfibusDpv0 => 0x03,
            CommunicationMode::Rs232Silent => 0x04,
            CommunicationMode::Unknown(mode) => mode,
        }
    }
}

/// Unit system the module reports and accepts values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    /// Millimetres.
    Millimetre,
    /// Metres.
    Metre,
    /// Inches.
    Inch,
    /// Radians.
    Radian,
    /// Degrees.
    Degree,
    /// Internal encoder units.
    Internal,
    /// Integer micrometres.
    MicrometreInteger,
    /// Integer microdegrees.
    MicrodegreeInteger,
    /// Integer microinches.
    MicroinchInteger,
    /// Integer millidegrees.
    MillidegreeInteger,
    /// Unit byte not listed in the manual.
    Unknown(u8),
}

impl UnitSystem {
    /// Integer unit systems are out of scope for this client; all commands
    /// assume floating-point units.
    pub fn is_float(&self) -> bool {
        !matches!(
            self,
            UnitSystem::MicrometreInteger
                | UnitSystem::MicrodegreeInteger
                | UnitSystem::MicroinchInteger
                | UnitSystem::MillidegreeInteger
        )
    }
}

impl From<u8> for UnitSystem {
    fn from(units: u8) -> Self {
        match units {
            0x00 => UnitSystem::Millimetre,
            0x01 => UnitSystem::Metre,
            0x02 => UnitSystem::Inch,
            0x03 => UnitSystem::Radian,
            0x04 => UnitSystem::Degree,
            0x05 => UnitSystem::Internal,
            0x06 => UnitSystem::MicrometreInteger,
            0x07 => UnitSystem::MicrodegreeInteger,
            0x08 => UnitSystem::MicroinchInteger,
            0x09 => UnitSystem::MillidegreeInteger,
            other => UnitSystem::Unknown(other),
        }
    }
}

impl From<UnitSystem> for u8 {
    fn from(units: UnitSystem) -> Self {
        match units {
            UnitSystem::Millimetre => 0x00,
            UnitSystem::Metre => 0x01,
            UnitSystem::Inch => 0x02,
            UnitSystem::Radian => 0x03,
            UnitSystem::Degree => 0x04,
            UnitSystem::Internal => 0x05,
            UnitSystem::MicrometreInteger => 0x06,
            UnitSystem::MicrodegreeInteger => 0x07,
            UnitSystem::MicroinchInteger => 0x08,
            UnitSystem::MillidegreeInteger => 0x09,
            UnitSystem::Unknown(units) => units,
        }
    }
}

/// Identification block returned by a parameterless GET CONFIG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module type string, e.g. "PR-70".
    pub module_type: String,
    /// Order number.
    pub order_number: u32,
    /// Firmware version, e.g. 121 for 1.21.
    pub firmware_version: u16,
    /// Protocol version.
    pub protocol_version: u16,
    /// Hardware version, e.g. 530 for 5.30.
    pub hardware_version: u16,
    /// Firmware build date string.
    pub firmware_date: String,
}

/// Record returned by GET DETAILED ERROR INFO.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailedErrorInfo {
    /// How the condition was classified.
    pub class: crate::error::FaultClass,
    /// The pending error code.
    pub code: FaultCode,
    /// Vendor-specific diagnostic value.
    pub data: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Status bytes from the state fixtures in the Schunk manual.
    #[test]
    fn status_flags_referenced_and_moving() {
        let flags = StatusFlags::from_byte(0x03);
        assert!(flags.referenced);
        assert!(flags.moving);
        assert!(!flags.error);
        assert!(!flags.position_reached);
        assert_eq!(flags.to_byte(), 0x03);
    }

    #[test]
    fn status_flags_stopped_with_brake() {
        let flags = StatusFlags::from_byte(0x61);
        assert!(flags.referenced);
        assert!(flags.brake);
        assert!(flags.move_end);
        assert!(!flags.moving);
        assert_eq!(flags.to_byte(), 0x61);
    }

    #[test]
    fn status_flags_unreferenced() {
        let flags = StatusFlags::from_byte(0x20);
        assert!(!flags.referenced);
        assert!(flags.brake);
        assert_eq!(flags.to_byte(), 0x20);
    }

    #[test]
    fn config_param_table_spot_checks() {
        assert_eq!(ConfigParam::ModuleId.subcommand(), 0x01);
        assert_eq!(ConfigParam::ModuleId.kind(), ConfigKind::Byte);
        assert_eq!(ConfigParam::Rs232Baudrate.subcommand(), 0x03);
        assert_eq!(ConfigParam::Rs232Baudrate.kind(), ConfigKind::Word);
        assert_eq!(ConfigParam::MaxVelocity.subcommand(), 0x09);
        assert_eq!(ConfigParam::MaxVelocity.kind(), ConfigKind::Float);
        assert_eq!(ConfigParam::SerialNumber.subcommand(), 0x15);
        assert_eq!(ConfigParam::SerialNumber.kind(), ConfigKind::Dword);
    }

    #[test]
    fn config_value_decode_widths() {
        assert_eq!(
            ConfigValue::decode(ConfigKind::Word, &[0x80, 0x25]),
            Ok(ConfigValue::Word(0x2580))
        );
        assert_eq!(
            ConfigValue::decode(ConfigKind::Units, &[0x00]),
            Ok(ConfigValue::Units(UnitSystem::Millimetre))
        );
        assert!(ConfigValue::decode(ConfigKind::Float, &[0x00, 0x00]).is_err());
    }

    #[test]
    fn unit_system_float_check() {
        assert!(UnitSystem::Millimetre.is_float());
        assert!(UnitSystem::Degree.is_float());
        assert!(!UnitSystem::MicrometreInteger.is_float());
    }
}

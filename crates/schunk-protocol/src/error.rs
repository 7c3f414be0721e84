//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when encoding or decoding protocol frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A caller-supplied parameter cannot be represented on the wire.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// The D-Len field disagrees with the received byte count.
    #[error("D-Len mismatch: declared {declared} data bytes, frame has {actual} bytes total")]
    LengthMismatch {
        /// D-Len declared in the frame header.
        declared: u8,
        /// Total number of bytes actually received.
        actual: usize,
    },

    /// The trailing CRC does not match the frame contents.
    #[error("checksum mismatch: computed 0x{computed:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        /// CRC computed over the received bytes.
        computed: u16,
        /// CRC carried in the frame trailer.
        received: u16,
    },

    /// The response carries a different module ID than the request.
    #[error("module ID mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ModuleMismatch {
        /// Module addressed by the outstanding request.
        expected: u8,
        /// Module ID found in the response.
        actual: u8,
    },

    /// Unknown message type byte.
    #[error("unexpected message type: 0x{0:02X}")]
    UnexpectedMessageType(u8),

    /// The response echoes a different command than the one sent.
    #[error("unexpected command code in response: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedCommand {
        /// Command code of the request.
        expected: u8,
        /// Command code found in the response.
        actual: u8,
    },

    /// The response payload does not have the shape the command calls for.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// The module reported an error, warning or info condition.
    #[error("module reported {class}: {code}")]
    Fault {
        /// How the condition was reported.
        class: FaultClass,
        /// Vendor error code.
        code: FaultCode,
    },
}

/// How a fault reply was classified by the module.
///
/// A fault reply (D-Len 2) carries one of the dedicated report codes or an
/// echo of the request command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// Reported via CMD ERROR (0x88).
    Error,
    /// Reported via CMD WARNING (0x89).
    Warning,
    /// Reported via CMD INFO (0x8A).
    Info,
    /// Reported as a direct reply to the given command code.
    Reply(u8),
}

impl FaultClass {
    /// Classify the command byte of a fault reply.
    pub fn from_report_code(code: u8) -> Self {
        use crate::constants::*;
        match code {
            REPORT_CMD_ERROR => FaultClass::Error,
            REPORT_CMD_WARNING => FaultClass::Warning,
            REPORT_CMD_INFO => FaultClass::Info,
            other => FaultClass::Reply(other),
        }
    }
}

impl std::fmt::Display for FaultClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultClass::Error => write!(f, "error"),
            FaultClass::Warning => write!(f, "warning"),
            FaultClass::Info => write!(f, "info"),
            FaultClass::Reply(code) => write!(f, "reply to command 0x{code:02X}"),
        }
    }
}

/// Vendor error codes, as listed in the Schunk manual.
///
/// Codes below 0x45 are informational, the rest are hardware or command
/// errors. Codes not listed in the manual are preserved as [`FaultCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    /// No error pending.
    NoError,
    /// Module has (re)booted.
    InfoBoot,
    /// No free space for the requested operation.
    InfoNoFreeSpace,
    /// Insufficient access rights.
    InfoNoRights,
    /// Command code not known to the firmware.
    InfoUnknownCommand,
    /// Command failed.
    InfoFailed,
    /// Module has not been referenced yet.
    NotReferenced,
    /// Searching the sine commutation vector.
    InfoSearchSineVector,
    /// Explicit "no error" report.
    InfoNoErrorReported,
    /// Communication error.
    InfoCommunicationError,
    /// Communication timeout.
    InfoTimeout,
    /// Baudrate not supported.
    InfoWrongBaudrate,
    /// Checksum error in a received frame.
    InfoChecksum,
    /// Message length error in a received frame.
    InfoMessageLength,
    /// Parameter out of range.
    InfoWrongParameter,
    /// Stored program has ended.
    InfoProgramEnd,
    /// Trigger event.
    InfoTrigger,
    /// Module ready.
    InfoReady,
    /// GUI connected.
    InfoGuiConnected,
    /// GUI disconnected.
    InfoGuiDisconnected,
    /// Stored program changed.
    InfoProgramChanged,
    /// Logic temperature too low.
    TempLow,
    /// Logic temperature too high.
    TempHigh,
    /// Logic voltage too low.
    LogicLow,
    /// Logic voltage too high.
    LogicHigh,
    /// Motor voltage too low.
    MotorVoltageLow,
    /// Motor voltage too high.
    MotorVoltageHigh,
    /// Cable break detected.
    CableBreak,
    /// Motor temperature too high.
    MotorTemp,
    /// Wrong ramp type.
    WrongRampType,
    /// Configuration memory error.
    ConfigMemory,
    /// Program memory error.
    ProgramMemory,
    /// Invalid program phrase.
    InvalidPhrase,
    /// Lower soft limit violated.
    SoftLow,
    /// Upper soft limit violated.
    SoftHigh,
    /// Pressure error.
    Pressure,
    /// Service required.
    Service,
    /// Emergency stop active.
    EmergencyStop,
    /// Tow (following) error.
    Tow,
    /// Profibus VPC3 error.
    Vpc3,
    /// Fragmentation error.
    Fragmentation,
    /// Current error.
    Current,
    /// I2t overload protection triggered.
    I2t,
    /// Initialization error.
    Initialize,
    /// Internal error.
    Internal,
    /// Lower hard limit violated.
    HardLow,
    /// Upper hard limit violated.
    HardHigh,
    /// Commutation error.
    Commutation,
    /// Math error.
    Math,
    /// Code not listed in the manual; raw value preserved.
    Unknown(u8),
}

impl FaultCode {
    /// The error string used in the Schunk manual.
    pub fn name(&self) -> &'static str {
        match self {
            FaultCode::NoError => "NO ERROR",
            FaultCode::InfoBoot => "INFO BOOT",
            FaultCode::InfoNoFreeSpace => "INFO NO FREE SPACE",
            FaultCode::InfoNoRights => "INFO NO RIGHTS",
            FaultCode::InfoUnknownCommand => "INFO UNKNOWN COMMAND",
            FaultCode::InfoFailed => "INFO FAILED",
            FaultCode::NotReferenced => "NOT REFERENCED",
            FaultCode::InfoSearchSineVector => "INFO SEARCH SINE VECTOR",
            FaultCode::InfoNoErrorReported => "INFO NO ERROR",
            FaultCode::InfoCommunicationError => "INFO COMMUNICATION ERROR",
            FaultCode::InfoTimeout => "INFO TIMEOUT",
            FaultCode::InfoWrongBaudrate => "INFO WRONG BAUDRATE",
            FaultCode::InfoChecksum => "INFO CHECKSUM",
            FaultCode::InfoMessageLength => "INFO MESSAGE LENGTH",
            FaultCode::InfoWrongParameter => "INFO WRONG PARAMETER",
            FaultCode::InfoProgramEnd => "INFO PROGRAM END",
            FaultCode::InfoTrigger => "INFO TRIGGER",
            FaultCode::InfoReady => "INFO READY",
            FaultCode::InfoGuiConnected => "INFO GUI CONNECTED",
            FaultCode::InfoGuiDisconnected => "INFO GUI DISCONNECTED",
            FaultCode::InfoProgramChanged => "INFO PROGRAM CHANGED",
            FaultCode::TempLow => "ERROR TEMP LOW",
            FaultCode::TempHigh => "ERROR TEMP HIGH",
            FaultCode::LogicLow => "ERROR LOGIC LOW",
            FaultCode::LogicHigh => "ERROR LOGIC HIGH",
            FaultCode::MotorVoltageLow => "ERROR MOTOR VOLTAGE LOW",
            FaultCode::MotorVoltageHigh => "ERROR MOTOR VOLTAGE HIGH",
            FaultCode::CableBreak => "ERROR CABLE BREAK",
            FaultCode::MotorTemp => "ERROR MOTOR TEMP",
            FaultCode::WrongRampType => "ERROR WRONG RAMP TYPE",
            FaultCode::ConfigMemory => "ERROR CONFIG MEMORY",
            FaultCode::ProgramMemory => "ERROR PROGRAM MEMORY",
            FaultCode::InvalidPhrase => "ERROR INVALID PHRASE",
            FaultCode::SoftLow => "ERROR SOFT LOW",
            FaultCode::SoftHigh => "ERROR SOFT HIGH",
            FaultCode::Pressure => "ERROR PRESSURE",
            FaultCode::Service => "ERROR SERVICE",
            FaultCode::EmergencyStop => "ERROR EMERGENCY STOP",
            FaultCode::Tow => "ERROR TOW",
            FaultCode::Vpc3 => "ERROR VPC3",
            FaultCode::Fragmentation => "ERROR FRAGMENTATION",
            FaultCode::Current => "ERROR CURRENT",
            FaultCode::I2t => "ERROR I2T",
            FaultCode::Initialize => "ERROR INITIALIZE",
            FaultCode::Internal => "ERROR INTERNAL",
            FaultCode::HardLow => "ERROR HARD LOW",
            FaultCode::HardHigh => "ERROR HARD HIGH",
            FaultCode::Commutation => "ERROR COMMUTATION",
            FaultCode::Math => "ERROR MATH",
            FaultCode::Unknown(_) => "UNKNOWN",
        }
    }

    /// The raw error byte.
    pub fn raw(&self) -> u8 {
        u8::from(*self)
    }
}

impl std::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.raw())
    }
}

impl From<u8> for FaultCode {
    fn from(code: u8) -> Self {
        match code {
            0x00 => FaultCode::NoError,
            0x01 => FaultCode::InfoBoot,
            0x02 => FaultCode::InfoNoFreeSpace,
            0x03 => FaultCode::InfoNoRights,
            0x04 => FaultCode::InfoUnknownCommand,
            0x05 => FaultCode::InfoFailed,
            0x06 => FaultCode::NotReferenced,
            0x07 => FaultCode::InfoSearchSineVector,
            0x08 => FaultCode::InfoNoErrorReported,
            0x09 => FaultCode::InfoCommunicationError,
            0x10 => FaultCode::InfoTimeout,
            0x16 => FaultCode::InfoWrongBaudrate,
            0x19 => FaultCode::InfoChecksum,
            0x1D => FaultCode::InfoMessageLength,
            0x1E => FaultCode::InfoWrongParameter,
            0x1F => FaultCode::InfoProgramEnd,
            0x40 => FaultCode::InfoTrigger,
            0x41 => FaultCode::InfoReady,
            0x42 => FaultCode::InfoGuiConnected,
            0x43 => FaultCode::InfoGuiDisconnected,
            0x44 => FaultCode::InfoProgramChanged,
            0x70 => FaultCode::TempLow,
            0x71 => FaultCode::TempHigh,
            0x72 => FaultCode::LogicLow,
            0x73 => FaultCode::LogicHigh,
            0x74 => FaultCode::MotorVoltageLow,
            0x75 => FaultCode::MotorVoltageHigh,
            0x76 => FaultCode::CableBreak,
            0x78 => FaultCode::MotorTemp,
            0xC8 => FaultCode::WrongRampType,
            0xD2 => FaultCode::ConfigMemory,
            0xD3 => FaultCode::ProgramMemory,
            0xD4 => FaultCode::InvalidPhrase,
            0xD5 => FaultCode::SoftLow,
            0xD6 => FaultCode::SoftHigh,
            0xD7 => FaultCode::Pressure,
            0xD8 => FaultCode::Service,
            0xD9 => FaultCode::EmergencyStop,
            0xDA => FaultCode::Tow,
            0xDB => FaultCode::Vpc3,
            0xDC => FaultCode::Fragmentation,
            0xDE => FaultCode::Current,
            0xDF => FaultCode::I2t,
            0xE0 => FaultCode::Initialize,
            0xE1 => FaultCode::Internal,
            0xE2 => FaultCode::HardLow,
            0xE3 => FaultCode::HardHigh,
            0xE4 => FaultCode::Commutation,
            0xEC => FaultCode::Math,
            other => FaultCode::Unknown(other),
        }
    }
}

impl From<FaultCode> for u8 {
    fn from(code: FaultCode) -> Self {
        match code {
            FaultCode::NoError => 0x00,
            FaultCode::InfoBoot => 0x01,
            FaultCode::InfoNoFreeSpace => 0x02,
            FaultCode::InfoNoRights => 0x03,
            FaultCode::InfoUnknownCommand => 0x04,
            FaultCode::InfoFailed => 0x05,
            FaultCode::NotReferenced => 0x06,
            FaultCode::InfoSearchSineVector => 0x07,
            FaultCode::InfoNoErrorReported => 0x08,
            FaultCode::InfoCommunicationError => 0x09,
            FaultCode::InfoTimeout => 0x10,
            FaultCode::InfoWrongBaudrate => 0x16,
            FaultCode::InfoChecksum => 0x19,
            FaultCode::InfoMessageLength => 0x1D,
            FaultCode::InfoWrongParameter => 0x1E,
            FaultCode::InfoProgramEnd => 0x1F,
            FaultCode::InfoTrigger => 0x40,
            FaultCode::InfoReady => 0x41,
            FaultCode::InfoGuiConnected => 0x42,
            FaultCode::InfoGuiDisconnected => 0x43,
            FaultCode::InfoProgramChanged => 0x44,
            FaultCode::TempLow => 0x70,
            FaultCode::TempHigh => 0x71,
            FaultCode::LogicLow => 0x72,
            FaultCode::LogicHigh => 0x73,
            FaultCode::MotorVoltageLow => 0x74,
            FaultCode::MotorVoltageHigh => 0x75,
            FaultCode::CableBreak => 0x76,
            FaultCode::MotorTemp => 0x78,
            FaultCode::WrongRampType => 0xC8,
            FaultCode::ConfigMemory => 0xD2,
            FaultCode::ProgramMemory => 0xD3,
            FaultCode::InvalidPhrase => 0xD4,
            FaultCode::SoftLow => 0xD5,
            FaultCode::SoftHigh => 0xD6,
            FaultCode::Pressure => 0xD7,
            FaultCode::Service => 0xD8,
            FaultCode::EmergencyStop => 0xD9,
            FaultCode::Tow => 0xDA,
            FaultCode::Vpc3 => 0xDB,
            FaultCode::Fragmentation => 0xDC,
            FaultCode::Current => 0xDE,
            FaultCode::I2t => 0xDF,
            FaultCode::Initialize => 0xE0,
            FaultCode::Internal => 0xE1,
            FaultCode::HardLow => 0xE2,
            FaultCode::HardHigh => 0xE3,
            FaultCode::Commutation => 0xE4,
            FaultCode::Math => 0xEC,
            FaultCode::Unknown(code) => code,
        }
    }
}

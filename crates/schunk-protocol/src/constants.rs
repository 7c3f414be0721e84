//! Protocol constants
//!
//! These constants define the message types, command codes, error codes and
//! other protocol-specific values of the Schunk Motion Protocol, taken from
//! the Motion Control manual. They are a compatibility-critical boundary:
//! changing any of them breaks communication with real hardware.

// ============================================================================
// Message Types (first byte of every RS232 frame)
// ============================================================================

/// Message from the master (PC) to a module.
pub const MSG_MASTER_TO_MODULE: u8 = 0x05;
/// Normal reply from a module to the master.
pub const MSG_MODULE_TO_MASTER: u8 = 0x07;
/// Error reply from a module to the master. Always has D-Len 2.
pub const MSG_ERROR: u8 = 0x03;

// ============================================================================
// Command Codes (master → module)
// ============================================================================

/// 2.1.1 CMD REFERENCE - perform a reference movement.
pub const CMD_REFERENCE: u8 = 0x92;
/// 2.1.3 MOVE POS - move to an absolute position.
pub const CMD_MOVE_POS: u8 = 0xB0;
/// 2.1.4 MOVE POS REL - move by a relative distance.
pub const CMD_MOVE_POS_REL: u8 = 0xB8;
/// 2.1.5 MOVE POS TIME - absolute move within a given time.
pub const CMD_MOVE_POS_TIME: u8 = 0xB1;
/// 2.1.6 MOVE POS TIME REL - relative move within a given time.
pub const CMD_MOVE_POS_TIME_REL: u8 = 0xB9;
/// 2.1.14 SET TARGET VEL - set the target velocity.
pub const CMD_SET_TARGET_VEL: u8 = 0xA0;
/// 2.1.15 SET TARGET ACC - set the target acceleration.
pub const CMD_SET_TARGET_ACC: u8 = 0xA1;
/// 2.1.16 SET TARGET JERK - set the target jerk.
pub const CMD_SET_TARGET_JERK: u8 = 0xA2;
/// 2.1.17 SET TARGET CUR - set the target current.
pub const CMD_SET_TARGET_CUR: u8 = 0xA3;
/// 2.1.18 SET TARGET TIME - set the target time for timed moves.
pub const CMD_SET_TARGET_TIME: u8 = 0xA4;
/// 2.1.19 CMD STOP - stop the current movement.
pub const CMD_STOP: u8 = 0x91;
/// 2.2.6 CMD TOGGLE IMPULSE MESSAGE - enable/disable impulse messages.
pub const CMD_TOGGLE_IMPULSE_MESSAGE: u8 = 0xE7;
/// 2.3.1 SET CONFIG - write a configuration parameter.
pub const CMD_SET_CONFIG: u8 = 0x81;
/// 2.3.2 GET CONFIG - read a configuration parameter.
pub const CMD_GET_CONFIG: u8 = 0x80;
/// 2.5.1 GET STATE - query position, velocity, current and status.
pub const CMD_GET_STATE: u8 = 0x95;
/// 2.5.2 CMD REBOOT - restart the module.
pub const CMD_REBOOT: u8 = 0xE0;
/// 2.5.7 CHECK MC PC COMMUNICATION - module sends a known test pattern.
pub const CMD_CHECK_MC_PC: u8 = 0xE4;
/// 2.5.8 CHECK PC MC COMMUNICATION - master sends the known test pattern.
pub const CMD_CHECK_PC_MC: u8 = 0xE5;
/// 2.8.1.4 CMD ACK - acknowledge a pending error.
pub const CMD_ACK: u8 = 0x8B;
/// 2.8.1.5 GET DETAILED ERROR INFO.
pub const CMD_GET_DETAILED_ERROR_INFO: u8 = 0x96;

// Not implemented: 2.1.20 CMD EMERGENCY STOP (0x90), see warnings in the
// Schunk manual.

// ============================================================================
// Error Report Codes (command byte of a D-Len 2 reply)
// ============================================================================

/// Reply reporting an error condition.
pub const REPORT_CMD_ERROR: u8 = 0x88;
/// Reply reporting a warning.
pub const REPORT_CMD_WARNING: u8 = 0x89;
/// Reply reporting an informational condition.
pub const REPORT_CMD_INFO: u8 = 0x8A;

// ============================================================================
// GET STATE
// ============================================================================

/// Request the current position in the state reply.
pub const STATE_MODE_POSITION: u8 = 0x01;
/// Request the current velocity in the state reply.
pub const STATE_MODE_VELOCITY: u8 = 0x02;
/// Request the motor current in the state reply.
pub const STATE_MODE_CURRENT: u8 = 0x04;

// Status byte bits, in wire order.

/// Module has been referenced.
pub const STATUS_REFERENCED: u8 = 0x01;
/// A movement is in progress.
pub const STATUS_MOVING: u8 = 0x02;
/// Module is executing a stored program.
pub const STATUS_PROGRAM_MODE: u8 = 0x04;
/// A warning is pending.
pub const STATUS_WARNING: u8 = 0x08;
/// An error is pending.
pub const STATUS_ERROR: u8 = 0x10;
/// The brake is engaged.
pub const STATUS_BRAKE: u8 = 0x20;
/// The last movement has ended.
pub const STATUS_MOVE_END: u8 = 0x40;
/// The target position has been reached.
pub const STATUS_POSITION_REACHED: u8 = 0x80;

// ============================================================================
// GET CONFIG / SET CONFIG Subcommands
// ============================================================================

/// Module ID (1 byte).
pub const CFG_MODULE_ID: u8 = 0x01;
/// Group ID (1 byte).
pub const CFG_GROUP_ID: u8 = 0x02;
/// RS232 baudrate (2 bytes).
pub const CFG_RS232_BAUDRATE: u8 = 0x03;
/// CAN baudrate (2 bytes).
pub const CFG_CAN_BAUDRATE: u8 = 0x04;
/// Communication mode (1 byte).
pub const CFG_COMMUNICATION_MODE: u8 = 0x05;
/// Unit system (1 byte).
pub const CFG_UNIT_SYSTEM: u8 = 0x06;
/// Upper soft limit (4-byte float).
pub const CFG_SOFT_HIGH: u8 = 0x07;
/// Lower soft limit (4-byte float).
pub const CFG_SOFT_LOW: u8 = 0x08;
/// Maximum velocity (4-byte float).
pub const CFG_MAX_VELOCITY: u8 = 0x09;
/// Maximum acceleration (4-byte float).
pub const CFG_MAX_ACCELERATION: u8 = 0x0A;
/// Maximum current (4-byte float).
pub const CFG_MAX_CURRENT: u8 = 0x0B;
/// Nominal current (4-byte float).
pub const CFG_NOM_CURRENT: u8 = 0x0C;
/// Maximum jerk (4-byte float).
pub const CFG_MAX_JERK: u8 = 0x0D;
/// Phase A offset (2 bytes).
pub const CFG_OFFSET_PHASE_A: u8 = 0x0E;
/// Phase B offset (2 bytes).
pub const CFG_OFFSET_PHASE_B: u8 = 0x0F;
/// Data CRC enable flag (2 bytes).
pub const CFG_DATA_CRC: u8 = 0x13;
/// Reference offset (4-byte float).
pub const CFG_REFERENCE_OFFSET: u8 = 0x14;
/// Serial number (4 bytes).
pub const CFG_SERIAL_NUMBER: u8 = 0x15;
/// Order number (4 bytes).
pub const CFG_ORDER_NUMBER: u8 = 0x16;

// ============================================================================
// Sizes
// ============================================================================

/// Header bytes of an RS232 frame: message type, module ID, D-Len.
pub const FRAME_HEADER_SIZE: usize = 3;
/// Trailing checksum bytes of an RS232 frame.
pub const FRAME_CRC_SIZE: usize = 2;
/// Smallest valid response frame: header + command echo + checksum.
pub const MIN_RESPONSE_SIZE: usize = FRAME_HEADER_SIZE + 1 + FRAME_CRC_SIZE;
/// Largest possible frame (D-Len is a single byte).
pub const MAX_FRAME_SIZE: usize = FRAME_HEADER_SIZE + 255 + FRAME_CRC_SIZE;
/// Size of the GET STATE data block: three floats, status byte, error byte.
pub const STATE_PAYLOAD_SIZE: usize = 14;
/// Size of the module info block returned by a parameterless GET CONFIG.
pub const MODULE_INFO_SIZE: usize = 44;

// ============================================================================
// Communication Self-Test (CHECK MC PC / CHECK PC MC)
// ============================================================================

/// Float values of the vendor test pattern.
pub const TEST_FLOATS: [f32; 2] = [-1.2345, 47.11];
/// 32-bit integer values of the vendor test pattern.
pub const TEST_INTS: [i32; 2] = [0x1122_3344, -1_122_868];
/// 16-bit integer values of the vendor test pattern.
pub const TEST_SHORTS: [i16; 2] = [512, -20482];
/// Size of the packed test pattern.
pub const TEST_PATTERN_SIZE: usize = 20;

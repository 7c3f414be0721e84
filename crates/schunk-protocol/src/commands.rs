//! Commands that can be sent to a module.
//!
//! [`Command::encode`] produces the telegram part of a frame: D-Len,
//! command code and parameter bytes. The RS232 header and checksum are
//! added by [`crate::frame::encode_request`].

use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::*;

/// Commands supported by this client.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Perform a reference movement.
    Reference,

    /// Move to an absolute position.
    MovePos {
        /// Absolute target position.
        position: f32,
        /// Optional trailing motion parameters.
        profile: MotionProfile,
    },

    /// Move by a relative distance.
    MovePosRel {
        /// Relative target position.
        position: f32,
        /// Optional trailing motion parameters.
        profile: MotionProfile,
    },

    /// Move to an absolute position within a given time.
    MovePosTime {
        /// Absolute target position.
        position: f32,
        /// Optional trailing motion parameters.
        profile: TimedMotionProfile,
    },

    /// Move by a relative distance within a given time.
    MovePosTimeRel {
        /// Relative target position.
        position: f32,
        /// Optional trailing motion parameters.
        profile: TimedMotionProfile,
    },

    /// Set the target velocity.
    SetTargetVel {
        /// New target velocity.
        velocity: f32,
    },

    /// Set the target acceleration.
    SetTargetAcc {
        /// New target acceleration.
        acceleration: f32,
    },

    /// Set the target jerk.
    SetTargetJerk {
        /// New target jerk.
        jerk: f32,
    },

    /// Set the target current.
    SetTargetCur {
        /// New target current.
        current: f32,
    },

    /// Set the target time for timed moves.
    SetTargetTime {
        /// New target time.
        time: f32,
    },

    /// Stop the current movement.
    Stop,

    /// Enable or disable impulse messages. The reply tells which.
    ToggleImpulseMessage,

    /// Query the module identification block.
    GetModuleInfo,

    /// Read a scalar configuration parameter.
    GetConfig(ConfigParam),

    /// Write a scalar configuration parameter.
    SetConfig {
        /// Parameter to write.
        param: ConfigParam,
        /// New value; its width must match the parameter.
        value: ConfigValue,
    },

    /// Query position, velocity, current, status and error code.
    GetState,

    /// Restart the module.
    Reboot,

    /// Acknowledge a pending error.
    Ack,

    /// Ask the module to send the vendor test pattern.
    CheckMcPcCommunication,

    /// Send the vendor test pattern to the module.
    CheckPcMcCommunication,

    /// Query detailed information on the pending error.
    GetDetailedErrorInfo,
}

impl Command {
    /// Get the command code for this command.
    pub fn code(&self) -> u8 {
        match self {
            Command::Reference => CMD_REFERENCE,
            Command::MovePos { .. } => CMD_MOVE_POS,
            Command::MovePosRel { .. } => CMD_MOVE_POS_REL,
            Command::MovePosTime { .. } => CMD_MOVE_POS_TIME,
            Command::MovePosTimeRel { .. } => CMD_MOVE_POS_TIME_REL,
            Command::SetTargetVel { .. } => CMD_SET_TARGET_VEL,
            Command::SetTargetAcc { .. } => CMD_SET_TARGET_ACC,
            Command::SetTargetJerk { .. } => CMD_SET_TARGET_JERK,
            Command::SetTargetCur { .. } => CMD_SET_TARGET_CUR,
            Command::SetTargetTime { .. } => CMD_SET_TARGET_TIME,
            Command::Stop => CMD_STOP,
            Command::ToggleImpulseMessage => CMD_TOGGLE_IMPULSE_MESSAGE,
            Command::GetModuleInfo => CMD_GET_CONFIG,
            Command::GetConfig(_) => CMD_GET_CONFIG,
            Command::SetConfig { .. } => CMD_SET_CONFIG,
            Command::GetState => CMD_GET_STATE,
            Command::Reboot => CMD_REBOOT,
            Command::Ack => CMD_ACK,
            Command::CheckMcPcCommunication => CMD_CHECK_MC_PC,
            Command::CheckPcMcCommunication => CMD_CHECK_PC_MC,
            Command::GetDetailedErrorInfo => CMD_GET_DETAILED_ERROR_INFO,
        }
    }

    /// Encode the telegram: D-Len, command code, parameter bytes.
    ///
    /// Parameters are validated here, before any frame is built: non-finite
    /// floats and gapped optional parameter lists are rejected with
    /// [`ProtocolError::InvalidParameter`].
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = Vec::with_capacity(MAX_FRAME_SIZE);
        buf.push(0); // D-Len, patched below
        buf.push(self.code());

        match self {
            Command::Reference
            | Command::Stop
            | Command::ToggleImpulseMessage
            | Command::GetModuleInfo
            | Command::Reboot
            | Command::Ack
            | Command::CheckMcPcCommunication
            | Command::GetDetailedErrorInfo => {}

            Command::MovePos { position, profile } => {
                push_motion_params(&mut buf, *position, &profile.slots())?;
            }

            Command::MovePosRel { position, profile } => {
                push_motion_params(&mut buf, *position, &profile.slots())?;
            }

            Command::MovePosTime { position, profile } => {
                push_motion_params(&mut buf, *position, &profile.slots())?;
            }

            Command::MovePosTimeRel { position, profile } => {
                push_motion_params(&mut buf, *position, &profile.slots())?;
            }

            Command::SetTargetVel { velocity } => push_f32(&mut buf, *velocity)?,
            Command::SetTargetAcc { acceleration } => push_f32(&mut buf, *acceleration)?,
            Command::SetTargetJerk { jerk } => push_f32(&mut buf, *jerk)?,
            Command::SetTargetCur { current } => push_f32(&mut buf, *current)?,
            Command::SetTargetTime { time } => push_f32(&mut buf, *time)?,

            Command::GetConfig(param) => {
                buf.push(param.subcommand());
            }

            Command::SetConfig { param, value } => {
                if !value.matches(param.kind()) {
                    return Err(ProtocolError::InvalidParameter(format!(
                        "value {value:?} does not match the width of {param:?}"
                    )));
                }
                buf.push(param.subcommand());
                value.encode_into(&mut buf)?;
            }

            Command::GetState => {
                // Cyclic reporting disabled (time 0.0), request everything.
                buf.extend_from_slice(&0.0f32.to_le_bytes());
                buf.push(STATE_MODE_POSITION | STATE_MODE_VELOCITY | STATE_MODE_CURRENT);
            }

            Command::CheckPcMcCommunication => {
                push_test_pattern(&mut buf);
            }
        }

        buf[0] = (buf.len() - 1) as u8;
        Ok(buf)
    }
}

/// Append the vendor test pattern: two floats, two ints, two shorts.
fn push_test_pattern(buf: &mut Vec<u8>) {
    for value in TEST_FLOATS {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    for value in TEST_INTS {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    for value in TEST_SHORTS {
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Append a single float parameter, rejecting values the wire cannot carry.
fn push_f32(buf: &mut Vec<u8>, value: f32) -> Result<(), ProtocolError> {
    if !value.is_finite() {
        return Err(ProtocolError::InvalidParameter(format!(
            "non-finite parameter: {value}"
        )));
    }
    buf.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Append a position plus optional trailing parameters.
///
/// Trailing omitted slots are simply not sent; an omitted slot followed by a
/// given one has no wire representation and is rejected.
fn push_motion_params(
    buf: &mut Vec<u8>,
    position: f32,
    slots: &[Option<f32>; 4],
) -> Result<(), ProtocolError> {
    let given = slots
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1);
    if slots[..given].iter().any(Option::is_none) {
        return Err(ProtocolError::InvalidParameter(
            "omitted motion parameter followed by a given one".to_string(),
        ));
    }

    push_f32(buf, position)?;
    for slot in &slots[..given] {
        // No gaps past this point, checked above.
        if let Some(value) = slot {
            push_f32(buf, *value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Telegram fixtures from the Schunk manual examples.

    #[test]
    fn encode_reference() {
        assert_eq!(Command::Reference.encode().unwrap(), b"\x01\x92");
    }

    #[test]
    fn encode_move_pos() {
        let cmd = Command::MovePos {
            position: 10.0,
            profile: MotionProfile::default(),
        };
        assert_eq!(cmd.encode().unwrap(), b"\x05\xB0\x00\x00\x20\x41");
    }

    #[test]
    fn encode_move_pos_full_profile() {
        let cmd = Command::MovePos {
            position: 10.0,
            profile: MotionProfile {
                velocity: Some(1.0),
                acceleration: Some(2.0),
                current: Some(3.0),
                jerk: Some(4.0),
            },
        };
        let telegram = cmd.encode().unwrap();
        assert_eq!(telegram.len(), 1 + 1 + 5 * 4);
        assert_eq!(telegram[0], 0x15);
        assert_eq!(telegram[1], 0xB0);
        assert_eq!(&telegram[2..6], &10.0f32.to_le_bytes());
        assert_eq!(&telegram[18..22], &4.0f32.to_le_bytes());
    }

    #[test]
    fn encode_move_pos_trailing_omitted() {
        let cmd = Command::MovePosRel {
            position: 10.0,
            profile: MotionProfile {
                velocity: Some(1.5),
                ..Default::default()
            },
        };
        let telegram = cmd.encode().unwrap();
        assert_eq!(telegram[0], 0x09);
        assert_eq!(telegram[1], 0xB8);
        assert_eq!(&telegram[6..10], &1.5f32.to_le_bytes());
    }

    #[test]
    fn encode_rejects_gapped_profile() {
        let cmd = Command::MovePos {
            position: 10.0,
            profile: MotionProfile {
                velocity: None,
                acceleration: Some(2.0),
                ..Default::default()
            },
        };
        assert!(matches!(
            cmd.encode(),
            Err(ProtocolError::InvalidParameter(_))
        ));
    }

    #[test]
    fn encode_rejects_non_finite_position() {
        for position in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let cmd = Command::MovePos {
                position,
                profile: MotionProfile::default(),
            };
            assert!(matches!(
                cmd.encode(),
                Err(ProtocolError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn encode_accepts_boundary_position() {
        let cmd = Command::MovePos {
            position: f32::MAX,
            profile: MotionProfile::default(),
        };
        assert!(cmd.encode().is_ok());
    }

    #[test]
    fn encode_set_target_vel() {
        let cmd = Command::SetTargetVel { velocity: 12.2 };
        assert_eq!(cmd.encode().unwrap(), b"\x05\xA0\x33\x33\x43\x41");
    }

    #[test]
    fn encode_get_state() {
        assert_eq!(
            Command::GetState.encode().unwrap(),
            b"\x06\x95\x00\x00\x00\x00\x07"
        );
    }

    #[test]
    fn encode_get_config_unit_system() {
        let cmd = Command::GetConfig(ConfigParam::UnitSystem);
        assert_eq!(cmd.encode().unwrap(), b"\x02\x80\x06");
    }

    #[test]
    fn encode_get_module_info() {
        assert_eq!(Command::GetModuleInfo.encode().unwrap(), b"\x01\x80");
    }

    #[test]
    fn encode_set_config_module_id() {
        let cmd = Command::SetConfig {
            param: ConfigParam::ModuleId,
            value: ConfigValue::Byte(12),
        };
        assert_eq!(cmd.encode().unwrap(), b"\x03\x81\x01\x0C");
    }

    #[test]
    fn encode_set_config_rejects_width_mismatch() {
        let cmd = Command::SetConfig {
            param: ConfigParam::ModuleId,
            value: ConfigValue::Word(12),
        };
        assert!(matches!(
            cmd.encode(),
            Err(ProtocolError::InvalidParameter(_))
        ));
    }

    #[test]
    fn encode_check_pc_mc() {
        let telegram = Command::CheckPcMcCommunication.encode().unwrap();
        assert_eq!(
            telegram,
            b"\x15\xE5\x19\x04\x9E\xBF\xA4\x70\x3C\x42\x44\x33\x22\x11\
              \xCC\xDD\xEE\xFF\x00\x02\xFE\xAF"
        );
    }

    #[test]
    fn encode_toggle_impulse_message() {
        assert_eq!(Command::ToggleImpulseMessage.encode().unwrap(), b"\x01\xE7");
    }
}

//! Responses received from a module.
//!
//! The wire format does not self-describe payload shapes, so decoding is
//! driven by the command the response answers.

use crate::commands::Command;
use crate::constants::*;
use crate::error::{FaultClass, FaultCode, ProtocolError};
use crate::frame::ResponseFrame;
use crate::types::*;

/// Decoded reply to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Plain acknowledgement.
    Ok,

    /// Reply to a move command: estimated time to reach the target, 0.0
    /// when the module cannot estimate it.
    EstimatedTime(f32),

    /// Reply to GET STATE.
    State(ModuleState),

    /// Reply to TOGGLE IMPULSE MESSAGE: whether impulse messages are now on.
    ImpulseMessages(bool),

    /// Reply to a parameterless GET CONFIG.
    ModuleInfo(ModuleInfo),

    /// Reply to GET CONFIG for a scalar parameter.
    Config(ConfigValue),

    /// Reply to a communication self-test.
    CommunicationOk,

    /// Reply to GET DETAILED ERROR INFO.
    DetailedError(DetailedErrorInfo),
}

impl Response {
    /// Decode a validated response frame in the context of the command it
    /// answers.
    ///
    /// A D-Len 2 frame is an error report and decodes to
    /// [`ProtocolError::Fault`] regardless of the command; no payload
    /// decode is attempted for it.
    pub fn decode(command: &Command, frame: &ResponseFrame) -> Result<Self, ProtocolError> {
        if frame.is_fault() {
            return Err(ProtocolError::Fault {
                class: FaultClass::from_report_code(frame.command),
                code: FaultCode::from(frame.payload[0]),
            });
        }
        if frame.command != command.code() {
            return Err(ProtocolError::UnexpectedCommand {
                expected: command.code(),
                actual: frame.command,
            });
        }

        let payload = frame.payload.as_slice();
        match command {
            Command::Reference
            | Command::Stop
            | Command::Reboot
            | Command::Ack
            | Command::SetTargetVel { .. }
            | Command::SetTargetAcc { .. }
            | Command::SetTargetJerk { .. }
            | Command::SetTargetCur { .. }
            | Command::SetTargetTime { .. } => expect_ok(payload).map(|_| Response::Ok),

            Command::MovePos { .. }
            | Command::MovePosRel { .. }
            | Command::MovePosTime { .. }
            | Command::MovePosTimeRel { .. } => decode_estimated_time(payload),

            Command::GetState => decode_state(payload),

            Command::ToggleImpulseMessage => {
                if payload == b"ON" {
                    Ok(Response::ImpulseMessages(true))
                } else if payload == b"OFF" {
                    Ok(Response::ImpulseMessages(false))
                } else {
                    Err(unexpected("impulse toggle", payload))
                }
            }

            Command::GetModuleInfo => decode_module_info(payload),

            Command::GetConfig(param) => decode_config(*param, payload),

            Command::SetConfig { param, .. } => {
                if payload.len() == 3 && &payload[..2] == b"OK" && payload[2] == param.subcommand()
                {
                    Ok(Response::Ok)
                } else {
                    Err(unexpected("config write acknowledgement", payload))
                }
            }

            Command::CheckMcPcCommunication => decode_test_pattern(payload),

            Command::CheckPcMcCommunication => {
                if payload == b"OK\x00" {
                    Ok(Response::CommunicationOk)
                } else {
                    Err(unexpected("communication check acknowledgement", payload))
                }
            }

            Command::GetDetailedErrorInfo => decode_detailed_error(payload),
        }
    }
}

fn unexpected(what: &str, payload: &[u8]) -> ProtocolError {
    ProtocolError::UnexpectedPayload(format!("{what}: {payload:02X?}"))
}

fn expect_ok(payload: &[u8]) -> Result<(), ProtocolError> {
    if payload == b"OK" {
        Ok(())
    } else {
        Err(unexpected("acknowledgement", payload))
    }
}

fn read_f32(data: &[u8]) -> f32 {
    f32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

fn decode_estimated_time(payload: &[u8]) -> Result<Response, ProtocolError> {
    // Modules that cannot estimate the time answer with a plain OK.
    if payload == b"OK" {
        return Ok(Response::EstimatedTime(0.0));
    }
    if payload.len() != 4 {
        return Err(unexpected("estimated time", payload));
    }
    Ok(Response::EstimatedTime(read_f32(payload)))
}

fn decode_state(payload: &[u8]) -> Result<Response, ProtocolError> {
    if payload.len() != STATE_PAYLOAD_SIZE {
        return Err(ProtocolError::UnexpectedPayload(format!(
            "state block: expected {STATE_PAYLOAD_SIZE} bytes, got {}",
            payload.len()
        )));
    }
    Ok(Response::State(ModuleState {
        position: read_f32(&payload[0..4]),
        velocity: read_f32(&payload[4..8]),
        current: read_f32(&payload[8..12]),
        flags: StatusFlags::from_byte(payload[12]),
        error: FaultCode::from(payload[13]),
    }))
}

fn decode_module_info(payload: &[u8]) -> Result<Response, ProtocolError> {
    // 8-byte type string, order number, three version words and the build
    // date. The PR-70 returns a 26-byte date, 5 more than the manual says.
    if payload.len() != MODULE_INFO_SIZE {
        return Err(ProtocolError::UnexpectedPayload(format!(
            "module info block: expected {MODULE_INFO_SIZE} bytes, got {}",
            payload.len()
        )));
    }
    Ok(Response::ModuleInfo(ModuleInfo {
        module_type: trimmed_string(&payload[0..8]),
        order_number: u32::from_le_bytes([payload[8], payload[9], payload[10], payload[11]]),
        firmware_version: u16::from_le_bytes([payload[12], payload[13]]),
        protocol_version: u16::from_le_bytes([payload[14], payload[15]]),
        hardware_version: u16::from_le_bytes([payload[16], payload[17]]),
        firmware_date: trimmed_string(&payload[18..44]),
    }))
}

fn trimmed_string(data: &[u8]) -> String {
    let end = data
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&data[..end]).into_owned()
}

fn decode_config(param: ConfigParam, payload: &[u8]) -> Result<Response, ProtocolError> {
    if payload.is_empty() || payload[0] != param.subcommand() {
        return Err(unexpected("config subcommand echo", payload));
    }
    ConfigValue::decode(param.kind(), &payload[1..]).map(Response::Config)
}

fn decode_test_pattern(payload: &[u8]) -> Result<Response, ProtocolError> {
    if payload.len() != TEST_PATTERN_SIZE {
        return Err(unexpected("test pattern", payload));
    }
    let floats_ok = TEST_FLOATS
        .iter()
        .zip(payload.chunks_exact(4).take(2))
        .all(|(expected, bytes)| (read_f32(bytes) - expected).abs() <= 1e-6);
    let ints_ok = TEST_INTS.iter().zip(payload[8..16].chunks_exact(4)).all(
        |(expected, bytes)| {
            i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) == *expected
        },
    );
    let shorts_ok = TEST_SHORTS
        .iter()
        .zip(payload[16..20].chunks_exact(2))
        .all(|(expected, bytes)| i16::from_le_bytes([bytes[0], bytes[1]]) == *expected);
    if floats_ok && ints_ok && shorts_ok {
        Ok(Response::CommunicationOk)
    } else {
        Err(unexpected("test pattern", payload))
    }
}

fn decode_detailed_error(payload: &[u8]) -> Result<Response, ProtocolError> {
    if payload.len() != 6 {
        return Err(unexpected("detailed error info", payload));
    }
    Ok(Response::DetailedError(DetailedErrorInfo {
        class: FaultClass::from_report_code(payload[0]),
        code: FaultCode::from(payload[1]),
        data: read_f32(&payload[2..6]),
    }))
}

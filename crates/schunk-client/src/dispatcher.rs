//! Single-shot command dispatch.
//!
//! One call, one transport session: open, write the request frame, read
//! until a complete response frame has been assembled (or the timeout
//! expires), close, decode. No state is carried between calls.

use std::io;
use std::time::{Duration, Instant};

use schunk_protocol::{
    decode_response, encode_request, Command, FrameBuffer, Response, MAX_FRAME_SIZE,
};
use tracing::trace;

use crate::error::ClientError;
use crate::transport::{Session, Transport};

/// Send a command to the given module and decode its reply.
///
/// The session is released on every exit path - success, decode error or
/// timeout - before the result is returned.
pub fn exchange<T: Transport>(
    transport: &T,
    module: u8,
    command: &Command,
) -> Result<Response, ClientError> {
    // Parameter validation happens here, before a port is opened.
    let request = encode_request(module, command)?;

    let mut session = transport.open()?;
    trace!(module, command = command.code(), "tx {}", hex::encode(&request));
    session.write_all(&request)?;
    let frame = read_frame(&mut session, transport.timeout());
    drop(session);
    let frame = frame?;
    trace!(module, "rx {}", hex::encode(&frame));

    let reply = decode_response(module, &frame)?;
    Response::decode(command, &reply).map_err(ClientError::from)
}

/// Assemble one response frame from the session.
///
/// The frame length is declared in the header, so reads are accumulated
/// until the header plus the declared body and checksum have arrived.
/// Partial reads are never treated as complete frames. A single deadline
/// covers the whole assembly.
fn read_frame<S: Session>(session: &mut S, timeout: Duration) -> Result<Vec<u8>, ClientError> {
    let deadline = Instant::now() + timeout;
    let mut buffer = FrameBuffer::new();
    let mut chunk = [0u8; MAX_FRAME_SIZE];

    loop {
        if let Some(frame) = buffer.take_frame() {
            return Ok(frame);
        }
        if Instant::now() >= deadline {
            return Err(ClientError::Timeout { timeout });
        }
        match session.read(&mut chunk) {
            Ok(0) => continue,
            Ok(n) => buffer.push(&chunk[..n]),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut
                        | io::ErrorKind::WouldBlock
                        | io::ErrorKind::Interrupted
                ) =>
            {
                // The deadline check above decides when to give up.
                continue;
            }
            Err(e) => return Err(ClientError::Transport(e)),
        }
    }
}

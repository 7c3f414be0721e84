//! Client error types.

use std::time::Duration;

use schunk_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur during a command exchange.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Encoding or decoding failed, or the module reported a fault.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The underlying connection failed mid-exchange.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// No complete response frame arrived within the configured timeout.
    ///
    /// The only defense against a hung or disconnected module, since no
    /// connection is kept open between calls.
    #[error("no complete response within {timeout:?}")]
    Timeout {
        /// The configured transport timeout.
        timeout: Duration,
    },
}

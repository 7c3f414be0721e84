//! Transport abstraction and the RS232 serial implementation.
//!
//! A transport hands out one session per request/response exchange; the
//! session is dropped (and the underlying connection closed) as soon as the
//! exchange finishes, successfully or not. No connection state survives
//! between calls.

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;

/// A byte-stream connection for a single request/response exchange.
///
/// Dropping the session closes the connection.
pub trait Session {
    /// Write the complete request frame.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read available response bytes into `buf`.
    ///
    /// May return fewer bytes than requested. Implementations block no
    /// longer than the transport's configured timeout; an expired wait is
    /// reported as [`io::ErrorKind::TimedOut`] or a zero-length read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Factory for per-exchange connections.
pub trait Transport {
    /// The session type this transport hands out.
    type Session: Session;

    /// Open a connection for one exchange.
    fn open(&self) -> Result<Self::Session, ClientError>;

    /// The response timeout this transport is configured with.
    fn timeout(&self) -> Duration;
}

/// Configuration for the RS232 serial transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Baudrate; modules default to 9600.
    pub baud_rate: u32,
    /// Response timeout for one exchange.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            timeout: Duration::from_secs(1),
        }
    }
}

/// RS232 transport backed by the `serialport` crate.
///
/// The port is opened fresh for every exchange and closed when the session
/// drops.
pub struct SerialTransport {
    config: SerialConfig,
}

impl SerialTransport {
    /// Create a transport for the given serial configuration.
    pub fn new(config: SerialConfig) -> Self {
        SerialTransport { config }
    }

    /// The configuration this transport was created with.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

impl Transport for SerialTransport {
    type Session = SerialSession;

    fn open(&self) -> Result<SerialSession, ClientError> {
        debug!(
            port = %self.config.port,
            baud_rate = self.config.baud_rate,
            "opening serial port"
        );
        let port = serialport::new(&self.config.port, self.config.baud_rate)
            .timeout(self.config.timeout)
            .open()?;
        Ok(SerialSession { port })
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

/// An open serial port, held for the duration of one exchange.
pub struct SerialSession {
    port: Box<dyn serialport::SerialPort>,
}

impl Session for SerialSession {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, data)?;
        io::Write::flush(&mut self.port)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.port, buf)
    }
}

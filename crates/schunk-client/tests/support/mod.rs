//! Scripted in-memory transport for driving the facade without hardware.
//!
//! Each scripted exchange pins the exact request frame the client must
//! send and the raw reply bytes to feed back. Replies are served in small
//! chunks to exercise partial-read accumulation. Session drops are counted
//! so tests can observe that every exchange releases its session.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use schunk_client::{ClientError, Module, Session, Transport};

/// One scripted request/response exchange.
pub struct Exchange {
    /// Exact frame the client is expected to write.
    pub request: Vec<u8>,
    /// Raw reply bytes to serve back.
    pub reply: Vec<u8>,
}

impl Exchange {
    pub fn new(request: &[u8], reply: &[u8]) -> Self {
        Exchange {
            request: request.to_vec(),
            reply: reply.to_vec(),
        }
    }
}

/// Shared observation state, kept by the test while the transport is owned
/// by the module facade.
#[derive(Clone, Default)]
pub struct ScriptState {
    script: Arc<Mutex<VecDeque<Exchange>>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl ScriptState {
    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn remaining_exchanges(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

pub struct ScriptedTransport {
    state: ScriptState,
    timeout: Duration,
}

impl Transport for ScriptedTransport {
    type Session = ScriptedSession;

    fn open(&self) -> Result<ScriptedSession, ClientError> {
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            exchange: self.state.script.lock().unwrap().pop_front(),
            cursor: 0,
            closed: self.state.closed.clone(),
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

pub struct ScriptedSession {
    /// `None` once the script is exhausted: writes are swallowed and reads
    /// starve, like a dead serial line.
    exchange: Option<Exchange>,
    cursor: usize,
    closed: Arc<AtomicUsize>,
}

impl Session for ScriptedSession {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if let Some(exchange) = &self.exchange {
            assert_eq!(
                data,
                exchange.request.as_slice(),
                "client sent an unexpected request frame"
            );
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(exchange) = &self.exchange else {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
        };
        if self.cursor >= exchange.reply.len() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "reply exhausted"));
        }
        let n = (exchange.reply.len() - self.cursor).min(5).min(buf.len());
        buf[..n].copy_from_slice(&exchange.reply[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a facade for module 0x01 over the given script.
pub fn scripted_module(
    exchanges: Vec<Exchange>,
    timeout: Duration,
) -> (Module<ScriptedTransport>, ScriptState) {
    let state = ScriptState::default();
    state.script.lock().unwrap().extend(exchanges);
    let transport = ScriptedTransport {
        state: state.clone(),
        timeout,
    };
    let module = Module::new(0x01, transport).with_poll_interval(Duration::ZERO);
    (module, state)
}

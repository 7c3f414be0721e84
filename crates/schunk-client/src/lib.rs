//! Serial client for Schunk motion modules.
//!
//! This crate drives the Schunk Motion Protocol over a serial link. The
//! codec lives in `schunk-protocol`; this crate adds the transport seam,
//! the per-call dispatcher and the [`Module`] facade with one method per
//! supported command.
//!
//! Every call opens a fresh transport session, performs exactly one
//! request/response exchange and closes the session again, so no state
//! survives between calls. Blocking move variants repeat GET STATE
//! exchanges until the module reports the position reached or a fault.
//!
//! # Example
//!
//! ```rust,ignore
//! use schunk_client::{Module, SerialConfig, SerialTransport};
//!
//! let transport = SerialTransport::new(SerialConfig {
//!     port: "/dev/ttyUSB0".to_string(),
//!     ..SerialConfig::default()
//! });
//! let module = Module::new(0x0B, transport);
//!
//! module.reference()?;
//! module.move_pos_blocking(42.0, Default::default())?;
//! ```

mod blocking;
mod dispatcher;
mod error;
mod module;
mod transport;

pub use blocking::*;
pub use dispatcher::*;
pub use error::*;
pub use module::*;
pub use transport::*;

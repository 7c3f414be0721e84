//! Schunk Motion Protocol
//!
//! This crate provides types and utilities for talking to Schunk motion
//! modules (grippers, rotary and linear axes) over the binary Schunk Motion
//! Protocol. It is a pure codec: frames go in and out as byte slices, all
//! I/O lives elsewhere.
//!
//! # Protocol Overview
//!
//! Every exchange is a single request/response pair of RS232 frames:
//!
//! - **Requests** (master → module): message type 0x05, module ID, D-Len,
//!   command code, parameters, CRC-16.
//! - **Replies** (module → master): message type 0x07 (or 0x03 for an
//!   error), module ID, D-Len, echoed command code, data, CRC-16.
//! - A reply with D-Len 2 always reports an error, warning or info
//!   condition; its single data byte is the vendor error code.
//!
//! Payload shapes are not self-describing, so responses are decoded in the
//! context of the command they answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use schunk_protocol::{encode_request, decode_response, Command, Response};
//!
//! // Build a request frame
//! let frame = encode_request(0x0B, &Command::GetState)?;
//!
//! // Parse the response
//! let reply = decode_response(0x0B, &received_data)?;
//! let state = Response::decode(&Command::GetState, &reply)?;
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use types::*;

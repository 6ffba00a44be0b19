//! Board-agnostic core of the bit-banged SDI-12 driver
//!
//! This crate contains everything that does not touch a pin:
//!
//! - Bus configuration (pin assignment and timing)
//! - Line states of the external line driver
//! - Frame encoding: 7 data bits, even parity, start/stop bits
//! - The circular receive buffer shared with the receive interrupt
//! - The outcome taxonomy of a single frame decode
//!
//! # Wire format
//!
//! ```text
//! ┌───────┬────────────────┬────────┬──────┐
//! │ START │ DATA (LSB 1st) │ PARITY │ STOP │
//! │ space │ 7 bits         │ even   │ mark │
//! └───────┴────────────────┴────────┴──────┘
//!   805 µs per bit slot, 1200 baud nominal
//! ```
//!
//! Every transaction starts with a wake sequence: a break (spacing) of at
//! least 12 ms followed by at least 8.33 ms of marking.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod frame;
pub mod line;
pub mod outcome;

pub use buffer::{BufferFull, RxBuffer, RX_BUFFER_SIZE};
pub use config::{BusConfig, BusTiming, ConfigError, PinAssignment};
pub use frame::{even_parity, Frame, FRAME_BITS};
pub use line::{LineState, UnknownLineState};
pub use outcome::EdgeOutcome;

/// ASCII line feed, the last byte of every sensor response
pub const LF: u8 = b'\n';

/// ASCII carriage return, sent just before the final line feed
pub const CR: u8 = b'\r';

#[cfg(test)]
extern crate std;

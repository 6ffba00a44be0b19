//! Bit-banged SDI-12 bus driver
//!
//! Turns four GPIO pins and an inverting tri-state line driver into an
//! SDI-12 transceiver:
//!
//! - [`Sdi12Bus`] - owns the pins, the delay provider and the line state
//! - Line state controller ([`Sdi12Bus::set_state`]) - the only code that
//!   decides pin levels, pull modes and interrupt arming
//! - Transmit encoder ([`Sdi12Bus::send_command`]) - wake sequence and
//!   framed, parity-encoded characters
//! - Receive decoder ([`Sdi12Bus::on_falling_edge`]) - runs in interrupt
//!   context, samples one frame and pushes it into the [`RxBuffer`]
//! - [`SharedBus`] and [`EdgeDispatch`] - glue between a context-free
//!   interrupt vector and the bus instance that owns the pin
//!
//! # Typical flow
//!
//! ```text
//! begin() ─▶ send_command("0M!") ─▶ [edge ISR decodes reply] ─▶ read_byte() ...
//!              wake + frames            pushes into RxBuffer      polls buffer
//! ```

#![no_std]
#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
mod log;

pub mod bus;
pub mod dispatch;
mod line;
mod receive;
pub mod shared;
mod transmit;

#[cfg(test)]
mod sim;

pub use bus::{BusPins, Sdi12Bus};
pub use dispatch::{DispatchError, EdgeDispatch};
pub use shared::{EdgeSink, SharedBus};

// Re-export the core types callers need alongside the bus
pub use sdi12_core::{
    BusConfig, BusTiming, ConfigError, EdgeOutcome, LineState, PinAssignment, RxBuffer,
    UnknownLineState,
};

#[cfg(test)]
extern crate std;

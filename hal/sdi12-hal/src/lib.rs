//! SDI-12 Hardware Abstraction Layer
//!
//! This crate defines the GPIO traits the SDI-12 driver consumes. A board
//! support crate implements them for its chip; the driver never touches
//! hardware registers itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  sdi12-driver (line states, tx, rx ISR) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sdi12-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board GPIO / EXTI implementation       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Microsecond and millisecond delays are not defined here: the driver uses
//! [`embedded_hal::delay::DelayNs`](https://docs.rs/embedded-hal) directly.
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::PullPin`] - Pull resistor configuration
//! - [`interrupt::EdgeInterrupt`] - Edge-triggered interrupt arm/disarm
//! - [`RxDataPin`] - Everything the receive data pin must support

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod interrupt;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin, Pull, PullPin};
pub use interrupt::{Edge, EdgeInterrupt};

/// Receive data pin
///
/// The pin the line driver's receive output is wired to. It is sampled by
/// the decoder, pulled up while idle, and raises the falling-edge interrupt
/// that starts each frame decode.
pub trait RxDataPin: InputPin + PullPin + EdgeInterrupt {}

// Blanket implementation
impl<T: InputPin + PullPin + EdgeInterrupt> RxDataPin for T {}

//! Receive decoder
//!
//! Runs from the falling-edge interrupt of the receive data pin and turns
//! one frame on the wire into one byte in the [`RxBuffer`](sdi12_core::RxBuffer).
//!
//! Sampling schedule after the interrupt is entered (default timing):
//!
//! ```text
//! edge ─┬─ 20 µs ─┬─ 800 ─┬─ 800 ─┬ ... ─┬─ 800 ─┬─ 650 ─┐
//!       │         │  d0   │  d1   │      │ parity│  stop │
//! ```
//!
//! The defaults assume the decoder starts a few hundred microseconds after
//! the edge; platforms with faster interrupt entry should lengthen
//! `rx_start_offset_us`.
//!
//! Faults are never retried. A bad stop bit or parity latches the sticky
//! parity error and disables the bus; every further edge is ignored until
//! `flush()` or an `end()` then `begin()` cycle clears the flag.

use embedded_hal::delay::DelayNs;
use sdi12_core::{BufferFull, EdgeOutcome, Frame, LineState};
use sdi12_hal::{OutputPin, RxDataPin};

use crate::bus::Sdi12Bus;

/// Payload slots sampled per frame: 7 data bits then the parity bit
const PAYLOAD_BITS: u8 = 8;

impl<TE, TD, RE, RD, D> Sdi12Bus<'_, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    /// Decode one frame; call from the receive pin's falling-edge interrupt
    ///
    /// Must not be re-entered and should run with other interrupts masked;
    /// [`SharedBus`](crate::SharedBus) with a critical-section mutex does
    /// both.
    pub fn on_falling_edge(&mut self) -> EdgeOutcome {
        if self.rx.has_parity_error() {
            trace!("edge ignored, parity error latched");
            return EdgeOutcome::Halted;
        }

        // A real start bit is still spacing (pin low) when we get here
        if self.pins.rx_data.is_high() {
            trace!("spurious edge");
            return EdgeOutcome::Spurious;
        }

        let timing = self.config.timing;
        self.delay.delay_us(timing.rx_start_offset_us);

        let mut payload = 0u8;
        for bit in 0..PAYLOAD_BITS {
            self.delay.delay_us(timing.rx_bit_us);
            if self.pins.rx_data.is_high() {
                payload |= 1 << bit;
            } else {
                payload &= !(1 << bit);
            }
        }

        self.delay.delay_us(timing.rx_stop_offset_us);
        if self.pins.rx_data.is_low() {
            warn!("framing error, payload {=u8:#x}", payload);
            self.latch_fault();
            return EdgeOutcome::FramingError;
        }

        let frame = Frame::from_payload(payload);
        if !frame.parity_ok() {
            warn!("parity error, payload {=u8:#x}", payload);
            self.latch_fault();
            return EdgeOutcome::ParityError(payload);
        }

        let ch = frame.data();
        match self.rx.push(ch) {
            Ok(()) => EdgeOutcome::Stored(ch),
            Err(BufferFull) => {
                warn!("receive buffer full, dropped {=u8:#x}", ch);
                EdgeOutcome::Dropped(ch)
            }
        }
    }

    /// Latch the sticky error and stop listening
    fn latch_fault(&mut self) {
        self.rx.set_parity_error();
        self.set_state(LineState::Disabled);
    }
}

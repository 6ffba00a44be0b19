//! Transmit encoder
//!
//! Wakes the sensors and bit-bangs framed characters onto the bus. The line
//! driver inverts the data pin, so a HIGH pin puts the bus at marking
//! (logic 1) and a LOW pin at spacing (logic 0).
//!
//! Everything here blocks: a command takes the wake sequence (about 24 ms)
//! plus ten bit periods per character, and there is no way to cancel it.

use embedded_hal::delay::DelayNs;
use sdi12_core::{Frame, LineState};
use sdi12_hal::{OutputPin, RxDataPin};

use crate::bus::Sdi12Bus;

impl<TE, TD, RE, RD, D> Sdi12Bus<'_, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    /// Send a break followed by marking to wake every sensor on the bus
    pub fn wake_sensors(&mut self) {
        let timing = self.config.timing;

        self.set_state(LineState::Transmitting);
        self.pins.tx_data.set_low();
        self.delay.delay_us(timing.break_us);
        self.pins.tx_data.set_high();
        self.delay.delay_us(timing.mark_us);
    }

    /// Send one character: start bit, 7 data bits, even parity, stop bit
    pub fn write_char(&mut self, ch: u8) {
        let bit_us = self.config.timing.tx_bit_us;

        for marking in Frame::new(ch).bits() {
            self.pins.tx_data.set_state(marking);
            self.delay.delay_us(bit_us);
        }
    }

    /// Wake the sensors, send `command` and hand the bus to the sensor
    ///
    /// `command` is sent as-is; any terminator is the caller's business.
    /// Returns once the bus is in [`LineState::Listening`].
    pub fn send_command(&mut self, command: &str) {
        self.wake_sensors();
        for &ch in command.as_bytes() {
            self.write_char(ch);
        }
        self.set_state(LineState::Listening);
        debug!("sent {} byte command", command.len());
    }
}

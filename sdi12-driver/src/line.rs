//! Line state controller
//!
//! The only code that decides line driver pin levels, the receive pull
//! resistor and the receive interrupt. Both output-enable inputs of the line
//! driver are active low.
//!
//! | State            | rx_enable | tx_enable | tx_data        | interrupt          |
//! |------------------|-----------|-----------|----------------|--------------------|
//! | Holding          | HIGH      | LOW       | HIGH (marking) | unchanged          |
//! | Transmitting     | HIGH      | LOW       | per bit        | unchanged          |
//! | Listening        | LOW       | HIGH      | unchanged      | unchanged          |
//! | Disabled         | HIGH      | HIGH      | unchanged      | disarmed           |
//! | InterruptEnabled | HIGH      | LOW       | HIGH (marking) | pull-up, armed     |
//!
//! The driver inverts tx_data, so "data low" on the bus in Holding means the
//! pin is driven HIGH.

use embedded_hal::delay::DelayNs;
use sdi12_core::{LineState, UnknownLineState};
use sdi12_hal::{Edge, OutputPin, Pull, RxDataPin};

use crate::bus::Sdi12Bus;

impl<TE, TD, RE, RD, D> Sdi12Bus<'_, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    /// Drive the line driver into `state`
    pub fn set_state(&mut self, state: LineState) {
        let pins = &mut self.pins;

        match state {
            LineState::Holding => {
                pins.rx_enable.set_high();
                pins.tx_data.set_high();
                pins.tx_enable.set_low();
            }
            LineState::Transmitting => {
                pins.rx_enable.set_high();
                pins.tx_enable.set_low();
            }
            LineState::Listening => {
                // Release the bus before listening to it
                pins.tx_enable.set_high();
                pins.rx_enable.set_low();
            }
            LineState::Disabled => {
                pins.rx_data.disarm();
                pins.rx_enable.set_high();
                pins.tx_enable.set_high();
            }
            LineState::InterruptEnabled => {
                pins.rx_data.set_pull(Pull::Up);
                pins.rx_data.arm(Edge::Falling);
                self.delay.delay_ms(self.config.timing.settle_ms);
                pins.rx_enable.set_high();
                pins.tx_data.set_high();
                pins.tx_enable.set_low();
            }
        }

        trace!("line state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Drive the line driver into the state with raw code `raw`
    ///
    /// An unknown code is reported and leaves every pin untouched.
    pub fn set_state_raw(&mut self, raw: u8) -> Result<(), UnknownLineState> {
        match LineState::try_from(raw) {
            Ok(state) => {
                self.set_state(state);
                Ok(())
            }
            Err(e) => {
                error!("unknown line state code {}", raw);
                Err(e)
            }
        }
    }
}

//! SDI-12 bus controller
//!
//! One [`Sdi12Bus`] owns the four line driver pins, the delay provider and
//! the current [`LineState`]. Received characters live in an [`RxBuffer`]
//! borrowed from the caller, so ordinary code can poll it without going
//! through the bus while the receive interrupt owns the bus.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use sdi12_core::{BusConfig, ConfigError, LineState, RxBuffer, RX_BUFFER_SIZE};
use sdi12_hal::{OutputPin, RxDataPin};

/// The four line driver connections
#[derive(Debug)]
pub struct BusPins<TE, TD, RE, RD> {
    /// Transmit output enable (active low)
    pub tx_enable: TE,
    /// Transmit data; HIGH puts the bus at marking
    pub tx_data: TD,
    /// Receive output enable (active low)
    pub rx_enable: RE,
    /// Receive data and interrupt source; HIGH reads as marking
    pub rx_data: RD,
}

/// Software SDI-12 transceiver
///
/// Dropping the bus puts it in [`LineState::Disabled`]; the receive buffer
/// keeps its contents.
pub struct Sdi12Bus<'a, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    pub(crate) pins: BusPins<TE, TD, RE, RD>,
    pub(crate) delay: D,
    pub(crate) config: BusConfig,
    pub(crate) rx: &'a RxBuffer,
    pub(crate) state: LineState,
}

impl<'a, TE, TD, RE, RD, D> Sdi12Bus<'a, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    /// Create a bus controller
    ///
    /// Empties `rx` and clears both error flags. No pin is touched until
    /// [`begin`](Self::begin).
    pub fn new(
        pins: BusPins<TE, TD, RE, RD>,
        delay: D,
        config: BusConfig,
        rx: &'a RxBuffer,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        rx.flush();

        Ok(Self {
            pins,
            delay,
            config,
            rx,
            state: LineState::Disabled,
        })
    }

    /// Arm the receive interrupt and settle the idle line
    ///
    /// Clears a latched parity error, so `end()` then `begin()` restarts
    /// reception after a fault. Buffered characters are kept.
    ///
    /// The pull-up reconfiguration may fire the interrupt once or twice;
    /// the decoder discards those edges because the line reads high.
    pub fn begin(&mut self) {
        if self.rx.has_parity_error() {
            debug!("clearing latched parity error");
            self.rx.clear_parity_error();
        }
        self.set_state(LineState::InterruptEnabled);
    }

    /// Disarm the receive interrupt and release the bus
    ///
    /// Buffered characters stay available.
    pub fn end(&mut self) {
        self.set_state(LineState::Disabled);
    }

    /// Put the bus back into a known-safe holding state
    ///
    /// Use after an aborted or garbled exchange.
    pub fn force_hold(&mut self) {
        self.set_state(LineState::Holding);
    }

    /// Currently active line state
    pub fn line_state(&self) -> LineState {
        self.state
    }

    /// Configuration this bus was built with
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// The receive buffer shared with the interrupt
    pub fn buffer(&self) -> &'a RxBuffer {
        self.rx
    }

    /// Number of received characters, or `None` after an overflow
    pub fn bytes_available(&self) -> Option<usize> {
        self.rx.available()
    }

    /// Oldest received character, left in the buffer
    pub fn peek_byte(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Consume the oldest received character
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rx.read()
    }

    /// Check if the newest received character is a line feed
    pub fn ends_with_line_feed(&self) -> bool {
        self.rx.ends_with_line_feed()
    }

    /// Check if the character before the newest is a carriage return
    pub fn ends_with_carriage_return_before_last(&self) -> bool {
        self.rx.ends_with_carriage_return_before_last()
    }

    /// Drain a complete response line once its line feed has arrived
    pub fn take_line(&mut self) -> Option<Vec<u8, RX_BUFFER_SIZE>> {
        self.rx.take_line()
    }

    /// Discard received characters and clear both error flags
    ///
    /// Clearing the parity error lets the decoder run again; the interrupt
    /// itself is only re-armed by [`begin`](Self::begin).
    pub fn flush(&mut self) {
        self.rx.flush();
    }

    /// Skip up to `n` received characters, returning how many were skipped
    pub fn advance_head(&mut self, n: usize) -> usize {
        self.rx.advance_head(n)
    }

    /// Sticky buffer overflow flag
    pub fn has_overflowed(&self) -> bool {
        self.rx.has_overflowed()
    }

    /// Sticky parity/framing error flag
    pub fn has_parity_error(&self) -> bool {
        self.rx.has_parity_error()
    }
}

impl<TE, TD, RE, RD, D> Drop for Sdi12Bus<'_, TE, TD, RE, RD, D>
where
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    fn drop(&mut self) {
        self.set_state(LineState::Disabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{self, PinId, Wire};
    use sdi12_core::{EdgeOutcome, PinAssignment};

    #[test]
    fn test_new_resets_buffer_and_flags() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        rx.push(b'x').unwrap();
        rx.set_parity_error();

        let bus = sim::bus(&wire, &rx);
        assert_eq!(bus.bytes_available(), Some(0));
        assert!(!bus.has_parity_error());
        assert!(!bus.has_overflowed());
        assert_eq!(bus.line_state(), LineState::Disabled);
        // Construction leaves the pins alone
        assert!(wire.borrow().writes.is_empty());
    }

    #[test]
    fn test_new_rejects_duplicate_pins() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        let (pins, delay) = sim::pins(&wire);
        let config = BusConfig::new(PinAssignment::new(4, 4, 27, 22));

        let result = Sdi12Bus::new(pins, delay, config, &rx);
        assert!(matches!(result, Err(ConfigError::DuplicatePin(4))));
    }

    #[test]
    fn test_begin_tolerates_spurious_edges() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        let mut bus = sim::bus(&wire, &rx);

        bus.begin();
        assert_eq!(bus.line_state(), LineState::InterruptEnabled);

        // Pull reconfiguration artifact: two edges while the line idles high
        assert_eq!(bus.on_falling_edge(), EdgeOutcome::Spurious);
        assert_eq!(bus.on_falling_edge(), EdgeOutcome::Spurious);
        assert_eq!(bus.bytes_available(), Some(0));
        assert!(!bus.has_parity_error());
        assert!(!bus.has_overflowed());
    }

    #[test]
    fn test_end_keeps_buffered_data() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        let mut bus = sim::bus(&wire, &rx);

        bus.begin();
        sim::receive(&wire, &mut bus, b"0\r\n", 805);
        bus.end();

        assert_eq!(bus.line_state(), LineState::Disabled);
        assert!(wire.borrow().armed.is_none());
        assert_eq!(bus.bytes_available(), Some(3));
        assert!(bus.ends_with_line_feed());
        assert!(bus.ends_with_carriage_return_before_last());
    }

    #[test]
    fn test_drop_disables_bus() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        {
            let mut bus = sim::bus(&wire, &rx);
            bus.begin();
            assert!(wire.borrow().armed.is_some());
        }
        let wire = wire.borrow();
        assert!(wire.armed.is_none());
        assert!(wire.level(PinId::TxEnable));
        assert!(wire.level(PinId::RxEnable));
    }

    #[test]
    fn test_accessors_delegate_to_buffer() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        let mut bus = sim::bus(&wire, &rx);
        bus.begin();
        sim::receive(&wire, &mut bus, b"0+12\r\n", 805);

        assert_eq!(bus.peek_byte(), Some(b'0'));
        assert_eq!(bus.advance_head(1), 1);
        assert_eq!(bus.read_byte(), Some(b'+'));
        assert_eq!(bus.take_line().unwrap().as_slice(), b"12\r\n");
        assert_eq!(bus.read_byte(), None);

        // The same buffer is reachable without the bus
        assert!(core::ptr::eq(bus.buffer(), &rx));
    }

    #[test]
    fn test_flush_clears_state() {
        let wire = Wire::new();
        let rx = RxBuffer::new();
        let mut bus = sim::bus(&wire, &rx);
        bus.begin();
        sim::receive(&wire, &mut bus, b"013", 805);
        rx.set_parity_error();

        bus.flush();
        assert_eq!(bus.bytes_available(), Some(0));
        assert_eq!(bus.peek_byte(), None);
        assert!(!bus.has_overflowed());
        assert!(!bus.has_parity_error());
    }
}

//! Result of handling one receive-pin falling edge
//!
//! The receive path runs in interrupt context and cannot hand errors to a
//! caller. Faults are latched as sticky flags in the receive buffer; this
//! value only tells the interrupt glue (and tests) what happened.

/// What a single falling edge turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// A character was decoded and stored
    Stored(u8),
    /// A character was decoded but the buffer was full; overflow latched
    Dropped(u8),
    /// The line was already back high: noise or a pull-resistor artifact
    Spurious,
    /// The sticky parity error is set, so decoding is suspended
    Halted,
    /// The stop bit read as spacing; bus disabled
    FramingError,
    /// Data and parity bit disagree; bus disabled. Holds the raw payload
    ParityError(u8),
}

impl EdgeOutcome {
    /// Check if this edge latched a fault that disabled the bus
    pub fn is_fault(&self) -> bool {
        matches!(self, EdgeOutcome::FramingError | EdgeOutcome::ParityError(_))
    }

    /// The decoded character, if one was stored
    pub fn stored(&self) -> Option<u8> {
        match self {
            EdgeOutcome::Stored(ch) => Some(*ch),
            _ => None,
        }
    }
}

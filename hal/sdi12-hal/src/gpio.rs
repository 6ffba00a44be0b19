//! Pin traits for the line driver connections
//!
//! Three outputs steer the line driver (both enables and the transmit
//! data); one input carries the received data back.

/// Push-pull output wired to the line driver
///
/// Writes are infallible: a bit-banged frame cannot be retried after a
/// failed write halfway through, so a board crate that can fail must
/// decide for itself how to report it.
pub trait OutputPin {
    /// Drive the pin to the supply rail
    fn set_high(&mut self);

    /// Drive the pin to ground
    fn set_low(&mut self);

    /// Drive the pin high when `high` is set, low otherwise
    ///
    /// The transmit encoder writes each frame slot through this.
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Last level written
    fn is_set_high(&self) -> bool;

    /// Check if the last level written was low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Input sampled by the receive decoder
///
/// Reads must be cheap enough to call from an interrupt handler.
pub trait InputPin {
    /// Check if the pin reads high (bus at marking)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (bus at spacing)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Internal pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pull towards the supply rail; holds the idle line at marking
    Up,
    /// Pull towards ground
    Down,
}

/// Input pin with a configurable pull resistor
pub trait PullPin {
    /// Select the pull resistor
    ///
    /// On some platforms reconfiguring the pull resistor while an edge
    /// interrupt is armed fires that interrupt spuriously. Callers must
    /// tolerate this.
    fn set_pull(&mut self, pull: Pull);
}

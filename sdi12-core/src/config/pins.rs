//! Pin assignment for the external line driver

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// GPIO numbers of the four connections to the line driver
///
/// ```text
///            ┌──────────────┐
/// tx_data ──▶│ 2A   ▷o  2Y  │──┐
/// tx_enable ▶│ 2OE          │  ├── SDI-12 data line
/// rx_data ◀──│ 1Y   o◁  1A  │◀─┘
/// rx_enable ▶│ 1OE          │
///            └──────────────┘
/// ```
///
/// Both output-enable inputs are active low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinAssignment {
    /// Output enable of the transmit buffer
    pub tx_enable: u8,
    /// Input of the transmit buffer
    pub tx_data: u8,
    /// Output enable of the receive buffer
    pub rx_enable: u8,
    /// Output of the receive buffer, also the interrupt source
    pub rx_data: u8,
}

impl PinAssignment {
    /// Create a pin assignment
    pub const fn new(tx_enable: u8, tx_data: u8, rx_enable: u8, rx_data: u8) -> Self {
        Self {
            tx_enable,
            tx_data,
            rx_enable,
            rx_data,
        }
    }

    /// All four pins in declaration order
    pub const fn as_array(&self) -> [u8; 4] {
        [self.tx_enable, self.tx_data, self.rx_enable, self.rx_data]
    }

    /// Reject assignments where two roles share one GPIO
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.as_array();
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
        }
        Ok(())
    }
}

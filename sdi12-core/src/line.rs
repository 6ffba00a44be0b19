//! Line states of the external line driver
//!
//! Exactly one state is active for a bus at any time. Transitions are
//! explicit and only the driver's line state controller performs them.
//!
//! ```text
//! InterruptEnabled ─▶ Transmitting ─▶ Listening ─▶ Transmitting ─▶ ... ─▶ Disabled
//!                          ▲                              │
//!                          └───────── Holding ◀───────────┘ (forced after an abort)
//! ```

/// Line driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LineState {
    /// Both buffers released, receive interrupt disarmed
    Disabled = 0,
    /// Bus actively held at marking, safe default before a transaction
    Holding = 1,
    /// Bus driven with outgoing bits
    Transmitting = 2,
    /// Bus released to the sensor, receive buffer enabled
    Listening = 3,
    /// Receive pin pulled up and its falling-edge interrupt armed
    InterruptEnabled = 4,
}

/// A raw state code that does not name any [`LineState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownLineState(pub u8);

impl LineState {
    /// Check if the transmit buffer drives the bus in this state
    pub fn tx_driving(&self) -> bool {
        matches!(
            self,
            LineState::Holding | LineState::Transmitting | LineState::InterruptEnabled
        )
    }

    /// Check if the receive buffer forwards the bus in this state
    pub fn rx_enabled(&self) -> bool {
        matches!(self, LineState::Listening)
    }
}

impl TryFrom<u8> for LineState {
    type Error = UnknownLineState;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(LineState::Disabled),
            1 => Ok(LineState::Holding),
            2 => Ok(LineState::Transmitting),
            3 => Ok(LineState::Listening),
            4 => Ok(LineState::InterruptEnabled),
            other => Err(UnknownLineState(other)),
        }
    }
}

impl From<LineState> for u8 {
    fn from(state: LineState) -> Self {
        state as u8
    }
}

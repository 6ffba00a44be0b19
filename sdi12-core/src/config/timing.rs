//! Bus timing
//!
//! All durations are in microseconds unless the field name says otherwise.
//! The defaults were measured against real sensors: nominal 1200 baud is an
//! 833 µs bit, but delay call overhead makes 805 µs the right busy-wait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timing of the wake sequence and of both bit streams
///
/// The receive offsets assume the decoder starts a few hundred microseconds
/// after the falling edge. With near-zero interrupt latency raise
/// `rx_start_offset_us` towards half a bit period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusTiming {
    /// Break (spacing) held to wake sensors, at least 12 ms
    pub break_us: u32,
    /// Marking after the break, at least 8.33 ms and well under 100 ms
    pub mark_us: u32,
    /// Transmit bit period
    pub tx_bit_us: u32,
    /// Delay after the falling edge before the first bit period
    pub rx_start_offset_us: u32,
    /// Receive bit period between samples
    pub rx_bit_us: u32,
    /// Delay from the parity sample to the stop bit sample
    pub rx_stop_offset_us: u32,
    /// Settle time after arming the receive interrupt (milliseconds)
    pub settle_ms: u32,
}

impl BusTiming {
    /// Standard SDI-12 timing
    pub const STANDARD: Self = Self {
        break_us: 14_161,
        mark_us: 10_000,
        tx_bit_us: 805,
        rx_start_offset_us: 20,
        rx_bit_us: 800,
        rx_stop_offset_us: 650,
        settle_ms: 1,
    };

    /// Duration of the break plus mark wake sequence
    pub const fn wake_us(&self) -> u32 {
        self.break_us + self.mark_us
    }

    /// Time to transmit `chars` framed characters after the wake sequence
    pub const fn command_us(&self, chars: u32) -> u32 {
        self.wake_us() + chars * crate::frame::FRAME_BITS as u32 * self.tx_bit_us
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::STANDARD
    }
}

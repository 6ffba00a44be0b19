//! Character framing for the SDI-12 wire format.
//!
//! Frame format (10 bit slots, least significant data bit first):
//! - START (1 bit): spacing
//! - DATA (7 bits): 7-bit ASCII
//! - PARITY (1 bit): even parity over the data bits
//! - STOP (1 bit): marking
//!
//! Bits are logical here: `true` is marking (logic 1), `false` is spacing.
//! Mapping to pin levels is the driver's concern.

/// Bit slots per character frame
pub const FRAME_BITS: usize = 10;

/// Parity of every 4-bit value packed into one word: bit `n` is the parity of `n`
const NIBBLE_PARITY: u16 = 0x6996;

/// Even-parity bit for `byte`
///
/// Returns 1 when `byte` has an odd number of set bits, so that appending
/// the result makes the total even. The two nibbles are folded together
/// with XOR, which preserves parity, and the 4-bit remainder is looked up.
pub const fn even_parity(byte: u8) -> u8 {
    let folded = (byte ^ (byte >> 4)) & 0x0F;
    ((NIBBLE_PARITY >> folded) & 1) as u8
}

/// One character frame
///
/// Holds the 8-bit payload: 7 data bits with the parity bit in bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    payload: u8,
}

impl Frame {
    /// Frame a character, computing its parity bit
    ///
    /// SDI-12 is 7-bit ASCII; bit 7 of `ch` is discarded.
    pub const fn new(ch: u8) -> Self {
        let data = ch & 0x7F;
        Self {
            payload: data | (even_parity(data) << 7),
        }
    }

    /// Wrap a payload as sampled off the wire, parity bit included
    pub const fn from_payload(payload: u8) -> Self {
        Self { payload }
    }

    /// Data bits plus parity bit, as sent between start and stop
    pub const fn payload(&self) -> u8 {
        self.payload
    }

    /// The 7-bit character
    pub const fn data(&self) -> u8 {
        self.payload & 0x7F
    }

    /// The parity bit
    pub const fn parity_bit(&self) -> bool {
        self.payload & 0x80 != 0
    }

    /// Check that data and parity bit together hold an even number of ones
    pub const fn parity_ok(&self) -> bool {
        even_parity(self.payload) == 0
    }

    /// Logical level of bit slot `slot` (0 = start, 9 = stop)
    pub const fn bit(&self, slot: usize) -> bool {
        match slot {
            0 => false,
            1..=8 => (self.payload >> (slot - 1)) & 1 != 0,
            _ => true,
        }
    }

    /// All ten bit slots in transmission order
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let frame = *self;
        (0..FRAME_BITS).map(move |slot| frame.bit(slot))
    }
}

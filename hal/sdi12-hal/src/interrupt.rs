//! Edge interrupt abstractions
//!
//! The driver only arms and disarms the interrupt. Routing the hardware
//! vector to the driver's handler is the board crate's job (see
//! `sdi12_driver::dispatch`).

/// Signal edge that triggers the interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// High to low transition
    Falling,
    /// Low to high transition
    Rising,
    /// Either transition
    Both,
}

/// Pin able to raise an edge-triggered interrupt
pub trait EdgeInterrupt {
    /// Enable interrupt generation on the given edge
    ///
    /// Any edge latched before arming should be discarded by the
    /// implementation where the hardware allows it.
    fn arm(&mut self, edge: Edge);

    /// Stop generating interrupts
    ///
    /// Must be callable from inside the interrupt handler itself.
    fn disarm(&mut self);

    /// Check if the interrupt is currently armed
    fn is_armed(&self) -> bool;
}

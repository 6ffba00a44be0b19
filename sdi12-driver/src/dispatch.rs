//! Interrupt dispatch table
//!
//! Most platforms give one context-free handler for all GPIO edge
//! interrupts. [`EdgeDispatch`] maps the receive pin that fired to the bus
//! that owns it, so several buses can share that vector.
//!
//! Sinks must be `Sync` so the table can live in a `static`. Keep it behind
//! a blocking mutex, fill it during setup, then only read it from the
//! handler:
//!
//! ```ignore
//! static BUS_A: SharedBus<CriticalSectionRawMutex, BusA> = SharedBus::new();
//! static DISPATCH: Mutex<CriticalSectionRawMutex, RefCell<EdgeDispatch<'static, 4>>> =
//!     Mutex::new(RefCell::new(EdgeDispatch::new()));
//!
//! DISPATCH.lock(|table| table.borrow_mut().register(22, &BUS_A))?;
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     for pin in pending_falling_edges() {
//!         DISPATCH.lock(|table| table.borrow().dispatch(pin));
//!     }
//! }
//! ```

use heapless::Vec;
use sdi12_core::EdgeOutcome;

use crate::shared::EdgeSink;

/// Errors from registering a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// No free slot left in the table
    TableFull,
    /// Another sink is already registered for this pin
    DuplicatePin(u8),
}

/// Fixed-capacity map from receive pin number to edge sink
pub struct EdgeDispatch<'a, const N: usize> {
    routes: Vec<(u8, &'a (dyn EdgeSink + Sync)), N>,
}

impl<const N: usize> Default for EdgeDispatch<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> EdgeDispatch<'a, N> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Route falling edges on `rx_pin` to `sink`
    pub fn register(
        &mut self,
        rx_pin: u8,
        sink: &'a (dyn EdgeSink + Sync),
    ) -> Result<(), DispatchError> {
        if self.routes.iter().any(|(pin, _)| *pin == rx_pin) {
            return Err(DispatchError::DuplicatePin(rx_pin));
        }
        self.routes
            .push((rx_pin, sink))
            .map_err(|_| DispatchError::TableFull)
    }

    /// Remove the route for `rx_pin`, returning whether one existed
    pub fn unregister(&mut self, rx_pin: u8) -> bool {
        match self.routes.iter().position(|(pin, _)| *pin == rx_pin) {
            Some(index) => {
                self.routes.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver a falling edge on `rx_pin`
    ///
    /// Returns `None` for pins with no route or whose bus is unavailable.
    pub fn dispatch(&self, rx_pin: u8) -> Option<EdgeOutcome> {
        let (_, sink) = self.routes.iter().find(|(pin, _)| *pin == rx_pin)?;
        sink.on_falling_edge()
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if no routes are registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

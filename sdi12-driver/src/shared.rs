//! Sharing one bus between ordinary code and its receive interrupt
//!
//! Interrupt vectors take no context, so the bus has to live somewhere both
//! sides can reach. [`SharedBus`] keeps it behind an `embassy-sync` blocking
//! mutex:
//!
//! - Ordinary code calls [`SharedBus::with`] to change state or send commands.
//! - The interrupt handler calls [`EdgeSink::on_falling_edge`].
//!
//! With `CriticalSectionRawMutex` the lock masks interrupts, so a frame
//! decode is never preempted and never overlaps a transmission. Polling the
//! receive buffer does not need the lock at all: keep the `RxBuffer` in its
//! own `static` and read it directly.
//!
//! # Interrupt latency while transmitting
//!
//! `send_command` inside [`with`](SharedBus::with) masks every interrupt for
//! the whole wake sequence and all frames: about 24 ms plus 8 ms per
//! character. When other interrupts cannot wait that long, [`take`] the bus
//! out of the slot, transmit without the lock and [`install`] it again. Edges
//! arriving meanwhile return `None`; none are expected since the receiver
//! is disabled while transmitting.
//!
//! [`take`]: SharedBus::take
//! [`install`]: SharedBus::install
//!
//! ```ignore
//! static RX: RxBuffer = RxBuffer::new();
//! static BUS: SharedBus<CriticalSectionRawMutex, Bus> = SharedBus::new();
//!
//! let _ = BUS.install(Sdi12Bus::new(pins, delay, config, &RX)?);
//! BUS.with(|bus| bus.begin());
//!
//! if let Some(mut bus) = BUS.take() {
//!     bus.send_command("0M!");
//!     let _ = BUS.install(bus);
//! }
//! // ... later
//! if RX.ends_with_line_feed() { let line = RX.take_line(); }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use sdi12_core::EdgeOutcome;
use sdi12_hal::{OutputPin, RxDataPin};

use crate::bus::Sdi12Bus;

/// Something that consumes receive-pin falling edges
pub trait EdgeSink {
    /// Handle one falling edge
    ///
    /// Returns `None` when no bus was there to take it.
    fn on_falling_edge(&self) -> Option<EdgeOutcome>;
}

/// A bus reachable from both execution contexts
pub struct SharedBus<M: RawMutex, B> {
    inner: Mutex<M, RefCell<Option<B>>>,
}

impl<M: RawMutex, B> Default for SharedBus<M, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, B> SharedBus<M, B> {
    /// Create an empty slot, usable in a `static`
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Place a bus in the slot, returning any previous one
    ///
    /// Called from inside [`with`](Self::with) the slot is in use and the
    /// bus is handed back as `Err`.
    pub fn install(&self, bus: B) -> Result<Option<B>, B> {
        self.inner.lock(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => Ok(slot.replace(bus)),
            Err(_) => Err(bus),
        })
    }

    /// Remove the bus from the slot
    ///
    /// Returns `None` when called from inside [`with`](Self::with).
    pub fn take(&self) -> Option<B> {
        self.inner
            .lock(|cell| cell.try_borrow_mut().ok().and_then(|mut slot| slot.take()))
    }

    /// Check if a bus is installed
    pub fn is_installed(&self) -> bool {
        self.inner
            .lock(|cell| cell.try_borrow().map_or(true, |slot| slot.is_some()))
    }

    /// Run `f` with exclusive access to the bus
    ///
    /// Returns `None` if no bus is installed or the bus is already in use
    /// further up the stack (an edge arriving while the lock is held by a
    /// mutex that does not mask interrupts).
    pub fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        self.inner
            .lock(|cell| cell.try_borrow_mut().ok()?.as_mut().map(f))
    }
}

impl<M, TE, TD, RE, RD, D> EdgeSink for SharedBus<M, Sdi12Bus<'_, TE, TD, RE, RD, D>>
where
    M: RawMutex,
    TE: OutputPin,
    TD: OutputPin,
    RE: OutputPin,
    RD: RxDataPin,
    D: DelayNs,
{
    fn on_falling_edge(&self) -> Option<EdgeOutcome> {
        let outcome = self.with(|bus| bus.on_falling_edge());
        if outcome.is_none() {
            trace!("edge with no bus available");
        }
        outcome
    }
}

//! Simulated bus hardware for unit tests
//!
//! A virtual microsecond clock advanced only by the delay provider, a log of
//! every output pin write, and a scripted receive waveform.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use sdi12_core::{BusConfig, Frame, PinAssignment, RxBuffer};
use sdi12_hal::{Edge, EdgeInterrupt, InputPin, OutputPin, Pull, PullPin};

use crate::bus::{BusPins, Sdi12Bus};

/// Delay between a falling edge and the decoder starting to run
///
/// The default receive timing is calibrated for a few hundred microseconds
/// of interrupt latency. At 600 µs every sample lands inside its slot for
/// both 805 µs and nominal 833 µs senders.
pub const EDGE_LATENCY_US: u64 = 600;

/// Output pins of the line driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinId {
    TxEnable,
    TxData,
    RxEnable,
}

impl PinId {
    fn index(self) -> usize {
        match self {
            PinId::TxEnable => 0,
            PinId::TxData => 1,
            PinId::RxEnable => 2,
        }
    }
}

/// One recorded pin write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub at_us: u64,
    pub pin: PinId,
    pub high: bool,
}

/// Shared state of the simulated hardware
#[derive(Debug)]
pub struct Wire {
    now_ns: u64,
    pub writes: Vec<Write>,
    levels: [bool; 3],
    /// Receive line transitions; the line idles high before the first one
    rx_edges: Vec<(u64, bool)>,
    pub pulls: Vec<Pull>,
    pub armed: Option<Edge>,
    pub arm_count: usize,
    pub disarm_count: usize,
}

/// Shared handle to the simulated hardware
///
/// Backed by a mutex so the simulated pins are `Send`, which a bus needs to
/// sit in a `Sync` [`SharedBus`](crate::SharedBus).
#[derive(Debug, Clone)]
pub struct WireRef(Arc<Mutex<Wire>>);

impl WireRef {
    pub fn borrow(&self) -> MutexGuard<'_, Wire> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn borrow_mut(&self) -> MutexGuard<'_, Wire> {
        self.borrow()
    }
}

impl Wire {
    pub fn new() -> WireRef {
        WireRef(Arc::new(Mutex::new(Self {
            now_ns: 0,
            writes: Vec::new(),
            levels: [false; 3],
            rx_edges: Vec::new(),
            pulls: Vec::new(),
            armed: None,
            arm_count: 0,
            disarm_count: 0,
        })))
    }

    pub fn now_us(&self) -> u64 {
        self.now_ns / 1_000
    }

    /// Jump the clock forward to `at_us`
    pub fn advance_to(&mut self, at_us: u64) {
        assert!(at_us >= self.now_us(), "clock cannot run backwards");
        self.now_ns = at_us * 1_000;
    }

    pub fn level(&self, pin: PinId) -> bool {
        self.levels[pin.index()]
    }

    /// Writes to one pin as (time, level) pairs
    pub fn writes_to(&self, pin: PinId) -> Vec<(u64, bool)> {
        self.writes
            .iter()
            .filter(|w| w.pin == pin)
            .map(|w| (w.at_us, w.high))
            .collect()
    }

    /// Current level of the receive data pin
    pub fn rx_level(&self) -> bool {
        let now = self.now_us();
        self.rx_edges
            .iter()
            .rev()
            .find(|(at, _)| *at <= now)
            .map(|(_, high)| *high)
            .unwrap_or(true)
    }

    /// Drive the receive pin with logical bit slots starting at `start_us`
    ///
    /// The line returns to idle (high) after the last slot. Returns the end
    /// time of the last slot.
    pub fn schedule_bits(
        &mut self,
        start_us: u64,
        bits: impl IntoIterator<Item = bool>,
        bit_us: u64,
    ) -> u64 {
        if let Some((last, _)) = self.rx_edges.last() {
            assert!(start_us >= *last, "waveform must be scheduled in order");
        }
        let mut at = start_us;
        for bit in bits {
            self.rx_edges.push((at, bit));
            at += bit_us;
        }
        self.rx_edges.push((at, true));
        at
    }

    /// Drive one well-formed character frame
    pub fn schedule_char(&mut self, start_us: u64, ch: u8, bit_us: u64) -> u64 {
        self.schedule_bits(start_us, Frame::new(ch).bits(), bit_us)
    }

    fn write(&mut self, pin: PinId, high: bool) {
        let at_us = self.now_us();
        self.levels[pin.index()] = high;
        self.writes.push(Write { at_us, pin, high });
    }
}

pub struct SimPin {
    id: PinId,
    wire: WireRef,
}

impl OutputPin for SimPin {
    fn set_high(&mut self) {
        self.wire.borrow_mut().write(self.id, true);
    }

    fn set_low(&mut self) {
        self.wire.borrow_mut().write(self.id, false);
    }

    fn is_set_high(&self) -> bool {
        self.wire.borrow().level(self.id)
    }
}

pub struct SimRx {
    wire: WireRef,
}

impl InputPin for SimRx {
    fn is_high(&self) -> bool {
        self.wire.borrow().rx_level()
    }
}

impl PullPin for SimRx {
    fn set_pull(&mut self, pull: Pull) {
        self.wire.borrow_mut().pulls.push(pull);
    }
}

impl EdgeInterrupt for SimRx {
    fn arm(&mut self, edge: Edge) {
        let mut wire = self.wire.borrow_mut();
        wire.armed = Some(edge);
        wire.arm_count += 1;
    }

    fn disarm(&mut self) {
        let mut wire = self.wire.borrow_mut();
        wire.armed = None;
        wire.disarm_count += 1;
    }

    fn is_armed(&self) -> bool {
        self.wire.borrow().armed.is_some()
    }
}

pub struct SimDelay {
    wire: WireRef,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wire.borrow_mut().now_ns += ns as u64;
    }
}

pub type SimBus<'a> = Sdi12Bus<'a, SimPin, SimPin, SimPin, SimRx, SimDelay>;

pub fn config() -> BusConfig {
    BusConfig::new(PinAssignment::new(4, 17, 27, 22))
}

pub fn pins(wire: &WireRef) -> (BusPins<SimPin, SimPin, SimPin, SimRx>, SimDelay) {
    let pin = |id| SimPin {
        id,
        wire: wire.clone(),
    };
    let pins = BusPins {
        tx_enable: pin(PinId::TxEnable),
        tx_data: pin(PinId::TxData),
        rx_enable: pin(PinId::RxEnable),
        rx_data: SimRx { wire: wire.clone() },
    };
    (pins, SimDelay { wire: wire.clone() })
}

/// A bus on simulated hardware with the standard configuration
pub fn bus<'a>(wire: &WireRef, rx: &'a RxBuffer) -> SimBus<'a> {
    let (pins, delay) = pins(wire);
    match Sdi12Bus::new(pins, delay, config(), rx) {
        Ok(bus) => bus,
        Err(e) => panic!("simulated config rejected: {:?}", e),
    }
}

/// Play `chars` onto the receive line and run the decoder for each frame
///
/// Frames use `bit_us` slots separated by one idle bit; the decoder runs
/// [`EDGE_LATENCY_US`] after each falling edge.
pub fn receive(
    wire: &WireRef,
    bus: &mut SimBus<'_>,
    chars: &[u8],
    bit_us: u64,
) -> Vec<sdi12_core::EdgeOutcome> {
    let mut outcomes = Vec::new();
    for &ch in chars {
        let start = wire.borrow().now_us() + bit_us;
        wire.borrow_mut().schedule_char(start, ch, bit_us);
        let end = start + 10 * bit_us;
        wire.borrow_mut().advance_to(start + EDGE_LATENCY_US);
        outcomes.push(bus.on_falling_edge());
        wire.borrow_mut().advance_to(end);
    }
    outcomes
}

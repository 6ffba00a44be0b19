//! Circular receive buffer
//!
//! Single-producer/single-consumer byte ring shared between the receive
//! interrupt and ordinary code, without locks.
//!
//! # Ownership of each field
//!
//! | Field | Writer | Reader |
//! |---|---|---|
//! | `tail`, slots | interrupt (`push`) | both |
//! | `head` | ordinary code (`read`, `advance_head`) | both |
//! | `overflow` | interrupt sets, `read` clears | ordinary code |
//! | `parity_error` | interrupt sets, `flush` and `clear_parity_error` clear | both |
//!
//! `flush` rewinds both indices and must not race the interrupt: call it
//! with the interrupt disarmed or from under the bus lock.
//!
//! Indices are single machine words advanced with plain atomic stores, so a
//! reader never observes a torn index. Only atomic `load`/`store` are used,
//! which keeps the ring usable on cores without compare-and-swap
//! (Cortex-M0+).

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use heapless::Vec;

use crate::{CR, LF};

/// Slots in the receive ring; one is kept free, so 74 bytes fit
pub const RX_BUFFER_SIZE: usize = 75;

/// The ring was full and the byte was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferFull;

/// Fixed-capacity receive ring with sticky error status
///
/// `head == tail` means empty. One slot always stays unused so that a full
/// ring is distinguishable from an empty one; usable capacity is `N - 1`.
#[derive(Debug)]
pub struct RxBuffer<const N: usize = RX_BUFFER_SIZE> {
    slots: [AtomicU8; N],
    /// Index of the oldest stored byte
    head: AtomicUsize,
    /// Index one past the newest stored byte
    tail: AtomicUsize,
    overflow: AtomicBool,
    parity_error: AtomicBool,
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxBuffer<N> {
    /// Create an empty buffer with both error flags clear
    ///
    /// Usable in a `static`.
    pub const fn new() -> Self {
        assert!(N >= 2, "receive buffer needs at least two slots");

        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overflow: AtomicBool::new(false),
            parity_error: AtomicBool::new(false),
        }
    }

    /// Number of bytes the ring can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    // --- Producer side (receive interrupt) ---

    /// Append a byte
    ///
    /// When the ring is full the byte is discarded and the sticky overflow
    /// flag is set.
    pub fn push(&self, byte: u8) -> Result<(), BufferFull> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) % N;

        if next == self.head.load(Ordering::Acquire) {
            self.overflow.store(true, Ordering::Relaxed);
            return Err(BufferFull);
        }

        self.slots[tail].store(byte, Ordering::Relaxed);
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Latch the parity/framing error flag
    pub fn set_parity_error(&self) {
        self.parity_error.store(true, Ordering::Release);
    }

    // --- Consumer side (ordinary code) ---

    /// Number of stored bytes, regardless of the overflow flag
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Relaxed);
        (tail + N - head) % N
    }

    /// Check if no bytes are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored bytes, or `None` while the overflow flag is set
    ///
    /// After an overflow the contents are missing at least one byte, so the
    /// count is withheld until the next successful [`read`](Self::read).
    pub fn available(&self) -> Option<usize> {
        if self.has_overflowed() {
            return None;
        }
        Some(self.len())
    }

    /// Oldest byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }
        Some(self.slots[head].load(Ordering::Relaxed))
    }

    /// Consume the oldest byte
    ///
    /// A successful read clears the overflow flag: it frees a slot but does
    /// not bring back the byte that was dropped.
    pub fn read(&self) -> Option<u8> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[head].load(Ordering::Relaxed);
        self.head.store((head + 1) % N, Ordering::Release);
        self.overflow.store(false, Ordering::Relaxed);
        Some(byte)
    }

    /// Skip up to `n` stored bytes without reading them
    ///
    /// Wraps like [`read`](Self::read) and never moves the head past the
    /// tail. Returns the number of bytes skipped.
    pub fn advance_head(&self, n: usize) -> usize {
        let skipped = n.min(self.len());
        let head = self.head.load(Ordering::Relaxed);
        self.head.store((head + skipped) % N, Ordering::Release);
        skipped
    }

    /// Drop all contents and clear both error flags
    pub fn flush(&self) {
        self.head.store(0, Ordering::Release);
        self.tail.store(0, Ordering::Release);
        self.overflow.store(false, Ordering::Relaxed);
        self.parity_error.store(false, Ordering::Release);
    }

    /// The `k`-th most recently stored byte (0 = newest), without consuming
    pub fn from_end(&self, k: usize) -> Option<u8> {
        if k >= self.len() {
            return None;
        }
        let tail = self.tail.load(Ordering::Acquire);
        let index = (tail + N - 1 - k) % N;
        Some(self.slots[index].load(Ordering::Relaxed))
    }

    /// Check if the newest byte is a line feed
    pub fn ends_with_line_feed(&self) -> bool {
        self.from_end(0) == Some(LF)
    }

    /// Check if the byte before the newest is a carriage return
    pub fn ends_with_carriage_return_before_last(&self) -> bool {
        self.from_end(1) == Some(CR)
    }

    /// Drain one complete line, line feed included
    ///
    /// Only fires once the newest byte is a line feed; until then the
    /// buffer is left untouched and `None` is returned. Bytes are drained up
    /// to the first line feed, so a second buffered line stays queued.
    pub fn take_line(&self) -> Option<Vec<u8, N>> {
        if !self.ends_with_line_feed() {
            return None;
        }

        let mut line = Vec::new();
        while let Some(byte) = self.read() {
            // Cannot fail: the ring never holds more than N - 1 bytes
            let _ = line.push(byte);
            if byte == LF {
                break;
            }
        }
        Some(line)
    }

    /// Clear the parity/framing error flag, keeping contents and overflow
    ///
    /// Only call while the receive interrupt is disarmed.
    pub fn clear_parity_error(&self) {
        self.parity_error.store(false, Ordering::Release);
    }

    /// Sticky overflow flag
    pub fn has_overflowed(&self) -> bool {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Sticky parity/framing error flag
    pub fn has_parity_error(&self) -> bool {
        self.parity_error.load(Ordering::Acquire)
    }
}

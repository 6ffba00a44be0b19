//! Bus configuration
//!
//! The configuration is fixed at construction and never mutated. With the
//! `serde` feature it can be persisted as postcard binary data.

pub mod pins;
pub mod timing;

pub use pins::PinAssignment;
pub use timing::BusTiming;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from configuration validation or persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The same GPIO number was assigned to two roles
    DuplicatePin(u8),
    /// Postcard encoding or decoding failed
    Encoding,
}

/// Complete configuration of one SDI-12 bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// GPIO numbers of the four line driver connections
    pub pins: PinAssignment,
    /// Bit and wake timing
    pub timing: BusTiming,
}

impl BusConfig {
    /// Create a configuration with the standard SDI-12 timing
    pub const fn new(pins: PinAssignment) -> Self {
        Self {
            pins,
            timing: BusTiming::STANDARD,
        }
    }

    /// Replace the timing, keeping the pin assignment
    pub const fn with_timing(mut self, timing: BusTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Check the configuration for conflicts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pins.validate()
    }

    /// Serialize into `buf` as postcard, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Deserialize from postcard bytes and validate the result
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        config.validate()?;
        Ok(config)
    }
}

//! Pan/tilt speed values
//!
//! Speeds are linear in `0x00..=0x3F`, with the out-of-band sentinel
//! `0xFF` meaning "turbo" (device-defined fastest). The sentinel has to be
//! special-cased in every range check, so the raw byte is kept behind a
//! validated newtype.

use std::fmt;

use crate::error::{Error, Result};

/// Validated pan/tilt speed byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(u8);

impl Speed {
    /// Slowest linear speed
    pub const SLOW: Speed = Speed(0x00);

    /// Medium linear speed
    pub const MEDIUM: Speed = Speed(0x10);

    /// Normal linear speed
    pub const NORMAL: Speed = Speed(0x20);

    /// Fastest linear speed
    pub const HIGH: Speed = Speed(0x3F);

    /// Turbo sentinel, outside the linear range
    pub const TURBO: Speed = Speed(0xFF);

    /// Upper bound of the linear range
    pub const MAX_LINEAR: u8 = 0x3F;

    /// Validate a raw speed byte
    ///
    /// Accepts `0x00..=0x3F` and the turbo sentinel `0xFF`; anything else
    /// is [`Error::InvalidSpeed`]. Turbo is eligible on each axis
    /// independently.
    pub fn new(value: u8) -> Result<Self> {
        if value <= Self::MAX_LINEAR || value == Self::TURBO.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidSpeed(value))
        }
    }

    /// Get the wire byte
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// Check for the turbo sentinel
    pub fn is_turbo(self) -> bool {
        self.0 == Self::TURBO.0
    }
}

impl TryFrom<u8> for Speed {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_turbo() {
            write!(f, "turbo")
        } else {
            write!(f, "0x{:02X}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_accepts_linear_range() {
        assert!(Speed::new(0x00).is_ok());
        assert!(Speed::new(0x20).is_ok());
        assert!(Speed::new(0x3F).is_ok());
    }

    #[test]
    fn test_speed_accepts_turbo_sentinel() {
        let speed = Speed::new(0xFF).unwrap();
        assert!(speed.is_turbo());
        assert_eq!(speed, Speed::TURBO);
    }

    #[test]
    fn test_speed_rejects_gap_values() {
        assert!(matches!(Speed::new(0x40), Err(Error::InvalidSpeed(0x40))));
        assert!(matches!(Speed::new(0xFE), Err(Error::InvalidSpeed(0xFE))));
    }

    #[test]
    fn test_speed_named_levels() {
        assert_eq!(Speed::SLOW.as_byte(), 0x00);
        assert_eq!(Speed::MEDIUM.as_byte(), 0x10);
        assert_eq!(Speed::NORMAL.as_byte(), 0x20);
        assert_eq!(Speed::HIGH.as_byte(), 0x3F);
        assert_eq!(Speed::TURBO.as_byte(), 0xFF);
    }
}

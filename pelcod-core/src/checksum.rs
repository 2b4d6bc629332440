//! Pelco-D checksum algorithm
//!
//! The checksum is the unsigned 8-bit truncated sum of every byte between
//! the sync byte and the checksum byte itself (address included). The same
//! rule covers the 7-byte command frame and both reply layouts.

/// Calculate the checksum over the payload bytes (sync excluded)
pub fn calculate(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Verify a received checksum byte against the payload
pub fn verify(payload: &[u8], received: u8) -> bool {
    calculate(payload) == received
}

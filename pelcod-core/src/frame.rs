//! Pelco-D command frame structure and encoding/decoding

use bytes::{BufMut, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    checksum,
    error::{Error, Result},
};

/// Pelco-D command frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬─────────┬──────┬──────┬───────┬───────┬──────────┐
/// │ Sync │ Address │ Cmd1 │ Cmd2 │ Data1 │ Data2 │ Checksum │
/// │ 0xFF │   u8    │  u8  │  u8  │  u8   │  u8   │    u8    │
/// └──────┴─────────┴──────┴──────┴───────┴───────┴──────────┘
/// ```
///
/// `checksum = (address + cmd1 + cmd2 + data1 + data2) mod 256`.
///
/// The address identifies the device on a shared RS-485 bus; by common
/// deployment convention 0 is a broadcast, but the codec does not enforce
/// that.
///
/// # Examples
///
/// ```
/// use pelcod_core::Frame;
///
/// let frame = Frame::new(1, 0x00, 0x07, 0x00, 22);
/// let encoded = frame.encode();
///
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Device address on the bus (0-255)
    pub address: u8,

    /// First command byte
    pub cmd1: u8,

    /// Second command byte
    pub cmd2: u8,

    /// First data byte (pan speed for standard commands)
    pub data1: u8,

    /// Second data byte (tilt speed for standard commands)
    pub data2: u8,
}

impl Frame {
    /// Leading sync byte of every frame in either direction
    pub const SYNC: u8 = 0xFF;

    /// Command frame size in bytes
    pub const LEN: usize = 7;

    /// Create a new command frame
    pub fn new(address: u8, cmd1: u8, cmd2: u8, data1: u8, data2: u8) -> Self {
        Self {
            address,
            cmd1,
            cmd2,
            data1,
            data2,
        }
    }

    /// Calculate the checksum byte for this frame
    pub fn checksum(&self) -> u8 {
        checksum::calculate(&[self.address, self.cmd1, self.cmd2, self.data1, self.data2])
    }

    /// Encode the frame to its 7-byte wire form
    ///
    /// Encoding never fails; every field is already a byte by construction.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::LEN);

        buf.put_u8(Self::SYNC);
        buf.put_u8(self.address);
        buf.put_u8(self.cmd1);
        buf.put_u8(self.cmd2);
        buf.put_u8(self.data1);
        buf.put_u8(self.data2);
        buf.put_u8(self.checksum());

        trace!("Encoded {}: {:02X?}", self, &buf[..]);

        buf
    }

    /// Decode a command frame from bytes
    ///
    /// # Errors
    ///
    /// - [`Error::FrameTooShort`] if fewer than 7 bytes are available
    /// - [`Error::BadSync`] if the leading byte is not 0xFF
    /// - [`Error::ChecksumMismatch`] if the trailing byte fails the
    ///   byte-sum invariant
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::LEN {
            return Err(Error::FrameTooShort {
                expected: Self::LEN,
                actual: buf.len(),
            });
        }

        if buf[0] != Self::SYNC {
            return Err(Error::BadSync(buf[0]));
        }

        let expected = checksum::calculate(&buf[1..6]);
        if expected != buf[6] {
            return Err(Error::ChecksumMismatch {
                expected,
                received: buf[6],
            });
        }

        Ok(Self {
            address: buf[1],
            cmd1: buf[2],
            cmd2: buf[3],
            data1: buf[4],
            data2: buf[5],
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &self.address)
            .field("cmd1", &format!("0x{:02X}", self.cmd1))
            .field("cmd2", &format!("0x{:02X}", self.cmd2))
            .field("data1", &format!("0x{:02X}", self.data1))
            .field("data2", &format!("0x{:02X}", self.data2))
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[addr={}](cmd=0x{:02X},0x{:02X} data=0x{:02X},0x{:02X})",
            self.address, self.cmd1, self.cmd2, self.data1, self.data2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_frame_encode_layout() {
        let frame = Frame::new(1, 0x00, 0x07, 0x00, 22);
        let encoded = frame.encode();

        assert_eq!(
            encoded.as_ref(),
            &[0xFF, 0x01, 0x00, 0x07, 0x00, 22, 0x1E]
        );
    }

    #[test]
    fn test_frame_decode_rejects_short_buffer() {
        let result = Frame::decode(&[0xFF, 0x01, 0x00]);
        assert!(matches!(result, Err(Error::FrameTooShort { expected: 7, actual: 3 })));
    }

    #[test]
    fn test_frame_decode_rejects_bad_sync() {
        let mut encoded = Frame::new(1, 0, 0, 0, 0).encode();
        encoded[0] = 0xFE;

        let result = Frame::decode(&encoded);
        assert!(matches!(result, Err(Error::BadSync(0xFE))));
    }

    #[test]
    fn test_frame_decode_rejects_corrupt_checksum() {
        let mut encoded = Frame::new(1, 0x88, 0x00, 0x20, 0x20).encode();
        encoded[6] ^= 0xFF;

        let result = Frame::decode(&encoded);

        if let Err(Error::ChecksumMismatch { expected, received }) = result {
            assert_ne!(expected, received);
        } else {
            panic!("Expected ChecksumMismatch error");
        }
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(
            address: u8,
            cmd1: u8,
            cmd2: u8,
            data1: u8,
            data2: u8,
        ) {
            let frame = Frame::new(address, cmd1, cmd2, data1, data2);
            let encoded = frame.encode();

            prop_assert_eq!(encoded.len(), Frame::LEN);

            let sum = address as u32 + cmd1 as u32 + cmd2 as u32 + data1 as u32 + data2 as u32;
            prop_assert_eq!(encoded[6] as u32, sum % 256);

            let decoded = Frame::decode(&encoded).unwrap();
            prop_assert_eq!(decoded, frame);
        }
    }
}

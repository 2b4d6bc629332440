//! Device reply decoding
//!
//! Replies are shorter than command frames: a 4-byte alarm-status reply
//! echoed after most commands, and a 5-byte part-number reply to the query
//! opcode. Both use the command-frame checksum rule over the bytes between
//! sync and checksum.
//!
//! A zero-length read (transport timeout with nothing received) is an
//! expected outcome on an open-loop device, not an error: the decoders
//! return `Ok(None)` for it, keeping "no reply" distinguishable from a
//! malformed reply.

use bitflags::bitflags;
use std::fmt;

use crate::{
    checksum,
    error::{Error, Result},
    frame::Frame,
};

/// Status (alarm) reply size in bytes
pub const STATUS_REPLY_LEN: usize = 4;

/// Query reply size in bytes
pub const QUERY_REPLY_LEN: usize = 5;

bitflags! {
    /// The 8 independent alarm flags of a status reply
    ///
    /// Bit *i* of the alarm byte maps to alarm *i+1*.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AlarmVector: u8 {
        const ALARM1 = 0x01;
        const ALARM2 = 0x02;
        const ALARM3 = 0x04;
        const ALARM4 = 0x08;
        const ALARM5 = 0x10;
        const ALARM6 = 0x20;
        const ALARM7 = 0x40;
        const ALARM8 = 0x80;
    }
}

impl AlarmVector {
    /// Check a single alarm by its 1-based number
    pub fn is_active(self, alarm: u8) -> bool {
        (1..=8).contains(&alarm) && self.bits() & (1 << (alarm - 1)) != 0
    }

    /// List the active alarm numbers (1-8)
    pub fn active(self) -> Vec<u8> {
        (1..=8).filter(|&n| self.is_active(n)).collect()
    }
}

impl fmt::Display for AlarmVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("no alarms")
        } else {
            write!(f, "alarms {:?}", self.active())
        }
    }
}

/// Decoded query reply: bus address plus device part number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryReply {
    pub address: u8,
    pub part_number: u16,
}

/// Decode a 4-byte alarm-status reply
///
/// Returns `Ok(None)` for an empty buffer (read timeout, nothing
/// received).
///
/// # Errors
///
/// - [`Error::FrameTooShort`] for a non-empty but truncated reply
/// - [`Error::BadSync`] if the leading byte is not 0xFF
/// - [`Error::ChecksumMismatch`] if the checksum over `address + alarm
///   byte` fails
pub fn decode_status(buf: &[u8]) -> Result<Option<AlarmVector>> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.len() < STATUS_REPLY_LEN {
        return Err(Error::FrameTooShort {
            expected: STATUS_REPLY_LEN,
            actual: buf.len(),
        });
    }
    if buf[0] != Frame::SYNC {
        return Err(Error::BadSync(buf[0]));
    }

    let expected = checksum::calculate(&buf[1..3]);
    if expected != buf[3] {
        return Err(Error::ChecksumMismatch {
            expected,
            received: buf[3],
        });
    }

    Ok(Some(AlarmVector::from_bits_retain(buf[2])))
}

/// Decode a 5-byte query reply (part number is big-endian)
///
/// Returns `Ok(None)` for an empty buffer. Not every device variant
/// implements the query opcode at all; callers targeting such devices
/// must treat query as permanently unavailable rather than retrying.
pub fn decode_query(buf: &[u8]) -> Result<Option<QueryReply>> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.len() < QUERY_REPLY_LEN {
        return Err(Error::FrameTooShort {
            expected: QUERY_REPLY_LEN,
            actual: buf.len(),
        });
    }
    if buf[0] != Frame::SYNC {
        return Err(Error::BadSync(buf[0]));
    }

    let expected = checksum::calculate(&buf[1..4]);
    if expected != buf[4] {
        return Err(Error::ChecksumMismatch {
            expected,
            received: buf[4],
        });
    }

    Ok(Some(QueryReply {
        address: buf[1],
        part_number: u16::from_be_bytes([buf[2], buf[3]]),
    }))
}

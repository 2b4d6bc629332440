//! Transport layer for the Pelco-D protocol engine
//!
//! The link is a single shared, unbuffered, half-duplex serial line. The
//! engine talks to it through the [`Transport`] trait so tests can swap in
//! a scripted in-memory transport; [`SerialTransport`] is the real
//! implementation.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use async_trait::async_trait;
use bytes::BytesMut;
use std::time::Duration;

/// Byte-level transport for the half-duplex serial link
///
/// A timed-out read is a legitimate outcome, not a failure: `receive`
/// returns whatever arrived inside the timeout, possibly nothing. Only
/// genuine I/O failures surface as errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `count` bytes, returning early contents on timeout
    ///
    /// The returned buffer may be shorter than `count` (including empty)
    /// if the timeout expires first.
    async fn receive(&mut self, count: usize, timeout: Duration) -> Result<BytesMut>;

    /// Discard any buffered inbound bytes
    ///
    /// Called before a command that expects a reply, so a stale reply
    /// from an earlier command cannot be consumed as the new one.
    async fn flush_input(&mut self) -> Result<()>;

    /// Close the link
    async fn close(&mut self) -> Result<()>;

    /// Check if the link is open
    fn is_connected(&self) -> bool;

    /// Descriptive endpoint name for logging
    fn endpoint(&self) -> String;
}

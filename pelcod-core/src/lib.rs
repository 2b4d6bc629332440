//! # pelcod-core
//!
//! Core Pelco-D protocol implementation for PTZ camera mounts.
//!
//! This crate provides the pure (I/O-free) protocol primitives:
//! - Frame structure, checksum, and encoding/decoding
//! - Standard-command synthesis (motion intents and the scan/enable
//!   legality matrix)
//! - The extended command catalog with per-command argument validation
//! - Reply decoding (alarm vectors, part-number query)
//! - Sticky pan/tilt speed session state

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod response;
pub mod session;
pub mod speed;
pub mod standard;

pub use command::{ArgSpec, Bank, ExtendedCommand};
pub use error::{Error, Result};
pub use frame::Frame;
pub use response::{AlarmVector, QueryReply};
pub use session::Session;
pub use speed::Speed;
pub use standard::{Direction, MotionIntent};

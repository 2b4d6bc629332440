//! # pelcod
//!
//! Async Pelco-D protocol engine for PTZ camera mounts on RS-485 serial
//! links.
//!
//! The workspace splits the way the protocol does:
//! - [`pelcod_core`]: frames, checksums, the command catalog, reply
//!   decoding (pure, no I/O)
//! - [`pelcod_transport`]: the serial link behind the [`Transport`] trait
//! - [`pelcod_types`]: shared value types
//! - this crate: the [`Camera`] client, the AVUE specialization, and the
//!   background alarm receiver
//!
//! ## Quick start
//!
//! ```no_run
//! use pelcod::{Camera, Direction, Speed};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> pelcod::Result<()> {
//!     let camera = Camera::open_serial("/dev/ttyUSB0", 4800, 1).await?;
//!
//!     camera.move_in(Direction::RightUp, Some(Speed::NORMAL)).await?;
//!     tokio::time::sleep(Duration::from_secs(2)).await;
//!     camera.stop().await?;
//!
//!     camera.close().await?;
//!     Ok(())
//! }
//! ```

pub mod avue;
pub mod camera;
pub mod error;
pub mod receiver;

#[cfg(test)]
mod mock;

pub use avue::Avue;
pub use camera::{AutoMode, Camera, Increment, PresetAction, ZoneBoundary};
pub use error::{Error, Result};
pub use receiver::{LinkSession, LinkState, RxEvent};

pub use pelcod_core::{
    standard::{CameraSwitch, Focus, Iris, Pan, ScanMode, Tilt, Zoom},
    AlarmVector, Bank, Direction, ExtendedCommand, Frame, MotionIntent, QueryReply, Speed,
};
pub use pelcod_transport::{SerialTransport, Transport};
pub use pelcod_types::CameraInfo;

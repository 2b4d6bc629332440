//! Type definitions for pelcod

pub mod camera_info;
pub mod error;

pub use camera_info::CameraInfo;
pub use error::{Error, Result};

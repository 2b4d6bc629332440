//! Standard (motion/state) command synthesis
//!
//! A standard command's two opcode bytes are packed bit-by-bit from up to
//! seven independent intents. Five of them (pan, tilt, iris, focus, zoom)
//! really are independent; scan mode and camera enable are not: the
//! device conflates them into a single 2-bit `(sense, scan_cam)` pair, so
//! two of the nine combinations cannot be expressed on the wire at all.
//! This module is the one place that coupling is handled.

use crate::{
    error::{Error, Result},
    frame::Frame,
    speed::Speed,
};

/// Pan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pan {
    Left,
    Right,
}

/// Tilt direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tilt {
    Down,
    Up,
}

/// Manual iris direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iris {
    Open,
    Close,
}

/// Manual focus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Far,
    Near,
}

/// Zoom direction (tele/wide)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    Out,
    In,
}

/// Scan mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Manual,
    Auto,
}

/// Camera enable switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSwitch {
    Off,
    On,
}

/// Compound motion direction for single-call moves
///
/// A closed enumeration of the eight pan/tilt combinations plus `Stop`;
/// one parameterized move operation replaces a per-direction method per
/// combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Stop,
    Up,
    Down,
    Left,
    LeftUp,
    LeftDown,
    Right,
    RightUp,
    RightDown,
}

impl Direction {
    /// Split into per-axis components (`None` means "do not move that axis")
    pub fn components(self) -> (Option<Pan>, Option<Tilt>) {
        match self {
            Self::Stop => (None, None),
            Self::Up => (None, Some(Tilt::Up)),
            Self::Down => (None, Some(Tilt::Down)),
            Self::Left => (Some(Pan::Left), None),
            Self::LeftUp => (Some(Pan::Left), Some(Tilt::Up)),
            Self::LeftDown => (Some(Pan::Left), Some(Tilt::Down)),
            Self::Right => (Some(Pan::Right), None),
            Self::RightUp => (Some(Pan::Right), Some(Tilt::Up)),
            Self::RightDown => (Some(Pan::Right), Some(Tilt::Down)),
        }
    }
}

/// One logical motion/state request
///
/// Transient value object: built per call, consumed by the frame builder,
/// never persisted. Every field defaults to "leave as is"; an
/// all-default intent encodes the stop command (0x00, 0x00).
///
/// # Examples
///
/// ```
/// use pelcod_core::standard::{MotionIntent, Pan, Tilt};
///
/// let intent = MotionIntent::new().pan(Pan::Right).tilt(Tilt::Up);
/// let (cmd1, cmd2) = intent.command_bytes().unwrap();
/// assert_eq!((cmd1, cmd2), (0x00, 0x0A));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionIntent {
    pub pan: Option<Pan>,
    pub tilt: Option<Tilt>,
    pub iris: Option<Iris>,
    pub focus: Option<Focus>,
    pub zoom: Option<Zoom>,
    pub scan_mode: Option<ScanMode>,
    pub camera: Option<CameraSwitch>,
}

impl MotionIntent {
    /// Create an empty intent (encodes as the stop command)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pan(mut self, pan: Pan) -> Self {
        self.pan = Some(pan);
        self
    }

    pub fn tilt(mut self, tilt: Tilt) -> Self {
        self.tilt = Some(tilt);
        self
    }

    pub fn iris(mut self, iris: Iris) -> Self {
        self.iris = Some(iris);
        self
    }

    pub fn focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn scan_mode(mut self, mode: ScanMode) -> Self {
        self.scan_mode = Some(mode);
        self
    }

    pub fn camera(mut self, switch: CameraSwitch) -> Self {
        self.camera = Some(switch);
        self
    }

    /// Resolve the scan-mode/camera-enable coupling
    ///
    /// The 3x3 matrix of `(scan_mode, camera)` maps to the device's
    /// `(sense, scan_cam)` bit pair. Two cells are unrepresentable:
    /// manual scan with the camera on, and auto scan with the camera off.
    fn sense_scan_cam(&self) -> Result<(u8, u8)> {
        match (self.scan_mode, self.camera) {
            (None, None) => Ok((0, 0)),
            (None, Some(CameraSwitch::Off)) => Ok((0, 1)),
            (None, Some(CameraSwitch::On)) => Ok((1, 1)),
            (Some(ScanMode::Manual), None) => Ok((0, 2)),
            (Some(ScanMode::Manual), Some(CameraSwitch::Off)) => Ok((0, 3)),
            (Some(ScanMode::Auto), None) => Ok((1, 2)),
            (Some(ScanMode::Auto), Some(CameraSwitch::On)) => Ok((1, 3)),
            (Some(ScanMode::Manual), Some(CameraSwitch::On))
            | (Some(ScanMode::Auto), Some(CameraSwitch::Off)) => {
                Err(Error::IllegalModeCombination)
            }
        }
    }

    /// Pack the intent into the two standard-command opcode bytes
    ///
    /// # Errors
    ///
    /// [`Error::IllegalModeCombination`] for the two unrepresentable
    /// scan/enable cells; nothing is built in that case.
    pub fn command_bytes(&self) -> Result<(u8, u8)> {
        let (sense, scan_cam) = self.sense_scan_cam()?;

        let mut cmd1 = (sense << 7) | (scan_cam << 3);
        cmd1 |= match self.iris {
            Some(Iris::Close) => 0x08,
            Some(Iris::Open) => 0x04,
            None => 0x00,
        };
        if self.focus == Some(Focus::Near) {
            cmd1 |= 0x01;
        }

        let mut cmd2 = 0u8;
        if self.focus == Some(Focus::Far) {
            cmd2 |= 0x80;
        }
        cmd2 |= match self.zoom {
            Some(Zoom::In) => 0x20,
            Some(Zoom::Out) => 0x40,
            None => 0x00,
        };
        cmd2 |= match self.tilt {
            Some(Tilt::Up) => 0x08,
            Some(Tilt::Down) => 0x10,
            None => 0x00,
        };
        cmd2 |= match self.pan {
            Some(Pan::Right) => 0x02,
            Some(Pan::Left) => 0x04,
            None => 0x00,
        };

        Ok((cmd1, cmd2))
    }

    /// Build the complete standard-command frame
    ///
    /// `data1`/`data2` carry the pan/tilt speed bytes. Speed resolution
    /// against sticky session state happens in the caller; by the time a
    /// [`Speed`] exists it is already validated.
    pub fn frame(&self, address: u8, pan_speed: Speed, tilt_speed: Speed) -> Result<Frame> {
        let (cmd1, cmd2) = self.command_bytes()?;
        Ok(Frame::new(
            address,
            cmd1,
            cmd2,
            pan_speed.as_byte(),
            tilt_speed.as_byte(),
        ))
    }
}

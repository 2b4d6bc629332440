//! High-level camera client
//!
//! [`Camera`] owns the serial link and exposes one method per PTZ
//! operation. Every operation validates fully before any byte is
//! written, then holds the transport lock across flush + write + (when a
//! reply is expected) the paired read, so concurrent callers cannot
//! interleave their frames on the half-duplex line.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use pelcod_core::{
    constants,
    response::{self, QUERY_REPLY_LEN, STATUS_REPLY_LEN},
    standard::{CameraSwitch, Direction, Focus, Iris, MotionIntent, Pan, ScanMode, Tilt, Zoom},
    AlarmVector, ExtendedCommand, Frame, Session, Speed,
};
use pelcod_transport::{SerialTransport, Transport};
use pelcod_types::CameraInfo;

use crate::error::{Error, Result};

/// Preset slot operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetAction {
    Set,
    Clear,
    Call,
}

/// Zone boundary marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneBoundary {
    Start,
    End,
}

/// Tri-state mode for the auto-focus/iris/gain commands
///
/// Wire encoding follows the device: auto = 0, on = 1, off = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoMode {
    Auto,
    On,
    Off,
}

impl AutoMode {
    fn code(self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::On => 1,
            Self::Off => 2,
        }
    }
}

/// Nudge size for [`Camera::move_for`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Small,
    Medium,
    Large,
}

impl Increment {
    fn speed(self) -> Speed {
        match self {
            Self::Small => Speed::SLOW,
            Self::Medium => Speed::NORMAL,
            Self::Large => Speed::HIGH,
        }
    }
}

/// A Pelco-D camera on the far end of a serial link
///
/// Cloneable handle: clones share the transport, the sticky-speed
/// session, and the configuration flags.
#[derive(Clone)]
pub struct Camera {
    transport: Arc<Mutex<Box<dyn Transport>>>,
    session: Session,
    address: u8,
    timeout: Duration,
    expect_reply: bool,
    supports_query: bool,
}

impl Camera {
    /// Wrap an already-open transport
    pub fn new(transport: Box<dyn Transport>, address: u8) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
            session: Session::new(),
            address,
            timeout: constants::DEFAULT_SERIAL_TIMEOUT,
            expect_reply: true,
            supports_query: true,
        }
    }

    /// Open a serial port and wrap it
    pub async fn open_serial(port: impl Into<String>, baud_rate: u32, address: u8) -> Result<Self> {
        let transport = SerialTransport::open(port, baud_rate).await?;
        debug!("Camera {} attached to {}", address, transport.endpoint());
        Ok(Self::new(Box::new(transport), address))
    }

    /// Set the reply read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Do not wait for status replies after commands
    ///
    /// Useful on lines where the device never echoes, to avoid paying
    /// the read timeout on every command.
    pub fn without_reply(mut self) -> Self {
        self.expect_reply = false;
        self
    }

    /// Mark this device variant as lacking part-number query support
    pub fn without_query(mut self) -> Self {
        self.supports_query = false;
        self
    }

    /// Device address on the shared line
    pub fn address(&self) -> u8 {
        self.address
    }

    pub(crate) fn shared_transport(&self) -> Arc<Mutex<Box<dyn Transport>>> {
        Arc::clone(&self.transport)
    }

    pub(crate) fn poll_timeout(&self) -> Duration {
        self.timeout
    }

    /// Write one frame and read the paired status reply if one is
    /// expected, all under a single transport lock
    async fn issue(&self, frame: Frame) -> Result<Option<AlarmVector>> {
        let bytes = frame.encode();

        debug!("Issuing {} to camera {}", frame, self.address);

        let mut transport = self.transport.lock().await;
        transport.flush_input().await?;
        transport.send(&bytes).await?;

        if !self.expect_reply {
            return Ok(None);
        }

        let reply = transport.receive(STATUS_REPLY_LEN, self.timeout).await?;
        drop(transport);

        let status = response::decode_status(&reply)?;
        if let Some(alarms) = status {
            trace!("Camera {} alarm vector: {}", self.address, alarms);
        }

        Ok(status)
    }

    /// Issue a standard (motion/state) command
    ///
    /// Omitted speeds fall back to the session's sticky values; the
    /// speeds actually sent become the new sticky values. Validation
    /// happens before the sticky state is touched, so a rejected intent
    /// leaves the session unchanged.
    pub async fn issue_standard(
        &self,
        intent: MotionIntent,
        pan_speed: Option<Speed>,
        tilt_speed: Option<Speed>,
    ) -> Result<Option<AlarmVector>> {
        let (cmd1, cmd2) = intent.command_bytes()?;

        let mut transport = self.transport.lock().await;
        let (pan, tilt) = self.session.resolve(pan_speed, tilt_speed);
        let frame = Frame::new(self.address, cmd1, cmd2, pan.as_byte(), tilt.as_byte());
        let bytes = frame.encode();

        debug!("Issuing {} to camera {}", frame, self.address);

        transport.flush_input().await?;
        transport.send(&bytes).await?;

        if !self.expect_reply {
            return Ok(None);
        }

        let reply = transport.receive(STATUS_REPLY_LEN, self.timeout).await?;
        drop(transport);

        Ok(response::decode_status(&reply)?)
    }

    /// Issue an extended (catalog) command
    ///
    /// Both argument slots are validated against the command's spec
    /// before anything is written.
    pub async fn issue_extended(
        &self,
        command: ExtendedCommand,
        arg1: Option<u8>,
        arg2: Option<u8>,
    ) -> Result<Option<AlarmVector>> {
        let frame = command.frame(self.address, arg1, arg2)?;
        self.issue(frame).await
    }

    /// Power the camera block on
    pub async fn camera_on(&self) -> Result<Option<AlarmVector>> {
        self.issue_standard(MotionIntent::new().camera(CameraSwitch::On), None, None)
            .await
    }

    /// Power the camera block off
    pub async fn camera_off(&self) -> Result<Option<AlarmVector>> {
        self.issue_standard(MotionIntent::new().camera(CameraSwitch::Off), None, None)
            .await
    }

    /// Start continuous motion on either or both axes
    ///
    /// Forces the manual-scan sense so a running auto scan is overridden
    /// by the operator's stick input. Motion continues until [`stop`] or
    /// a subsequent motion command.
    ///
    /// [`stop`]: Camera::stop
    pub async fn motion(
        &self,
        pan: Option<Pan>,
        tilt: Option<Tilt>,
        pan_speed: Option<Speed>,
        tilt_speed: Option<Speed>,
    ) -> Result<Option<AlarmVector>> {
        let mut intent = MotionIntent::new().scan_mode(ScanMode::Manual);
        if let Some(pan) = pan {
            intent = intent.pan(pan);
        }
        if let Some(tilt) = tilt {
            intent = intent.tilt(tilt);
        }

        self.issue_standard(intent, pan_speed, tilt_speed).await
    }

    /// Start moving in a compound direction at one speed for both axes
    ///
    /// `Direction::Stop` is equivalent to [`stop`].
    ///
    /// [`stop`]: Camera::stop
    pub async fn move_in(
        &self,
        direction: Direction,
        speed: Option<Speed>,
    ) -> Result<Option<AlarmVector>> {
        if direction == Direction::Stop {
            return self.stop().await;
        }

        let (pan, tilt) = direction.components();
        self.motion(pan, tilt, speed, speed).await
    }

    /// Timed nudge: move in a direction for a duration, then stop
    pub async fn move_for(
        &self,
        direction: Direction,
        duration: Duration,
        increment: Increment,
    ) -> Result<Option<AlarmVector>> {
        let speed = increment.speed();
        self.move_in(direction, Some(speed)).await?;
        tokio::time::sleep(duration).await;
        self.stop().await
    }

    /// Stop all motion (the all-zero opcode frame)
    pub async fn stop(&self) -> Result<Option<AlarmVector>> {
        self.issue_standard(MotionIntent::new(), None, None).await
    }

    /// Start or stop an automatic scan sweep
    pub async fn auto_scan(&self, on: bool) -> Result<Option<AlarmVector>> {
        let mode = if on { ScanMode::Auto } else { ScanMode::Manual };
        self.issue_standard(MotionIntent::new().scan_mode(mode), None, None)
            .await
    }

    /// Start zooming, optionally setting the zoom motor speed first
    ///
    /// Zoom continues until [`stop`].
    ///
    /// [`stop`]: Camera::stop
    pub async fn zoom(&self, direction: Zoom, speed: Option<u8>) -> Result<Option<AlarmVector>> {
        if let Some(speed) = speed {
            self.set_zoom_speed(speed).await?;
        }
        self.issue_standard(MotionIntent::new().zoom(direction), None, None)
            .await
    }

    /// Start a manual focus adjustment, optionally setting the focus
    /// motor speed first
    pub async fn focus(&self, direction: Focus, speed: Option<u8>) -> Result<Option<AlarmVector>> {
        if let Some(speed) = speed {
            self.set_focus_speed(speed).await?;
        }
        self.issue_standard(MotionIntent::new().focus(direction), None, None)
            .await
    }

    /// Start a manual iris adjustment
    pub async fn iris(&self, direction: Iris) -> Result<Option<AlarmVector>> {
        self.issue_standard(MotionIntent::new().iris(direction), None, None)
            .await
    }

    /// Set, clear, or move to a preset position
    pub async fn preset(&self, action: PresetAction, id: u8) -> Result<Option<AlarmVector>> {
        let command = match action {
            PresetAction::Set => ExtendedCommand::SetPreset,
            PresetAction::Clear => ExtendedCommand::ClearPreset,
            PresetAction::Call => ExtendedCommand::GotoPreset,
        };
        self.issue_extended(command, None, Some(id)).await
    }

    /// Switch an auxiliary output on or off
    pub async fn auxiliary(&self, on: bool, which: u8) -> Result<Option<AlarmVector>> {
        let command = if on {
            ExtendedCommand::SetAux
        } else {
            ExtendedCommand::ClearAux
        };
        self.issue_extended(command, None, Some(which)).await
    }

    /// Mark the current position as a zone boundary
    pub async fn set_zone(&self, boundary: ZoneBoundary, zone: u8) -> Result<Option<AlarmVector>> {
        let command = match boundary {
            ZoneBoundary::Start => ExtendedCommand::SetZoneStart,
            ZoneBoundary::End => ExtendedCommand::SetZoneEnd,
        };
        self.issue_extended(command, None, Some(zone)).await
    }

    /// Start or stop zone scanning
    pub async fn zone_scan(&self, on: bool) -> Result<Option<AlarmVector>> {
        let command = if on {
            ExtendedCommand::ZoneScanOn
        } else {
            ExtendedCommand::ZoneScanOff
        };
        self.issue_extended(command, None, None).await
    }

    /// Acknowledge an alarm input
    pub async fn alarm_ack(&self, alarm: u8) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::AlarmAck, None, Some(alarm))
            .await
    }

    /// Start or stop recording the motion pattern
    pub async fn pattern_record(&self, on: bool) -> Result<Option<AlarmVector>> {
        let command = if on {
            ExtendedCommand::PatternStart
        } else {
            ExtendedCommand::PatternStop
        };
        self.issue_extended(command, None, None).await
    }

    /// Replay the recorded motion pattern
    pub async fn run_pattern(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::RunPattern, None, None)
            .await
    }

    /// Set the zoom motor speed (0 slowest ..= 3 fastest)
    pub async fn set_zoom_speed(&self, speed: u8) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::ZoomSpeed, None, Some(speed))
            .await
    }

    /// Set the focus motor speed (0 slowest ..= 3 fastest)
    pub async fn set_focus_speed(&self, speed: u8) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::FocusSpeed, None, Some(speed))
            .await
    }

    /// Write one character to the on-screen display
    pub async fn write_char(&self, column: u8, ch: u8) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::WriteChar, Some(column), Some(ch))
            .await
    }

    /// Clear the on-screen display
    pub async fn clear_screen(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::ClearScreen, None, None)
            .await
    }

    /// Rotate the head 180 degrees
    pub async fn flip(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::Flip, None, None).await
    }

    /// Slew to the zero-pan reference position
    pub async fn goto_zero_pan(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::GotoZeroPan, None, None)
            .await
    }

    /// Restore camera defaults
    pub async fn reset_camera_defaults(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::ResetCamera, None, None)
            .await
    }

    /// Remote-reset the receiver electronics
    pub async fn remote_reset(&self) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::RemoteReset, None, None)
            .await
    }

    /// Select the auto-focus mode
    pub async fn auto_focus(&self, mode: AutoMode) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::AutoFocus, None, Some(mode.code()))
            .await
    }

    /// Select the auto-iris mode
    pub async fn auto_iris(&self, mode: AutoMode) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::AutoIris, None, Some(mode.code()))
            .await
    }

    /// Select the automatic gain control mode
    pub async fn auto_gain(&self, mode: AutoMode) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::Agc, None, Some(mode.code()))
            .await
    }

    /// Enable or disable backlight compensation
    pub async fn backlight_comp(&self, on: bool) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::BacklightComp, None, Some(on as u8))
            .await
    }

    /// Enable or disable automatic white balance
    pub async fn auto_white_balance(&self, on: bool) -> Result<Option<AlarmVector>> {
        self.issue_extended(ExtendedCommand::Awb, None, Some(on as u8))
            .await
    }

    /// Query the device part number
    ///
    /// Sends the query opcode and reads the 5-byte reply. Returns
    /// `Ok(None)` if the device stays silent within the timeout, and
    /// [`Error::Unsupported`] on device variants known to lack query
    /// support.
    pub async fn query(&self) -> Result<Option<CameraInfo>> {
        if !self.supports_query {
            return Err(Error::Unsupported("part-number query"));
        }

        let frame = Frame::new(self.address, 0x00, constants::QUERY_OPCODE, 0x00, 0x00);
        let bytes = frame.encode();

        debug!("Querying camera {}", self.address);

        let mut transport = self.transport.lock().await;
        transport.flush_input().await?;
        transport.send(&bytes).await?;
        let reply = transport.receive(QUERY_REPLY_LEN, self.timeout).await?;
        drop(transport);

        let reply = response::decode_query(&reply)?;
        Ok(reply.map(|r| CameraInfo::new(r.address, r.part_number)))
    }

    /// Close the underlying link
    pub async fn close(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;
        debug!(
            "Closing link to camera {} on {}",
            self.address,
            transport.endpoint()
        );
        transport.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("address", &self.address)
            .field("timeout", &self.timeout)
            .field("expect_reply", &self.expect_reply)
            .field("supports_query", &self.supports_query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use pretty_assertions::assert_eq;

    fn silent_camera(address: u8) -> (Camera, crate::mock::SentLog) {
        let (mock, sent) = MockTransport::new();
        (Camera::new(Box::new(mock), address), sent)
    }

    #[tokio::test]
    async fn test_stop_sends_all_zero_opcodes() {
        let (camera, sent) = silent_camera(1);

        let reply = camera.stop().await.unwrap();

        assert_eq!(reply, None);
        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01]]
        );
    }

    #[tokio::test]
    async fn test_motion_forces_manual_scan_sense() {
        let (camera, sent) = silent_camera(1);

        camera
            .motion(Some(Pan::Right), None, Some(Speed::NORMAL), None)
            .await
            .unwrap();

        // scan_cam = 2 (manual, camera untouched) lands in bit 4 of cmd1
        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x10, 0x02, 0x20, 0x00, 0x33]]
        );
    }

    #[tokio::test]
    async fn test_omitted_speed_reuses_sticky_value() {
        let (camera, sent) = silent_camera(1);

        camera
            .motion(Some(Pan::Right), None, Some(Speed::HIGH), Some(Speed::MEDIUM))
            .await
            .unwrap();
        camera.motion(None, Some(Tilt::Up), None, None).await.unwrap();

        let frames = sent.frames();
        assert_eq!(&frames[0][4..6], &[0x3F, 0x10]);
        assert_eq!(&frames[1][4..6], &[0x3F, 0x10]);
    }

    #[tokio::test]
    async fn test_rejected_intent_leaves_sticky_speeds_untouched() {
        let (camera, sent) = silent_camera(1);

        let illegal = MotionIntent::new()
            .scan_mode(ScanMode::Manual)
            .camera(CameraSwitch::On);
        let result = camera
            .issue_standard(illegal, Some(Speed::TURBO), Some(Speed::TURBO))
            .await;

        assert!(matches!(
            result,
            Err(Error::Core(pelcod_core::Error::IllegalModeCombination))
        ));
        assert!(sent.frames().is_empty());

        // Next command still sees the initial slow speeds
        camera.motion(Some(Pan::Left), None, None, None).await.unwrap();
        assert_eq!(&sent.frames()[0][4..6], &[0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_goto_preset_frame_bytes() {
        let (camera, sent) = silent_camera(1);

        camera.preset(PresetAction::Call, 22).await.unwrap();

        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x00, 0x07, 0x00, 22, 0x1E]]
        );
    }

    #[tokio::test]
    async fn test_extended_validation_rejects_before_send() {
        let (camera, sent) = silent_camera(1);

        let result = camera.set_zoom_speed(9).await;

        match result {
            Err(Error::Core(e)) => {
                assert!(e.is_validation());
                assert!(matches!(
                    e,
                    pelcod_core::Error::ArgumentOutOfRange { lo: 0, hi: 3, provided: 9 }
                ));
            }
            other => panic!("Expected a validation error, got {other:?}"),
        }
        assert!(sent.frames().is_empty());
    }

    #[tokio::test]
    async fn test_zoom_with_speed_sends_speed_command_first() {
        let (camera, sent) = silent_camera(1);

        camera.zoom(Zoom::In, Some(2)).await.unwrap();

        let frames = sent.frames();
        assert_eq!(frames.len(), 2);
        // ZoomSpeed 0x25 with data2 = 2, then the standard zoom-in frame
        assert_eq!(frames[0], vec![0xFF, 0x01, 0x00, 0x25, 0x00, 0x02, 0x28]);
        assert_eq!(frames[1], vec![0xFF, 0x01, 0x00, 0x20, 0x00, 0x00, 0x21]);
    }

    #[tokio::test]
    async fn test_status_reply_is_decoded() {
        let (mock, sent) = MockTransport::new();
        let mut mock = mock;
        // alarm bits 0b0000_0101 -> alarms 1 and 3
        mock.push_reply(&[0xFF, 0x01, 0x05, 0x06]);
        let camera = Camera::new(Box::new(mock), 1);

        let reply = camera.camera_on().await.unwrap();

        let alarms = reply.unwrap();
        assert_eq!(alarms.active(), vec![1, 3]);
        assert_eq!(sent.frames().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_status_reply_is_an_error() {
        let (mut mock, _sent) = MockTransport::new();
        mock.push_reply(&[0xFF, 0x01, 0x05, 0x99]);
        let camera = Camera::new(Box::new(mock), 1);

        let result = camera.camera_on().await;

        assert!(matches!(
            result,
            Err(Error::Core(pelcod_core::Error::ChecksumMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_without_reply_skips_the_read() {
        let (mut mock, sent) = MockTransport::new();
        // A buffered reply that must NOT be consumed
        mock.push_reply(&[0xFF, 0x01, 0x05, 0x06]);
        let camera = Camera::new(Box::new(mock), 1).without_reply();

        let reply = camera.camera_on().await.unwrap();

        assert_eq!(reply, None);
        assert_eq!(sent.frames().len(), 1);
    }

    #[tokio::test]
    async fn test_query_decodes_part_number() {
        let (mut mock, sent) = MockTransport::new();
        // part number 0x1234 big-endian
        mock.push_reply(&[0xFF, 0x01, 0x12, 0x34, 0x47]);
        let camera = Camera::new(Box::new(mock), 1);

        let info = camera.query().await.unwrap().unwrap();

        assert_eq!(info.address, 1);
        assert_eq!(info.part_number, 0x1234);
        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x00, 0x45, 0x00, 0x00, 0x46]]
        );
    }

    #[tokio::test]
    async fn test_query_unsupported_variant() {
        let (camera, sent) = silent_camera(1);
        let camera = camera.without_query();

        let result = camera.query().await;

        assert!(matches!(result, Err(Error::Unsupported(_))));
        assert!(sent.frames().is_empty());
    }

    #[tokio::test]
    async fn test_move_for_moves_then_stops() {
        tokio::time::pause();
        let (camera, sent) = silent_camera(1);

        camera
            .move_for(Direction::RightUp, Duration::from_millis(250), Increment::Large)
            .await
            .unwrap();

        let frames = sent.frames();
        assert_eq!(frames.len(), 2);
        // Manual scan sense + right (0x02) + up (0x08), both speeds HIGH
        assert_eq!(frames[0], vec![0xFF, 0x01, 0x10, 0x0A, 0x3F, 0x3F, 0x99]);
        // Stop frame reuses the committed HIGH speeds
        assert_eq!(frames[1], vec![0xFF, 0x01, 0x00, 0x00, 0x3F, 0x3F, 0x7F]);
    }

    #[tokio::test]
    async fn test_auto_mode_wire_codes() {
        let (camera, sent) = silent_camera(1);

        camera.auto_focus(AutoMode::Auto).await.unwrap();
        camera.auto_focus(AutoMode::On).await.unwrap();
        camera.auto_focus(AutoMode::Off).await.unwrap();

        let frames = sent.frames();
        assert_eq!(frames[0][5], 0);
        assert_eq!(frames[1][5], 1);
        assert_eq!(frames[2][5], 2);
    }

    #[tokio::test]
    async fn test_auxiliary_range_enforced() {
        let (camera, sent) = silent_camera(1);

        assert!(camera.auxiliary(true, 0).await.is_err());
        assert!(camera.auxiliary(true, 9).await.is_err());
        assert!(sent.frames().is_empty());

        camera.auxiliary(false, 3).await.unwrap();
        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x00, 0x0B, 0x00, 0x03, 0x0F]]
        );
    }
}

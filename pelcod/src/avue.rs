//! AVUE G50IR-WB36N device specialization
//!
//! This dome deviates from stock Pelco-D in a few ways: it never answers
//! the part-number query, its IR illuminator and wiper hang off magic
//! preset slots, and it has no position feedback, so angular moves are
//! dead-reckoned from a measured slew rate.

use std::time::Duration;

use tracing::debug;

use pelcod_core::{
    standard::{Pan, Tilt},
    AlarmVector, ExtendedCommand, Speed,
};

use crate::camera::{Camera, PresetAction};
use crate::error::Result;

/// Measured pan slew rate at [`Speed::NORMAL`], degrees per second
pub const PAN_DEGREES_PER_SEC: f64 = 18.4;

/// Measured tilt slew rate at [`Speed::NORMAL`], degrees per second
pub const TILT_DEGREES_PER_SEC: f64 = 18.4;

/// Preset slot wired to the IR illuminator
const IR_PRESET: u8 = 62;

/// Preset slot wired to the wiper
const WIPER_PRESET: u8 = 63;

// Duration::from_secs_f64 panics on negative or NaN input, so the
// angle has to be checked before the slew time is derived from it.
fn check_degrees(axis: &str, degrees: f64) -> Result<()> {
    if degrees.is_finite() && degrees >= 0.0 {
        Ok(())
    } else {
        Err(pelcod_types::Error::Validation(format!(
            "{axis} degrees must be non-negative and finite, got {degrees}"
        ))
        .into())
    }
}

/// AVUE G50IR-WB36N camera
///
/// Wraps a [`Camera`] and layers the device's quirks on top. The
/// wrapped camera is still reachable through [`camera`] for the stock
/// operations.
///
/// [`camera`]: Avue::camera
#[derive(Debug, Clone)]
pub struct Avue {
    camera: Camera,
}

impl Avue {
    /// Wrap a camera handle
    ///
    /// The part-number query is disabled permanently: this device never
    /// answers it.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera: camera.without_query(),
        }
    }

    /// The wrapped stock camera interface
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Return to the zero-pan home position
    ///
    /// Elevation is left untouched; the device has no homing command
    /// for the tilt axis.
    pub async fn home(&self) -> Result<Option<AlarmVector>> {
        self.camera
            .issue_extended(ExtendedCommand::GotoZeroPan, None, None)
            .await
    }

    /// Pan a number of degrees from the current position
    ///
    /// Dead-reckoned: the camera has no position feedback, so this
    /// slews for `degrees / rate` seconds and stops. Rough, not
    /// repeatable. `degrees` must be a non-negative finite value.
    pub async fn pan(&self, direction: Pan, degrees: f64, speed: Speed) -> Result<Option<AlarmVector>> {
        check_degrees("pan", degrees)?;

        debug!("Dead-reckoned pan {:?} {} degrees", direction, degrees);

        self.camera
            .motion(Some(direction), None, Some(speed), None)
            .await?;
        tokio::time::sleep(Duration::from_secs_f64(degrees / PAN_DEGREES_PER_SEC)).await;
        self.camera.stop().await
    }

    /// Tilt a number of degrees from the current position
    ///
    /// Dead-reckoned, same caveats as [`pan`].
    ///
    /// [`pan`]: Avue::pan
    pub async fn tilt(&self, direction: Tilt, degrees: f64, speed: Speed) -> Result<Option<AlarmVector>> {
        check_degrees("tilt", degrees)?;

        debug!("Dead-reckoned tilt {:?} {} degrees", direction, degrees);

        self.camera
            .motion(None, Some(direction), None, Some(speed))
            .await?;
        tokio::time::sleep(Duration::from_secs_f64(degrees / TILT_DEGREES_PER_SEC)).await;
        self.camera.stop().await
    }

    /// Slew to an absolute azimuth, in degrees from the zero position
    ///
    /// Pans to zero first, then takes the shorter way around. Accepts
    /// 0..=360.
    pub async fn azimuth(&self, degrees: f64) -> Result<Option<AlarmVector>> {
        if !(0.0..=360.0).contains(&degrees) {
            return Err(pelcod_types::Error::Validation(format!(
                "azimuth must be 0..=360 degrees, got {degrees}"
            ))
            .into());
        }

        self.home().await?;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let (direction, distance) = if degrees < 180.0 {
            (Pan::Right, degrees)
        } else {
            (Pan::Left, 360.0 - degrees)
        };

        self.camera
            .motion(Some(direction), None, Some(Speed::NORMAL), None)
            .await?;
        tokio::time::sleep(Duration::from_secs_f64(distance / PAN_DEGREES_PER_SEC)).await;
        self.camera.stop().await
    }

    /// Switch the IR illuminator on or off
    ///
    /// The camera shifts to IR imaging automatically when the
    /// illuminator comes on, and back to color when it goes off.
    pub async fn ir_mode(&self, on: bool) -> Result<Option<AlarmVector>> {
        let action = if on { PresetAction::Call } else { PresetAction::Set };
        self.camera.preset(action, IR_PRESET).await
    }

    /// Run the wiper for its built-in five cycles
    pub async fn wiper(&self) -> Result<Option<AlarmVector>> {
        self.camera.preset(PresetAction::Call, WIPER_PRESET).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockTransport;
    use pretty_assertions::assert_eq;

    fn avue() -> (Avue, crate::mock::SentLog) {
        let (mock, sent) = MockTransport::new();
        let camera = Camera::new(Box::new(mock), 1).without_reply();
        (Avue::new(camera), sent)
    }

    #[tokio::test]
    async fn test_query_is_permanently_unsupported() {
        let (avue, _sent) = avue();
        assert!(matches!(
            avue.camera().query().await,
            Err(Error::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_home_sends_goto_zero_pan() {
        let (avue, sent) = avue();

        avue.home().await.unwrap();

        assert_eq!(
            sent.frames(),
            vec![vec![0xFF, 0x01, 0x00, 0x07, 0x00, 22, 0x1E]]
        );
    }

    #[tokio::test]
    async fn test_ir_mode_uses_preset_62() {
        let (avue, sent) = avue();

        avue.ir_mode(true).await.unwrap();
        avue.ir_mode(false).await.unwrap();

        let frames = sent.frames();
        // On calls the preset, off re-sets it
        assert_eq!(frames[0][3], 0x07);
        assert_eq!(frames[0][5], 62);
        assert_eq!(frames[1][3], 0x03);
        assert_eq!(frames[1][5], 62);
    }

    #[tokio::test]
    async fn test_wiper_calls_preset_63() {
        let (avue, sent) = avue();

        avue.wiper().await.unwrap();

        let frames = sent.frames();
        assert_eq!(frames[0][3], 0x07);
        assert_eq!(frames[0][5], 63);
    }

    #[tokio::test]
    async fn test_pan_rejects_negative_degrees() {
        let (avue, sent) = avue();

        let result = avue.pan(Pan::Right, -1.0, Speed::NORMAL).await;

        assert!(matches!(
            result,
            Err(Error::Types(pelcod_types::Error::Validation(_)))
        ));
        assert!(sent.frames().is_empty());
    }

    #[tokio::test]
    async fn test_tilt_rejects_nan_degrees() {
        let (avue, sent) = avue();

        let result = avue.tilt(Tilt::Up, f64::NAN, Speed::NORMAL).await;

        assert!(matches!(
            result,
            Err(Error::Types(pelcod_types::Error::Validation(_)))
        ));
        assert!(sent.frames().is_empty());
    }

    #[tokio::test]
    async fn test_azimuth_rejects_out_of_range() {
        let (avue, sent) = avue();

        assert!(matches!(
            avue.azimuth(361.0).await,
            Err(Error::Types(pelcod_types::Error::Validation(_)))
        ));
        assert!(sent.frames().is_empty());
    }

    #[tokio::test]
    async fn test_azimuth_takes_the_shorter_way() {
        tokio::time::pause();
        let (avue, sent) = avue();

        avue.azimuth(270.0).await.unwrap();

        let frames = sent.frames();
        // home, then pan left (cmd2 bit 0x04), then stop
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0][3], 0x07);
        assert_eq!(frames[1][3] & 0x04, 0x04);
        assert_eq!(frames[2][2..4], [0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_pan_moves_then_stops() {
        tokio::time::pause();
        let (avue, sent) = avue();

        avue.pan(Pan::Right, 45.0, Speed::NORMAL).await.unwrap();

        let frames = sent.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0][3] & 0x02, 0x02);
        assert_eq!(frames[0][4], 0x20);
        assert_eq!(frames[1][2..4], [0x00, 0x00]);
    }
}

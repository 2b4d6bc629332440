//! Sticky-speed session state
//!
//! The protocol has no "keep current speed" encoding: every standard
//! command carries both speed bytes. The session remembers the last pan
//! and tilt speed sent so that a motion call may omit either and reuse the
//! previous value. Nothing else about the camera is tracked; the device
//! is open-loop.

use std::sync::Arc;

use crate::speed::Speed;

/// Shared sticky-speed state
///
/// Thread-safe and cheap to clone (`Arc` internally). Mutation happens
/// only on the command-issuing path; callers issuing from multiple threads
/// must already hold the transport write lock, which serializes the
/// commit with the write it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    speeds: parking_lot::Mutex<Speeds>,
}

#[derive(Debug, Clone, Copy)]
struct Speeds {
    pan: Speed,
    tilt: Speed,
}

impl Session {
    /// Create a session with both axes at the slowest speed
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                speeds: parking_lot::Mutex::new(Speeds {
                    pan: Speed::SLOW,
                    tilt: Speed::SLOW,
                }),
            }),
        }
    }

    /// Last pan speed sent
    pub fn pan_speed(&self) -> Speed {
        self.inner.speeds.lock().pan
    }

    /// Last tilt speed sent
    pub fn tilt_speed(&self) -> Speed {
        self.inner.speeds.lock().tilt
    }

    /// Resolve omitted speeds against the sticky values and commit the
    /// result as the new sticky state
    ///
    /// The input speeds are already validated by construction, so this
    /// cannot fail; it runs after all other validation and before the
    /// frame is written.
    pub fn resolve(&self, pan: Option<Speed>, tilt: Option<Speed>) -> (Speed, Speed) {
        let mut speeds = self.inner.speeds.lock();

        let pan = pan.unwrap_or(speeds.pan);
        let tilt = tilt.unwrap_or(speeds.tilt);
        speeds.pan = pan;
        speeds.tilt = tilt;

        (pan, tilt)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

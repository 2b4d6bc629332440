//! Background receive loop
//!
//! Pelco-D devices raise alarms by sending unsolicited status replies.
//! [`LinkSession`] shares the camera's transport and polls it for those
//! replies, delivering them over a bounded channel. The loop takes the
//! transport lock only for one timed read at a time, so command writers
//! (which hold the lock across their whole write + paired read) are
//! never interleaved with it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use pelcod_core::{response, response::STATUS_REPLY_LEN, AlarmVector};
use pelcod_transport::Transport;

use crate::camera::Camera;
use crate::error::{Error, Result};

/// Receive-loop lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkState {
    Idle = 0,
    Receiving = 1,
    ShuttingDown = 2,
    Closed = 3,
}

impl LinkState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Receiving,
            2 => Self::ShuttingDown,
            _ => Self::Closed,
        }
    }
}

/// Event delivered by the receive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RxEvent {
    /// An unsolicited status reply carrying the device's alarm vector
    Status(AlarmVector),
    /// The loop has exited; no further events will arrive
    EndOfStream,
}

/// Background receiver attached to a camera's link
pub struct LinkSession {
    transport: Arc<Mutex<Box<dyn Transport>>>,
    state: Arc<AtomicU8>,
    poll_timeout: Duration,
    handle: Option<JoinHandle<()>>,
}

impl LinkSession {
    /// Attach to a camera's transport without starting the loop
    pub fn attach(camera: &Camera) -> Self {
        Self {
            transport: camera.shared_transport(),
            state: Arc::new(AtomicU8::new(LinkState::Idle as u8)),
            poll_timeout: camera.poll_timeout(),
            handle: None,
        }
    }

    /// Set the per-poll read timeout
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> LinkState {
        LinkState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Spawn the receive loop
    ///
    /// Returns the consumer end of a bounded queue of `queue_depth`
    /// events. If the consumer falls behind until the queue is full, the
    /// loop logs a warning and shuts itself down rather than block the
    /// shared transport. The final event on the queue is
    /// [`RxEvent::EndOfStream`] (dropped if the queue is full at exit).
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`] unless the session is `Idle`.
    pub fn start(&mut self, queue_depth: usize) -> Result<mpsc::Receiver<RxEvent>> {
        if self
            .state
            .compare_exchange(
                LinkState::Idle as u8,
                LinkState::Receiving as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(Error::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel(queue_depth);
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let poll_timeout = self.poll_timeout;

        self.handle = Some(tokio::spawn(async move {
            {
                let transport = transport.lock().await;
                debug!("Receive loop started on {}", transport.endpoint());
            }

            while state.load(Ordering::Acquire) == LinkState::Receiving as u8 {
                let read = {
                    let mut transport = transport.lock().await;
                    transport.receive(STATUS_REPLY_LEN, poll_timeout).await
                };

                let buf = match read {
                    Ok(buf) => buf,
                    Err(e) => {
                        warn!("Receive loop transport error: {}", e);
                        state.store(LinkState::ShuttingDown as u8, Ordering::Release);
                        break;
                    }
                };

                match response::decode_status(&buf) {
                    Ok(None) => {}
                    Ok(Some(alarms)) => match tx.try_send(RxEvent::Status(alarms)) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            warn!("Receive queue full, shutting down receive loop");
                            state.store(LinkState::ShuttingDown as u8, Ordering::Release);
                        }
                        Err(TrySendError::Closed(_)) => {
                            debug!("Receive queue consumer dropped");
                            state.store(LinkState::ShuttingDown as u8, Ordering::Release);
                        }
                    },
                    Err(e) => {
                        warn!("Discarding malformed status reply: {}", e);
                    }
                }
            }

            let _ = tx.try_send(RxEvent::EndOfStream);
            state.store(LinkState::Closed as u8, Ordering::Release);

            debug!("Receive loop closed");
        }));

        Ok(rx)
    }

    /// Ask the loop to exit after its current poll
    pub fn shutdown(&self) {
        let _ = self.state.compare_exchange(
            LinkState::Receiving as u8,
            LinkState::ShuttingDown as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Wait for the loop task to finish
    pub async fn wait_for_shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn session_with_replies(replies: &[&[u8]]) -> LinkSession {
        let (mut mock, _sent) = MockTransport::new();
        for reply in replies {
            mock.push_reply(reply);
        }
        let camera =
            Camera::new(Box::new(mock), 1).with_timeout(Duration::from_millis(10));
        LinkSession::attach(&camera)
    }

    #[tokio::test]
    async fn test_delivers_alarm_events_then_end_of_stream() {
        let mut session = session_with_replies(&[
            &[0xFF, 0x01, 0x05, 0x06],
            &[0xFF, 0x01, 0x02, 0x03],
        ]);

        let mut rx = session.start(8).unwrap();
        assert_eq!(session.state(), LinkState::Receiving);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first, RxEvent::Status(AlarmVector::ALARM1 | AlarmVector::ALARM3));
        assert_eq!(second, RxEvent::Status(AlarmVector::ALARM2));

        session.shutdown();
        assert_eq!(rx.recv().await.unwrap(), RxEvent::EndOfStream);

        session.wait_for_shutdown().await;
        assert_eq!(session.state(), LinkState::Closed);
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut session = session_with_replies(&[]);

        let _rx = session.start(8).unwrap();
        assert!(matches!(session.start(8), Err(Error::AlreadyStarted)));

        session.shutdown();
        session.wait_for_shutdown().await;
    }

    #[tokio::test]
    async fn test_malformed_reply_is_discarded_not_fatal() {
        let mut session = session_with_replies(&[
            &[0xFF, 0x01, 0x05, 0x99], // bad checksum
            &[0xFF, 0x01, 0x01, 0x02],
        ]);

        let mut rx = session.start(8).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event, RxEvent::Status(AlarmVector::ALARM1));

        session.shutdown();
        session.wait_for_shutdown().await;
    }

    #[tokio::test]
    async fn test_queue_full_shuts_the_loop_down() {
        let mut session = session_with_replies(&[
            &[0xFF, 0x01, 0x01, 0x02],
            &[0xFF, 0x01, 0x02, 0x03],
        ]);

        let mut rx = session.start(1).unwrap();
        session.wait_for_shutdown().await;
        assert_eq!(session.state(), LinkState::Closed);

        // Only the first event fit; the end-of-stream marker was dropped
        assert_eq!(rx.recv().await.unwrap(), RxEvent::Status(AlarmVector::ALARM1));
        assert_eq!(rx.recv().await, None);
    }
}

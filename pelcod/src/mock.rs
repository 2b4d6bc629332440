//! Scripted in-memory transport for tests
//!
//! Replies are queued ahead of time; each `receive` call consumes one.
//! With no reply queued, `receive` sleeps out its timeout and returns
//! empty, exactly like a silent serial line.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

use pelcod_transport::{Error, Result, Transport};

/// Shared handle onto the bytes a [`MockTransport`] has sent
#[derive(Clone)]
pub struct SentLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl SentLog {
    /// Every frame sent so far, in order
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }
}

pub struct MockTransport {
    replies: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    connected: bool,
}

impl MockTransport {
    pub fn new() -> (Self, SentLog) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            replies: VecDeque::new(),
            sent: Arc::clone(&sent),
            connected: true,
        };
        (transport, SentLog(sent))
    }

    /// Queue a reply buffer for a future `receive` call
    pub fn push_reply(&mut self, reply: &[u8]) {
        self.replies.push_back(reply.to_vec());
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn receive(&mut self, count: usize, timeout: Duration) -> Result<BytesMut> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        match self.replies.pop_front() {
            Some(mut reply) => {
                reply.truncate(count);
                Ok(BytesMut::from(&reply[..]))
            }
            None => {
                tokio::time::sleep(timeout).await;
                Ok(BytesMut::new())
            }
        }
    }

    async fn flush_input(&mut self) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn endpoint(&self) -> String {
        "mock".into()
    }
}

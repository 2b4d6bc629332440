//! Serial (RS-485) transport
//!
//! PTZ mounts of this family sit on a half-duplex RS-485 line, usually
//! behind a USB adapter, at 4800 or 9600 baud with 8-N-1 framing and no
//! flow control.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// Serial transport for Pelco-D devices
pub struct SerialTransport {
    port: Option<SerialStream>,
    port_name: String,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate
    ///
    /// Framing is fixed at 8 data bits, 1 stop bit, no parity, no flow
    /// control, the line discipline every device of this family uses.
    pub async fn open(port: impl Into<String>, baud_rate: u32) -> Result<Self> {
        let port_name = port.into();

        debug!("Opening serial port {} at {} baud...", port_name, baud_rate);

        let stream = tokio_serial::new(&port_name, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|source| Error::Open {
                port: port_name.clone(),
                source,
            })?;

        debug!("Opened {} at {} baud", port_name, baud_rate);

        Ok(Self {
            port: Some(stream),
            port_name,
        })
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        port.write_all(data).await?;
        port.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, count: usize, timeout: Duration) -> Result<BytesMut> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(count);
        let mut filled = 0;
        let deadline = tokio::time::Instant::now() + timeout;

        // Accumulate until the frame is complete or the deadline passes;
        // a short (or empty) buffer is the caller's "no reply" signal.
        while filled < count {
            match tokio::time::timeout_at(deadline, port.read(&mut buf[filled..])).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(Error::Io(e)),
                Err(_) => break,
            }
        }

        buf.truncate(filled);

        trace!("Received {} of {} bytes: {:02X?}", filled, count, &buf[..]);

        Ok(buf)
    }

    async fn flush_input(&mut self) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        port.clear(ClearBuffer::Input)
            .map_err(|e| Error::Io(e.into()))?;

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            debug!("Closing serial port {}...", self.port_name);
            let _ = port.flush().await;
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn endpoint(&self) -> String {
        self.port_name.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still open: {}", self.port_name);
        }
    }
}

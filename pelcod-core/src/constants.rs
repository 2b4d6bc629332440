//! Protocol constants

use std::time::Duration;

/// Default serial device path
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default RS-485 baud rate
pub const DEFAULT_BAUD_RATE: u32 = 4800;

/// Baud rates the protocol family is deployed at
pub const SUPPORTED_BAUD_RATES: [u32; 2] = [4800, 9600];

/// Default device address on the bus
pub const DEFAULT_CAMERA_ADDRESS: u8 = 1;

/// Address 0 is a broadcast by common deployment convention; the codec
/// does not enforce it
pub const BROADCAST_ADDRESS: u8 = 0;

/// Default serial read timeout
pub const DEFAULT_SERIAL_TIMEOUT: Duration = Duration::from_millis(100);

/// Opcode (word4) of the part-number query command
///
/// Not part of the extended catalog: its reply is the 5-byte part-number
/// layout rather than the alarm-status echo.
pub const QUERY_OPCODE: u8 = 0x45;

//! Error types for pelcod-core

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An extended-command argument slot requires a value and none was given
    #[error("Missing argument: command requires a value in {lo}..={hi}")]
    MissingArgument {
        lo: u8,
        hi: u8,
    },

    /// A supplied argument falls outside the command's allowed range
    #[error("Argument out of range: {provided} does not lie in {lo}..={hi}")]
    ArgumentOutOfRange {
        lo: u8,
        hi: u8,
        provided: u8,
    },

    /// A supplied argument conflicts with a fixed-value argument slot
    #[error("Argument mismatch: slot is fixed at {expected}, got {provided}")]
    ArgumentMismatch {
        expected: u8,
        provided: u8,
    },

    /// Scan mode and camera enable were combined in a way the protocol
    /// cannot express (manual scan with camera on, or auto scan with
    /// camera off)
    #[error("Illegal scan-mode/camera-enable combination")]
    IllegalModeCombination,

    /// Speed byte outside the linear range and not the turbo sentinel
    #[error("Invalid speed: 0x{0:02X} (must be 0x00..=0x3F or 0xFF)")]
    InvalidSpeed(u8),

    /// Frame is shorter than its layout requires (transport timeout
    /// mid-frame or truncated reply)
    #[error("Frame too short: expected {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Leading sync byte is not 0xFF
    #[error("Bad sync byte: expected 0xFF, got 0x{0:02X}")]
    BadSync(u8),

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },
}

impl Error {
    /// Check whether the error was raised before any byte was built,
    /// i.e. the command was rejected and nothing reached the wire
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::ArgumentOutOfRange { .. }
                | Self::ArgumentMismatch { .. }
                | Self::IllegalModeCombination
                | Self::InvalidSpeed(_)
        )
    }
}

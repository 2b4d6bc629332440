//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Core protocol error (validation, framing, checksum)
    #[error("Protocol error: {0}")]
    Core(#[from] pelcod_core::Error),

    /// Transport error (serial I/O)
    #[error("Transport error: {0}")]
    Transport(#[from] pelcod_transport::Error),

    /// Shared type error
    #[error("Type error: {0}")]
    Types(#[from] pelcod_types::Error),

    /// Operation permanently unavailable on this device variant
    #[error("Operation not supported by this device: {0}")]
    Unsupported(&'static str),

    /// Background receive session is not in the state the call requires
    #[error("Receive session already started")]
    AlreadyStarted,
}

//! Camera identification structures

use std::fmt;

/// Camera identification returned by the part-number query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInfo {
    /// Device address on the bus
    pub address: u8,

    /// Manufacturer part number
    pub part_number: u16,
}

impl CameraInfo {
    pub fn new(address: u8, part_number: u16) -> Self {
        Self {
            address,
            part_number,
        }
    }
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Camera[addr: {}, part: {}]",
            self.address, self.part_number
        )
    }
}

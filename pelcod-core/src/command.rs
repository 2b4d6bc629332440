//! Extended command catalog
//!
//! Extended commands are selected from a fixed catalog; each carries two
//! opcode bytes (word3, word4) and two argument slots validated against a
//! per-command spec. The catalog is the single source of truth for which
//! opcode pair and argument legality corresponds to each named operation;
//! presets, auxiliaries, zones, on-screen text, and the image-control bank
//! all share one dispatch path.

use std::fmt;

use crate::{
    error::{Error, Result},
    frame::Frame,
};

/// Argument slot specification for an extended command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// The slot always carries this byte; a caller may omit the argument
    /// or pass exactly this value
    Fixed(u8),

    /// The slot takes a caller-supplied byte in the inclusive range
    Range(u8, u8),
}

impl ArgSpec {
    /// Validate a caller-supplied argument against this slot
    ///
    /// # Errors
    ///
    /// - [`Error::ArgumentMismatch`] if a fixed slot gets a different value
    /// - [`Error::MissingArgument`] if a ranged slot gets `None`
    /// - [`Error::ArgumentOutOfRange`] if a ranged slot's value falls
    ///   outside the inclusive bounds
    pub fn validate(self, arg: Option<u8>) -> Result<u8> {
        match self {
            Self::Fixed(fixed) => match arg {
                None => Ok(fixed),
                Some(value) if value == fixed => Ok(fixed),
                Some(value) => Err(Error::ArgumentMismatch {
                    expected: fixed,
                    provided: value,
                }),
            },
            Self::Range(lo, hi) => match arg {
                None => Err(Error::MissingArgument { lo, hi }),
                Some(value) if (lo..=hi).contains(&value) => Ok(value),
                Some(value) => Err(Error::ArgumentOutOfRange {
                    lo,
                    hi,
                    provided: value,
                }),
            },
        }
    }
}

/// Parameter bank selector for the paired image-control commands
///
/// Several exposure/white-balance/gain parameters exist twice on the wire,
/// distinguished only by word3 = 0x00 or 0x01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bank {
    Zero = 0x00,
    One = 0x01,
}

/// Catalog entry: opcode pair plus both argument slot specs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub word3: u8,
    pub word4: u8,
    pub arg1: ArgSpec,
    pub arg2: ArgSpec,
}

/// Extended protocol commands
///
/// A closed enumeration: every named operation maps at compile time to its
/// opcode/argument-spec tuple, so an unknown command cannot be expressed.
///
/// Selector-style arguments (aux, zone, alarm-ack) use the physically
/// meaningful `1..=8` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedCommand {
    SetPreset,
    ClearPreset,
    GotoPreset,
    Flip,
    GotoZeroPan,
    SetAux,
    ClearAux,
    RemoteReset,
    SetZoneStart,
    SetZoneEnd,
    WriteChar,
    ClearScreen,
    AlarmAck,
    ZoneScanOn,
    ZoneScanOff,
    PatternStart,
    PatternStop,
    RunPattern,
    ZoomSpeed,
    FocusSpeed,
    ResetCamera,
    AutoFocus,
    AutoIris,
    Agc,
    BacklightComp,
    Awb,
    PhaseDelayMode,
    ShutterSpeed,
    LineLockDelay(Bank),
    WhiteBalanceRb(Bank),
    WhiteBalanceMg(Bank),
    AdjustGain(Bank),
    AutoIrisLevel(Bank),
    AutoIrisPeak(Bank),
}

impl ExtendedCommand {
    /// Look up the catalog entry for this command
    pub fn spec(self) -> CommandSpec {
        use ArgSpec::{Fixed, Range};

        let (word3, word4, arg1, arg2) = match self {
            Self::SetPreset => (0x00, 0x03, Fixed(0x00), Range(0, 255)),
            Self::ClearPreset => (0x00, 0x05, Fixed(0x00), Range(0, 255)),
            Self::GotoPreset => (0x00, 0x07, Fixed(0x00), Range(0, 255)),
            Self::Flip => (0x00, 0x07, Fixed(0x00), Fixed(21)),
            Self::GotoZeroPan => (0x00, 0x07, Fixed(0x00), Fixed(22)),
            Self::SetAux => (0x00, 0x09, Fixed(0x00), Range(1, 8)),
            Self::ClearAux => (0x00, 0x0B, Fixed(0x00), Range(1, 8)),
            Self::RemoteReset => (0x00, 0x0F, Fixed(0x00), Fixed(0x00)),
            Self::SetZoneStart => (0x00, 0x11, Fixed(0x00), Range(1, 8)),
            Self::SetZoneEnd => (0x00, 0x13, Fixed(0x00), Range(1, 8)),
            Self::WriteChar => (0x00, 0x15, Range(0, 28), Range(0, 127)),
            Self::ClearScreen => (0x00, 0x17, Fixed(0x00), Fixed(0x00)),
            Self::AlarmAck => (0x00, 0x19, Fixed(0x00), Range(1, 8)),
            Self::ZoneScanOn => (0x00, 0x1B, Fixed(0x00), Fixed(0x00)),
            Self::ZoneScanOff => (0x00, 0x1D, Fixed(0x00), Fixed(0x00)),
            Self::PatternStart => (0x00, 0x1F, Fixed(0x00), Fixed(0x00)),
            Self::PatternStop => (0x00, 0x21, Fixed(0x00), Fixed(0x00)),
            Self::RunPattern => (0x00, 0x23, Fixed(0x00), Fixed(0x00)),
            Self::ZoomSpeed => (0x00, 0x25, Fixed(0x00), Range(0, 3)),
            Self::FocusSpeed => (0x00, 0x27, Fixed(0x00), Range(0, 3)),
            Self::ResetCamera => (0x00, 0x29, Fixed(0x00), Fixed(0x00)),
            Self::AutoFocus => (0x00, 0x2B, Fixed(0x00), Range(0, 2)),
            Self::AutoIris => (0x00, 0x2D, Fixed(0x00), Range(0, 2)),
            Self::Agc => (0x00, 0x2F, Fixed(0x00), Range(0, 2)),
            Self::BacklightComp => (0x00, 0x31, Fixed(0x00), Range(0, 2)),
            Self::Awb => (0x00, 0x33, Fixed(0x00), Range(0, 2)),
            Self::PhaseDelayMode => (0x00, 0x35, Fixed(0x00), Fixed(0x00)),
            Self::ShutterSpeed => (0x00, 0x37, Range(0, 255), Range(0, 255)),
            Self::LineLockDelay(bank) => (bank as u8, 0x39, Range(0, 255), Range(0, 255)),
            Self::WhiteBalanceRb(bank) => (bank as u8, 0x3B, Range(0, 255), Range(0, 255)),
            Self::WhiteBalanceMg(bank) => (bank as u8, 0x3D, Range(0, 255), Range(0, 255)),
            Self::AdjustGain(bank) => (bank as u8, 0x3F, Range(0, 255), Range(0, 255)),
            Self::AutoIrisLevel(bank) => (bank as u8, 0x41, Range(0, 255), Range(0, 255)),
            Self::AutoIrisPeak(bank) => (bank as u8, 0x43, Range(0, 255), Range(0, 255)),
        };

        CommandSpec {
            word3,
            word4,
            arg1,
            arg2,
        }
    }

    /// Get the command name
    pub fn name(self) -> &'static str {
        match self {
            Self::SetPreset => "SetPreset",
            Self::ClearPreset => "ClearPreset",
            Self::GotoPreset => "GotoPreset",
            Self::Flip => "Flip",
            Self::GotoZeroPan => "GotoZeroPan",
            Self::SetAux => "SetAux",
            Self::ClearAux => "ClearAux",
            Self::RemoteReset => "RemoteReset",
            Self::SetZoneStart => "SetZoneStart",
            Self::SetZoneEnd => "SetZoneEnd",
            Self::WriteChar => "WriteChar",
            Self::ClearScreen => "ClearScreen",
            Self::AlarmAck => "AlarmAck",
            Self::ZoneScanOn => "ZoneScanOn",
            Self::ZoneScanOff => "ZoneScanOff",
            Self::PatternStart => "PatternStart",
            Self::PatternStop => "PatternStop",
            Self::RunPattern => "RunPattern",
            Self::ZoomSpeed => "ZoomSpeed",
            Self::FocusSpeed => "FocusSpeed",
            Self::ResetCamera => "ResetCamera",
            Self::AutoFocus => "AutoFocus",
            Self::AutoIris => "AutoIris",
            Self::Agc => "AGC",
            Self::BacklightComp => "BacklightComp",
            Self::Awb => "AWB",
            Self::PhaseDelayMode => "PhaseDelayMode",
            Self::ShutterSpeed => "ShutterSpeed",
            Self::LineLockDelay(_) => "LineLockDelay",
            Self::WhiteBalanceRb(_) => "WhiteBalanceRB",
            Self::WhiteBalanceMg(_) => "WhiteBalanceMG",
            Self::AdjustGain(_) => "AdjustGain",
            Self::AutoIrisLevel(_) => "AutoIrisLevel",
            Self::AutoIrisPeak(_) => "AutoIrisPeak",
        }
    }

    /// Validate both arguments and return the resolved data bytes
    ///
    /// Both slots are always evaluated before the first failure aborts the
    /// command, so no partial frame can reach the wire.
    pub fn data_bytes(self, arg1: Option<u8>, arg2: Option<u8>) -> Result<(u8, u8)> {
        let spec = self.spec();
        let data1 = spec.arg1.validate(arg1);
        let data2 = spec.arg2.validate(arg2);
        Ok((data1?, data2?))
    }

    /// Build the complete extended-command frame for the given address
    pub fn frame(self, address: u8, arg1: Option<u8>, arg2: Option<u8>) -> Result<Frame> {
        let spec = self.spec();
        let (data1, data2) = self.data_bytes(arg1, arg2)?;
        Ok(Frame::new(address, spec.word3, spec.word4, data1, data2))
    }
}

impl fmt::Display for ExtendedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineLockDelay(bank)
            | Self::WhiteBalanceRb(bank)
            | Self::WhiteBalanceMg(bank)
            | Self::AdjustGain(bank)
            | Self::AutoIrisLevel(bank)
            | Self::AutoIrisPeak(bank) => write!(f, "{}[{}]", self.name(), *bank as u8),
            _ => f.write_str(self.name()),
        }
    }
}

//! This module contains the typed values exchanged with the instrument.

use core::fmt::{self, Write as _};

use strum_macros::{Display, EnumIter, EnumString};

use crate::value::{FromScpi, ToScpi};

/// Depth of the E8257D firmware error queue.
pub const ERROR_QUEUE_DEPTH: usize = 30;

/// Amplitude units accepted by `UNIT:POW`.
///
/// The configured unit applies to every amplitude entry and readback until it is changed
/// again, so it behaves as instrument-global state shared by all callers.
#[derive(Debug, Display, EnumString, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum PowerUnit {
    /// dB relative to one milliwatt. The canonical unit for amplitude readback.
    #[strum(serialize = "DBM")]
    Dbm,
    /// dB relative to one microvolt.
    #[strum(serialize = "DBUV")]
    Dbuv,
    /// Volts.
    #[strum(serialize = "V")]
    Volt,
    /// Volts, EMF (open-circuit).
    #[strum(serialize = "VEMF")]
    Vemf,
    /// Watts.
    #[strum(serialize = "WATT")]
    Watt,
}

impl ToScpi for PowerUnit {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{self}")
    }
}

impl FromScpi for PowerUnit {
    fn from_scpi(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// Used to be less ambiguous about whether something is on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    Off,
    /// Enabled.
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

impl ToScpi for State {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match self {
            State::Off => out.write_str("OFF"),
            State::On => out.write_str("ON"),
        }
    }
}

impl FromScpi for State {
    // The instrument replies "0"/"1" but accepts "ON"/"OFF" too.
    fn from_scpi(text: &str) -> Option<Self> {
        match text {
            "0" | "OFF" => Some(State::Off),
            "1" | "ON" => Some(State::On),
            _ => None,
        }
    }
}

/// One entry popped from the instrument's error queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    /// Standard SCPI error code. Negative codes are defined by SCPI, positive codes are
    /// instrument-specific, `0` means "no error".
    pub code: i32,
    /// Human-readable description, truncated if the firmware is unusually verbose.
    pub message: heapless::String<64>,
}

impl FromScpi for DeviceError {
    /// Parses a `SYST:ERR?` reply of the shape `-222,"Data out of range"`.
    fn from_scpi(text: &str) -> Option<Self> {
        let (code, message) = text.split_once(',')?;
        let code = code.trim().parse().ok()?;
        let message = message
            .trim()
            .trim_start_matches('"')
            .trim_end_matches('"');
        let mut truncated = heapless::String::new();
        for ch in message.chars() {
            if truncated.push(ch).is_err() {
                break;
            }
        }
        Some(DeviceError {
            code,
            message: truncated,
        })
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},\"{}\"", self.code, self.message)
    }
}

/// Everything drained from the error queue after one exchange, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceErrorList(pub heapless::Vec<DeviceError, ERROR_QUEUE_DEPTH>);

impl fmt::Display for DeviceErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Parsed `*IDN?` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub manufacturer: heapless::String<32>,
    pub model: heapless::String<32>,
    pub serial: heapless::String<32>,
    pub firmware: heapless::String<32>,
}

impl FromScpi for Identity {
    fn from_scpi(text: &str) -> Option<Self> {
        let mut fields = text.splitn(4, ',');
        let manufacturer = FromScpi::from_scpi(fields.next()?.trim())?;
        let model = FromScpi::from_scpi(fields.next()?.trim())?;
        let serial = FromScpi::from_scpi(fields.next()?.trim())?;
        let firmware = FromScpi::from_scpi(fields.next()?.trim())?;
        Some(Identity {
            manufacturer,
            model,
            serial,
            firmware,
        })
    }
}

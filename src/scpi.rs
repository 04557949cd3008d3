//! This module defines the SCPI command mnemonics used on the E8257D.
//!
//! Constants are the bare subsystem paths; [`query`](crate::siggen::E8257d::query) appends the
//! `?` suffix itself, so the same mnemonic serves both the set and the query form where the
//! instrument supports both.

/// __R__ - Identification string, `*IDN?`.
///
/// Replies with four comma-separated fields:
/// `<manufacturer>,<model>,<serial>,<firmware>`, e.g.
/// `Agilent Technologies,E8257D,MY50001234,C.06.26`.
pub const IDENTITY: &str = "*IDN";

/// __W__ - Full instrument preset, `*RST`.
pub const RESET: &str = "*RST";

/// __W__ - Clear status registers and the error queue, `*CLS`.
pub const CLEAR_STATUS: &str = "*CLS";

/// __R__ - Pop the oldest entry from the firmware error queue.
///
/// Replies `+0,"No error"` when the queue is empty. The queue holds up to
/// 30 entries; on overflow the newest entry is replaced with `-350`.
pub const ERROR_QUEUE: &str = "SYST:ERR";

/// __W__ - Return the instrument to front-panel (local) control.
pub const LOCAL: &str = "SYST:COMM:GTL";

/// __R/W__ - Power unit used for amplitude entry and readback.
///
/// See [`PowerUnit`](crate::types::PowerUnit) for the accepted tokens. This is
/// instrument-global state: it affects every amplitude query until changed again.
pub const POWER_UNIT: &str = "UNIT:POW";

/// __R/W__ - CW frequency setting.
///
/// Value is in Hz, 250 kHz to 20/40/67 GHz depending on the frequency option.
pub const FREQUENCY: &str = "FREQ";

/// __R/W__ - RF output amplitude.
///
/// Set and read back in the currently configured [`POWER_UNIT`].
pub const POWER_LEVEL: &str = "POW";

/// __R/W__ - RF output on/off.
/// * `0` - Output off.
/// * `1` - Output on.
///
/// See [`State`](crate::types::State).
pub const OUTPUT_STATE: &str = "OUTP";

/// __R/W__ - List-mode amplitude points, comma-separated.
pub const LIST_POWER: &str = "LIST:POW";

use core::fmt::Write as _;

use embedded_io::Error as _;
use log::debug;

use crate::{
    error::{Error, Result},
    scpi,
    types::{DeviceError, DeviceErrorList, Identity, PowerUnit, State, ERROR_QUEUE_DEPTH},
    value::{FromScpi, ToScpi},
};

/// Model token expected in the `*IDN?` reply. Anything else fails [`E8257d::initialise`].
pub const EXPECTED_MODEL: &str = "E8257D";

/// You can create an E8257d using any interface which implements [embedded_io::Read] &
/// [embedded_io::Write].
///
/// For its methods, we generally use the nomenclature that "set" means to write a
/// configuration and "get" means to read back a configuration value. Whereas "read" means to
/// get a measured or derived value.
///
/// Every public command and query drains the instrument's error queue afterwards, so an `Ok`
/// return guarantees the queue was empty once the exchange completed. The checked building
/// blocks ([`post`](Self::post), [`set`](Self::set), [`query`](Self::query) and their
/// sequence variants) are public, so subsystems this crate has no convenience method for can
/// still be driven with the same guarantees.
///
/// `L` is the line buffer capacity in bytes and bounds both outgoing commands and replies.
pub struct E8257d<S: embedded_io::Read + embedded_io::Write, const L: usize = 256> {
    interface: S,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> E8257d<S, L> {
    /// Wrap an already-open interface without touching the instrument.
    ///
    /// The session is unverified until [`initialise`](Self::initialise) has run; prefer
    /// [`try_new`](Self::try_new) unless you need to keep hold of the interface when
    /// initialisation fails.
    pub fn new(interface: S) -> Self {
        Self { interface }
    }

    /// Wrap an interface and run [`initialise`](Self::initialise) on it.
    pub fn try_new(interface: S) -> Result<Self, S::Error> {
        let mut siggen = Self::new(interface);
        siggen.initialise()?;
        Ok(siggen)
    }

    /// Verify that the right instrument is on the other end of the link.
    ///
    /// Queries `*IDN?`, checks the model field against [`EXPECTED_MODEL`], then runs one
    /// standalone error-queue audit so the session starts clean. A model mismatch returns
    /// immediately without that audit.
    pub fn initialise(&mut self) -> Result<(), S::Error> {
        let identity: Identity = self.query(scpi::IDENTITY)?;
        if identity.model.as_str() != EXPECTED_MODEL {
            return Err(Error::UnexpectedModel(identity.model));
        }
        self.check_errors()
    }

    /// Return the instrument to front-panel control.
    pub fn local_control(&mut self) -> Result<(), S::Error> {
        self.post(scpi::LOCAL)
    }

    /// Return the instrument to local control and hand the interface back.
    ///
    /// The interface is returned even when the local-control command fails, since leaving
    /// the port open on a device error would leak it; the command's result is reported
    /// alongside. Dropping the returned interface closes the link.
    pub fn close(mut self) -> (S, Result<(), S::Error>) {
        let released = self.local_control();
        (self.interface, released)
    }

    /// Give up the interface without talking to the instrument.
    pub fn into_inner(self) -> S {
        self.interface
    }

    /// Send a zero-argument instruction, then audit the error queue.
    pub fn post(&mut self, key: &str) -> Result<(), S::Error> {
        self.send_line(key)?;
        self.check_errors()
    }

    /// Send `key value`, then audit the error queue.
    pub fn set<T: ToScpi>(&mut self, key: &str, value: T) -> Result<(), S::Error> {
        let mut line: heapless::String<L> = heapless::String::new();
        write!(line, "{key} ").map_err(|_| Error::BufferError)?;
        value.fmt_scpi(&mut line).map_err(|_| Error::BufferError)?;
        self.send_line(&line)?;
        self.check_errors()
    }

    /// Send `key v1,v2,...`, then audit the error queue.
    pub fn set_sequence<T: ToScpi>(&mut self, key: &str, values: &[T]) -> Result<(), S::Error> {
        let mut line: heapless::String<L> = heapless::String::new();
        write!(line, "{key} ").map_err(|_| Error::BufferError)?;
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                line.push(',').map_err(|_| Error::BufferError)?;
            }
            value.fmt_scpi(&mut line).map_err(|_| Error::BufferError)?;
        }
        self.send_line(&line)?;
        self.check_errors()
    }

    /// Send `key?`, parse the one-line reply as a `T`, then audit the error queue.
    ///
    /// An unparsable reply fails with [`Error::InvalidResponse`] before the queue is read,
    /// so a local parse problem is never misreported as a device fault.
    pub fn query<T: FromScpi>(&mut self, key: &str) -> Result<T, S::Error> {
        let reply = self.query_line(key)?;
        let value = T::from_scpi(reply.trim()).ok_or(Error::InvalidResponse)?;
        self.check_errors()?;
        Ok(value)
    }

    /// Send `key?`, split the reply on commas and parse each field as a `T`, then audit the
    /// error queue. Field order matches the reply order.
    pub fn query_sequence<T: FromScpi, const N: usize>(
        &mut self,
        key: &str,
    ) -> Result<heapless::Vec<T, N>, S::Error> {
        let reply = self.query_line(key)?;
        let mut values = heapless::Vec::new();
        for field in reply.split(',') {
            let value = T::from_scpi(field.trim()).ok_or(Error::InvalidResponse)?;
            values.push(value).map_err(|_| Error::BufferError)?;
        }
        self.check_errors()?;
        Ok(values)
    }

    /// Drain the instrument's error queue, popping `SYST:ERR?` until it reports code 0.
    ///
    /// Succeeds only if the queue was already empty; otherwise fails with everything that
    /// was collected, oldest first. Draining is capped at the firmware queue depth so a
    /// device that never reports "no error" cannot wedge the driver. This is the sole place
    /// that decides whether the preceding operation succeeded on the device side.
    pub fn check_errors(&mut self) -> Result<(), S::Error> {
        let mut reported: heapless::Vec<DeviceError, ERROR_QUEUE_DEPTH> = heapless::Vec::new();
        loop {
            let reply = self.query_line(scpi::ERROR_QUEUE)?;
            let entry = DeviceError::from_scpi(reply.trim()).ok_or(Error::InvalidResponse)?;
            if entry.code == 0 {
                break;
            }
            debug!("instrument error queued: {entry}");
            if reported.push(entry).is_err() {
                break;
            }
        }
        if reported.is_empty() {
            Ok(())
        } else {
            Err(Error::Device(DeviceErrorList(reported)))
        }
    }

    /// Read one amplitude value in dBm regardless of the configured power unit.
    ///
    /// The instrument reports amplitude in whatever unit `UNIT:POW` is set to, which is
    /// global state shared with the front panel and other callers. This reads the current
    /// unit, pins dBm, queries `key`, and restores the original unit. Once the unit has
    /// been pinned the restore is attempted on every exit path; a failure in the amplitude
    /// query is reported in preference to a failure in the restore.
    pub fn query_amplitude(&mut self, key: &str) -> Result<f64, S::Error> {
        let original: PowerUnit = self.query(scpi::POWER_UNIT)?;
        self.set(scpi::POWER_UNIT, PowerUnit::Dbm)?;
        let amplitude = self.query::<f64>(key);
        let restored = self.set(scpi::POWER_UNIT, original);
        let amplitude = amplitude?;
        restored?;
        Ok(amplitude)
    }

    /// Sequence variant of [`query_amplitude`](Self::query_amplitude): the reply is a
    /// comma-separated list and every element is returned in dBm.
    pub fn query_amplitude_sequence<const N: usize>(
        &mut self,
        key: &str,
    ) -> Result<heapless::Vec<f64, N>, S::Error> {
        let original: PowerUnit = self.query(scpi::POWER_UNIT)?;
        self.set(scpi::POWER_UNIT, PowerUnit::Dbm)?;
        let amplitudes = self.query_sequence::<f64, N>(key);
        let restored = self.set(scpi::POWER_UNIT, original);
        let amplitudes = amplitudes?;
        restored?;
        Ok(amplitudes)
    }

    /// Return the parsed `*IDN?` identification.
    pub fn identity(&mut self) -> Result<Identity, S::Error> {
        self.query(scpi::IDENTITY)
    }

    /// Full instrument preset (`*RST`).
    pub fn reset(&mut self) -> Result<(), S::Error> {
        self.post(scpi::RESET)
    }

    /// Clear the status registers and the error queue (`*CLS`).
    pub fn clear_status(&mut self) -> Result<(), S::Error> {
        self.post(scpi::CLEAR_STATUS)
    }

    /// Set the CW frequency. Value supplied in Hz.
    pub fn set_frequency_hz(&mut self, frequency_hz: f64) -> Result<(), S::Error> {
        self.set(scpi::FREQUENCY, frequency_hz)
    }

    /// Get the current CW frequency setting. Value returned in Hz.
    pub fn get_frequency_hz(&mut self) -> Result<f64, S::Error> {
        self.query(scpi::FREQUENCY)
    }

    /// Enable/disable the RF output.
    pub fn set_output_state(&mut self, state: impl Into<State>) -> Result<(), S::Error> {
        self.set(scpi::OUTPUT_STATE, state.into())
    }

    /// Read whether the RF output is enabled or disabled.
    pub fn get_output_state(&mut self) -> Result<State, S::Error> {
        self.query(scpi::OUTPUT_STATE)
    }

    /// Set the power unit used for amplitude entry and readback.
    ///
    /// Note this is instrument-global: it also changes what every subsequent plain
    /// amplitude query reports. [`query_amplitude`](Self::query_amplitude) is immune.
    pub fn set_power_unit(&mut self, unit: PowerUnit) -> Result<(), S::Error> {
        self.set(scpi::POWER_UNIT, unit)
    }

    /// Get the currently configured power unit.
    pub fn get_power_unit(&mut self) -> Result<PowerUnit, S::Error> {
        self.query(scpi::POWER_UNIT)
    }

    /// Set the output amplitude, interpreted in the currently configured power unit.
    pub fn set_power_level(&mut self, level: f64) -> Result<(), S::Error> {
        self.set(scpi::POWER_LEVEL, level)
    }

    /// Read the output amplitude setting in dBm, whatever unit is configured.
    pub fn read_power_dbm(&mut self) -> Result<f64, S::Error> {
        self.query_amplitude(scpi::POWER_LEVEL)
    }

    /// Read the list-mode amplitude points in dBm, whatever unit is configured.
    pub fn read_power_sweep_dbm<const N: usize>(
        &mut self,
    ) -> Result<heapless::Vec<f64, N>, S::Error> {
        self.query_amplitude_sequence(scpi::LIST_POWER)
    }

    /// Write one terminated command line to the interface.
    fn send_line(&mut self, line: &str) -> Result<(), S::Error> {
        self.interface
            .write_all(line.as_bytes())
            .map_err(Error::SerialError)?;
        self.interface.write_all(b"\n").map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)?;
        debug!("sent: {line}");
        Ok(())
    }

    /// Read one reply line, stripping the terminator.
    ///
    /// A timeout with bytes already buffered is treated as end of reply, since some link
    /// bridges swallow the final terminator.
    fn read_line(&mut self) -> Result<heapless::String<L>, S::Error> {
        let mut raw: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.interface.read(&mut byte) {
                Ok(0) => {
                    if raw.is_empty() {
                        return Err(Error::Timeout);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    raw.push(byte[0]).map_err(|_| Error::BufferError)?;
                }
                Err(e) => {
                    if matches!(
                        e.kind(),
                        embedded_io::ErrorKind::TimedOut | embedded_io::ErrorKind::Other
                    ) {
                        if raw.is_empty() {
                            return Err(Error::Timeout);
                        }
                        break;
                    }
                    return Err(Error::SerialError(e));
                }
            }
        }
        while raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let text = core::str::from_utf8(&raw).map_err(|_| Error::InvalidResponse)?;
        let mut line = heapless::String::new();
        line.push_str(text).map_err(|_| Error::BufferError)?;
        debug!("received: {line}");
        Ok(line)
    }

    /// Send `key?` and read the raw reply line. No error-queue audit.
    fn query_line(&mut self, key: &str) -> Result<heapless::String<L>, S::Error> {
        let mut line: heapless::String<L> = heapless::String::new();
        write!(line, "{key}?").map_err(|_| Error::BufferError)?;
        self.send_line(&line)?;
        self.read_line()
    }
}

//! Our error types for the E8257D driver.

use thiserror::Error;

use crate::types::DeviceErrorList;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for E8257D communications.
///
/// `Device` carries every `(code, message)` pair drained from the instrument's
/// error queue after the failing exchange, oldest first.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Communication timeout")]
    Timeout,
    #[error("Line buffer overflow")]
    BufferError,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Instrument reported errors: {0}")]
    Device(DeviceErrorList),
    #[error("Unexpected instrument model: {0}")]
    UnexpectedModel(heapless::String<32>),
}

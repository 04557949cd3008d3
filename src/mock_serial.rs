//! We use this mocking module in unit tests to emulate the instrument end of a serial link.

/// Our mock type used to emulate a serial port with a scripted instrument behind it.
///
/// Replies are queued as whole lines up front with [`queue_reply`](MockSerial::queue_reply);
/// the driver consumes them in order as it reads. Everything the driver writes is captured
/// for assertion via [`written`](MockSerial::written).
pub struct MockSerial {
    /// Everything the driver has written to the port.
    write_buffer: heapless::Vec<u8, 1024>,
    /// Pre-scripted reply bytes, already terminated.
    read_buffer: heapless::Vec<u8, 1024>,
    /// Current position in the read buffer.
    read_position: usize,
    /// Flag to simulate write errors.
    should_error_on_write: bool,
    /// Flag to simulate read errors.
    should_error_on_read: bool,
}

#[derive(Debug)]
pub enum MockSerialError {
    /// Simulated timeout error.
    Timeout,
    /// Simulated buffer overflow.
    BufferOverflow,
    /// Generic simulated error for testing.
    SimulatedError,
    /// Would block - the reply script has been exhausted.
    WouldBlock,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MockSerialError::Timeout => write!(f, "simulated timeout"),
            MockSerialError::BufferOverflow => write!(f, "simulated buffer overflow"),
            MockSerialError::SimulatedError => write!(f, "simulated error"),
            MockSerialError::WouldBlock => write!(f, "would block: reply script exhausted"),
        }
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::TimedOut,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::WouldBlock);
        }

        let available = self.read_buffer.len() - self.read_position;
        let count = buf.len().min(available);
        buf[..count].copy_from_slice(&self.read_buffer[self.read_position..self.read_position + count]);
        self.read_position += count;
        Ok(count)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers.
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Append one reply line to the script. The newline terminator is added here.
    pub fn queue_reply(&mut self, line: &str) {
        self.read_buffer
            .extend_from_slice(line.as_bytes())
            .expect("mock read buffer full");
        self.read_buffer.push(b'\n').expect("mock read buffer full");
    }

    /// Everything written to the port so far, as text.
    pub fn written(&self) -> &str {
        core::str::from_utf8(&self.write_buffer).expect("driver wrote non-UTF8 data")
    }

    /// Clear the captured writes.
    pub fn clear_written(&mut self) {
        self.write_buffer.clear();
    }

    /// True once the driver has consumed every scripted reply.
    pub fn script_exhausted(&self) -> bool {
        self.read_position >= self.read_buffer.len()
    }

    /// Configure whether write operations should fail with an error.
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error.
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Read, Write};

    #[test]
    fn test_write_capture() {
        let mut mock = MockSerial::new();
        mock.write(b"FREQ 1000").unwrap();
        mock.write(b"\n").unwrap();
        assert_eq!(mock.written(), "FREQ 1000\n");

        mock.clear_written();
        assert_eq!(mock.written(), "");
    }

    #[test]
    fn test_scripted_replies_in_order() {
        let mut mock = MockSerial::new();
        mock.queue_reply("DBM");
        mock.queue_reply("+0,\"No error\"");

        let mut buf = [0u8; 64];
        let count = mock.read(&mut buf).unwrap();
        assert_eq!(&buf[..count], b"DBM\n+0,\"No error\"\n");
        assert!(mock.script_exhausted());
    }

    #[test]
    fn test_read_blocks_when_script_exhausted() {
        let mut mock = MockSerial::new();
        let mut buf = [0u8; 8];
        assert!(matches!(
            mock.read(&mut buf),
            Err(MockSerialError::WouldBlock)
        ));
    }

    #[test]
    fn test_partial_reads() {
        let mut mock = MockSerial::new();
        mock.queue_reply("E8257D");

        let mut one = [0u8; 1];
        let mut collected: heapless::Vec<u8, 16> = heapless::Vec::new();
        while let Ok(count) = mock.read(&mut one) {
            collected.extend_from_slice(&one[..count]).unwrap();
        }
        assert_eq!(collected.as_slice(), b"E8257D\n");
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::new();
        mock.queue_reply("+0,\"No error\"");

        mock.set_write_error(true);
        assert!(mock.write(b"*RST\n").is_err());
        assert!(mock.flush().is_err());
        assert_eq!(mock.written(), "");

        mock.set_write_error(false);
        mock.set_read_error(true);
        let mut buf = [0u8; 8];
        assert!(matches!(
            mock.read(&mut buf),
            Err(MockSerialError::SimulatedError)
        ));
    }
}

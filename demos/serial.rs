use std::env;

use agilent_e8257d::siggen::E8257d;
use agilent_e8257d::types::PowerUnit;
use inquire::Select;
use serialport::SerialPort;

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 9600;
// The instrument can take a while to answer a query, a reasonably large timeout is required.
const SERIAL_TIMEOUT_MS: u64 = 500;
const CW_FREQUENCY_HZ: f64 = 1.0e9; // 1 GHz

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::ConnectionRefused => embedded_io::ErrorKind::ConnectionRefused,
            std::io::ErrorKind::ConnectionReset => embedded_io::ErrorKind::ConnectionReset,
            std::io::ErrorKind::ConnectionAborted => embedded_io::ErrorKind::ConnectionAborted,
            std::io::ErrorKind::NotConnected => embedded_io::ErrorKind::NotConnected,
            std::io::ErrorKind::AddrInUse => embedded_io::ErrorKind::AddrInUse,
            std::io::ErrorKind::AddrNotAvailable => embedded_io::ErrorKind::AddrNotAvailable,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::AlreadyExists => embedded_io::ErrorKind::AlreadyExists,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            std::io::ErrorKind::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

fn main() {
    // RUST_LOG=debug shows every line exchanged with the instrument.
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to list serial ports");
        let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
        Select::new("Select the serial port connected to the PSG:", names)
            .prompt()
            .expect("No serial port selected")
    });

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    // try_new verifies the model and that the session starts with an empty error queue.
    let mut siggen: E8257d<PortWrapper, 256> =
        E8257d::try_new(PortWrapper(port)).expect("Failed to initialise the instrument");

    let identity = siggen.identity().expect("Failed to read identity");
    println!(
        "Connected to {} {} (serial {}, firmware {})",
        identity.manufacturer, identity.model, identity.serial, identity.firmware
    );

    let frequency = siggen.get_frequency_hz().expect("Failed to read frequency");
    println!("CW frequency: {} Hz", frequency);

    let unit = siggen.get_power_unit().expect("Failed to read power unit");
    println!("Configured power unit: {}", unit);

    // Amplitude readback is unit-pinned: this is dBm no matter what the panel is set to,
    // and the configured unit is restored afterwards.
    let amplitude = siggen.read_power_dbm().expect("Failed to read amplitude");
    println!("Output amplitude: {} dBm (unit still {})", amplitude, unit);

    siggen
        .set_frequency_hz(CW_FREQUENCY_HZ)
        .expect("Failed to set frequency");
    println!("CW frequency set to {} Hz", CW_FREQUENCY_HZ);

    // Switching the entry unit explicitly is also checked against the error queue.
    siggen
        .set_power_unit(PowerUnit::Dbm)
        .expect("Failed to set power unit");

    let (_, released) = siggen.close();
    released.expect("Instrument reported an error on return to local control");
    println!("Instrument returned to local control.");
}

//! This crate provides an interface for communicating with and controlling the Agilent/Keysight
//! E8257D PSG analog signal generator over its line-oriented SCPI remote control protocol.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The driver is generic over any transport which implements [embedded_io::Read] and
//! [embedded_io::Write], so the same code works over RS-232, a TCP socket wrapper, or a
//! GPIB-to-serial bridge. Opening and configuring the link is the caller's job; see
//! `demos/serial.rs` for wiring up a `serialport` port.
//!
//! Every command and query issued through the driver is followed by a drain of the
//! instrument's error queue (`SYST:ERR?`), so a fault the firmware reports is surfaced as a
//! [`Device`](error::Error::Device) error on the call that caused it rather than silently
//! poisoning later operations.
//!
//! Typical serial configuration for the rear-panel RS-232 port:
//! * Baud rate: 9600 (instrument default)
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None

#![cfg_attr(feature = "no-std", no_std)]

pub mod error;
pub mod scpi;
pub mod siggen;
pub mod types;
pub mod value;

#[cfg(test)]
mod mock_serial;

//! Conversion between typed values and their textual SCPI representation.
//!
//! The driver never formats or parses protocol text inline; everything a command argument or a
//! reply can be goes through these two traits. Comma-separated sequences are handled by the
//! checked layers themselves ([`set_sequence`](crate::siggen::E8257d::set_sequence) joins,
//! [`query_sequence`](crate::siggen::E8257d::query_sequence) splits), so implementations here
//! only ever see one element at a time.

use core::fmt::{self, Write as _};

/// A value which can be rendered as a SCPI command argument.
pub trait ToScpi {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// A value which can be parsed from one SCPI reply field.
///
/// Returning `None` is surfaced by the checked query layer as
/// [`InvalidResponse`](crate::error::Error::InvalidResponse). The input has already been
/// trimmed of surrounding whitespace and the line terminator.
pub trait FromScpi: Sized {
    fn from_scpi(text: &str) -> Option<Self>;
}

impl ToScpi for f64 {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{self}")
    }
}

impl ToScpi for i32 {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{self}")
    }
}

impl ToScpi for u32 {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{self}")
    }
}

impl ToScpi for &str {
    fn fmt_scpi(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_str(self)
    }
}

impl FromScpi for f64 {
    fn from_scpi(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromScpi for i32 {
    fn from_scpi(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromScpi for u32 {
    fn from_scpi(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl<const N: usize> FromScpi for heapless::String<N> {
    fn from_scpi(text: &str) -> Option<Self> {
        let mut value = heapless::String::new();
        value.push_str(text).ok()?;
        Some(value)
    }
}

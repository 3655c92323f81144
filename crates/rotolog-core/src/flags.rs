//! Prefix flags selecting which metadata fields precede each line.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::Error;

/// Bit set of prefix fields rendered before the message body.
///
/// Fields are always rendered in the fixed order date, time, microseconds,
/// long file, short file, regardless of how the flags were combined.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PrefixFlags(u8);

impl PrefixFlags {
    /// No prefix at all.
    pub const NONE: PrefixFlags = PrefixFlags(0);
    /// Local date: `2009-01-23 `
    pub const DATE: PrefixFlags = PrefixFlags(1 << 0);
    /// Local time: `01:23:23 `
    pub const TIME: PrefixFlags = PrefixFlags(1 << 1);
    /// Microseconds within the current second: `123123 `
    pub const MICROSECONDS: PrefixFlags = PrefixFlags(1 << 2);
    /// Full caller path and line: `/a/b/c/d.rs:23 `
    pub const LONG_FILE: PrefixFlags = PrefixFlags(1 << 3);
    /// Caller file name and line: `d.rs:23 `
    pub const SHORT_FILE: PrefixFlags = PrefixFlags(1 << 4);
    /// Date, time and short file.
    pub const STD: PrefixFlags = PrefixFlags(Self::DATE.0 | Self::TIME.0 | Self::SHORT_FILE.0);

    const NAMED: [(&'static str, PrefixFlags); 5] = [
        ("date", Self::DATE),
        ("time", Self::TIME),
        ("microseconds", Self::MICROSECONDS),
        ("longfile", Self::LONG_FILE),
        ("shortfile", Self::SHORT_FILE),
    ];

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> PrefixFlags {
        PrefixFlags(bits & 0b1_1111)
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: PrefixFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any file/line field is requested.
    pub const fn wants_location(self) -> bool {
        self.0 & (Self::LONG_FILE.0 | Self::SHORT_FILE.0) != 0
    }
}

impl BitOr for PrefixFlags {
    type Output = PrefixFlags;

    fn bitor(self, rhs: PrefixFlags) -> PrefixFlags {
        PrefixFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PrefixFlags {
    fn bitor_assign(&mut self, rhs: PrefixFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for PrefixFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrefixFlags({})", self)
    }
}

impl fmt::Display for PrefixFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, flag) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Parses `|` or `,` separated names, e.g. `date|time|shortfile` or `std`.
impl FromStr for PrefixFlags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = PrefixFlags::NONE;
        for part in s.split(['|', ',']).map(str::trim).filter(|p| !p.is_empty()) {
            let lower = part.to_lowercase();
            flags |= match lower.as_str() {
                "std" => PrefixFlags::STD,
                "none" => PrefixFlags::NONE,
                "micro" | "microseconds" => PrefixFlags::MICROSECONDS,
                "long" | "longfile" => PrefixFlags::LONG_FILE,
                "short" | "shortfile" => PrefixFlags::SHORT_FILE,
                other => Self::NAMED
                    .iter()
                    .find(|(name, _)| *name == other)
                    .map(|(_, flag)| *flag)
                    .ok_or_else(|| Error::InvalidFlag(part.to_string()))?,
            };
        }
        Ok(flags)
    }
}

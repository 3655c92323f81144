//! Line construction.
//!
//! A line is the configured prefix fields followed by a severity tagged body
//! and a trailing newline:
//!
//! ```text
//! 2026-01-21 14:30:45 worker.rs:42 [info] [flag is 3 tick 17]
//! ```

use std::fmt::{self, Display, Write as _};
use std::panic::Location;
use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::flags::PrefixFlags;
use crate::level::Severity;

/// The message part of a line.
#[derive(Clone, Copy)]
pub enum Body<'a> {
    /// Values joined by spaces inside brackets: `[a b c]`
    Values(&'a [&'a dyn Display]),
    /// Pre-formatted text rendered as is.
    Args(fmt::Arguments<'a>),
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Values(values) => f.debug_tuple("Values").field(&values.len()).finish(),
            Body::Args(args) => f.debug_tuple("Args").field(args).finish(),
        }
    }
}

/// Render one complete line into `buf`.
///
/// `buf` is appended to, not cleared. File fields are skipped when
/// `location` is `None`.
pub fn format_line(
    buf: &mut String,
    now: &NaiveDateTime,
    flags: PrefixFlags,
    severity: Severity,
    location: Option<&Location<'_>>,
    body: Body<'_>,
) {
    write_prefix(buf, now, flags, location);

    let _ = write!(buf, "[{}] ", severity.as_str());
    match body {
        Body::Values(values) => {
            buf.push('[');
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                let _ = write!(buf, "{}", value);
            }
            buf.push(']');
        }
        Body::Args(args) => {
            let _ = buf.write_fmt(args);
        }
    }
    buf.push('\n');
}

/// Render only the prefix fields selected by `flags`.
pub fn write_prefix(
    buf: &mut String,
    now: &NaiveDateTime,
    flags: PrefixFlags,
    location: Option<&Location<'_>>,
) {
    if flags.contains(PrefixFlags::DATE) {
        let _ = write!(buf, "{}-{:02}-{:02} ", now.year(), now.month(), now.day());
    }
    if flags.contains(PrefixFlags::TIME) {
        let _ = write!(
            buf,
            "{:02}:{:02}:{:02} ",
            now.hour(),
            now.minute(),
            now.second()
        );
    }
    if flags.contains(PrefixFlags::MICROSECONDS) {
        let _ = write!(buf, "{} ", micros_of_second(now));
    }

    let Some(location) = location.filter(|_| flags.wants_location()) else {
        return;
    };
    // Both file fields render when both flags are set.
    if flags.contains(PrefixFlags::LONG_FILE) {
        let _ = write!(buf, "{}:{} ", location.file(), location.line());
    }
    if flags.contains(PrefixFlags::SHORT_FILE) {
        let _ = write!(buf, "{}:{} ", short_file(location.file()), location.line());
    }
}

/// Final path component of a source file, falling back to the full path.
pub fn short_file(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// Microseconds elapsed within the current second.
///
/// A leap second shows up as a nanosecond value past one billion; it is
/// folded back into the 0..1_000_000 range.
pub(crate) fn micros_of_second(now: &NaiveDateTime) -> u32 {
    (now.nanosecond() % 1_000_000_000) / 1_000
}

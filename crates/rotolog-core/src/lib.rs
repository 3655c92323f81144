//! rotolog core library
//!
//! Leveled, timestamped logging into files that rotate on a fixed interval.
//!
//! ## Overview
//!
//! - [`Logger`] gates calls by [`Severity`], renders the [`PrefixFlags`]
//!   fields (date, time, microseconds, caller file/line) and writes each line
//!   to its sink in one write.
//! - [`Rotator`] owns the active file. A background thread opens a new
//!   timestamped file every interval and swaps it in under the write lock.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rotolog_core::{Logger, PrefixFlags, Severity, SinkConfig};
//!
//! fn main() -> rotolog_core::Result<()> {
//!     let config = SinkConfig::new("/var/log/svc", "svc", "1h");
//!     let logger = Logger::create(Severity::Info, PrefixFlags::STD, &config)?;
//!
//!     rotolog_core::info!(logger, "service started");
//!     rotolog_core::debugf!(logger, "not written at {}", logger.level());
//!     Ok(())
//! }
//! ```
//!
//! Files are named `<prefix>-<year>-<MM>-<DD>.<hh>.<mm>.<ss>-<micros>.log`.

pub mod config;
pub mod error;
pub mod flags;
pub mod format;
pub mod level;
pub mod logger;
mod macros;
pub mod rotator;
pub mod sink;

#[cfg(test)]
mod test_support;

// Re-exports
pub use config::{parse_interval, SinkConfig, DEFAULT_ROTATION_INTERVAL};
pub use error::{Error, Result};
pub use flags::PrefixFlags;
pub use format::Body;
pub use level::Severity;
pub use logger::Logger;
pub use rotator::{file_name, parse_file_name, RotationErrorCallback, Rotator, RotatorBuilder};
pub use sink::{FailingSink, MemorySink, Sink};

//! The leveled logger.

use std::fmt::{self, Display};
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::SinkConfig;
use crate::error::Result;
use crate::flags::PrefixFlags;
use crate::format::{format_line, Body};
use crate::level::Severity;
use crate::rotator::Rotator;
use crate::sink::Sink;

/// Leveled logger writing formatted lines to a swappable sink.
///
/// Every public logging method captures its own call site, so the file/line
/// prefix always points at the code that called the logger.
///
/// Logging never fails from the caller's point of view: sink errors are
/// dropped. The exception is [`Logger::fatal`], which terminates the process.
///
/// # Example
///
/// ```no_run
/// use rotolog_core::{Logger, PrefixFlags, Severity, SinkConfig};
///
/// let config = SinkConfig::new("/tmp/x", "svc", "1m");
/// let logger = Logger::create(Severity::Info, PrefixFlags::STD, &config)?;
///
/// rotolog_core::info!(logger, "hello");
/// rotolog_core::warnf!(logger, "disk at {}%", 93);
/// # Ok::<(), rotolog_core::Error>(())
/// ```
pub struct Logger {
    level: AtomicU8,
    flags: AtomicU8,
    sink: RwLock<Option<Arc<dyn Sink>>>,
    rotator: Option<Rotator>,
}

impl Logger {
    /// A logger without a sink. Calls are gated and then dropped until a
    /// sink is installed with [`Logger::set_sink`].
    pub fn new(level: Severity, flags: PrefixFlags) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            flags: AtomicU8::new(flags.bits()),
            sink: RwLock::new(None),
            rotator: None,
        }
    }

    /// A logger writing to `sink`.
    pub fn with_sink(level: Severity, flags: PrefixFlags, sink: Arc<dyn Sink>) -> Self {
        let logger = Self::new(level, flags);
        logger.set_sink(sink);
        logger
    }

    /// A logger writing to rotating files described by `config`.
    ///
    /// Fails if the log directory or the first file cannot be created. An
    /// unparsable rotation interval is not an error; it falls back to one
    /// hour.
    pub fn create(level: Severity, flags: PrefixFlags, config: &SinkConfig) -> Result<Self> {
        let mut logger = Self::new(level, flags);
        let rotator = Rotator::start(config, &logger)?;
        logger.rotator = Some(rotator);
        Ok(logger)
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Change the threshold. Takes effect on the next call.
    pub fn set_level(&self, level: Severity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn flags(&self) -> PrefixFlags {
        PrefixFlags::from_bits_truncate(self.flags.load(Ordering::Relaxed))
    }

    /// Change the prefix fields. Takes effect on the next call.
    pub fn set_flags(&self, flags: PrefixFlags) {
        self.flags.store(flags.bits(), Ordering::Relaxed);
    }

    /// Replace the output destination.
    pub fn set_sink(&self, sink: Arc<dyn Sink>) {
        *self.sink.write() = Some(sink);
    }

    /// The rotator owned by this logger, if it was built with
    /// [`Logger::create`].
    pub fn rotator(&self) -> Option<&Rotator> {
        self.rotator.as_ref()
    }

    /// Stop background rotation. The current file keeps receiving lines.
    pub fn shutdown(&self) {
        if let Some(rotator) = &self.rotator {
            rotator.stop();
        }
    }

    /// Whether a call at `severity` would be written.
    #[inline]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.passes(self.level())
    }

    /// Log at an explicit severity and call site.
    ///
    /// This is the entry point the leveled methods use. `Fatal` is written
    /// but does not exit here; use [`Logger::fatal`] for that.
    pub fn log(&self, severity: Severity, location: Option<&Location<'_>>, body: Body<'_>) {
        if self.enabled(severity) {
            let _ = self.write_line(severity, location, body);
        }
    }

    #[track_caller]
    pub fn trace(&self, values: &[&dyn Display]) {
        self.log(Severity::Trace, Some(Location::caller()), Body::Values(values));
    }

    #[track_caller]
    pub fn debug(&self, values: &[&dyn Display]) {
        self.log(Severity::Debug, Some(Location::caller()), Body::Values(values));
    }

    #[track_caller]
    pub fn info(&self, values: &[&dyn Display]) {
        self.log(Severity::Info, Some(Location::caller()), Body::Values(values));
    }

    #[track_caller]
    pub fn warn(&self, values: &[&dyn Display]) {
        self.log(Severity::Warn, Some(Location::caller()), Body::Values(values));
    }

    #[track_caller]
    pub fn error(&self, values: &[&dyn Display]) {
        self.log(Severity::Error, Some(Location::caller()), Body::Values(values));
    }

    /// Write the line regardless of level, flush, and exit with status 1.
    #[track_caller]
    pub fn fatal(&self, values: &[&dyn Display]) -> ! {
        self.exit_fatal(Some(Location::caller()), Body::Values(values))
    }

    #[track_caller]
    pub fn tracef(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Trace, Some(Location::caller()), Body::Args(args));
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, Some(Location::caller()), Body::Args(args));
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, Some(Location::caller()), Body::Args(args));
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, Some(Location::caller()), Body::Args(args));
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, Some(Location::caller()), Body::Args(args));
    }

    /// Formatted variant of [`Logger::fatal`].
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.exit_fatal(Some(Location::caller()), Body::Args(args))
    }

    fn exit_fatal(&self, location: Option<&Location<'_>>, body: Body<'_>) -> ! {
        let _ = self.write_line(Severity::Fatal, location, body);
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            let _ = sink.flush();
        }
        std::process::exit(1)
    }

    /// Format one line and hand it to the sink in a single write.
    fn write_line(
        &self,
        severity: Severity,
        location: Option<&Location<'_>>,
        body: Body<'_>,
    ) -> io::Result<()> {
        let Some(sink) = self.sink.read().clone() else {
            return Ok(());
        };

        let now = chrono::Local::now().naive_local();
        let mut line = String::with_capacity(128);
        format_line(&mut line, &now, self.flags(), severity, location, body);
        sink.write_all(line.as_bytes())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("flags", &self.flags())
            .field("has_sink", &self.sink.read().is_some())
            .field("rotator", &self.rotator)
            .finish()
    }
}

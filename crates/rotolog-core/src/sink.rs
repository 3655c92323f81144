//! Output destinations for formatted lines.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

/// A destination the logger forwards formatted lines to.
///
/// Methods take `&self` so a sink can be shared between every logging thread
/// and whatever component replaces its underlying resource.
pub trait Sink: Send + Sync {
    /// Write some bytes, returning how many were accepted.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Write a whole buffer.
    ///
    /// Implementations that swap their underlying resource should override
    /// this so the buffer cannot be split across two resources.
    fn write_all(&self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    ))
                }
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Flush anything buffered below this sink.
    fn flush(&self) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// In-memory sink that records every write.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rotolog_core::{Logger, MemorySink, PrefixFlags, Severity};
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Logger::with_sink(Severity::Info, PrefixFlags::NONE, sink.clone());
/// logger.info(&[&"hello"]);
/// assert_eq!(sink.contents(), "[info] [hello]\n");
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    recorded: Mutex<Recorded>,
}

/// Bytes and write count, kept under one lock so they always agree.
#[derive(Debug, Default)]
struct Recorded {
    buf: Vec<u8>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.recorded.lock().buf).into_owned()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.recorded.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of write calls received.
    pub fn write_count(&self) -> usize {
        self.recorded.lock().writes
    }

    /// Recorded contents split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut recorded = self.recorded.lock();
        recorded.buf.extend_from_slice(buf);
        recorded.writes += 1;
        Ok(buf.len())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that fails every write. Useful for checking that logging errors
/// never reach the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl Sink for FailingSink {
    fn write(&self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

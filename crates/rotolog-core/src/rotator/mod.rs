//! Time based log file rotation.
//!
//! A [`Rotator`] owns the active log file. A background thread wakes up
//! every rotation interval, creates a fresh timestamped file and swaps it in
//! under the same lock that guards writes, so a line always lands whole in
//! exactly one file.
//!
//! ```text
//! logs/
//! ├── svc-2026-01-21.14.00.00-000102.log   # closed
//! ├── svc-2026-01-21.15.00.00-000311.log   # closed
//! └── svc-2026-01-21.16.00.00-000087.log   # active
//! ```
//!
//! A rotation that fails keeps serving the previous file and is retried on
//! the next tick.

pub mod filename;

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use parking_lot::{Condvar, Mutex};

use crate::config::SinkConfig;
use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::sink::Sink;

pub use filename::{file_name, parse_file_name};

/// Callback invoked with every failed rotation.
pub type RotationErrorCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// The currently open file.
struct ActiveFile {
    file: File,
    path: PathBuf,
    opened_at: NaiveDateTime,
}

/// State shared between the rotator handle, the rotation thread and the
/// logger that uses it as its sink.
struct Inner {
    directory: PathBuf,
    file_prefix: String,
    interval: Duration,
    active: Mutex<ActiveFile>,
    /// Serializes rotations so timestamps stay strictly increasing.
    rotating: Mutex<()>,
    stopped: Mutex<bool>,
    wake: Condvar,
    rotations: AtomicU64,
    failures: AtomicU64,
    on_error: Option<RotationErrorCallback>,
}

/// Open a new log file in `directory`, stamped strictly after `previous`.
///
/// If the wall clock has stepped back (DST change, NTP correction) the stamp
/// is `previous + 1µs` instead of the real creation time. Names keep sorting
/// in creation order, but such a name no longer parses back to the moment the
/// file was opened.
fn open_log_file(
    directory: &Path,
    file_prefix: &str,
    previous: Option<NaiveDateTime>,
) -> Result<ActiveFile> {
    let mut opened_at = chrono::Local::now().naive_local();
    if let Some(previous) = previous {
        if opened_at <= previous {
            opened_at = previous + chrono::Duration::microseconds(1);
        }
    }

    let path = directory.join(file_name(file_prefix, &opened_at));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| Error::CreateFile {
            path: path.clone(),
            source,
        })?;

    Ok(ActiveFile {
        file,
        path,
        opened_at,
    })
}

impl Inner {
    fn rotate(&self) -> Result<PathBuf> {
        let rotating = self.rotating.lock();
        let previous = self.active.lock().opened_at;

        let next = match open_log_file(&self.directory, &self.file_prefix, Some(previous)) {
            Ok(next) => next,
            Err(e) => {
                drop(rotating);
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    directory = %self.directory.display(),
                    error = %e,
                    "Log rotation failed, keeping the current file"
                );
                // No rotator lock is held here, so the callback may rotate.
                if let Some(on_error) = &self.on_error {
                    on_error(&e);
                }
                return Err(e);
            }
        };
        let path = next.path.clone();

        let old = std::mem::replace(&mut *self.active.lock(), next);
        drop(rotating);
        self.rotations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            from = %old.path.display(),
            to = %path.display(),
            "Rotated log file"
        );

        // Close outside the lock.
        if let Err(e) = old.file.sync_all() {
            tracing::warn!(path = %old.path.display(), error = %e, "Failed to sync rotated log file");
        }
        drop(old);

        Ok(path)
    }

    /// Sleep until the next tick. Returns false once stopped.
    fn wait_for_tick(&self) -> bool {
        let mut stopped = self.stopped.lock();
        match Instant::now().checked_add(self.interval) {
            Some(deadline) => {
                while !*stopped {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
            }
            // Too far out to represent: only a stop can end the wait.
            None => {
                while !*stopped {
                    self.wake.wait(&mut stopped);
                }
            }
        }
        !*stopped
    }

    fn run(self: Arc<Self>) {
        tracing::debug!(
            directory = %self.directory.display(),
            interval = ?self.interval,
            "Log rotation thread started"
        );
        while self.wait_for_tick() {
            // Failures are already reported; the next tick retries.
            let _ = self.rotate();
        }
        tracing::debug!(directory = %self.directory.display(), "Log rotation thread stopped");
    }
}

impl Sink for Inner {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.active.lock().file.write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.active.lock().file.write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.active.lock().file.flush()
    }
}

/// Configures and starts a [`Rotator`].
pub struct RotatorBuilder {
    config: SinkConfig,
    on_error: Option<RotationErrorCallback>,
    background: bool,
}

impl RotatorBuilder {
    pub fn new(config: SinkConfig) -> Self {
        Self {
            config,
            on_error: None,
            background: true,
        }
    }

    /// Called with the error of every failed rotation.
    ///
    /// Runs on the thread that attempted the rotation, after the rotator's
    /// locks are released; calling [`Rotator::rotate_now`] from it is allowed.
    pub fn on_error(mut self, callback: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Do not spawn the rotation thread; rotate only through
    /// [`Rotator::rotate_now`].
    pub fn manual(mut self) -> Self {
        self.background = false;
        self
    }

    /// Open the first file and start rotating, without a logger attached.
    pub fn build(self) -> Result<Rotator> {
        let background = self.background;
        let rotator = self.open()?;
        if background {
            rotator.spawn()?;
        }
        Ok(rotator)
    }

    /// Open the first file, install the rotator as `logger`'s sink, then
    /// start rotating.
    pub fn start(self, logger: &Logger) -> Result<Rotator> {
        let background = self.background;
        let rotator = self.open()?;
        logger.set_sink(rotator.sink());
        if background {
            rotator.spawn()?;
        }
        Ok(rotator)
    }

    fn open(self) -> Result<Rotator> {
        let directory = self.config.directory.clone();
        fs::create_dir_all(&directory).map_err(|source| Error::CreateDirectory {
            path: directory.clone(),
            source,
        })?;

        let interval = self.config.parsed_interval();
        let first = open_log_file(&directory, &self.config.file_prefix, None)?;
        tracing::info!(
            path = %first.path.display(),
            interval = ?interval,
            "Opened log file"
        );

        let inner = Inner {
            directory,
            file_prefix: self.config.file_prefix,
            interval,
            active: Mutex::new(first),
            rotating: Mutex::new(()),
            stopped: Mutex::new(false),
            wake: Condvar::new(),
            rotations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            on_error: self.on_error,
        };

        Ok(Rotator {
            inner: Arc::new(inner),
            worker: Mutex::new(None),
        })
    }
}

/// Owner of the active log file and its rotation thread.
///
/// Dropping the rotator stops the rotation thread. Sinks handed out through
/// [`Rotator::sink`] keep writing to the last active file.
pub struct Rotator {
    inner: Arc<Inner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Rotator {
    /// Start rotating files for `logger` as described by `config`.
    ///
    /// An unparsable interval falls back to one hour. Fails if the directory
    /// or the first file cannot be created.
    pub fn start(config: &SinkConfig, logger: &Logger) -> Result<Rotator> {
        RotatorBuilder::new(config.clone()).start(logger)
    }

    pub fn builder(config: SinkConfig) -> RotatorBuilder {
        RotatorBuilder::new(config)
    }

    fn spawn(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let handle = thread::Builder::new()
            .name(format!("rotolog-{}", self.inner.file_prefix))
            .spawn(move || inner.run())
            .map_err(Error::ThreadSpawn)?;
        *self.worker.lock() = Some(handle);
        Ok(())
    }

    /// A shareable sink writing to whichever file is currently active.
    pub fn sink(&self) -> Arc<dyn Sink> {
        self.inner.clone()
    }

    /// Rotate immediately.
    ///
    /// On failure the previous file stays active and the error is reported
    /// exactly as for a scheduled rotation.
    pub fn rotate_now(&self) -> Result<PathBuf> {
        self.inner.rotate()
    }

    /// Stop the rotation thread and wait for it to exit. Idempotent.
    pub fn stop(&self) {
        *self.inner.stopped.lock() = true;
        self.inner.wake.notify_all();
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::error!("Log rotation thread panicked");
            }
        }
    }

    /// Whether the background thread is still scheduled to rotate.
    pub fn is_running(&self) -> bool {
        !*self.inner.stopped.lock()
            && self
                .worker
                .lock()
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Path of the file currently receiving writes.
    pub fn current_path(&self) -> PathBuf {
        self.inner.active.lock().path.clone()
    }

    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    pub fn file_prefix(&self) -> &str {
        &self.inner.file_prefix
    }

    /// Effective rotation interval after fallback.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Number of successful rotations since start.
    pub fn rotations(&self) -> u64 {
        self.inner.rotations.load(Ordering::Relaxed)
    }

    /// Number of failed rotation attempts since start.
    pub fn failed_rotations(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }
}

impl Sink for Rotator {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        Sink::flush(&*self.inner)
    }
}

impl Write for &Rotator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Sink::write(*self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Sink::write_all(*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(*self)
    }
}

impl Drop for Rotator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rotator")
            .field("directory", &self.inner.directory)
            .field("file_prefix", &self.inner.file_prefix)
            .field("interval", &self.inner.interval)
            .field("current_path", &self.current_path())
            .finish()
    }
}

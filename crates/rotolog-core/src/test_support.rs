//! Helpers shared by unit tests.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

/// Collects the facility's own `tracing` output emitted on the current
/// thread while `f` runs.
pub(crate) fn capture_diagnostics<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = CapturedOutput::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&captured.0.lock()).into_owned();
    (result, output)
}

#[derive(Clone, Default)]
struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

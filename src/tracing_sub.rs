use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Level;

/// Where log lines go. The terminal is owned by the UI while the demo runs,
/// so lines are either appended to a file or held in memory until the host
/// has left the alternate screen.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Buffer(Arc<Mutex<Vec<u8>>>),
}

fn lock<T>(sink: &Mutex<T>) -> io::Result<MutexGuard<'_, T>> {
    sink.lock().map_err(|_| io::Error::other("log sink lock poisoned"))
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.inner {
            DelegatingInner::File(file) => lock(&**file)?.write(buf),
            DelegatingInner::Buffer(lines) => {
                lock(&**lines)?.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.inner {
            DelegatingInner::File(file) => lock(&**file)?.flush(),
            DelegatingInner::Buffer(_) => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
enum Sink {
    File(Arc<Mutex<File>>),
    Buffer(Arc<Mutex<Vec<u8>>>),
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    sink: Sink,
}

impl SubscriberMakeWriter {
    /// Keep lines in memory until [`SubscriberMakeWriter::flush_to`] is called.
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Arc::default()),
        }
    }

    /// Append to `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Sink::File(Arc::new(Mutex::new(file))),
        })
    }

    /// Move buffered lines into `out`. File sinks have nothing to hand over.
    pub fn flush_to(&self, out: &mut impl Write) -> io::Result<()> {
        match &self.sink {
            Sink::File(_) => Ok(()),
            Sink::Buffer(lines) => {
                let pending = std::mem::take(&mut *lock(&**lines)?);
                out.write_all(&pending)?;
                out.flush()
            }
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.sink {
            Sink::File(file) => DelegatingInner::File(Arc::clone(file)),
            Sink::Buffer(lines) => DelegatingInner::Buffer(Arc::clone(lines)),
        };
        DelegatingWriter { inner }
    }
}

/// Initialize the global subscriber writing to `path` when given, or to an
/// in-memory buffer otherwise. The returned writer is what the host flushes
/// to stderr once the terminal is restored. Later calls leave the first
/// subscriber installed.
pub fn init(log_file: Option<&Path>) -> io::Result<SubscriberMakeWriter> {
    let writer = match log_file {
        Some(path) => SubscriberMakeWriter::file(path)?,
        None => SubscriberMakeWriter::buffered(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(writer.clone())
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn buffered_lines_wait_for_flush() {
        let sink = SubscriberMakeWriter::buffered();
        let mut writer = sink.make_writer();
        writer.write_all(b"opened overlay\n").unwrap();
        writer.flush().unwrap();
        sink.make_writer().write_all(b"closed overlay\n").unwrap();

        let mut out = Vec::new();
        sink.flush_to(&mut out).unwrap();
        assert_eq!(out, b"opened overlay\nclosed overlay\n");

        let mut again = Vec::new();
        sink.flush_to(&mut again).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn subscriber_events_land_in_buffer() {
        let sink = SubscriberMakeWriter::buffered();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("badge clicked");
        });
        let mut out = Vec::new();
        sink.flush_to(&mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("badge clicked"));
    }
}

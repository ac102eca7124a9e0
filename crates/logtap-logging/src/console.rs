//! Process-wide console streams
//!
//! Handlers and test utilities never write to `std::io::stdout()` or
//! `std::io::stderr()` directly. They go through the [`Console`], whose sinks
//! can be swapped so that tests can observe what reached "the real" output and
//! error streams.

use crate::buffer::MemoizingStream;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// A console output sink
pub type Sink = Box<dyn Write + Send>;

/// One of the two console streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// The standard output and error sinks of the process
pub struct Console {
    out: Mutex<Sink>,
    err: Mutex<Sink>,
}

static CONSOLE: OnceLock<Console> = OnceLock::new();

/// The process-wide console
pub fn console() -> &'static Console {
    CONSOLE.get_or_init(|| Console {
        out: Mutex::new(Box::new(io::stdout())),
        err: Mutex::new(Box::new(io::stderr())),
    })
}

impl Console {
    fn sink(&self, stream: Stream) -> MutexGuard<'_, Sink> {
        let sink = match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        };
        sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writer for the standard output stream
    pub fn out(&'static self) -> ConsoleStream {
        ConsoleStream {
            console: self,
            stream: Stream::Out,
        }
    }

    /// Writer for the standard error stream
    pub fn err(&'static self) -> ConsoleStream {
        ConsoleStream {
            console: self,
            stream: Stream::Err,
        }
    }

    /// Replace the sink of `stream`, returning the previous one
    pub fn replace(&self, stream: Stream, sink: Sink) -> Sink {
        let mut guard = self.sink(stream);
        // Pending bytes belong to the sink being replaced.
        guard.flush().ok();
        std::mem::replace(&mut *guard, sink)
    }

    pub fn set_out(&self, sink: Sink) -> Sink {
        self.replace(Stream::Out, sink)
    }

    pub fn set_err(&self, sink: Sink) -> Sink {
        self.replace(Stream::Err, sink)
    }

    /// Write `bytes` to `stream` in one locked operation
    ///
    /// # Errors
    ///
    /// Returns the error reported by the current sink.
    pub fn write_all(&self, stream: Stream, bytes: &[u8]) -> io::Result<()> {
        let mut sink = self.sink(stream);
        sink.write_all(bytes)?;
        sink.flush()
    }
}

/// `Write` adapter over one console stream
///
/// Every write goes to whatever sink is current at the time of the write.
#[derive(Clone, Copy)]
pub struct ConsoleStream {
    console: &'static Console,
    stream: Stream,
}

impl Write for ConsoleStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.sink(self.stream).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.sink(self.stream).flush()
    }
}

/// Redirects both console streams into memory until dropped
///
/// Output and error are kept apart so a test can check each of them.
pub struct ConsoleCapture {
    out: MemoizingStream,
    err: MemoizingStream,
    saved: Option<(Sink, Sink)>,
}

impl ConsoleCapture {
    pub fn install() -> Self {
        let out = MemoizingStream::new();
        let err = MemoizingStream::new();
        let saved_out = console().set_out(Box::new(out.clone()));
        let saved_err = console().set_err(Box::new(err.clone()));
        Self {
            out,
            err,
            saved: Some((saved_out, saved_err)),
        }
    }

    /// Everything written to the output stream since install
    pub fn out(&self) -> String {
        self.out.to_string_lossy()
    }

    /// Everything written to the error stream since install
    pub fn err(&self) -> String {
        self.err.to_string_lossy()
    }

    pub fn out_size(&self) -> usize {
        self.out.size()
    }

    pub fn err_size(&self) -> usize {
        self.err.size()
    }

    /// Forget what has been captured so far
    pub fn reset(&self) {
        self.out.reset();
        self.err.reset();
    }

    /// Put the previous sinks back
    pub fn restore(&mut self) {
        if let Some((out, err)) = self.saved.take() {
            console().set_out(out);
            console().set_err(err);
        }
    }
}

impl Drop for ConsoleCapture {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Run `block` and return everything it wrote to either console stream
pub fn tap_console<F: FnOnce()>(block: F) -> String {
    let tap = MemoizingStream::new();
    let saved_out = console().set_out(Box::new(tap.clone()));
    let saved_err = console().set_err(Box::new(tap.clone()));

    struct Restore(Option<(Sink, Sink)>);
    impl Drop for Restore {
        fn drop(&mut self) {
            if let Some((out, err)) = self.0.take() {
                console().set_out(out);
                console().set_err(err);
            }
        }
    }

    let restore = Restore(Some((saved_out, saved_err)));
    block();
    drop(restore);
    tap.to_string_lossy()
}

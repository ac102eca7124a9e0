use logtap_testlib::values::random_string_with_prefix;
use logtap_testlib::Logger;
use std::io::{self, Write};

/// A logger name no other test uses
///
/// Tests run in parallel against one process-wide registry, so each test
/// works on its own logger below `prefix`.
#[allow(dead_code)]
pub fn unique_logger(prefix: &str) -> String {
    random_string_with_prefix(&format!("{}.", prefix))
}

/// Messages emitted to `name` through a `Logger` handle, one per entry
#[allow(dead_code)]
pub fn emit_info(name: &str, messages: &[&str]) {
    let logger = Logger::get(name);
    for message in messages {
        logger.info(*message);
    }
}

/// Sink rejecting every write
#[allow(dead_code)]
pub struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

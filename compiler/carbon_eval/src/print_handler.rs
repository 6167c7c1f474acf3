//! Where `print` output goes.
//!
//! The interpreter writes through a [`SharedPrintHandler`]:
//! - the `carbon` binary prints to stdout
//! - tests capture into a buffer and assert on it
//! - forked interpreters share their parent's handler
//!
//! Enum dispatch keeps this path free of vtables.

use std::sync::Arc;

use parking_lot::Mutex;

/// Captures output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, line: &str) {
        let mut captured = self.buffer.lock();
        captured.push_str(line);
        captured.push('\n');
    }

    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Destination of printed lines.
pub enum PrintHandler {
    Stdout,
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandler {
    /// Print a line (with newline).
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(buffer) => buffer.println(line),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.output(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.clear();
        }
    }
}

/// Print handler shared between an interpreter and its forks.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

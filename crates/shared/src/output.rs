//! Output sinks for the text produced by operations

use std::sync::Mutex;

/// Destination for text effects, injected so callers can redirect or capture it
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes each line to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn emit(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps emitted lines in memory
#[derive(Debug, Default)]
pub struct BufferedOutput {
    lines: Mutex<Vec<String>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Drain captured lines
    pub fn take(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|mut lines| std::mem::take(&mut *lines))
            .unwrap_or_default()
    }
}

impl OutputSink for BufferedOutput {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Default)]
pub struct NullOutput;

impl OutputSink for NullOutput {
    fn emit(&self, _line: &str) {}
}

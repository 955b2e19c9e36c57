// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Captures formatted `tracing` output so tests can inspect emitted events.
///
/// Install the capture for the current thread with
/// `tracing::subscriber::set_default(capture.subscriber())`. Clones share the
/// same buffer.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything captured so far.
    #[must_use]
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap_or_else(PoisonError::into_inner)).to_string()
    }

    /// Counts the occurrences of `needle` in the captured output.
    #[must_use]
    pub fn count(&self, needle: &str) -> usize {
        self.output().matches(needle).count()
    }

    /// Asserts that the captured output contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the captured output does not contain the expected string.
    #[track_caller]
    pub fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(
            output.contains(expected),
            "log output does not contain '{expected}', got:\n{output}"
        );
    }

    /// Creates a subscriber that formats every event into this capture, without
    /// ANSI colors.
    #[must_use]
    pub fn subscriber(&self) -> impl tracing::Subscriber {
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_writer(self.clone()).with_ansi(false))
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Appends formatted output to the buffer of a [`LogCapture`].
#[derive(Debug)]
pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_events_of_current_thread() {
        let capture = LogCapture::new();
        {
            let _guard = tracing::subscriber::set_default(capture.subscriber());
            tracing::info!(name = "clock.started", "first");
            tracing::warn!(name = "clock.started", "second");
        }
        tracing::info!(name = "clock.started", "not captured");

        assert_eq!(capture.count("clock.started"), 2);
        capture.assert_contains("second");
        assert!(!capture.output().contains("not captured"));
    }

    #[test]
    fn clones_share_the_buffer() {
        let capture = LogCapture::new();
        let clone = capture.clone();
        let _guard = tracing::subscriber::set_default(clone.subscriber());

        tracing::info!("shared");

        capture.assert_contains("shared");
    }
}

//
//  bitbucket-build-status
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Two kinds of output leave the reporter besides its return value:
//!
//! - **Diagnostics**: raw response dumps written to an error stream when
//!   debugging is switched on. The switch and the stream travel together in
//!   a [`Diagnostics`] value handed to each reporter, so there is no global
//!   debug state.
//! - **Error messages**: response bodies rendered by [`pretty_sorted_json`]
//!   when no canned message applies.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_build_status::output::{CaptureBuffer, Diagnostics};
//!
//! let buffer = CaptureBuffer::default();
//! let diagnostics = Diagnostics::with_sink(true, buffer.clone());
//!
//! diagnostics.note("Request result: 204 No Content");
//! assert_eq!(buffer.contents(), "Request result: 204 No Content\n");
//! ```

mod json;

pub use json::*;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Debug switch plus the stream that debug notes are written to.
///
/// Cloning is cheap; clones share the same sink.
#[derive(Clone)]
pub struct Diagnostics {
    enabled: bool,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Diagnostics {
    /// Diagnostics that write to standard error when `enabled` is true.
    pub fn stderr(enabled: bool) -> Self {
        Self::with_sink(enabled, io::stderr())
    }

    /// Diagnostics that never write anything.
    pub fn disabled() -> Self {
        Self::with_sink(false, io::sink())
    }

    /// Diagnostics that write to a caller-supplied stream.
    pub fn with_sink<W: Write + Send + 'static>(enabled: bool, sink: W) -> Self {
        Self {
            enabled,
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Writes `message` followed by a newline when debugging is enabled.
    ///
    /// Write failures are ignored.
    pub fn note(&self, message: impl fmt::Display) {
        if !self.enabled {
            return;
        }

        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}", message);
            let _ = sink.flush();
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// In-memory sink for capturing diagnostics, mainly in tests.
#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut buf) => {
                buf.extend_from_slice(data);
                Ok(data.len())
            }
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "capture buffer poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_writes_nothing() {
        let buffer = CaptureBuffer::default();
        let diagnostics = Diagnostics::with_sink(false, buffer.clone());
        diagnostics.note("hidden");
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_clones_share_sink() {
        let buffer = CaptureBuffer::default();
        let diagnostics = Diagnostics::with_sink(true, buffer.clone());
        let clone = diagnostics.clone();
        diagnostics.note("one");
        clone.note("two");
        assert_eq!(buffer.contents(), "one\ntwo\n");
    }
}

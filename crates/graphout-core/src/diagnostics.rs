//! # Error/Warning Channel
//!
//! Human-facing diagnostics, kept separate from status codes.
//!
//! A `Result` tells the caller whether to continue. A diagnostic tells a
//! human what happened and where: every message carries the serializer's
//! current [`Locator`]. Messages go to the registered handler for their
//! severity, or to stderr when none is registered.

use crate::Location;
use std::fmt;
use std::io::Write;

// =============================================================================
// LOCATOR
// =============================================================================

/// Current position of a serialization session, attached to diagnostics.
///
/// `line` and `column` are zero when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    pub uri: Option<Location>,
    pub line: usize,
    pub column: usize,
}

impl Locator {
    /// Move the cursor to the start of `uri`.
    pub fn reset(&mut self, uri: Option<Location>) {
        self.uri = uri;
        self.line = 0;
        self.column = 0;
    }

    /// Whether the locator carries no position at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uri.is_none() && self.line == 0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(uri) = &self.uri {
            write!(f, "{}", uri)?;
        }
        if self.line > 0 {
            write!(f, ":{}", self.line)?;
            if self.column > 0 {
                write!(f, " column {}", self.column)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// SEVERITY & HANDLERS
// =============================================================================

/// Diagnostic class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// Receives diagnostics for one severity.
///
/// Any user data travels inside the implementor. Closures taking
/// `(&Locator, &str)` implement this trait.
pub trait MessageHandler: Send {
    fn handle(&self, locator: &Locator, message: &str);
}

impl<F> MessageHandler for F
where
    F: Fn(&Locator, &str) + Send,
{
    fn handle(&self, locator: &Locator, message: &str) {
        self(locator, message);
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Per-instance handler registration.
#[derive(Default)]
pub struct Diagnostics {
    error_handler: Option<Box<dyn MessageHandler>>,
    warning_handler: Option<Box<dyn MessageHandler>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("error_handler", &self.error_handler.is_some())
            .field("warning_handler", &self.warning_handler.is_some())
            .finish()
    }
}

impl Diagnostics {
    /// Create with no handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler for `severity`.
    pub fn set_handler(&mut self, severity: Severity, handler: Box<dyn MessageHandler>) {
        match severity {
            Severity::Error => self.error_handler = Some(handler),
            Severity::Warning => self.warning_handler = Some(handler),
        }
    }

    /// Remove the handler for `severity`, restoring the stderr fallback.
    pub fn clear_handler(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error_handler = None,
            Severity::Warning => self.warning_handler = None,
        }
    }

    /// Deliver a message.
    ///
    /// One trailing newline is stripped. Without a handler the message is
    /// written to stderr prefixed by the locator.
    pub fn emit(&self, severity: Severity, locator: &Locator, message: &str) {
        let message = message.strip_suffix('\n').unwrap_or(message);
        let handler = match severity {
            Severity::Error => self.error_handler.as_deref(),
            Severity::Warning => self.warning_handler.as_deref(),
        };
        match handler {
            Some(handler) => handler.handle(locator, message),
            None => {
                let mut stderr = std::io::stderr().lock();
                // Nothing useful to do if stderr itself is gone.
                let _ = writeln!(stderr, "{}", fallback_line(severity, locator, message));
            }
        }
    }
}

/// The stderr fallback text for one diagnostic.
fn fallback_line(severity: Severity, locator: &Locator, message: &str) -> String {
    if locator.is_empty() {
        format!("serializer {} - {}", severity, message)
    } else {
        format!("{} serializer {} - {}", locator, severity, message)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(String, String)>>>;

    fn capturing() -> (Captured, Box<dyn MessageHandler>) {
        let seen: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = move |locator: &Locator, message: &str| {
            sink.lock()
                .expect("lock")
                .push((locator.to_string(), message.to_string()));
        };
        (seen, Box::new(handler))
    }

    #[test]
    fn locator_display() {
        let mut locator = Locator::default();
        assert_eq!(locator.to_string(), "");

        locator.reset(Some(Location::new("file:///tmp/x.nt")));
        assert_eq!(locator.to_string(), "file:///tmp/x.nt");

        locator.line = 3;
        locator.column = 7;
        assert_eq!(locator.to_string(), "file:///tmp/x.nt:3 column 7");
    }

    #[test]
    fn handler_receives_locator_and_trimmed_message() {
        let (seen, handler) = capturing();
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_handler(Severity::Warning, handler);

        let locator = Locator {
            uri: Some(Location::new("http://example.org/")),
            line: 0,
            column: 0,
        };
        diagnostics.emit(Severity::Warning, &locator, "lossy literal\n");

        let seen = seen.lock().expect("lock");
        assert_eq!(
            seen.as_slice(),
            &[("http://example.org/".to_string(), "lossy literal".to_string())]
        );
    }

    #[test]
    fn severities_dispatch_independently() {
        let (errors, handler) = capturing();
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_handler(Severity::Error, handler);

        // Warning goes to the stderr fallback, not the error handler.
        diagnostics.emit(Severity::Warning, &Locator::default(), "w");
        diagnostics.emit(Severity::Error, &Locator::default(), "e");

        assert_eq!(errors.lock().expect("lock").len(), 1);
    }

    #[test]
    fn fallback_line_prefixes_location() {
        let locator = Locator {
            uri: Some(Location::new("file:///out.dot")),
            line: 2,
            column: 0,
        };
        assert_eq!(
            fallback_line(Severity::Error, &locator, "boom"),
            "file:///out.dot:2 serializer error - boom"
        );
        assert_eq!(
            fallback_line(Severity::Warning, &Locator::default(), "hm"),
            "serializer warning - hm"
        );
    }
}

//! # Serializer Instance
//!
//! One serialization session bound to one format.
//!
//! ## Lifecycle
//!
//! ```text
//! new ──► Created ──start*──► Started ──end──► Ended
//!                               ▲                │
//!                               └────start*──────┘
//! ```
//!
//! Dropping the instance (from any state) runs the format's terminate hook
//! and releases the context, the sink, the base location and every owned
//! feature value.
//!
//! ## Sinks
//!
//! At most one sink is bound at a time. Every start variant first releases
//! the previous base location and resets the locator to the new base, then
//! binds the sink and calls the format's start hook. A start that cannot
//! open its output returns before touching the current session. `emit_statement` and
//! `end` require a bound sink; that is the only precondition enforced here.

use crate::diagnostics::{Diagnostics, Locator, MessageHandler, Severity};
use crate::features::{Feature, FeatureSet};
use crate::format::{FormatContext, HookContext};
use crate::registry::{Factory, FormatRegistry};
use crate::sink::{MemoryBuffer, Sink};
use crate::{GraphoutError, Location, Namespace, Statement};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Where a serializer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Started,
    Ended,
}

/// A configured serialization session.
pub struct Serializer {
    factory: Arc<Factory>,
    context: Box<dyn FormatContext>,
    base: Option<Location>,
    sink: Option<Sink>,
    locator: Locator,
    features: FeatureSet,
    diagnostics: Diagnostics,
    state: SessionState,
}

impl std::fmt::Debug for Serializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serializer")
            .field("format", &self.factory.name())
            .field("base", &self.base)
            .field("sink", &self.sink)
            .field("state", &self.state)
            .field("features", &self.features)
            .finish()
    }
}

impl Serializer {
    /// Create a serializer for `name` (or the default format).
    ///
    /// Fails with `UnknownFormat` if nothing answers to the name, or with
    /// the init hook's error if the format refuses to initialize.
    pub fn new(registry: &FormatRegistry, name: Option<&str>) -> Result<Self, GraphoutError> {
        let factory = registry.lookup(name)?;
        let context = factory.format().init(name)?;
        tracing::debug!(format = factory.name(), requested = ?name, "serializer created");
        Ok(Self {
            factory,
            context,
            base: None,
            sink: None,
            locator: Locator::default(),
            features: FeatureSet::new(),
            diagnostics: Diagnostics::new(),
            state: SessionState::Created,
        })
    }

    /// The factory this instance was created from.
    #[must_use]
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Base location of the current (or last) session.
    #[must_use]
    pub fn base(&self) -> Option<&Location> {
        self.base.as_ref()
    }

    /// Current locator, as attached to diagnostics.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether a sink is currently bound.
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    // =========================================================================
    // START VARIANTS
    // =========================================================================

    /// Start writing to a caller-supplied byte stream.
    ///
    /// The stream is owned by the session and closed by [`Self::end`].
    pub fn start(
        &mut self,
        base: Option<&Location>,
        stream: Box<dyn Write + Send>,
    ) -> Result<(), GraphoutError> {
        self.rebase(base.cloned());
        self.bind(Sink::from_stream(stream))
    }

    /// Start writing to a new file at `path`.
    ///
    /// The base location is the file's `file:` URI. If the file cannot be
    /// created the current base, locator and sink are left as they were.
    pub fn start_to_path(&mut self, path: impl AsRef<Path>) -> Result<(), GraphoutError> {
        let path = path.as_ref();
        let base = Location::from_path(path)?;
        let sink = Sink::create_file(path)?;
        self.rebase(Some(base));
        self.bind(sink)
    }

    /// Start writing to memory.
    ///
    /// The returned buffer holds the final bytes once the session ends.
    pub fn start_to_buffer(
        &mut self,
        base: Option<&Location>,
    ) -> Result<MemoryBuffer, GraphoutError> {
        self.rebase(base.cloned());
        let (sink, buffer) = Sink::memory();
        self.bind(sink)?;
        Ok(buffer)
    }

    /// Start writing to an externally owned open file.
    ///
    /// The session never closes `file` itself.
    pub fn start_to_file_handle(
        &mut self,
        base: Option<&Location>,
        file: &File,
    ) -> Result<(), GraphoutError> {
        let sink = Sink::borrow_file(file)?;
        self.rebase(base.cloned());
        self.bind(sink)
    }

    fn rebase(&mut self, base: Option<Location>) {
        self.base = base;
        self.locator.reset(self.base.clone());
    }

    fn bind(&mut self, sink: Sink) -> Result<(), GraphoutError> {
        if let Some(previous) = self.sink.take() {
            tracing::debug!(kind = previous.kind(), "replacing bound sink");
            if let Err(e) = previous.close() {
                tracing::warn!(error = %e, "closing replaced sink failed");
            }
        }
        tracing::debug!(
            format = self.factory.name(),
            kind = sink.kind(),
            base = ?self.base.as_ref().map(Location::as_str),
            "session started"
        );
        self.sink = Some(sink);
        self.state = SessionState::Started;
        let (context, mut cx) = self.hook_parts();
        context.start(&mut cx)
    }

    // =========================================================================
    // NAMESPACES & STATEMENTS
    // =========================================================================

    /// Declare a namespace prefix with the format.
    pub fn declare_namespace(
        &mut self,
        uri: &Location,
        prefix: Option<&str>,
    ) -> Result<(), GraphoutError> {
        let (context, mut cx) = self.hook_parts();
        context.declare_namespace(&mut cx, uri, prefix)
    }

    /// Declare a namespace from an existing namespace object.
    pub fn declare_namespace_from_namespace(
        &mut self,
        namespace: &Namespace,
    ) -> Result<(), GraphoutError> {
        let (context, mut cx) = self.hook_parts();
        context.declare_namespace_from_namespace(&mut cx, namespace)
    }

    /// Serialize one statement. Requires a bound sink.
    pub fn emit_statement(&mut self, statement: &Statement) -> Result<(), GraphoutError> {
        if self.sink.is_none() {
            return Err(GraphoutError::NoSink);
        }
        let (context, mut cx) = self.hook_parts();
        context.emit_statement(&mut cx, statement)
    }

    /// End the session.
    ///
    /// Runs the format's end hook, then always closes and detaches the
    /// sink. The hook's error wins; a close failure after a failed hook is
    /// reported on the error channel instead.
    pub fn end(&mut self) -> Result<(), GraphoutError> {
        if self.sink.is_none() {
            return Err(GraphoutError::NoSink);
        }
        let hook_result = {
            let (context, mut cx) = self.hook_parts();
            context.end(&mut cx)
        };
        let close_result = match self.sink.take() {
            Some(sink) => sink.close(),
            None => Ok(()),
        };
        self.state = SessionState::Ended;
        tracing::debug!(format = self.factory.name(), "session ended");

        match (hook_result, close_result) {
            (Err(hook), Err(close)) => {
                tracing::warn!(error = %close, "closing sink after failed end hook");
                self.error(&format!("closing output failed: {}", close));
                Err(hook)
            }
            (Err(hook), Ok(())) => Err(hook),
            (Ok(()), close) => close,
        }
    }

    /// Destroy the instance. Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self);
    }

    // =========================================================================
    // FEATURES
    // =========================================================================

    /// Set an integer feature. Negative values and non-serializer features
    /// are rejected.
    pub fn set_feature(&mut self, feature: Feature, value: i32) -> Result<(), GraphoutError> {
        self.features.set(feature, value)
    }

    /// Set a feature from text, dispatching on the feature's declared kind.
    pub fn set_feature_string(
        &mut self,
        feature: Feature,
        value: &str,
    ) -> Result<(), GraphoutError> {
        self.features.set_string(feature, value)
    }

    /// Get an integer feature.
    pub fn get_feature(&self, feature: Feature) -> Result<i32, GraphoutError> {
        self.features.get(feature)
    }

    /// Get a string feature, `None` if unset or not string-kind.
    #[must_use]
    pub fn get_feature_string(&self, feature: Feature) -> Option<&str> {
        self.features.get_string(feature)
    }

    /// All configured feature values.
    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    // =========================================================================
    // DIAGNOSTICS
    // =========================================================================

    /// Route error diagnostics to `handler`.
    pub fn set_error_handler(&mut self, handler: impl MessageHandler + 'static) {
        self.diagnostics
            .set_handler(Severity::Error, Box::new(handler));
    }

    /// Route warning diagnostics to `handler`.
    pub fn set_warning_handler(&mut self, handler: impl MessageHandler + 'static) {
        self.diagnostics
            .set_handler(Severity::Warning, Box::new(handler));
    }

    /// Drop the error handler; errors go back to the default stderr output.
    pub fn clear_error_handler(&mut self) {
        self.diagnostics.clear_handler(Severity::Error);
    }

    pub fn clear_warning_handler(&mut self) {
        self.diagnostics.clear_handler(Severity::Warning);
    }

    /// Report an error with the current location attached.
    pub fn error(&self, message: &str) {
        self.diagnostics
            .emit(Severity::Error, &self.locator, message);
    }

    /// Report a warning with the current location attached.
    pub fn warning(&self, message: &str) {
        self.diagnostics
            .emit(Severity::Warning, &self.locator, message);
    }

    /// Split borrows: the format context plus the view its hooks receive.
    fn hook_parts(&mut self) -> (&mut (dyn FormatContext + 'static), HookContext<'_>) {
        let cx = HookContext {
            format_name: self.factory.name(),
            sink: self.sink.as_mut(),
            base: self.base.as_ref(),
            features: &self.features,
            locator: &self.locator,
            diagnostics: &self.diagnostics,
        };
        (self.context.as_mut(), cx)
    }
}

impl Drop for Serializer {
    fn drop(&mut self) {
        self.context.terminate();
        tracing::debug!(format = self.factory.name(), "serializer destroyed");
    }
}

// =============================================================================
// TESTS
// =============================================================================

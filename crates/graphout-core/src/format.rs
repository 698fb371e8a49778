//! # Format Plugin Interface
//!
//! A format is registered once as a [`Format`] and produces one
//! [`FormatContext`] per serializer instance. The context is the instance's
//! private state; the framework owns it and drops it on destroy.
//!
//! Hooks receive a [`HookContext`] giving access to the bound sink, the base
//! location, the configured features and the diagnostic channel. Every hook
//! except `emit_statement` has a default, so a format implements only what
//! it needs.

use crate::diagnostics::{Diagnostics, Locator, Severity};
use crate::features::{Feature, FeatureSet};
use crate::sink::Sink;
use crate::{GraphoutError, Location, Namespace, Statement};
use std::io::Write;

// =============================================================================
// PLUGIN TRAITS
// =============================================================================

/// A registered output format.
///
/// Implementations must be `Send + Sync`: one value serves every instance
/// created from its factory.
pub trait Format: Send + Sync {
    /// Initialize hook: build the per-instance context.
    ///
    /// `requested_name` is the name or alias the caller asked for, so one
    /// format can vary its behavior by alias.
    fn init(&self, requested_name: Option<&str>) -> Result<Box<dyn FormatContext>, GraphoutError>;

    /// Called once when the owning factory is torn down.
    fn finish_factory(&self) {}
}

/// Per-instance format state and hooks.
pub trait FormatContext: Send {
    /// Emit header material. Called by every start variant.
    fn start(&mut self, _cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        Ok(())
    }

    /// Declare a namespace prefix.
    fn declare_namespace(
        &mut self,
        cx: &mut HookContext<'_>,
        _uri: &Location,
        _prefix: Option<&str>,
    ) -> Result<(), GraphoutError> {
        Err(GraphoutError::NamespacesUnsupported(
            cx.format_name().to_string(),
        ))
    }

    /// Declare a namespace from an existing namespace object.
    ///
    /// Falls back to [`Self::declare_namespace`].
    fn declare_namespace_from_namespace(
        &mut self,
        cx: &mut HookContext<'_>,
        namespace: &Namespace,
    ) -> Result<(), GraphoutError> {
        self.declare_namespace(cx, namespace.uri(), namespace.prefix())
    }

    /// Write one statement. Only called while a sink is bound.
    fn emit_statement(
        &mut self,
        cx: &mut HookContext<'_>,
        statement: &Statement,
    ) -> Result<(), GraphoutError>;

    /// Emit trailing material. The sink is closed afterwards regardless.
    fn end(&mut self, _cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        Ok(())
    }

    /// Best-effort cleanup when the instance is destroyed.
    fn terminate(&mut self) {}
}

// =============================================================================
// HOOK CONTEXT
// =============================================================================

/// The view of a serializer instance handed to format hooks.
pub struct HookContext<'a> {
    pub(crate) format_name: &'a str,
    pub(crate) sink: Option<&'a mut Sink>,
    pub(crate) base: Option<&'a Location>,
    pub(crate) features: &'a FeatureSet,
    pub(crate) locator: &'a Locator,
    pub(crate) diagnostics: &'a Diagnostics,
}

impl HookContext<'_> {
    /// Canonical name of the factory this instance was created from.
    #[must_use]
    pub fn format_name(&self) -> &str {
        self.format_name
    }

    /// Base location of the current session.
    #[must_use]
    pub fn base(&self) -> Option<&Location> {
        self.base
    }

    /// Configured feature values.
    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        self.features
    }

    /// Current locator.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        self.locator
    }

    /// Whether a sink is bound.
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// The bound sink, or `NoSink` outside a session.
    pub fn sink(&mut self) -> Result<&mut Sink, GraphoutError> {
        self.sink.as_deref_mut().ok_or(GraphoutError::NoSink)
    }

    /// Write raw bytes to the bound sink.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), GraphoutError> {
        self.sink()?.write_all(bytes)?;
        Ok(())
    }

    /// Write text to the bound sink.
    pub fn write_str(&mut self, text: &str) -> Result<(), GraphoutError> {
        self.write_bytes(text.as_bytes())
    }

    /// Shorten an IRI against the base when relative output is enabled.
    #[must_use]
    pub fn relative<'s>(&self, iri: &'s str) -> &'s str {
        match self.base {
            Some(base) if self.features.is_enabled(Feature::RelativeUris) => {
                base.relative_reference(iri)
            }
            _ => iri,
        }
    }

    /// Report an error with the current location attached.
    pub fn error(&self, message: &str) {
        self.diagnostics.emit(Severity::Error, self.locator, message);
    }

    /// Report a warning with the current location attached.
    pub fn warning(&self, message: &str) {
        self.diagnostics
            .emit(Severity::Warning, self.locator, message);
    }
}

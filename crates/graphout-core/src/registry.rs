//! # Factory Registry
//!
//! Ordered collection of registered output formats.
//!
//! The registry is populated once at startup and read afterwards. It is
//! append-only: factories are never removed, and the first one registered
//! is the default format. Lookup matches the canonical name or the alias,
//! case-sensitively.
//!
//! Factories are shared with every serializer created from them through an
//! `Arc`, so a factory always outlives its instances. A factory's
//! `finish_factory` hook runs when its last reference is dropped.

use crate::format::Format;
use crate::serializer::Serializer;
use crate::GraphoutError;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// FACTORY
// =============================================================================

/// Registration metadata for one format.
///
/// All strings are owned copies, so callers may reuse their buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    name: String,
    label: String,
    mime_type: Option<String>,
    alias: Option<String>,
    uri: Option<String>,
}

impl FormatDescriptor {
    /// Describe a format by canonical name and human-readable label.
    #[must_use]
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            mime_type: None,
            alias: None,
            uri: None,
        }
    }

    #[must_use]
    pub fn mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// URI identifying the syntax.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = Some(uri.to_string());
        self
    }
}

/// A registered format: descriptor plus hooks.
pub struct Factory {
    descriptor: FormatDescriptor,
    format: Box<dyn Format>,
}

impl Factory {
    /// Canonical name, unique within the registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.descriptor.label
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.descriptor.alias.as_deref()
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.descriptor.mime_type.as_deref()
    }

    /// URI identifying the syntax.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.descriptor.uri.as_deref()
    }

    /// Whether `name` is this factory's canonical name or alias.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.name() == name || self.alias() == Some(name)
    }

    pub(crate) fn format(&self) -> &dyn Format {
        self.format.as_ref()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl Drop for Factory {
    fn drop(&mut self) {
        self.format.finish_factory();
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The collection of registered formats, in registration order.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    factories: Vec<Arc<Factory>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in format.
    ///
    /// N-Triples is registered first and is therefore the default.
    #[must_use]
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        crate::formats::register_builtin(&mut registry);
        registry
    }

    /// Register a format, failing if the name is taken.
    pub fn try_register(
        &mut self,
        descriptor: FormatDescriptor,
        format: impl Format + 'static,
    ) -> Result<Arc<Factory>, GraphoutError> {
        if self.factories.iter().any(|f| f.name() == descriptor.name) {
            return Err(GraphoutError::DuplicateFormat(descriptor.name));
        }
        tracing::debug!(
            name = %descriptor.name,
            label = %descriptor.label,
            alias = descriptor.alias.as_deref().unwrap_or("none"),
            "registering format"
        );
        let factory = Arc::new(Factory {
            descriptor,
            format: Box::new(format),
        });
        self.factories.push(Arc::clone(&factory));
        Ok(factory)
    }

    /// Register a format.
    ///
    /// # Panics
    ///
    /// Panics if a format with the same canonical name is already
    /// registered. Names are fixed at build time, so a clash is a defect in
    /// the set of compiled-in formats and there is no sensible way to run on.
    #[allow(clippy::panic)]
    pub fn register(
        &mut self,
        descriptor: FormatDescriptor,
        format: impl Format + 'static,
    ) -> Arc<Factory> {
        match self.try_register(descriptor, format) {
            Ok(factory) => factory,
            Err(e) => panic!("{}", e),
        }
    }

    /// Find a factory by name or alias, or the default when `name` is `None`.
    pub fn lookup(&self, name: Option<&str>) -> Result<Arc<Factory>, GraphoutError> {
        let found = match name {
            None => self.factories.first(),
            Some(name) => self.factories.iter().find(|f| f.answers_to(name)),
        };
        match found {
            Some(factory) => Ok(Arc::clone(factory)),
            None => {
                let wanted = name.unwrap_or("(default)");
                tracing::debug!(name = wanted, "no serializer found");
                Err(GraphoutError::UnknownFormat(wanted.to_string()))
            }
        }
    }

    /// The factory at ordinal `index`, for listings.
    #[must_use]
    pub fn enumerate(&self, index: usize) -> Option<&Factory> {
        self.factories.get(index).map(Arc::as_ref)
    }

    /// Whether `name` resolves to a registered format.
    #[must_use]
    pub fn name_is_known(&self, name: &str) -> bool {
        self.lookup(Some(name)).is_ok()
    }

    /// Iterate factories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Factory> {
        self.factories.iter().map(Arc::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Create a serializer for `name` (or the default format).
    pub fn new_serializer(&self, name: Option<&str>) -> Result<Serializer, GraphoutError> {
        Serializer::new(self, name)
    }
}

// =============================================================================
// TESTS
// =============================================================================

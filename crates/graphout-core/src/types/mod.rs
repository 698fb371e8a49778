//! # Core Type Definitions
//!
//! This module contains the value types shared by the framework and by
//! every format plugin:
//! - Locations (`Location`) used for base references and feature values
//! - Statement representation (`Statement`, `Term`, `Literal`)
//! - Namespace declarations (`Namespace`)
//! - Error types (`GraphoutError`)
//!
//! The framework never inspects statements; it forwards them by reference
//! to the bound format. These types exist so that formats and callers agree
//! on a shape.

use crate::features::Feature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

// =============================================================================
// LOCATION
// =============================================================================

/// An owned, resolvable reference such as a file or network URI.
///
/// Locations are opaque to the framework: they are copied on store and
/// dropped on replace. No parsing or resolution is performed beyond
/// deriving a `file:` URI from a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Create a location from a URI string.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Derive a `file:` location from a filesystem path.
    ///
    /// Relative paths are made absolute against the current directory.
    /// The file does not need to exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphoutError> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|e| {
            GraphoutError::SinkOpen(format!("Cannot resolve '{}': {}", path.display(), e))
        })?;
        let url = url::Url::from_file_path(&absolute).map_err(|()| {
            GraphoutError::SinkOpen(format!(
                "Cannot derive a file URI from '{}'",
                absolute.display()
            ))
        })?;
        Ok(Self(url.into()))
    }

    /// Get the location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shorten `iri` against this location when it shares a prefix.
    ///
    /// Same-document fragments become `#frag`, siblings in the same
    /// directory lose the directory prefix. Anything else is returned
    /// unchanged.
    #[must_use]
    pub fn relative_reference<'a>(&self, iri: &'a str) -> &'a str {
        let base = self.as_str();
        if let Some(rest) = iri.strip_prefix(base)
            && rest.starts_with('#')
        {
            return rest;
        }
        let directory = match base.rfind('/') {
            Some(idx) => &base[..=idx],
            None => return iri,
        };
        match iri.strip_prefix(directory) {
            Some(rest) if !rest.is_empty() && !rest.contains('/') => rest,
            _ => iri,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// STATEMENT COMPONENTS
// =============================================================================

/// A literal value with an optional datatype or language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The lexical form.
    pub value: String,
    /// Datatype IRI, if typed.
    #[serde(default)]
    pub datatype: Option<String>,
    /// Language tag, if language-tagged.
    #[serde(default)]
    pub language: Option<String>,
}

/// One position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// An IRI reference.
    Iri(String),
    /// A blank node identifier (without the `_:` prefix).
    Blank(String),
    /// A literal.
    Literal(Literal),
}

impl Term {
    /// Create an IRI term.
    #[must_use]
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    /// Create a blank node term.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    /// Create a plain literal term.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// Create a typed literal term.
    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        })
    }

    /// Create a language-tagged literal term.
    #[must_use]
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        })
    }
}

// =============================================================================
// STATEMENT
// =============================================================================

/// A subject-predicate-object statement describing one graph edge.
///
/// Passed to formats by reference and never mutated by the framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    /// Create a new statement.
    #[must_use]
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

// =============================================================================
// NAMESPACE
// =============================================================================

/// An association between a namespace URI and a short prefix.
///
/// A `None` prefix declares the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub uri: Location,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl Namespace {
    /// Create a namespace declaration.
    #[must_use]
    pub fn new(uri: impl Into<Location>, prefix: Option<&str>) -> Self {
        Self {
            uri: uri.into(),
            prefix: prefix.map(str::to_string),
        }
    }

    /// The namespace URI.
    #[must_use]
    pub fn uri(&self) -> &Location {
        &self.uri
    }

    /// The prefix, or `None` for the default namespace.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Graphout framework.
///
/// - Format hook failures are propagated unchanged
/// - Use `Result<T, GraphoutError>` for fallible operations
/// - Only duplicate format registration is fatal (see `FormatRegistry::register`)
#[derive(Debug, Error)]
pub enum GraphoutError {
    /// No registered format has this name or alias.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// A format with this name is already registered.
    #[error("Format {0} already registered")]
    DuplicateFormat(String),

    /// A statement or end call arrived while no output sink was bound.
    #[error("No output sink bound")]
    NoSink,

    /// The output sink could not be opened or its base location derived.
    #[error("Cannot open output sink: {0}")]
    SinkOpen(String),

    /// Writing to or closing the sink failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The feature is unknown to the serializer or queried through the wrong entry point.
    #[error("Unknown feature: {0}")]
    UnknownFeature(Feature),

    /// Integer feature values must be non-negative.
    #[error("Negative value {1} for feature {0}")]
    NegativeFeatureValue(Feature, i32),

    /// The string could not be interpreted for this feature.
    #[error("Invalid value '{1}' for feature {0}")]
    InvalidFeatureValue(Feature, String),

    /// The format supports no namespace declarations.
    #[error("Format {0} does not support namespace declarations")]
    NamespacesUnsupported(String),

    /// A format hook reported a failure.
    #[error("Format error: {0}")]
    Format(String),

    /// A serialization error occurred inside a format.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for GraphoutError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

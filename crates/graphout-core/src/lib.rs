//! # graphout-core
//!
//! The pluggable serializer framework for Graphout - THE FRAMEWORK.
//!
//! This crate lets independent output formats register under a name and an
//! optional alias, and drives a selected format through a fixed lifecycle:
//!
//! ```text
//! FormatRegistry::lookup ─► Serializer::new ─► start_* ─► emit_statement* ─► end ─► drop
//! ```
//!
//! ## Components
//!
//! - `features`: static feature table and per-instance typed values
//! - `diagnostics`: error/warning channel with location context
//! - `registry`: format factories, name/alias lookup, enumeration
//! - `serializer`: instance lifecycle and sink ownership
//! - `format`: the plugin traits formats implement
//! - `formats`: reference plugins (N-Triples, DOT, postcard, JSON Lines)
//!
//! ## Example
//!
//! ```
//! use graphout_core::{FormatRegistry, Statement, Term};
//!
//! let registry = FormatRegistry::with_builtin_formats();
//! let mut serializer = registry.new_serializer(Some("nt")).expect("format");
//! let buffer = serializer.start_to_buffer(None).expect("start");
//! serializer
//!     .emit_statement(&Statement::new(
//!         Term::iri("http://example.org/s"),
//!         Term::iri("http://example.org/p"),
//!         Term::literal("o"),
//!     ))
//!     .expect("emit");
//! serializer.end().expect("end");
//! assert!(buffer.to_string_lossy().ends_with(" .\n"));
//! ```
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous; no operation suspends
//! - The registry is populated once, then only read
//! - The framework never inspects statements or hook failures

// =============================================================================
// MODULES
// =============================================================================

pub mod diagnostics;
pub mod features;
pub mod format;
pub mod formats;
pub mod primitives;
pub mod registry;
pub mod serializer;
pub mod sink;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GraphoutError, Literal, Location, Namespace, Statement, Term};

// =============================================================================
// RE-EXPORTS: Framework
// =============================================================================

pub use diagnostics::{Diagnostics, Locator, MessageHandler, Severity};
pub use features::{
    FEATURES, Feature, FeatureArea, FeatureDescription, FeatureKind, FeatureSet, FeatureSpec,
    enumerate_serializer,
};
pub use format::{Format, FormatContext, HookContext};
pub use registry::{Factory, FormatDescriptor, FormatRegistry};
pub use serializer::{SessionState, Serializer};
pub use sink::{MemoryBuffer, Sink};

//! # Statement Documents
//!
//! The JSON input of the `serialize` command:
//!
//! ```json
//! {
//!   "namespaces": [{ "uri": "http://xmlns.com/foaf/0.1/", "prefix": "foaf" }],
//!   "statements": [
//!     {
//!       "subject": { "iri": "http://example.org/me" },
//!       "predicate": { "iri": "http://xmlns.com/foaf/0.1/name" },
//!       "object": { "literal": { "value": "Alice" } }
//!     }
//!   ]
//! }
//! ```

use graphout_core::{GraphoutError, Namespace, Serializer, Statement};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum input file size (100 MB).
///
/// This prevents memory exhaustion from accidental large files.
pub const MAX_INPUT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Namespaces and statements to serialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDocument {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// What [`StatementDocument::write_to`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub namespaces: usize,
    pub statements: usize,
}

impl StatementDocument {
    /// Parse a document from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GraphoutError> {
        serde_json::from_slice(bytes)
            .map_err(|e| GraphoutError::Serialization(format!("Invalid statement document: {}", e)))
    }

    /// Read and parse a document file.
    pub fn load(path: &Path) -> Result<Self, GraphoutError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            GraphoutError::Io(format!("Cannot read file metadata '{}': {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(GraphoutError::Io(format!(
                "Path '{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > MAX_INPUT_FILE_SIZE {
            return Err(GraphoutError::Serialization(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_INPUT_FILE_SIZE
            )));
        }
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    /// Declare the namespaces, then emit every statement.
    ///
    /// The serializer must already be started. A format without namespace
    /// support skips the declarations; any other failure stops the write.
    pub fn write_to(&self, serializer: &mut Serializer) -> Result<WriteSummary, GraphoutError> {
        let mut summary = WriteSummary::default();

        for namespace in &self.namespaces {
            match serializer.declare_namespace_from_namespace(namespace) {
                Ok(()) => summary.namespaces += 1,
                Err(GraphoutError::NamespacesUnsupported(format)) => {
                    tracing::debug!(
                        format = %format,
                        skipped = self.namespaces.len(),
                        "format has no namespace support, skipping declarations"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        for statement in &self.statements {
            serializer.emit_statement(statement)?;
            summary.statements += 1;
        }
        Ok(summary)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use graphout_core::Term;

    #[test]
    fn parses_documented_shape() {
        let json = r#"{
            "namespaces": [{ "uri": "http://xmlns.com/foaf/0.1/", "prefix": "foaf" }],
            "statements": [{
                "subject": { "iri": "http://example.org/me" },
                "predicate": { "iri": "http://xmlns.com/foaf/0.1/name" },
                "object": { "literal": { "value": "Alice" } }
            }]
        }"#;
        let document = StatementDocument::from_json(json.as_bytes()).expect("parse");

        assert_eq!(document.namespaces[0].prefix(), Some("foaf"));
        assert_eq!(document.statements[0].object, Term::literal("Alice"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let document = StatementDocument::from_json(b"{}").expect("parse");
        assert_eq!(document, StatementDocument::default());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(StatementDocument::from_json(b"{\"statements\": 3}").is_err());
    }
}

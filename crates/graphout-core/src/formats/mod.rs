//! # Built-in Formats
//!
//! Reference format plugins compiled into the crate.
//!
//! Each format lives in its own module and plugs into the framework purely
//! through [`crate::format::Format`]; nothing in the framework core knows
//! about any of them. [`register_builtin`] registers them in default order.

pub mod binary;
pub mod dot;
pub mod jsonl;
pub mod ntriples;

use crate::registry::{FormatDescriptor, FormatRegistry};

pub use binary::{BinaryFormat, read_statements};
pub use dot::DotFormat;
pub use jsonl::JsonLinesFormat;
pub use ntriples::NTriplesFormat;

/// Register every built-in format. N-Triples first, so it is the default.
pub fn register_builtin(registry: &mut FormatRegistry) {
    registry.register(
        FormatDescriptor::new("ntriples", "N-Triples")
            .mime_type("text/plain")
            .alias("nt")
            .uri("http://www.w3.org/TR/rdf-testcases/#ntriples"),
        NTriplesFormat,
    );
    registry.register(
        FormatDescriptor::new("dot", "GraphViz DOT format")
            .mime_type("text/x-graphviz")
            .uri("http://www.graphviz.org/doc/info/lang.html"),
        DotFormat,
    );
    registry.register(
        FormatDescriptor::new("postcard", "Binary statement stream")
            .mime_type("application/x-graphout-postcard")
            .alias("binary"),
        BinaryFormat,
    );
    registry.register(
        FormatDescriptor::new("jsonl", "JSON Lines")
            .mime_type("application/x-ndjson")
            .alias("json"),
        JsonLinesFormat,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_and_default() {
        let registry = FormatRegistry::with_builtin_formats();
        let names: Vec<_> = registry.iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["ntriples", "dot", "postcard", "jsonl"]);
        assert_eq!(registry.lookup(None).expect("default").name(), "ntriples");
    }

    #[test]
    fn builtin_aliases_resolve() {
        let registry = FormatRegistry::with_builtin_formats();
        assert_eq!(registry.lookup(Some("nt")).expect("nt").name(), "ntriples");
        assert_eq!(registry.lookup(Some("binary")).expect("bin").name(), "postcard");
        assert_eq!(registry.lookup(Some("json")).expect("json").name(), "jsonl");
    }
}

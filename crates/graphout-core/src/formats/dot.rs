//! # GraphViz DOT
//!
//! Writes the statements as a directed graph: one edge per statement as it
//! arrives, node declarations on end. Nodes are styled from the six
//! border/fill string features, labels are abbreviated with declared
//! namespaces and shortened against the base when relative URIs are on.

use crate::features::Feature;
use crate::format::{Format, FormatContext, HookContext};
use crate::{GraphoutError, Literal, Location, Statement, Term};
use std::collections::BTreeSet;

/// The GraphViz DOT format (`dot`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DotFormat;

impl Format for DotFormat {
    fn init(&self, _requested: Option<&str>) -> Result<Box<dyn FormatContext>, GraphoutError> {
        Ok(Box::new(DotContext::default()))
    }
}

#[derive(Debug, Default)]
struct DotContext {
    namespaces: Vec<(Option<String>, Location)>,
    resources: BTreeSet<String>,
    blanks: BTreeSet<String>,
    literals: BTreeSet<Literal>,
}

/// Node kinds, each with its own id prefix and style features.
#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Resource,
    Blank,
    Literal,
}

impl NodeKind {
    fn id_prefix(self) -> char {
        match self {
            Self::Resource => 'R',
            Self::Blank => 'B',
            Self::Literal => 'L',
        }
    }

    fn style_features(self) -> (Feature, Feature) {
        match self {
            Self::Resource => (Feature::ResourceBorder, Feature::ResourceFill),
            Self::Blank => (Feature::BnodeBorder, Feature::BnodeFill),
            Self::Literal => (Feature::LiteralBorder, Feature::LiteralFill),
        }
    }

    fn shape(self) -> &'static str {
        match self {
            Self::Resource | Self::Blank => "ellipse",
            Self::Literal => "record",
        }
    }
}

impl DotContext {
    fn remember(&mut self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => {
                self.resources.insert(iri.clone());
                node_id(NodeKind::Resource, iri)
            }
            Term::Blank(id) => {
                self.blanks.insert(id.clone());
                node_id(NodeKind::Blank, id)
            }
            Term::Literal(literal) => {
                self.literals.insert(literal.clone());
                node_id(NodeKind::Literal, &literal_key(literal))
            }
        }
    }

    /// Abbreviate an IRI with the longest matching namespace.
    fn label(&self, cx: &HookContext<'_>, iri: &str) -> String {
        let best = self
            .namespaces
            .iter()
            .filter(|(_, uri)| iri.starts_with(uri.as_str()))
            .max_by_key(|(_, uri)| uri.as_str().len());
        match best {
            Some((prefix, uri)) => {
                let local = &iri[uri.as_str().len()..];
                format!("{}:{}", prefix.as_deref().unwrap_or(""), local)
            }
            None => cx.relative(iri).to_string(),
        }
    }

    /// Literal label: the lexical form plus its language or datatype.
    fn literal_label(&self, cx: &HookContext<'_>, literal: &Literal) -> String {
        let mut label = literal.value.clone();
        if let Some(language) = &literal.language {
            label.push('@');
            label.push_str(language);
        }
        if let Some(datatype) = &literal.datatype {
            label.push_str("^^");
            label.push_str(&self.label(cx, datatype));
        }
        label
    }

    /// Write one block of node declarations, each given as `(id, label)`.
    fn write_nodes(
        cx: &mut HookContext<'_>,
        kind: NodeKind,
        comment: &str,
        nodes: &[(String, String)],
    ) -> Result<(), GraphoutError> {
        if nodes.is_empty() {
            return Ok(());
        }
        let (border, fill) = kind.style_features();
        let border = cx.features().get_string(border).map(escape);
        let fill = cx.features().get_string(fill).map(escape);

        let mut out = format!("\n\t// {}\n", comment);
        for (id, label) in nodes {
            out.push_str(&format!(
                "\t\"{}\" [ label=\"{}\", shape = {}",
                escape(id),
                escape(label),
                kind.shape()
            ));
            if let Some(color) = &border {
                out.push_str(&format!(", color=\"{}\"", color));
            }
            if let Some(color) = &fill {
                out.push_str(&format!(", style = filled, fillcolor=\"{}\"", color));
            }
            out.push_str(" ];\n");
        }
        cx.write_str(&out)
    }
}

impl FormatContext for DotContext {
    fn start(&mut self, cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        self.resources.clear();
        self.blanks.clear();
        self.literals.clear();
        cx.write_str("digraph {\n\trankdir = LR;\n\tcharset=\"utf-8\";\n\n")
    }

    fn declare_namespace(
        &mut self,
        _cx: &mut HookContext<'_>,
        uri: &Location,
        prefix: Option<&str>,
    ) -> Result<(), GraphoutError> {
        let prefix = prefix.map(str::to_string);
        self.namespaces.retain(|(p, _)| *p != prefix);
        self.namespaces.push((prefix, uri.clone()));
        Ok(())
    }

    fn emit_statement(
        &mut self,
        cx: &mut HookContext<'_>,
        statement: &Statement,
    ) -> Result<(), GraphoutError> {
        let predicate = match &statement.predicate {
            Term::Iri(iri) => self.label(cx, iri),
            Term::Blank(id) => {
                cx.warning("blank node predicate drawn as a plain label");
                format!("_:{}", id)
            }
            Term::Literal(literal) => {
                cx.warning("literal predicate drawn as a plain label");
                literal.value.clone()
            }
        };
        let from = self.remember(&statement.subject);
        let to = self.remember(&statement.object);
        cx.write_str(&format!(
            "\t\"{}\" -> \"{}\" [ label=\"{}\" ];\n",
            escape(&from),
            escape(&to),
            escape(&predicate)
        ))
    }

    fn end(&mut self, cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        let resources: Vec<_> = self
            .resources
            .iter()
            .map(|iri| (node_id(NodeKind::Resource, iri), self.label(cx, iri)))
            .collect();
        let blanks: Vec<_> = self
            .blanks
            .iter()
            .map(|id| (node_id(NodeKind::Blank, id), format!("_:{}", id)))
            .collect();
        let literals: Vec<_> = self
            .literals
            .iter()
            .map(|literal| {
                (
                    node_id(NodeKind::Literal, &literal_key(literal)),
                    self.literal_label(cx, literal),
                )
            })
            .collect();
        Self::write_nodes(cx, NodeKind::Resource, "Resources", &resources)?;
        Self::write_nodes(cx, NodeKind::Blank, "Anonymous nodes", &blanks)?;
        Self::write_nodes(cx, NodeKind::Literal, "Literals", &literals)?;

        let mut footer = String::from("\n\tlabel=\"\\n\\nModel:\\n");
        match cx.base() {
            Some(base) => footer.push_str(&escape(base.as_str())),
            None => footer.push_str("(Unknown)"),
        }
        if !self.namespaces.is_empty() {
            footer.push_str("\\n\\nNamespaces:\\n");
            for (prefix, uri) in &self.namespaces {
                footer.push_str(&format!(
                    "{}: {}\\n",
                    escape(prefix.as_deref().unwrap_or("(default)")),
                    escape(uri.as_str())
                ));
            }
        }
        footer.push_str("\";\n}\n");
        cx.write_str(&footer)
    }
}

fn node_id(kind: NodeKind, key: &str) -> String {
    format!("{}{}", kind.id_prefix(), key)
}

/// Node key for a literal. `\\`, `@` and `^` in the lexical form are
/// backslash-escaped so the language and datatype suffixes stay distinct.
fn literal_key(literal: &Literal) -> String {
    let mut key = String::with_capacity(literal.value.len());
    for ch in literal.value.chars() {
        if matches!(ch, '\\' | '@' | '^') {
            key.push('\\');
        }
        key.push(ch);
    }
    if let Some(language) = &literal.language {
        key.push('@');
        key.push_str(language);
    }
    if let Some(datatype) = &literal.datatype {
        key.push_str("^^");
        key.push_str(datatype);
    }
    key
}

/// Escape text for a double-quoted DOT string.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormatRegistry, Namespace};

    fn foaf_statements() -> Vec<Statement> {
        vec![
            Statement::new(
                Term::iri("http://example.org/doc#me"),
                Term::iri("http://xmlns.com/foaf/0.1/name"),
                Term::literal("Alice"),
            ),
            Statement::new(
                Term::iri("http://example.org/doc#me"),
                Term::iri("http://xmlns.com/foaf/0.1/knows"),
                Term::blank("b1"),
            ),
        ]
    }

    #[test]
    fn graph_with_styles_and_namespaces() {
        let registry = FormatRegistry::with_builtin_formats();
        let mut serializer = registry.new_serializer(Some("dot")).expect("create");
        serializer
            .set_feature_string(Feature::ResourceFill, "lightblue")
            .expect("fill");
        serializer
            .set_feature_string(Feature::LiteralBorder, "red")
            .expect("border");
        serializer
            .declare_namespace_from_namespace(&Namespace::new(
                "http://xmlns.com/foaf/0.1/",
                Some("foaf"),
            ))
            .expect("namespace");

        let base = Location::new("http://example.org/doc");
        let buffer = serializer.start_to_buffer(Some(&base)).expect("start");
        for statement in foaf_statements() {
            serializer.emit_statement(&statement).expect("emit");
        }
        serializer.end().expect("end");
        let out = buffer.to_string_lossy();

        assert!(out.starts_with("digraph {\n"));
        assert!(out.contains(
            "\t\"Rhttp://example.org/doc#me\" -> \"LAlice\" [ label=\"foaf:name\" ];\n"
        ));
        assert!(out.contains("\"Bb1\" [ label=\"_:b1\", shape = ellipse ];"));
        // Relative URIs are on by default: the resource label is shortened.
        assert!(out.contains(
            "\"Rhttp://example.org/doc#me\" [ label=\"#me\", shape = ellipse, style = filled, fillcolor=\"lightblue\" ];"
        ));
        assert!(out.contains("\"LAlice\" [ label=\"Alice\", shape = record, color=\"red\" ];"));
        assert!(out.contains("foaf: http://xmlns.com/foaf/0.1/"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn relative_uris_disabled_keeps_full_label() {
        let registry = FormatRegistry::with_builtin_formats();
        let mut serializer = registry.new_serializer(Some("dot")).expect("create");
        serializer.set_feature(Feature::RelativeUris, 0).expect("set");

        let base = Location::new("http://example.org/doc");
        let buffer = serializer.start_to_buffer(Some(&base)).expect("start");
        for statement in foaf_statements() {
            serializer.emit_statement(&statement).expect("emit");
        }
        serializer.end().expect("end");

        assert!(
            buffer
                .to_string_lossy()
                .contains("[ label=\"http://example.org/doc#me\", shape = ellipse ];")
        );
    }

    #[test]
    fn colors_are_quoted_and_escaped() {
        let registry = FormatRegistry::with_builtin_formats();
        let mut serializer = registry.new_serializer(Some("dot")).expect("create");
        serializer
            .set_feature_string(Feature::ResourceFill, "light blue")
            .expect("fill");
        serializer
            .set_feature_string(Feature::BnodeBorder, "x\"y")
            .expect("border");

        let buffer = serializer.start_to_buffer(None).expect("start");
        for statement in foaf_statements() {
            serializer.emit_statement(&statement).expect("emit");
        }
        serializer.end().expect("end");
        let out = buffer.to_string_lossy();

        assert!(out.contains("style = filled, fillcolor=\"light blue\" ];"));
        assert!(out.contains("\"Bb1\" [ label=\"_:b1\", shape = ellipse, color=\"x\\\"y\" ];"));
    }

    #[test]
    fn literals_differing_in_language_or_datatype_stay_apart() {
        let registry = FormatRegistry::with_builtin_formats();
        let mut serializer = registry.new_serializer(Some("dot")).expect("create");
        let subject = Term::iri("http://example.org/s");
        let predicate = Term::iri("http://example.org/p");
        let int = "http://www.w3.org/2001/XMLSchema#int";

        let buffer = serializer.start_to_buffer(None).expect("start");
        for object in [
            Term::literal("1"),
            Term::lang_literal("1", "en"),
            Term::typed_literal("1", int),
            Term::literal("1@en"),
        ] {
            serializer
                .emit_statement(&Statement::new(subject.clone(), predicate.clone(), object))
                .expect("emit");
        }
        serializer.end().expect("end");
        let out = buffer.to_string_lossy();

        let literal_nodes = out
            .lines()
            .filter(|line| line.contains("shape = record"))
            .count();
        assert_eq!(literal_nodes, 4);
        assert!(out.contains("\"L1@en\" [ label=\"1@en\""));
        assert!(out.contains("\"L1\\\\@en\" [ label=\"1@en\""));
        assert!(out.contains(&format!("\"L1^^{}\" [ label=\"1^^{}\"", int, int)));
    }

    #[test]
    fn escape_quotes() {
        assert_eq!(escape("a\"b\\c"), "a\\\"b\\\\c");
    }
}

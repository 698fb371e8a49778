//! # N-Triples
//!
//! One `<s> <p> <o> .` line per statement. Absolute IRIs only: the
//! relative-URI feature does not apply, and namespace declarations are
//! not supported.

use crate::format::{Format, FormatContext, HookContext};
use crate::{GraphoutError, Literal, Statement, Term};

/// The N-Triples format (`ntriples`, alias `nt`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NTriplesFormat;

impl Format for NTriplesFormat {
    fn init(&self, _requested: Option<&str>) -> Result<Box<dyn FormatContext>, GraphoutError> {
        Ok(Box::new(NTriplesContext::default()))
    }
}

#[derive(Debug, Default)]
struct NTriplesContext {
    line: String,
}

impl FormatContext for NTriplesContext {
    fn emit_statement(
        &mut self,
        cx: &mut HookContext<'_>,
        statement: &Statement,
    ) -> Result<(), GraphoutError> {
        if matches!(statement.subject, Term::Literal(_)) {
            cx.error("literal in subject position cannot be written as N-Triples");
            return Err(GraphoutError::Format(
                "literal subject not allowed in N-Triples".to_string(),
            ));
        }
        if !matches!(statement.predicate, Term::Iri(_)) {
            cx.error("predicate must be an IRI in N-Triples");
            return Err(GraphoutError::Format(
                "non-IRI predicate not allowed in N-Triples".to_string(),
            ));
        }

        self.line.clear();
        write_term(cx, &mut self.line, &statement.subject);
        self.line.push(' ');
        write_term(cx, &mut self.line, &statement.predicate);
        self.line.push(' ');
        write_term(cx, &mut self.line, &statement.object);
        self.line.push_str(" .\n");
        cx.write_str(&self.line)
    }
}

fn write_term(cx: &HookContext<'_>, out: &mut String, term: &Term) {
    match term {
        Term::Iri(iri) => {
            out.push('<');
            escape_iri(out, iri);
            out.push('>');
        }
        Term::Blank(id) => {
            out.push_str("_:");
            out.push_str(id);
        }
        Term::Literal(literal) => write_literal(cx, out, literal),
    }
}

fn write_literal(cx: &HookContext<'_>, out: &mut String, literal: &Literal) {
    out.push('"');
    escape_string(out, &literal.value);
    out.push('"');
    match (&literal.language, &literal.datatype) {
        (Some(language), datatype) => {
            if datatype.is_some() {
                cx.warning("literal has both a language and a datatype; datatype dropped");
            }
            out.push('@');
            out.push_str(language);
        }
        (None, Some(datatype)) => {
            out.push_str("^^<");
            escape_iri(out, datatype);
            out.push('>');
        }
        (None, None) => {}
    }
}

/// Escape a literal's lexical form.
pub(crate) fn escape_string(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Escape characters not allowed inside `<...>`.
fn escape_iri(out: &mut String, iri: &str) {
    for ch in iri.chars() {
        match ch {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                out.push_str(&format!("\\u{:04X}", ch as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

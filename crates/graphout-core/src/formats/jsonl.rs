//! # JSON Lines
//!
//! One JSON object per line. Statements use the serde shape of
//! [`Statement`]; namespace declarations are written as
//! `{"prefix":..,"namespace":..}` records. Declarations made before the
//! session starts are held back and written right after start.

use crate::format::{Format, FormatContext, HookContext};
use crate::{GraphoutError, Location, Statement};
use serde::Serialize;

/// The JSON Lines format (`jsonl`, alias `json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesFormat;

impl Format for JsonLinesFormat {
    fn init(&self, _requested: Option<&str>) -> Result<Box<dyn FormatContext>, GraphoutError> {
        Ok(Box::new(JsonLinesContext::default()))
    }
}

#[derive(Debug, Serialize)]
struct NamespaceRecord {
    prefix: Option<String>,
    namespace: String,
}

#[derive(Debug, Default)]
struct JsonLinesContext {
    pending: Vec<NamespaceRecord>,
}

fn write_record<T: Serialize>(cx: &mut HookContext<'_>, record: &T) -> Result<(), GraphoutError> {
    let mut line =
        serde_json::to_vec(record).map_err(|e| GraphoutError::Serialization(e.to_string()))?;
    line.push(b'\n');
    cx.write_bytes(&line)
}

impl FormatContext for JsonLinesContext {
    fn start(&mut self, cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        for record in std::mem::take(&mut self.pending) {
            write_record(cx, &record)?;
        }
        Ok(())
    }

    fn declare_namespace(
        &mut self,
        cx: &mut HookContext<'_>,
        uri: &Location,
        prefix: Option<&str>,
    ) -> Result<(), GraphoutError> {
        let record = NamespaceRecord {
            prefix: prefix.map(str::to_string),
            namespace: uri.as_str().to_string(),
        };
        if cx.has_sink() {
            write_record(cx, &record)
        } else {
            self.pending.push(record);
            Ok(())
        }
    }

    fn emit_statement(
        &mut self,
        cx: &mut HookContext<'_>,
        statement: &Statement,
    ) -> Result<(), GraphoutError> {
        write_record(cx, statement)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::Config;
use crate::document::{StatementDocument, WriteSummary};
use graphout_core::{
    FeatureKind, FormatRegistry, GraphoutError, Locator, Serializer, enumerate_serializer,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

// =============================================================================
// FORMATS COMMAND
// =============================================================================

/// List registered formats in registration order.
pub fn cmd_formats(registry: &FormatRegistry, json_mode: bool) -> Result<(), GraphoutError> {
    if json_mode {
        let formats: Vec<_> = registry
            .iter()
            .enumerate()
            .map(|(index, factory)| {
                serde_json::json!({
                    "index": index,
                    "name": factory.name(),
                    "label": factory.label(),
                    "alias": factory.alias(),
                    "mime_type": factory.mime_type(),
                    "uri": factory.uri(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&formats).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Graphout Output Formats");
    println!("=======================");
    let mut index = 0;
    while let Some(factory) = registry.enumerate(index) {
        let marker = if index == 0 { " (default)" } else { "" };
        println!("{:>2}: {}{}", index, factory.name(), marker);
        println!("    Label:     {}", factory.label());
        if let Some(alias) = factory.alias() {
            println!("    Alias:     {}", alias);
        }
        if let Some(mime_type) = factory.mime_type() {
            println!("    MIME type: {}", mime_type);
        }
        if let Some(uri) = factory.uri() {
            println!("    URI:       {}", uri);
        }
        index += 1;
    }

    Ok(())
}

// =============================================================================
// FEATURES COMMAND
// =============================================================================

/// List the features a serializer accepts.
pub fn cmd_features(json_mode: bool) -> Result<(), GraphoutError> {
    let features: Vec<_> = (0..).map_while(enumerate_serializer).collect();

    if json_mode {
        let output: Vec<_> = features
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "uri": d.uri.as_str(),
                    "label": d.label,
                    "kind": kind_name(d.kind),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Graphout Serializer Features");
    println!("============================");
    for description in &features {
        println!(
            "{:<22} {:<8} {}",
            description.name,
            kind_name(description.kind),
            description.label
        );
        println!("{:<22} {}", "", description.uri);
    }

    Ok(())
}

fn kind_name(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Integer => "integer",
        FeatureKind::String => "string",
    }
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Succeed if `name` is a registered name or alias.
pub fn cmd_check(registry: &FormatRegistry, name: &str) -> Result<(), GraphoutError> {
    if registry.name_is_known(name) {
        println!("{}: known", name);
        Ok(())
    } else {
        Err(GraphoutError::UnknownFormat(name.to_string()))
    }
}

// =============================================================================
// SERIALIZE COMMAND
// =============================================================================

/// Where serialized output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output, through the generic byte-stream sink.
    Stdout,
    /// A new file, through the path sink.
    Path(PathBuf),
    /// An existing file opened for append, through the file-handle sink.
    Append(PathBuf),
}

/// Serialize the statement document at `input`.
pub fn cmd_serialize(
    registry: &FormatRegistry,
    config: &Config,
    input: &Path,
    target: &OutputTarget,
) -> Result<(), GraphoutError> {
    tracing::info!("Serializing {:?} (format: {})", input, config.format().unwrap_or("default"));

    let document = StatementDocument::load(input)?;
    let summary = serialize_document(registry, config, &document, target)?;

    tracing::info!(
        namespaces = summary.namespaces,
        statements = summary.statements,
        "serialization complete"
    );
    Ok(())
}

/// Drive one serializer session over `document`.
///
/// The session is always ended so the sink is released, even when a
/// statement fails; the first failure is returned.
pub fn serialize_document(
    registry: &FormatRegistry,
    config: &Config,
    document: &StatementDocument,
    target: &OutputTarget,
) -> Result<WriteSummary, GraphoutError> {
    let mut serializer = registry.new_serializer(config.format())?;
    serializer.set_error_handler(|locator: &Locator, message: &str| {
        tracing::error!(location = %locator, "{}", message);
    });
    serializer.set_warning_handler(|locator: &Locator, message: &str| {
        tracing::warn!(location = %locator, "{}", message);
    });
    config.configure(&mut serializer)?;

    let base = config.base();
    match target {
        OutputTarget::Stdout => {
            serializer.start(base.as_ref(), Box::new(std::io::stdout()))?;
            finish(&mut serializer, document)
        }
        OutputTarget::Path(path) => {
            if base.is_some() {
                tracing::debug!("path output uses the file location as base");
            }
            serializer.start_to_path(path)?;
            finish(&mut serializer, document)
        }
        OutputTarget::Append(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    GraphoutError::SinkOpen(format!("{}: {}", path.display(), e))
                })?;
            serializer.start_to_file_handle(base.as_ref(), &file)?;
            let result = finish(&mut serializer, document);
            drop(file);
            result
        }
    }
}

fn finish(
    serializer: &mut Serializer,
    document: &StatementDocument,
) -> Result<WriteSummary, GraphoutError> {
    let written = document.write_to(serializer);
    let ended = serializer.end();
    let summary = written?;
    ended?;
    Ok(summary)
}

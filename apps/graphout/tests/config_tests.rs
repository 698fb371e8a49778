//! Tests for config loading, overrides and the serialize pipeline.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use graphout::cli::{OutputTarget, serialize_document};
use graphout::config::Config;
use graphout::document::StatementDocument;
use graphout_core::{Feature, FormatRegistry, GraphoutError, Namespace, Statement, Term};
use std::fs;

fn foaf_document() -> StatementDocument {
    StatementDocument {
        namespaces: vec![Namespace::new("http://xmlns.com/foaf/0.1/", Some("foaf"))],
        statements: vec![
            Statement::new(
                Term::iri("http://example.org/me"),
                Term::iri("http://xmlns.com/foaf/0.1/name"),
                Term::literal("Alice"),
            ),
            Statement::new(
                Term::iri("http://example.org/me"),
                Term::iri("http://xmlns.com/foaf/0.1/knows"),
                Term::blank("b1"),
            ),
        ],
    }
}

// =============================================================================
// CONFIG PARSING TESTS
// =============================================================================

#[test]
fn test_config_full_file() {
    let config = Config::from_toml_str(
        r#"
        [serializer]
        format = "dot"
        base = "http://example.org/"

        [features]
        relativeURIs = 0
        resourceFill = "lightblue"
        "#,
    )
    .unwrap();

    assert_eq!(config.format(), Some("dot"));
    assert_eq!(config.base().unwrap().as_str(), "http://example.org/");

    let values = config.feature_values().unwrap();
    assert_eq!(
        values,
        vec![
            (Feature::RelativeUris, "0".to_string()),
            (Feature::ResourceFill, "lightblue".to_string()),
        ]
    );
}

#[test]
fn test_config_empty_is_default() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert!(config.format().is_none());
    assert!(config.base().is_none());
}

#[test]
fn test_config_invalid_toml() {
    let result = Config::from_toml_str("invalid toml [[");
    assert!(matches!(result, Err(GraphoutError::Config(_))));
}

#[test]
fn test_config_unknown_section_rejected() {
    let result = Config::from_toml_str("[server]\nport = 8080\n");
    assert!(result.is_err());
}

#[test]
fn test_config_unknown_feature_name() {
    let config = Config::from_toml_str("[features]\nnoSuchFeature = 1\n").unwrap();
    let err = config.feature_values().unwrap_err();
    assert!(err.to_string().contains("noSuchFeature"));
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphout.toml");
    fs::write(&path, "[serializer]\nformat = \"nt\"\n").unwrap();

    let config = Config::discover(Some(path.as_path())).unwrap();
    assert_eq!(config.format(), Some("nt"));
}

#[test]
fn test_config_explicit_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::discover(Some(dir.path().join("missing.toml").as_path()));
    assert!(matches!(result, Err(GraphoutError::Config(_))));
}

// =============================================================================
// OVERRIDE TESTS
// =============================================================================

#[test]
fn test_overrides_replace_file_values() {
    let mut config = Config::from_toml_str(
        "[serializer]\nformat = \"dot\"\n[features]\nresourceFill = \"red\"\n",
    )
    .unwrap();

    config
        .apply_overrides(
            Some("jsonl".to_string()),
            Some("http://example.org/doc".to_string()),
            &["resourceFill=blue".to_string(), "relativeURIs=0".to_string()],
        )
        .unwrap();

    assert_eq!(config.format(), Some("jsonl"));
    assert_eq!(config.base().unwrap().as_str(), "http://example.org/doc");
    let values = config.feature_values().unwrap();
    assert!(values.contains(&(Feature::ResourceFill, "blue".to_string())));
    assert!(values.contains(&(Feature::RelativeUris, "0".to_string())));
}

#[test]
fn test_overrides_keep_unset_values() {
    let mut config = Config::from_toml_str("[serializer]\nformat = \"dot\"\n").unwrap();
    config.apply_overrides(None, None, &[]).unwrap();
    assert_eq!(config.format(), Some("dot"));
}

#[test]
fn test_override_without_equals_rejected() {
    let mut config = Config::default();
    let result = config.apply_overrides(None, None, &["relativeURIs".to_string()]);
    assert!(matches!(result, Err(GraphoutError::Config(_))));
}

#[test]
fn test_configure_sets_serializer_features() {
    let registry = FormatRegistry::with_builtin_formats();
    let mut serializer = registry.new_serializer(Some("dot")).unwrap();
    let config = Config::from_toml_str(
        "[features]\nrelativeURIs = false\nwriterXMLVersion = 11\nbnodeFill = \"grey\"\n",
    )
    .unwrap();

    config.configure(&mut serializer).unwrap();

    assert_eq!(serializer.get_feature(Feature::RelativeUris).unwrap(), 0);
    assert_eq!(serializer.get_feature(Feature::WriterXmlVersion).unwrap(), 11);
    assert_eq!(serializer.get_feature_string(Feature::BnodeFill), Some("grey"));
}

#[test]
fn test_configure_rejects_parser_feature() {
    let registry = FormatRegistry::with_builtin_formats();
    let mut serializer = registry.new_serializer(None).unwrap();
    let config = Config::from_toml_str("[features]\nscanForRDF = 1\n").unwrap();

    let result = config.configure(&mut serializer);
    assert!(matches!(result, Err(GraphoutError::UnknownFeature(Feature::ScanForRdf))));
}

#[test]
fn test_configure_rejects_non_numeric_integer() {
    let registry = FormatRegistry::with_builtin_formats();
    let mut serializer = registry.new_serializer(None).unwrap();
    let mut config = Config::default();
    config
        .apply_overrides(None, None, &["relativeURIs=yes".to_string()])
        .unwrap();

    let result = config.configure(&mut serializer);
    assert!(matches!(
        result,
        Err(GraphoutError::InvalidFeatureValue(Feature::RelativeUris, _))
    ));
}

// =============================================================================
// SERIALIZE PIPELINE TESTS
// =============================================================================

#[test]
fn test_serialize_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.nt");
    let registry = FormatRegistry::with_builtin_formats();
    let config = Config::default();

    let summary = serialize_document(
        &registry,
        &config,
        &foaf_document(),
        &OutputTarget::Path(path.clone()),
    )
    .unwrap();

    // N-Triples has no namespace support; declarations are skipped.
    assert_eq!(summary.namespaces, 0);
    assert_eq!(summary.statements, 2);
    let out = fs::read_to_string(&path).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("\"Alice\""));
}

#[test]
fn test_serialize_append_keeps_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    fs::write(&path, "# existing\n").unwrap();
    let registry = FormatRegistry::with_builtin_formats();
    let mut config = Config::default();
    config
        .apply_overrides(Some("json".to_string()), None, &[])
        .unwrap();

    let summary = serialize_document(
        &registry,
        &config,
        &foaf_document(),
        &OutputTarget::Append(path.clone()),
    )
    .unwrap();

    assert_eq!(summary.namespaces, 1);
    let out = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "# existing");
    assert!(lines[1].contains("\"prefix\":\"foaf\""));
}

#[test]
fn test_serialize_dot_with_config_styles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.dot");
    let registry = FormatRegistry::with_builtin_formats();
    let config = Config::from_toml_str(
        "[serializer]\nformat = \"dot\"\n[features]\nliteralFill = \"yellow\"\n",
    )
    .unwrap();

    serialize_document(
        &registry,
        &config,
        &foaf_document(),
        &OutputTarget::Path(path.clone()),
    )
    .unwrap();

    let out = fs::read_to_string(&path).unwrap();
    assert!(out.starts_with("digraph {"));
    assert!(out.contains("label=\"foaf:name\""));
    assert!(out.contains("fillcolor=\"yellow\""));
}

#[test]
fn test_serialize_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FormatRegistry::with_builtin_formats();
    let mut config = Config::default();
    config
        .apply_overrides(Some("turtle".to_string()), None, &[])
        .unwrap();

    let result = serialize_document(
        &registry,
        &config,
        &foaf_document(),
        &OutputTarget::Path(dir.path().join("out")),
    );
    assert!(matches!(result, Err(GraphoutError::UnknownFormat(_))));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_serialize_failing_statement_still_closes_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.nt");
    let registry = FormatRegistry::with_builtin_formats();
    let mut document = foaf_document();
    document.statements.insert(
        1,
        Statement::new(
            Term::literal("bad"),
            Term::iri("http://example.org/p"),
            Term::literal("subject"),
        ),
    );

    let result = serialize_document(
        &registry,
        &Config::default(),
        &document,
        &OutputTarget::Path(path.clone()),
    );

    assert!(matches!(result, Err(GraphoutError::Format(_))));
    let out = fs::read_to_string(&path).unwrap();
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn test_document_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, serde_json::to_vec(&foaf_document()).unwrap()).unwrap();

    let document = StatementDocument::load(&path).unwrap();
    assert_eq!(document, foaf_document());
}

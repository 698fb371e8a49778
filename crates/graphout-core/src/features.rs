//! # Feature Registry
//!
//! Static table of configuration features and the per-instance value set.
//!
//! Every feature has a fixed value kind (integer or string) recorded in
//! [`FEATURES`]. Both the getter and setter paths consult the table, so the
//! kind of a feature is always looked up, never inferred from the call site.
//!
//! Only features whose area includes the serializer are stored by a
//! [`FeatureSet`]. Parser, shared and XML-writer-only features are known to
//! the table but rejected as unknown by the serializer entry points.

use crate::primitives::{FEATURE_URI_PREFIX, XML_VERSION_1_0, XML_VERSIONS};
use crate::{GraphoutError, Location};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// FEATURE IDENTIFIERS
// =============================================================================

/// A named configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    ScanForRdf,
    AssumeIsRdf,
    AllowNonNsAttributes,
    AllowOtherParsetypes,
    AllowBagId,
    AllowRdfTypeRdfList,
    NormalizeLanguage,
    NonNfcFatal,
    WarnOtherParseTypes,
    CheckRdfId,
    RelativeUris,
    StartUri,
    WriterAutoIndent,
    WriterAutoEmpty,
    WriterIndentWidth,
    WriterXmlVersion,
    WriterXmlDeclaration,
    NoNet,
    ResourceBorder,
    LiteralBorder,
    BnodeBorder,
    ResourceFill,
    LiteralFill,
    BnodeFill,
    HtmlTagSoup,
}

/// The value kind of a feature. Fixed at table definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Integer,
    String,
}

/// Which component a feature configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureArea {
    Parser,
    /// Shared between parsers and serializers but owned by neither.
    Shared,
    /// The XML writer only.
    XmlWriter,
    Serializer,
    /// Stored by the serializer on behalf of the XML writer.
    SerializerXmlWriter,
}

impl FeatureArea {
    /// Whether the serializer layer stores values for this area.
    #[must_use]
    pub const fn is_serializer(self) -> bool {
        matches!(self, Self::Serializer | Self::SerializerXmlWriter)
    }
}

/// One row of the feature table.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub feature: Feature,
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FeatureKind,
    pub area: FeatureArea,
    /// Default for serializer integer features; unused otherwise.
    pub default: i32,
    /// Values outside this set are ignored and the prior value kept.
    pub accepts: fn(i32) -> bool,
}

fn any_value(_: i32) -> bool {
    true
}

fn xml_version(value: i32) -> bool {
    XML_VERSIONS.contains(&value)
}

const fn row(
    feature: Feature,
    name: &'static str,
    label: &'static str,
    kind: FeatureKind,
    area: FeatureArea,
) -> FeatureSpec {
    FeatureSpec {
        feature,
        name,
        label,
        kind,
        area,
        default: 0,
        accepts: any_value,
    }
}

use FeatureArea::{Parser, Serializer, SerializerXmlWriter, Shared, XmlWriter};
use FeatureKind::{Integer, String as Text};

/// The feature table, in enumeration order.
pub static FEATURES: [FeatureSpec; 25] = [
    row(Feature::ScanForRdf, "scanForRDF", "Scan for rdf:RDF in XML content", Integer, Parser),
    row(Feature::AssumeIsRdf, "assumeIsRDF", "Assume content is RDF/XML, don't require rdf:RDF", Integer, Parser),
    row(Feature::AllowNonNsAttributes, "allowNonNsAttributes", "Allow bare 'name' rather than namespaced 'rdf:name' for rdf:about, rdf:resource, rdf:ID and rdf:parseType", Integer, Parser),
    row(Feature::AllowOtherParsetypes, "allowOtherParsetypes", "Allow user-defined rdf:parseType values", Integer, Parser),
    row(Feature::AllowBagId, "allowBagID", "Allow rdf:bagID", Integer, Parser),
    row(Feature::AllowRdfTypeRdfList, "allowRDFtypeRDFlist", "Generate the collection rdf:type rdf:List triple", Integer, Parser),
    row(Feature::NormalizeLanguage, "normalizeLanguage", "Normalize xml:lang values to lowercase", Integer, Parser),
    row(Feature::NonNfcFatal, "nonNFCfatal", "Make non-NFC literals cause a fatal error", Integer, Parser),
    row(Feature::WarnOtherParseTypes, "warnOtherParseTypes", "Warn about unknown rdf:parseType values", Integer, Parser),
    row(Feature::CheckRdfId, "checkRdfID", "Check rdf:ID values for duplicates", Integer, Parser),
    FeatureSpec {
        default: 1,
        ..row(Feature::RelativeUris, "relativeURIs", "Write relative URIs wherever possible in serializing", Integer, Serializer)
    },
    row(Feature::StartUri, "startURI", "Start URI for serializing to use", Text, Serializer),
    row(Feature::WriterAutoIndent, "writerAutoIndent", "Automatically indent elements when serializing", Integer, XmlWriter),
    row(Feature::WriterAutoEmpty, "writerAutoEmpty", "Automatically detect and abbreviate empty elements", Integer, XmlWriter),
    row(Feature::WriterIndentWidth, "writerIndentWidth", "Number of spaces to indent", Integer, XmlWriter),
    FeatureSpec {
        default: XML_VERSION_1_0,
        accepts: xml_version,
        ..row(Feature::WriterXmlVersion, "writerXMLVersion", "XML version to write", Integer, SerializerXmlWriter)
    },
    FeatureSpec {
        default: 1,
        ..row(Feature::WriterXmlDeclaration, "writerXMLDeclaration", "Write XML declaration", Integer, SerializerXmlWriter)
    },
    row(Feature::NoNet, "noNet", "Deny network requests", Integer, Shared),
    row(Feature::ResourceBorder, "resourceBorder", "DOT serializer resource border color", Text, Serializer),
    row(Feature::LiteralBorder, "literalBorder", "DOT serializer literal border color", Text, Serializer),
    row(Feature::BnodeBorder, "bnodeBorder", "DOT serializer blank node border color", Text, Serializer),
    row(Feature::ResourceFill, "resourceFill", "DOT serializer resource fill color", Text, Serializer),
    row(Feature::LiteralFill, "literalFill", "DOT serializer literal fill color", Text, Serializer),
    row(Feature::BnodeFill, "bnodeFill", "DOT serializer blank node fill color", Text, Serializer),
    row(Feature::HtmlTagSoup, "htmlTagSoup", "Use a lax HTML parser if an XML parser fails", Integer, Parser),
];

impl Feature {
    /// The table row for this feature.
    #[must_use]
    pub fn spec(self) -> &'static FeatureSpec {
        // The table holds one row per variant in declaration order.
        &FEATURES[self as usize]
    }

    /// Short name, e.g. `relativeURIs`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Declared value kind.
    #[must_use]
    pub fn kind(self) -> FeatureKind {
        self.spec().kind
    }

    /// Feature URI: [`FEATURE_URI_PREFIX`] followed by the short name.
    #[must_use]
    pub fn uri(self) -> Location {
        Location::new(format!("{}{}", FEATURE_URI_PREFIX, self.name()))
    }

    /// Look up a feature by short name (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FEATURES.iter().find(|s| s.name == name).map(|s| s.feature)
    }

    /// Look up a feature by its full URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        uri.strip_prefix(FEATURE_URI_PREFIX).and_then(Self::from_name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature metadata returned by [`enumerate_serializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescription {
    pub feature: Feature,
    pub name: &'static str,
    pub uri: Location,
    pub label: &'static str,
    pub kind: FeatureKind,
}

/// Describe the serializer feature at ordinal `index`.
///
/// Only serializer-area features are counted. Returns `None` once `index`
/// runs past the last one.
#[must_use]
pub fn enumerate_serializer(index: usize) -> Option<FeatureDescription> {
    FEATURES
        .iter()
        .filter(|s| s.area.is_serializer())
        .nth(index)
        .map(|s| FeatureDescription {
            feature: s.feature,
            name: s.name,
            uri: s.feature.uri(),
            label: s.label,
            kind: s.kind,
        })
}

// =============================================================================
// FEATURE VALUE SET
// =============================================================================

/// The configured feature values of one serializer instance.
///
/// Integer features live in one map, display strings in another and the
/// start URI as an owned [`Location`]. Replacing a value drops the old one.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    integers: BTreeMap<Feature, i32>,
    strings: BTreeMap<Feature, String>,
    start_uri: Option<Location>,
}

impl Default for FeatureSet {
    fn default() -> Self {
        let integers = FEATURES
            .iter()
            .filter(|s| s.area.is_serializer() && s.kind == FeatureKind::Integer)
            .map(|s| (s.feature, s.default))
            .collect();
        Self {
            integers,
            strings: BTreeMap::new(),
            start_uri: None,
        }
    }
}

impl FeatureSet {
    /// Create a value set holding every default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an integer feature.
    ///
    /// Negative values are rejected before anything else. Values the
    /// feature does not accept (e.g. an XML version other than 10 or 11)
    /// are ignored and the prior value is kept.
    pub fn set(&mut self, feature: Feature, value: i32) -> Result<(), GraphoutError> {
        if value < 0 {
            return Err(GraphoutError::NegativeFeatureValue(feature, value));
        }
        let spec = feature.spec();
        if spec.kind != FeatureKind::Integer || !spec.area.is_serializer() {
            return Err(GraphoutError::UnknownFeature(feature));
        }
        if !(spec.accepts)(value) {
            tracing::debug!(feature = spec.name, value, "ignoring unaccepted feature value");
            return Ok(());
        }
        self.integers.insert(feature, value);
        Ok(())
    }

    /// Set a feature from text.
    ///
    /// Integer-kind features parse the text and go through [`Self::set`].
    /// String-kind features store an owned copy, replacing any prior value.
    pub fn set_string(&mut self, feature: Feature, value: &str) -> Result<(), GraphoutError> {
        let spec = feature.spec();
        if spec.kind == FeatureKind::Integer {
            let parsed = value
                .trim()
                .parse::<i32>()
                .map_err(|_| GraphoutError::InvalidFeatureValue(feature, value.to_string()))?;
            return self.set(feature, parsed);
        }
        if !spec.area.is_serializer() {
            return Err(GraphoutError::UnknownFeature(feature));
        }
        match feature {
            Feature::StartUri => self.start_uri = Some(Location::new(value)),
            _ => {
                self.strings.insert(feature, value.to_string());
            }
        }
        Ok(())
    }

    /// Get an integer feature.
    pub fn get(&self, feature: Feature) -> Result<i32, GraphoutError> {
        self.integers
            .get(&feature)
            .copied()
            .ok_or(GraphoutError::UnknownFeature(feature))
    }

    /// Get a string feature, `None` if unset or not string-kind.
    #[must_use]
    pub fn get_string(&self, feature: Feature) -> Option<&str> {
        if feature.kind() != FeatureKind::String {
            return None;
        }
        match feature {
            Feature::StartUri => self.start_uri.as_ref().map(Location::as_str),
            _ => self.strings.get(&feature).map(String::as_str),
        }
    }

    /// The start URI feature as a location.
    #[must_use]
    pub fn start_uri(&self) -> Option<&Location> {
        self.start_uri.as_ref()
    }

    /// Whether an integer feature is set to a non-zero value.
    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.get(feature).is_ok_and(|v| v != 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_declaration_order() {
        for (idx, spec) in FEATURES.iter().enumerate() {
            assert_eq!(spec.feature as usize, idx, "row {} out of order", spec.name);
        }
    }

    #[test]
    fn names_are_unique() {
        for spec in &FEATURES {
            assert_eq!(Feature::from_name(spec.name), Some(spec.feature));
        }
    }

    #[test]
    fn uri_round_trip() {
        let uri = Feature::RelativeUris.uri();
        assert_eq!(uri.as_str(), "http://feature.librdf.org/raptor-relativeURIs");
        assert_eq!(Feature::from_uri(uri.as_str()), Some(Feature::RelativeUris));
    }

    #[test]
    fn defaults() {
        let set = FeatureSet::new();
        assert_eq!(set.get(Feature::RelativeUris).expect("get"), 1);
        assert_eq!(set.get(Feature::WriterXmlVersion).expect("get"), 10);
        assert_eq!(set.get(Feature::WriterXmlDeclaration).expect("get"), 1);
        assert_eq!(set.get_string(Feature::ResourceBorder), None);
        assert_eq!(set.get_string(Feature::StartUri), None);
    }

    #[test]
    fn xml_version_ignores_unaccepted_values() {
        let mut set = FeatureSet::new();
        set.set(Feature::WriterXmlVersion, 11).expect("set");
        set.set(Feature::WriterXmlVersion, 12).expect("ignored");
        assert_eq!(set.get(Feature::WriterXmlVersion).expect("get"), 11);
    }

    #[test]
    fn negative_rejected_before_kind_check() {
        let mut set = FeatureSet::new();
        assert!(matches!(
            set.set(Feature::ScanForRdf, -1),
            Err(GraphoutError::NegativeFeatureValue(Feature::ScanForRdf, -1))
        ));
    }

    #[test]
    fn parser_and_writer_features_are_unknown_to_serializer() {
        let mut set = FeatureSet::new();
        for feature in [Feature::ScanForRdf, Feature::NoNet, Feature::WriterIndentWidth] {
            assert!(matches!(
                set.set(feature, 1),
                Err(GraphoutError::UnknownFeature(_))
            ));
            assert!(set.get(feature).is_err());
        }
    }

    #[test]
    fn string_features_rejected_by_integer_path() {
        let mut set = FeatureSet::new();
        assert!(set.set(Feature::LiteralFill, 3).is_err());
        assert!(set.get(Feature::LiteralFill).is_err());
    }

    #[test]
    fn integer_feature_via_string() {
        let mut set = FeatureSet::new();
        set.set_string(Feature::RelativeUris, "0").expect("set");
        assert_eq!(set.get(Feature::RelativeUris).expect("get"), 0);
        assert!(set.set_string(Feature::RelativeUris, "yes").is_err());
        assert!(set.set_string(Feature::RelativeUris, "-4").is_err());
        assert_eq!(set.get_string(Feature::RelativeUris), None);
    }

    #[test]
    fn string_value_replaced() {
        let mut set = FeatureSet::new();
        set.set_string(Feature::BnodeFill, "red").expect("set");
        set.set_string(Feature::BnodeFill, "blue").expect("set");
        assert_eq!(set.get_string(Feature::BnodeFill), Some("blue"));
    }

    #[test]
    fn start_uri_is_location() {
        let mut set = FeatureSet::new();
        set.set_string(Feature::StartUri, "http://example.org/")
            .expect("set");
        assert_eq!(
            set.start_uri().map(Location::as_str),
            Some("http://example.org/")
        );
        assert_eq!(set.get_string(Feature::StartUri), Some("http://example.org/"));
    }

    #[test]
    fn enumerate_serializer_features_only() {
        let mut names = Vec::new();
        let mut idx = 0;
        while let Some(desc) = enumerate_serializer(idx) {
            names.push(desc.name);
            idx += 1;
        }
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"relativeURIs"));
        assert!(names.contains(&"bnodeFill"));
        assert!(!names.contains(&"scanForRDF"));
        assert!(!names.contains(&"writerIndentWidth"));
    }
}

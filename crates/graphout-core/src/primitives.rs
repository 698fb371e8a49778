//! # Fixed Primitives
//!
//! Compile-time constants shared by the framework and the built-in formats.
//! These are immutable at runtime.

/// Namespace under which every feature has a URI.
///
/// A feature's URI is this prefix followed by its short name.
pub const FEATURE_URI_PREFIX: &str = "http://feature.librdf.org/raptor-";

/// XML 1.0 output, the primary writer dialect version.
pub const XML_VERSION_1_0: i32 = 10;

/// XML 1.1 output.
pub const XML_VERSION_1_1: i32 = 11;

/// Accepted values for the writer XML version feature.
pub const XML_VERSIONS: [i32; 2] = [XML_VERSION_1_0, XML_VERSION_1_1];

/// Magic bytes for the binary statement stream header.
///
/// - Stream Header = Magic Bytes ("GOST") + Version (u8) before frames.
pub const BINARY_MAGIC: &[u8; 4] = b"GOST";

/// Current binary statement stream version.
///
/// Increment this when making breaking changes to the frame layout.
pub const BINARY_VERSION: u8 = 1;

/// Maximum encoded size of a single statement frame.
///
/// Frames larger than this are rejected by the reader before decoding.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024; // 16 MB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_xml_version_is_first() {
        assert_eq!(XML_VERSIONS[0], XML_VERSION_1_0);
    }

    #[test]
    fn magic_is_four_ascii_bytes() {
        assert!(BINARY_MAGIC.iter().all(u8::is_ascii_uppercase));
    }
}

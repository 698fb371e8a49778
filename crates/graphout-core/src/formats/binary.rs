//! # Binary Statement Stream
//!
//! Compact binary output for piping statements between processes.
//!
//! Format: Header (5 bytes) + frames.
//! - 4 bytes: Magic ("GOST")
//! - 1 byte: Version
//! - per statement: 4-byte little-endian length, then the postcard encoding
//!
//! [`read_statements`] decodes a complete stream. Frame lengths are checked
//! against `MAX_FRAME_SIZE` before any payload is decoded.

use crate::format::{Format, FormatContext, HookContext};
use crate::primitives::{BINARY_MAGIC, BINARY_VERSION, MAX_FRAME_SIZE};
use crate::{GraphoutError, Statement};

/// Size of the stream header in bytes.
const HEADER_SIZE: usize = BINARY_MAGIC.len() + 1;

/// Magic followed by the version byte.
fn stream_header() -> [u8; HEADER_SIZE] {
    let [m0, m1, m2, m3] = *BINARY_MAGIC;
    [m0, m1, m2, m3, BINARY_VERSION]
}

/// Check the stream header and return the frames that follow it.
fn frames_after_header(bytes: &[u8]) -> Result<&[u8], GraphoutError> {
    let rest = bytes
        .strip_prefix(BINARY_MAGIC.as_slice())
        .ok_or_else(|| GraphoutError::Serialization("Not a statement stream".to_string()))?;
    match rest.split_first() {
        Some((&BINARY_VERSION, frames)) => Ok(frames),
        Some((version, _)) => Err(GraphoutError::Serialization(format!(
            "Unsupported stream version {} (this build reads {})",
            version, BINARY_VERSION
        ))),
        None => Err(GraphoutError::Serialization(
            "Stream ends inside the header".to_string(),
        )),
    }
}

// =============================================================================
// FORMAT
// =============================================================================

/// The binary statement stream format (`postcard`, alias `binary`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl Format for BinaryFormat {
    fn init(&self, _requested: Option<&str>) -> Result<Box<dyn FormatContext>, GraphoutError> {
        Ok(Box::new(BinaryContext))
    }
}

struct BinaryContext;

impl FormatContext for BinaryContext {
    fn start(&mut self, cx: &mut HookContext<'_>) -> Result<(), GraphoutError> {
        cx.write_bytes(&stream_header())
    }

    fn emit_statement(
        &mut self,
        cx: &mut HookContext<'_>,
        statement: &Statement,
    ) -> Result<(), GraphoutError> {
        let payload = postcard::to_allocvec(statement)
            .map_err(|e| GraphoutError::Serialization(e.to_string()))?;
        if payload.len() > MAX_FRAME_SIZE {
            return Err(GraphoutError::Serialization(format!(
                "Statement frame of {} bytes exceeds maximum {}",
                payload.len(),
                MAX_FRAME_SIZE
            )));
        }
        cx.write_bytes(&(payload.len() as u32).to_le_bytes())?;
        cx.write_bytes(&payload)
    }
}

// =============================================================================
// READER
// =============================================================================

/// Decode a complete binary statement stream.
///
/// Validates the header, then every frame length before decoding it.
pub fn read_statements(bytes: &[u8]) -> Result<Vec<Statement>, GraphoutError> {
    let mut rest = frames_after_header(bytes)?;
    let mut statements = Vec::new();
    while !rest.is_empty() {
        let (len, tail) = rest.split_first_chunk::<4>().ok_or_else(|| {
            GraphoutError::Serialization("Truncated frame length".to_string())
        })?;
        let len = u32::from_le_bytes(*len) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(GraphoutError::Serialization(format!(
                "Frame size {} bytes exceeds maximum allowed {} bytes",
                len, MAX_FRAME_SIZE
            )));
        }
        if tail.len() < len {
            return Err(GraphoutError::Serialization("Truncated frame".to_string()));
        }
        let (frame, next) = tail.split_at(len);
        let statement: Statement = postcard::from_bytes(frame).map_err(|e| {
            GraphoutError::Serialization(format!("Failed to decode statement: {}", e))
        })?;
        statements.push(statement);
        rest = next;
    }
    Ok(statements)
}

// =============================================================================
// TESTS
// =============================================================================

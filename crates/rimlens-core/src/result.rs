//! Decode-result assembly: container decode plus entry dispatch in one call.

use serde_json::{Map, Value};

use crate::container::{ContainerDecoder, DecodePath, SignatureInfo, StructuralError};
use crate::dispatch::{classify_and_decode, DecodeOutcome};
use crate::registry::TagRegistry;

/// Immutable output of a full container decode: manifest metadata plus one
/// outcome per tagged entry, in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    meta: Map<String, Value>,
    signature: Option<SignatureInfo>,
    path: DecodePath,
    outcomes: Vec<DecodeOutcome>,
}

impl DecodeResult {
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn signature(&self) -> Option<&SignatureInfo> {
        self.signature.as_ref()
    }

    /// Which decode strategy accepted the container.
    pub fn path(&self) -> DecodePath {
        self.path
    }

    /// Per-entry outcomes, index-aligned with the container's tag list.
    pub fn outcomes(&self) -> &[DecodeOutcome] {
        &self.outcomes
    }
}

/// Decodes a buffered container and dispatches every tagged entry.
///
/// Per-entry failures are carried as diagnostics inside the result; only a
/// container matching neither the signed nor the plain shape is fatal. A
/// manifest with N entries of which M are malformed yields N-M decoded values
/// and M diagnostics, never a full failure.
pub fn decode_container(
    bytes: &[u8],
    registry: &TagRegistry,
) -> Result<DecodeResult, StructuralError> {
    let (manifest, path) = ContainerDecoder::new().decode(bytes)?;
    let outcomes = classify_and_decode(registry, manifest.entries());
    let (meta, _entries, signature) = manifest.into_parts();
    Ok(DecodeResult {
        meta,
        signature,
        path,
        outcomes,
    })
}

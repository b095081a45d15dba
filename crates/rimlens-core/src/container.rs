//! Two-stage container decoding: signature envelope first, plain manifest
//! second.
//!
//! The strategy order is a contract, not a content sniff. The envelope shape
//! is always tried first, and any structural failure there silently advances
//! to the plain shape. When every strategy fails, the reason from the last
//! attempt is the one reported.

use std::io::Cursor;

use ciborium::value::Value as CborValue;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::convert::cbor_to_json;
use crate::tag::TaggedEntry;

/// CBOR tag wrapping a COSE_Sign1 envelope.
const COSE_SIGN1_TAG: u64 = 18;
/// CBOR tag wrapping an unsigned corim map.
const CORIM_TAG: u64 = 501;

/// corim-map key holding the ordered tag list.
const KEY_TAGS: i128 = 1;
/// COSE protected-header label for the algorithm identifier.
const HDR_ALG: i128 = 1;
/// COSE protected-header label for the corim meta map.
const HDR_META: i128 = 8;

/// Container-level decode failure. Fatal: the bytes match neither the
/// signature-envelope nor the plain-manifest shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("invalid cbor at container top level")]
    InvalidCbor,
    #[error("expected a tag 501 corim map")]
    NotACorim,
    #[error("expected a tag 18 COSE_Sign1 envelope")]
    NotACoseSign1,
    #[error("COSE_Sign1 envelope must be [protected bstr, unprotected map, payload bstr, signature bstr]")]
    MalformedEnvelope,
    #[error("protected header does not decode as a cbor map")]
    MalformedProtectedHeader,
    #[error("corim tag list must be an array of byte strings")]
    MalformedTagList,
}

/// Which decode strategy produced the manifest. Consumed by rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    Signed,
    Plain,
}

/// Signature-envelope metadata, carried opaquely. Nothing here is verified.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureInfo {
    /// COSE algorithm identifier from the protected header, if present.
    pub algorithm: Option<i64>,
    /// corim meta map from the protected header, rendered generically.
    pub meta: Option<Value>,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
}

/// Decoded top-level manifest: free-form metadata plus the ordered tag list.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    meta: Map<String, Value>,
    entries: Vec<TaggedEntry>,
    signature: Option<SignatureInfo>,
}

impl Manifest {
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Tagged entries in declaration order. Order is semantically significant
    /// and preserved through to the decode result.
    pub fn entries(&self) -> &[TaggedEntry] {
        &self.entries
    }

    pub fn signature(&self) -> Option<&SignatureInfo> {
        self.signature.as_ref()
    }

    pub fn into_parts(self) -> (Map<String, Value>, Vec<TaggedEntry>, Option<SignatureInfo>) {
        (self.meta, self.entries, self.signature)
    }
}

/// One candidate way to read the container bytes into a [`Manifest`].
pub trait DecodeStrategy {
    fn path(&self) -> DecodePath;

    fn decode(&self, bytes: &[u8]) -> Result<Manifest, StructuralError>;
}

/// COSE_Sign1 envelope around a plain manifest payload.
pub struct SignedEnvelopeStrategy;

impl DecodeStrategy for SignedEnvelopeStrategy {
    fn path(&self) -> DecodePath {
        DecodePath::Signed
    }

    fn decode(&self, bytes: &[u8]) -> Result<Manifest, StructuralError> {
        decode_signed(bytes)
    }
}

/// Bare tag 501 corim map.
pub struct PlainManifestStrategy;

impl DecodeStrategy for PlainManifestStrategy {
    fn path(&self) -> DecodePath {
        DecodePath::Plain
    }

    fn decode(&self, bytes: &[u8]) -> Result<Manifest, StructuralError> {
        decode_plain(bytes)
    }
}

/// Ordered list of candidate decode strategies, attempted in sequence until
/// one succeeds structurally.
pub struct ContainerDecoder {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl ContainerDecoder {
    /// Signed envelope first, plain manifest second. The order determines
    /// which failure reason survives when every strategy fails.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(SignedEnvelopeStrategy), Box::new(PlainManifestStrategy)],
        }
    }

    /// Pure function of the input bytes: the first strategy that decodes
    /// structurally wins. When all fail, the error is the last attempt's
    /// reason; earlier reasons are discarded.
    pub fn decode(&self, bytes: &[u8]) -> Result<(Manifest, DecodePath), StructuralError> {
        let mut last = StructuralError::InvalidCbor;
        for strategy in &self.strategies {
            match strategy.decode(bytes) {
                Ok(manifest) => return Ok((manifest, strategy.path())),
                Err(err) => last = err,
            }
        }
        Err(last)
    }
}

impl Default for ContainerDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_value(bytes: &[u8]) -> Result<CborValue, StructuralError> {
    let mut cursor = Cursor::new(bytes);
    ciborium::de::from_reader(&mut cursor).map_err(|_| StructuralError::InvalidCbor)
}

fn decode_plain(bytes: &[u8]) -> Result<Manifest, StructuralError> {
    let CborValue::Tag(CORIM_TAG, inner) = decode_value(bytes)? else {
        return Err(StructuralError::NotACorim);
    };
    let CborValue::Map(fields) = *inner else {
        return Err(StructuralError::NotACorim);
    };

    let mut meta = Map::new();
    let mut entries = Vec::new();
    for (key, value) in fields {
        match key {
            CborValue::Integer(i) if i128::from(i) == KEY_TAGS => {
                let CborValue::Array(items) = value else {
                    return Err(StructuralError::MalformedTagList);
                };
                for item in items {
                    let CborValue::Bytes(raw) = item else {
                        return Err(StructuralError::MalformedTagList);
                    };
                    entries.push(TaggedEntry::new(raw));
                }
            }
            other => {
                meta.insert(meta_key(other), cbor_to_json(value));
            }
        }
    }

    Ok(Manifest {
        meta,
        entries,
        signature: None,
    })
}

fn decode_signed(bytes: &[u8]) -> Result<Manifest, StructuralError> {
    let CborValue::Tag(COSE_SIGN1_TAG, inner) = decode_value(bytes)? else {
        return Err(StructuralError::NotACoseSign1);
    };
    let CborValue::Array(parts) = *inner else {
        return Err(StructuralError::NotACoseSign1);
    };
    let [protected, unprotected, payload, signature] =
        <[CborValue; 4]>::try_from(parts).map_err(|_| StructuralError::MalformedEnvelope)?;

    let CborValue::Bytes(protected) = protected else {
        return Err(StructuralError::MalformedEnvelope);
    };
    let CborValue::Map(_) = unprotected else {
        return Err(StructuralError::MalformedEnvelope);
    };
    let CborValue::Bytes(payload) = payload else {
        return Err(StructuralError::MalformedEnvelope);
    };
    let CborValue::Bytes(signature) = signature else {
        return Err(StructuralError::MalformedEnvelope);
    };

    let CborValue::Map(header) =
        decode_value(&protected).map_err(|_| StructuralError::MalformedProtectedHeader)?
    else {
        return Err(StructuralError::MalformedProtectedHeader);
    };

    let mut algorithm = None;
    let mut header_meta = None;
    for (key, value) in header {
        let CborValue::Integer(label) = key else {
            continue;
        };
        match i128::from(label) {
            HDR_ALG => {
                if let CborValue::Integer(alg) = value {
                    algorithm = i64::try_from(i128::from(alg)).ok();
                }
            }
            HDR_META => header_meta = Some(cbor_to_json(value)),
            _ => {}
        }
    }

    let mut manifest = decode_plain(&payload)?;
    manifest.signature = Some(SignatureInfo {
        algorithm,
        meta: header_meta,
        signature,
    });
    Ok(manifest)
}

/// Names well-known corim-map keys; everything else keeps a positional name.
fn meta_key(key: CborValue) -> String {
    match key {
        CborValue::Text(s) => s,
        CborValue::Integer(i) => match i128::from(i) {
            0 => "id".to_string(),
            2 => "dependent-rims".to_string(),
            3 => "profile".to_string(),
            4 => "validity".to_string(),
            5 => "entities".to_string(),
            n => format!("key-{n}"),
        },
        other => cbor_to_json(other).to_string(),
    }
}

//! Open registry mapping 3-byte type tags to payload decoders.
//!
//! Dispatch never hard-codes tag comparisons: adding a sub-manifest kind is a
//! single [`TagRegistry::register`] call, with the control flow in
//! [`crate::dispatch`] untouched.

use std::io::Cursor;

use ciborium::value::Value as CborValue;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::convert::cbor_to_json;
use crate::tag::TypeTag;

/// Schema-specific payload decode failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid cbor payload")]
    InvalidCbor,
    #[error("unexpected top-level shape, expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

/// A successfully decoded sub-manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTag {
    /// Kind name reported by the decoder, e.g. `"CoMID"`.
    pub kind: &'static str,
    /// Decoded body, rendered generically.
    pub body: Value,
}

/// Capability to decode one sub-manifest kind's payload.
pub trait TagDecoder {
    fn kind(&self) -> &'static str;

    /// Decodes the payload that followed the 3-byte tag prefix.
    fn decode(&self, payload: &[u8]) -> Result<DecodedTag, SchemaError>;
}

/// Mapping from 3-byte tag prefix to decoder, in registration order.
#[derive(Default)]
pub struct TagRegistry {
    entries: IndexMap<[u8; 3], Box<dyn TagDecoder>>,
}

impl TagRegistry {
    /// An empty registry with no bindings.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// The built-in bindings for CoMID, CoSWID and CoTS.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tag in TypeTag::KNOWN {
            if let Some(bytes) = tag.bytes() {
                let shape = match tag {
                    TypeTag::Cots => Shape::ArrayOrMap,
                    _ => Shape::Map,
                };
                registry.register(bytes, Box::new(ShapeDecoder::new(tag.name(), shape)));
            }
        }
        registry
    }

    /// Binds a tag prefix to a decoder, replacing any previous binding.
    pub fn register(&mut self, tag: [u8; 3], decoder: Box<dyn TagDecoder>) {
        self.entries.insert(tag, decoder);
    }

    /// Looks up the decoder registered for the given tag bytes.
    pub fn lookup(&self, tag: &[u8]) -> Option<&dyn TagDecoder> {
        let key: [u8; 3] = tag.try_into().ok()?;
        self.entries.get(&key).map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum Shape {
    Map,
    ArrayOrMap,
}

impl Shape {
    const fn describe(&self) -> &'static str {
        match self {
            Shape::Map => "map",
            Shape::ArrayOrMap => "array or map",
        }
    }
}

/// Built-in decoder for the known kinds: checks the payload is well-formed
/// CBOR of the expected top-level shape and exposes the body generically.
/// Schema internals are not this engine's concern.
struct ShapeDecoder {
    kind: &'static str,
    shape: Shape,
}

impl ShapeDecoder {
    fn new(kind: &'static str, shape: Shape) -> Self {
        Self { kind, shape }
    }
}

impl TagDecoder for ShapeDecoder {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn decode(&self, payload: &[u8]) -> Result<DecodedTag, SchemaError> {
        let mut cursor = Cursor::new(payload);
        let value: CborValue =
            ciborium::de::from_reader(&mut cursor).map_err(|_| SchemaError::InvalidCbor)?;
        let inner = strip_tags(value);
        let matches = match (&self.shape, &inner) {
            (Shape::Map, CborValue::Map(_)) => true,
            (Shape::ArrayOrMap, CborValue::Map(_) | CborValue::Array(_)) => true,
            _ => false,
        };
        if !matches {
            return Err(SchemaError::UnexpectedShape {
                expected: self.shape.describe(),
            });
        }
        Ok(DecodedTag {
            kind: self.kind,
            body: cbor_to_json(inner),
        })
    }
}

fn strip_tags(value: CborValue) -> CborValue {
    let mut current = value;
    while let CborValue::Tag(_, inner) = current {
        current = *inner;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{COMID_TAG, COSWID_TAG, COTS_TAG};

    fn encode(value: &CborValue) -> Vec<u8> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(value, &mut out).expect("cbor encoding should not fail");
        out
    }

    #[test]
    fn builtin_covers_all_known_kinds() {
        let registry = TagRegistry::builtin();
        assert_eq!(registry.len(), 3);
        for tag in [COMID_TAG, COSWID_TAG, COTS_TAG] {
            assert!(registry.lookup(&tag).is_some());
        }
        assert!(registry.lookup(&[0xd9, 0x02, 0x00]).is_none());
        assert!(registry.lookup(&[0xd9]).is_none());
    }

    #[test]
    fn comid_decoder_requires_a_map() {
        let registry = TagRegistry::builtin();
        let decoder = registry.lookup(&COMID_TAG).expect("comid is built in");

        let map = encode(&CborValue::Map(vec![(
            CborValue::Integer(1.into()),
            CborValue::Text("acme".to_string()),
        )]));
        let decoded = decoder.decode(&map).expect("map payload should decode");
        assert_eq!(decoded.kind, "CoMID");
        assert_eq!(decoded.body["1"], "acme");

        let text = encode(&CborValue::Text("not a map".to_string()));
        assert_eq!(
            decoder.decode(&text),
            Err(SchemaError::UnexpectedShape { expected: "map" })
        );
        assert_eq!(decoder.decode(&[0xff]), Err(SchemaError::InvalidCbor));
    }

    #[test]
    fn cots_decoder_accepts_arrays() {
        let registry = TagRegistry::builtin();
        let decoder = registry.lookup(&COTS_TAG).expect("cots is built in");

        let stores = encode(&CborValue::Array(vec![CborValue::Map(vec![])]));
        let decoded = decoder.decode(&stores).expect("array payload should decode");
        assert_eq!(decoded.kind, "CoTS");
    }
}

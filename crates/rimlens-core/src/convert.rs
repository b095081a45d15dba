//! Generic CBOR-to-JSON conversion for presenting opaque manifest bodies.

use ciborium::value::Value as CborValue;
use serde_json::{Map, Number, Value};

/// Converts a CBOR value into a render-oriented JSON value.
///
/// The conversion is total: byte strings become lowercase hex, non-text map
/// keys are stringified, tags are unwrapped, and non-finite floats become
/// null. Nothing here round-trips; the output exists to be shown.
pub fn cbor_to_json(value: CborValue) -> Value {
    match value {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(b),
        CborValue::Integer(i) => {
            let n = i128::from(i);
            if let Ok(u) = u64::try_from(n) {
                Value::Number(Number::from(u))
            } else if let Ok(s) = i64::try_from(n) {
                Value::Number(Number::from(s))
            } else {
                Value::String(n.to_string())
            }
        }
        CborValue::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        CborValue::Text(s) => Value::String(s),
        CborValue::Bytes(bytes) => Value::String(hex_string(&bytes)),
        CborValue::Array(items) => Value::Array(items.into_iter().map(cbor_to_json).collect()),
        CborValue::Map(fields) => {
            let mut out = Map::new();
            for (k, v) in fields {
                out.insert(json_key(k), cbor_to_json(v));
            }
            Value::Object(out)
        }
        CborValue::Tag(_, inner) => cbor_to_json(*inner),
        _ => Value::Null,
    }
}

/// Lowercase hex rendering of raw bytes.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn json_key(key: CborValue) -> String {
    match key {
        CborValue::Text(s) => s,
        CborValue::Integer(i) => i128::from(i).to_string(),
        other => cbor_to_json(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_render_as_hex() {
        let json = cbor_to_json(CborValue::Bytes(vec![0xde, 0xad, 0x00]));
        assert_eq!(json, Value::String("dead00".to_string()));
    }

    #[test]
    fn integer_keys_are_stringified_and_tags_unwrapped() {
        let value = CborValue::Tag(
            999,
            Box::new(CborValue::Map(vec![(
                CborValue::Integer(3.into()),
                CborValue::Text("profile".to_string()),
            )])),
        );
        let json = cbor_to_json(value);
        assert_eq!(json["3"], Value::String("profile".to_string()));
    }
}

use ciborium::value::Value as CborValue;
use rimlens::render::{render, RenderOptions};
use rimlens_core::{decode_container, TagRegistry};

fn encode(value: &CborValue) -> Vec<u8> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).expect("cbor encoding should not fail");
    out
}

fn comid_entry() -> Vec<u8> {
    let payload = encode(&CborValue::Map(vec![(
        CborValue::Integer(1.into()),
        CborValue::Text("test-comid".to_string()),
    )]));
    let mut bytes = vec![0xd9, 0x01, 0xfa];
    bytes.extend(payload);
    bytes
}

fn plain_corim(entries: Vec<Vec<u8>>) -> Vec<u8> {
    let map = CborValue::Map(vec![
        (
            CborValue::Integer(0.into()),
            CborValue::Text("render-test".to_string()),
        ),
        (
            CborValue::Integer(1.into()),
            CborValue::Array(entries.into_iter().map(CborValue::Bytes).collect()),
        ),
    ]);
    encode(&CborValue::Tag(501, Box::new(map)))
}

fn signed_corim(plain: Vec<u8>) -> Vec<u8> {
    let protected = encode(&CborValue::Map(vec![(
        CborValue::Integer(1.into()),
        CborValue::Integer((-7i8).into()),
    )]));
    encode(&CborValue::Tag(
        18,
        Box::new(CborValue::Array(vec![
            CborValue::Bytes(protected),
            CborValue::Map(vec![]),
            CborValue::Bytes(plain),
            CborValue::Bytes(vec![0xcd; 4]),
        ])),
    ))
}

#[test]
fn plain_result_renders_corim_section_only() {
    let registry = TagRegistry::builtin();
    let bytes = plain_corim(vec![comid_entry()]);
    let result = decode_container(&bytes, &registry).expect("container should decode");

    let text = render(&result, &RenderOptions::default());
    assert!(text.starts_with("Corim:\n"));
    assert!(!text.contains("Meta:"));
    assert!(!text.contains("Tags:"));
    assert!(text.contains("\"id\": \"render-test\""));
}

#[test]
fn signed_result_renders_meta_section_first() {
    let registry = TagRegistry::builtin();
    let bytes = signed_corim(plain_corim(vec![comid_entry()]));
    let result = decode_container(&bytes, &registry).expect("container should decode");

    let text = render(&result, &RenderOptions::default());
    assert!(text.starts_with("Meta:\n"));
    assert!(text.contains("\"algorithm\": -7"));
    assert!(text.contains("\"signature\": \"cdcdcdcd\""));
    assert!(text.contains("Corim:\n"));
}

#[test]
fn show_entries_renders_decoded_values_and_skip_lines() {
    let registry = TagRegistry::builtin();
    let bytes = plain_corim(vec![comid_entry(), vec![0xd9, 0x01]]);
    let result = decode_container(&bytes, &registry).expect("container should decode");

    let text = render(
        &result,
        &RenderOptions {
            show_entries: true,
        },
    );
    assert!(text.contains("Tags:\n"));
    assert!(text.contains(">> [ 0 ] CoMID"));
    assert!(text.contains("\"1\": \"test-comid\""));
    assert!(text.contains(">> skipping entry at index 1:"));
}

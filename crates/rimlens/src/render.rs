//! Text rendering of a [`DecodeResult`].
//!
//! Decoding and rendering are separate steps: the engine returns a result
//! object carrying every diagnostic, and this module turns it into text after
//! the fact: a `Meta:` section for signed containers, a `Corim:` section with
//! the metadata map, and an opt-in `Tags:` section with one block per entry
//! outcome.

use std::fmt::Write;

use rimlens_core::convert::hex_string;
use rimlens_core::{DecodeOutcome, DecodePath, DecodeResult};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Also render each embedded sub-manifest, or its diagnostic.
    pub show_entries: bool,
}

/// Renders the result as display text. Pure function; never writes anywhere.
pub fn render(result: &DecodeResult, opts: &RenderOptions) -> String {
    let mut out = String::new();

    if result.path() == DecodePath::Signed {
        out.push_str("Meta:\n");
        push_json(&mut out, &signature_json(result));
    }

    out.push_str("Corim:\n");
    push_json(&mut out, &Value::Object(result.meta().clone()));

    if opts.show_entries {
        out.push_str("Tags:\n");
        for (index, outcome) in result.outcomes().iter().enumerate() {
            match outcome {
                DecodeOutcome::Decoded(tag) => {
                    let _ = writeln!(out, ">> [ {index} ] {}", tag.kind);
                    push_json(&mut out, &tag.body);
                }
                DecodeOutcome::Skipped(diag) => {
                    let _ = writeln!(out, ">> skipping entry at index {index}: {}", diag.message);
                }
            }
        }
    }

    out
}

fn signature_json(result: &DecodeResult) -> Value {
    let mut meta = Map::new();
    if let Some(sig) = result.signature() {
        if let Some(alg) = sig.algorithm {
            meta.insert("algorithm".to_string(), Value::from(alg));
        }
        if let Some(m) = &sig.meta {
            meta.insert("meta".to_string(), m.clone());
        }
        meta.insert(
            "signature".to_string(),
            Value::String(hex_string(&sig.signature)),
        );
    }
    Value::Object(meta)
}

fn push_json(out: &mut String, value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            out.push_str(&text);
            out.push('\n');
        }
        Err(_) => out.push_str("null\n"),
    }
}

//! Per-entry tag classification and dispatch.
//!
//! Every entry is processed unconditionally, in original order; a failure at
//! one index is downgraded to a [`Diagnostic`] and never aborts its siblings.

use crate::convert::hex_string;
use crate::registry::{DecodedTag, TagRegistry};
use crate::tag::{TaggedEntry, MIN_ENTRY_LEN};

/// Why a tagged entry could not be classified or decoded. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Entry shorter than the 4-byte minimum; never reaches a decoder.
    EntryTooShort,
    /// No registry binding for the 3-byte tag prefix.
    UnknownTag,
    /// Tag recognized but the payload failed its schema decode.
    PayloadDecodeError,
}

/// Per-entry failure record, index-aligned with the entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub index: usize,
    pub message: String,
}

/// Outcome for one tagged entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Decoded(DecodedTag),
    Skipped(Diagnostic),
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeOutcome::Decoded(_))
    }

    pub fn decoded(&self) -> Option<&DecodedTag> {
        match self {
            DecodeOutcome::Decoded(tag) => Some(tag),
            DecodeOutcome::Skipped(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            DecodeOutcome::Decoded(_) => None,
            DecodeOutcome::Skipped(diag) => Some(diag),
        }
    }
}

/// Classifies and decodes each entry independently, producing one outcome per
/// entry at the same index. Deterministic for identical input.
pub fn classify_and_decode(registry: &TagRegistry, entries: &[TaggedEntry]) -> Vec<DecodeOutcome> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| dispatch_entry(registry, index, entry))
        .collect()
}

fn dispatch_entry(registry: &TagRegistry, index: usize, entry: &TaggedEntry) -> DecodeOutcome {
    let Some((tag, payload)) = entry.split() else {
        return skipped(
            DiagnosticKind::EntryTooShort,
            index,
            format!(
                "entry is {} bytes, shorter than the {MIN_ENTRY_LEN}-byte minimum",
                entry.len()
            ),
        );
    };

    let Some(decoder) = registry.lookup(tag) else {
        return skipped(
            DiagnosticKind::UnknownTag,
            index,
            format!("unmatched type tag {}", hex_string(tag)),
        );
    };

    match decoder.decode(payload) {
        Ok(decoded) => DecodeOutcome::Decoded(decoded),
        Err(err) => skipped(
            DiagnosticKind::PayloadDecodeError,
            index,
            format!("malformed {} payload: {err}", decoder.kind()),
        ),
    }
}

fn skipped(kind: DiagnosticKind, index: usize, message: String) -> DecodeOutcome {
    DecodeOutcome::Skipped(Diagnostic {
        kind,
        index,
        message,
    })
}

//! Decode/dispatch engine for CoRIM manifest containers.
//!
//! A CoRIM container is a CBOR-encoded manifest, optionally wrapped in a
//! COSE_Sign1 signature envelope, carrying an ordered list of tagged
//! sub-manifests (CoMID, CoSWID, CoTS). This crate decodes the container in
//! two stages:
//!
//! 1. [`ContainerDecoder`] tries the signature-envelope shape first and falls
//!    back to the plain-manifest shape; only when both fail is the input
//!    fatal.
//! 2. [`classify_and_decode`] routes each tagged entry to the decoder
//!    registered for its 3-byte type tag, downgrading per-entry failures to
//!    diagnostics so one malformed entry never hides its siblings.
//!
//! [`decode_container`] combines both stages into a single immutable
//! [`DecodeResult`]. The engine never verifies signatures, never re-encodes,
//! and operates on fully buffered input only.

pub mod container;
pub mod convert;
pub mod dispatch;
pub mod registry;
pub mod result;
pub mod tag;

pub use container::{ContainerDecoder, DecodePath, Manifest, SignatureInfo, StructuralError};
pub use dispatch::{classify_and_decode, DecodeOutcome, Diagnostic, DiagnosticKind};
pub use registry::{DecodedTag, SchemaError, TagDecoder, TagRegistry};
pub use result::{decode_container, DecodeResult};
pub use tag::{TaggedEntry, TypeTag};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

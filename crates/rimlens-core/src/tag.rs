//! Type-tag constants and the tagged-entry wire form.
//!
//! Each sub-manifest in a container is stored as a byte string whose first
//! three bytes are the CBOR tag prefix of its kind and whose remainder is the
//! schema-specific payload.

/// CBOR tag prefix for a CoMID sub-manifest (tag 506).
pub const COMID_TAG: [u8; 3] = [0xd9, 0x01, 0xfa];
/// CBOR tag prefix for a CoSWID sub-manifest (tag 505).
pub const COSWID_TAG: [u8; 3] = [0xd9, 0x01, 0xf9];
/// CBOR tag prefix for a CoTS sub-manifest (tag 507).
pub const COTS_TAG: [u8; 3] = [0xd9, 0x01, 0xfb];

/// Minimum length of a well-formed tagged entry: 3 tag bytes + 1 payload byte.
pub const MIN_ENTRY_LEN: usize = 4;

/// Kind of a tagged sub-manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Comid,
    Coswid,
    Cots,
    /// No fixed 3-byte constant matches.
    Unknown,
}

impl TypeTag {
    /// The kinds with a fixed tag prefix, in registration order.
    pub const KNOWN: [TypeTag; 3] = [TypeTag::Comid, TypeTag::Coswid, TypeTag::Cots];

    /// The 3-byte tag prefix for this kind, `None` for [`TypeTag::Unknown`].
    pub const fn bytes(self) -> Option<[u8; 3]> {
        match self {
            TypeTag::Comid => Some(COMID_TAG),
            TypeTag::Coswid => Some(COSWID_TAG),
            TypeTag::Cots => Some(COTS_TAG),
            TypeTag::Unknown => None,
        }
    }

    /// Classifies raw tag bytes against the fixed constants.
    pub fn classify(tag: &[u8]) -> TypeTag {
        match tag {
            t if t == COMID_TAG => TypeTag::Comid,
            t if t == COSWID_TAG => TypeTag::Coswid,
            t if t == COTS_TAG => TypeTag::Cots,
            _ => TypeTag::Unknown,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Comid => "CoMID",
            TypeTag::Coswid => "CoSWID",
            TypeTag::Cots => "CoTS",
            TypeTag::Unknown => "unknown",
        }
    }
}

/// One entry of a container's tag list: 3 tag bytes plus payload, opaque
/// until dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry(Vec<u8>);

impl TaggedEntry {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Splits into (tag bytes, payload). `None` when the entry is shorter
    /// than [`MIN_ENTRY_LEN`]; such entries are malformed by construction and
    /// must never reach a type decoder.
    pub fn split(&self) -> Option<(&[u8], &[u8])> {
        if self.0.len() < MIN_ENTRY_LEN {
            return None;
        }
        Some(self.0.split_at(3))
    }
}

impl From<Vec<u8>> for TaggedEntry {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

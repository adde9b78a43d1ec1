//! Stand-in for the Windows Property System decoder.
//!
//! A full property-store parser (MS-PROPSTORE / MS-OLEPS) is a separate, much larger decoder in
//! its own right; this crate treats it as an external collaborator, the same way the reference
//! implementation delegates to a standalone property-storage parser for this one extra-data
//! block type. We keep the raw bytes so callers that do have such a collaborator can hand this
//! value to it.

/// Opaque serialized property storage, as carried by an `0xA0000009` extra-data block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyStorage {
    bytes: Box<[u8]>,
}

impl PropertyStorage {
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self { bytes: bytes.into() }
    }

    /// Returns the raw, undecoded property storage bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

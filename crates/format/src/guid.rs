//! COM-style GUIDs, as used for the shell link class identifier and several extra-data blocks.

use core::fmt;

use shlink_core::prelude::data::Error as DataError;
use shlink_core::prelude::*;

/// A 16-byte COM GUID, decomposed the way Windows structures declare it: three little-endian
/// integers followed by two big-endian groups covering the trailing 8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub group1: u32,
    pub group2: u16,
    pub group3: u16,
    pub group4: u16,
    pub group5: u64,
}

impl Guid {
    /// Shell link class identifier: `00021401-0000-0000-C000-000000000046`.
    pub const SHELL_LINK_CLASS: Self =
        Self { group1: 0x0002_1401, group2: 0, group3: 0, group4: 0xC000, group5: 0x0000_0046 };

    /// Reads a GUID from the cursor's current position, advancing it by 16 bytes.
    #[inline]
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T) -> Result<Self, DataError> {
        let group1 = input.read_u32()?;
        let group2 = input.read_u16()?;
        let group3 = input.read_u16()?;

        let mut group4_bytes = [0u8; 2];
        for byte in &mut group4_bytes {
            *byte = input.read_u8()?;
        }
        let group4 = u16::from_be_bytes(group4_bytes);

        let mut group5_bytes = [0u8; 6];
        for byte in &mut group5_bytes {
            *byte = input.read_u8()?;
        }
        let mut group5_full = [0u8; 8];
        group5_full[2..].copy_from_slice(&group5_bytes);
        let group5 = u64::from_be_bytes(group5_full);

        Ok(Self { group1, group2, group3, group4, group5 })
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
            self.group1, self.group2, self.group3, self.group4, self.group5
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_shell_link_class_id() {
        let bytes: [u8; 16] = [
            0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x46,
        ];
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let guid = Guid::read(&mut cursor).unwrap();
        assert_eq!(guid, Guid::SHELL_LINK_CLASS);
        assert_eq!(guid.to_string(), "00021401-0000-0000-C000-000000000046");
    }

    #[test]
    fn detects_mismatched_class_id() {
        // S6: Group4 stored as {0x00, 0xC0} instead of the canonical {0xC0, 0x00}.
        let bytes: [u8; 16] = [
            0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x46,
        ];
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let guid = Guid::read(&mut cursor).unwrap();
        assert_ne!(guid, Guid::SHELL_LINK_CLASS);
    }
}

//! The fixed 76-byte `ShellLinkHeader` structure (MS-SHLLINK §2.1).

use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use shlink_core::prelude::*;
use time::OffsetDateTime;

use crate::error::*;
use crate::guid::Guid;

/// Required size of the header, in bytes. Any other value makes the file unreadable.
pub const HEADER_SIZE: u32 = 0x0000_004C;

bitflags! {
    /// Gates for every later section of a shell link, plus a handful of presentation hints.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LinkFlags: u32 {
        const HAS_LINK_TARGET_ID_LIST          = 1 << 0;
        const HAS_LINK_INFO                    = 1 << 1;
        const HAS_NAME                         = 1 << 2;
        const HAS_RELATIVE_PATH                = 1 << 3;
        const HAS_WORKING_DIR                  = 1 << 4;
        const HAS_ARGUMENTS                    = 1 << 5;
        const HAS_ICON_LOCATION                = 1 << 6;
        const IS_UNICODE                       = 1 << 7;
        const FORCE_NO_LINK_INFO               = 1 << 8;
        const HAS_EXP_STRING                   = 1 << 9;
        const RUN_IN_SEPARATE_PROCESS          = 1 << 10;
        const HAS_DARWIN_ID                    = 1 << 12;
        const RUN_AS_USER                      = 1 << 13;
        const HAS_EXP_ICON                     = 1 << 14;
        const NO_PIDL_ALIAS                    = 1 << 15;
        const RUN_WITH_SHIM_LAYER              = 1 << 17;
        const FORCE_NO_LINK_TRACK              = 1 << 18;
        const ENABLE_TARGET_METADATA           = 1 << 19;
        const DISABLE_LINK_PATH_TRACKING       = 1 << 20;
        const DISABLE_KNOWN_FOLDER_TRACKING    = 1 << 21;
        const DISABLE_KNOWN_FOLDER_ALIAS       = 1 << 22;
        const ALLOW_LINK_TO_LINK               = 1 << 23;
        const UNALIAS_ON_SAVE                  = 1 << 24;
        const PREFER_ENVIRONMENT_PATH          = 1 << 25;
        const KEEP_LOCAL_ID_LIST_FOR_UNC_TARGET = 1 << 26;
    }
}

bitflags! {
    /// Mirrors the `dwFileAttributes` field of `WIN32_FIND_DATA`, as recorded at link-creation time.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FileAttributes: u32 {
        const READONLY            = 1 << 0;
        const HIDDEN              = 1 << 1;
        const SYSTEM              = 1 << 2;
        const DIRECTORY           = 1 << 4;
        const ARCHIVE             = 1 << 5;
        const NORMAL              = 1 << 7;
        const TEMPORARY           = 1 << 8;
        const SPARSE_FILE         = 1 << 9;
        const REPARSE_POINT       = 1 << 10;
        const COMPRESSED          = 1 << 11;
        const OFFLINE             = 1 << 12;
        const NOT_CONTENT_INDEXED = 1 << 13;
        const ENCRYPTED           = 1 << 14;
    }
}

bitflags! {
    /// High byte of the `HotKey` field: which modifier keys must be held.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct HotkeyModifiers: u8 {
        const SHIFT   = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT     = 1 << 2;
    }
}

/// A link's assigned hotkey: a virtual key code plus the modifiers that must accompany it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HotKey {
    pub virtual_key: u8,
    pub modifiers: HotkeyModifiers,
}

impl HotKey {
    fn from_raw(raw: u16) -> Self {
        let [virtual_key, modifiers] = raw.to_le_bytes();
        Self { virtual_key, modifiers: HotkeyModifiers::from_bits_truncate(modifiers) }
    }
}

/// `ShowCommand` values a link may request for the target window (MS-SHLLINK §2.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum ShowCommand {
    Normal = 1,
    Maximized = 3,
    MinNoActive = 7,
}

impl Default for ShowCommand {
    fn default() -> Self {
        Self::Normal
    }
}

/// A single raw FILETIME field alongside the timestamp it decodes to, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timestamp {
    pub raw: u64,
    pub value: Option<OffsetDateTime>,
}

impl Timestamp {
    fn read<T: DataCursorTrait + EndianRead>(input: &mut T) -> Result<Self> {
        let raw = input.read_u64()?;
        let value = shlink_core::time::filetime_to_datetime(raw).unwrap_or_else(|error| {
            log::warn!("failed to convert FILETIME {raw:#018X} to a timestamp: {error}");
            None
        });
        Ok(Self { raw, value })
    }
}

/// The fixed-size `ShellLinkHeader` structure that begins every `.lnk` file.
#[derive(Clone, Debug, Default)]
pub struct Header {
    pub class_id: Guid,
    pub link_flags: LinkFlags,
    pub file_attributes: FileAttributes,
    pub creation_time: Timestamp,
    pub access_time: Timestamp,
    pub write_time: Timestamp,
    pub file_size: u32,
    pub icon_index: i32,
    pub show_command: ShowCommand,
    pub hotkey: HotKey,
    pub reserved1: u16,
    pub reserved2: u32,
    pub reserved3: u32,
}

impl Header {
    /// Reads the 76-byte header from the current position, leaving the cursor at byte 76.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeaderSize`] if the declared header size isn't `0x4C`, which the
    /// caller must treat as fatal (§7 of the format notes: this is the only error that aborts the
    /// whole decode).
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T) -> Result<Self> {
        let header_size = input.read_u32()?;
        ensure_header_size(header_size)?;

        let class_id = Guid::read(input)?;
        if class_id != Guid::SHELL_LINK_CLASS {
            log::warn!("shell link class identifier {class_id} does not match the expected {}", Guid::SHELL_LINK_CLASS);
        }

        let link_flags = LinkFlags::from_bits_truncate(input.read_u32()?);
        let file_attributes = FileAttributes::from_bits_truncate(input.read_u32()?);
        let creation_time = Timestamp::read(input)?;
        let access_time = Timestamp::read(input)?;
        let write_time = Timestamp::read(input)?;
        let file_size = input.read_u32()?;
        let icon_index = input.read_i32()?;

        let raw_show_command = input.read_u32()?;
        let show_command = ShowCommand::try_from(raw_show_command).unwrap_or_else(|_| {
            log::warn!("unrecognized ShowCommand value {raw_show_command}, defaulting to Normal");
            ShowCommand::Normal
        });

        let hotkey = HotKey::from_raw(input.read_u16()?);
        let reserved1 = input.read_u16()?;
        let reserved2 = input.read_u32()?;
        let reserved3 = input.read_u32()?;

        Ok(Self {
            class_id,
            link_flags,
            file_attributes,
            creation_time,
            access_time,
            write_time,
            file_size,
            icon_index,
            show_command,
            hotkey,
            reserved1,
            reserved2,
            reserved3,
        })
    }
}

fn ensure_header_size(size: u32) -> Result<()> {
    if size == HEADER_SIZE {
        Ok(())
    } else {
        InvalidHeaderSizeSnafu { size }.fail()
    }
}

#[cfg(test)]
mod tests {
    use shlink_core::data::{DataCursorRef, Endian};

    use super::*;

    fn sample_header_bytes() -> Vec<u8> {
        let mut bytes = Vec::with_capacity(76);
        bytes.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        // Canonical shell link class id, stored raw (no byte-swap games).
        bytes.extend_from_slice(&[
            0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x46,
        ]);
        bytes.extend_from_slice(&0u32.to_le_bytes()); // LinkFlags
        bytes.extend_from_slice(&0u32.to_le_bytes()); // FileAttributes
        bytes.extend_from_slice(&0u64.to_le_bytes()); // creation
        bytes.extend_from_slice(&0u64.to_le_bytes()); // access
        bytes.extend_from_slice(&0u64.to_le_bytes()); // write
        bytes.extend_from_slice(&0u32.to_le_bytes()); // file size
        bytes.extend_from_slice(&0i32.to_le_bytes()); // icon index
        bytes.extend_from_slice(&1u32.to_le_bytes()); // ShowCommand::Normal
        bytes.extend_from_slice(&0u16.to_le_bytes()); // hotkey
        bytes.extend_from_slice(&0u16.to_le_bytes()); // reserved1
        bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved2
        bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved3
        bytes
    }

    #[test]
    fn reads_well_formed_header() {
        let bytes = sample_header_bytes();
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let header = Header::read(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 76);
        assert_eq!(header.class_id, Guid::SHELL_LINK_CLASS);
        assert_eq!(header.show_command, ShowCommand::Normal);
        assert!(header.creation_time.value.is_none());
    }

    #[test]
    fn rejects_wrong_header_size() {
        let mut bytes = sample_header_bytes();
        bytes[0] = 0x00; // corrupt the declared header size
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        assert!(matches!(Header::read(&mut cursor), Err(Error::InvalidHeaderSize { .. })));
    }
}

//! Decodes the Microsoft Windows Shell Link (`.lnk`) binary format.
//!
//! A shell link is five sections read back to back, each gated by the bits in the header's
//! `LinkFlags`: [`header::Header`], an optional [`id_list::LinkTargetIdList`], an optional
//! [`link_info::LinkInfo`], an optional [`string_data::StringData`], and a trailing
//! [`extra_data::ExtraData`].
//!
//! Only a malformed header is fatal. Every later irregularity — a truncated section, an
//! unparseable offset, a string that can't be decoded — resolves to an absent field or an early
//! stop and is reported through the `log` facade rather than aborting the decode, so that a
//! partially-corrupt link still yields whatever can be recovered from it.

pub mod extra_data;
pub mod header;
pub mod id_list;
pub mod link_info;
pub mod string_data;
pub mod strings;

use shlink_core::prelude::*;

use crate::codepage::Codepage;
use crate::error::Result;
use extra_data::ExtraData;
use header::{Header, LinkFlags};
use id_list::LinkTargetIdList;
use link_info::LinkInfo;
use string_data::StringData;

/// Options controlling how a shell link is decoded.
#[derive(Clone, Debug)]
pub struct Options {
    /// Label resolved via [`Codepage::from_label`] for every ANSI string in the file. Defaults to
    /// `"UTF-8"`.
    pub codepage: String,
}

impl Default for Options {
    fn default() -> Self {
        Self { codepage: String::from("UTF-8") }
    }
}

/// A fully decoded shell link: the header plus whichever optional sections its `LinkFlags`
/// enabled.
#[derive(Clone, Debug, Default)]
pub struct ShellLink {
    pub header: Header,
    pub linktarget_idlist: Option<LinkTargetIdList>,
    pub link_info: Option<LinkInfo>,
    pub string_data: StringData,
    pub extra_data: ExtraData,
}

impl ShellLink {
    /// Decodes a shell link using the default [`Options`].
    pub fn parse<T: DataCursorTrait + EndianRead>(input: &mut T) -> Result<Self> {
        Self::parse_with_options(input, &Options::default())
    }

    /// Decodes a shell link from the current position of `input`, which must point at the start
    /// of a `ShellLinkHeader`.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidHeaderSize`] if the header's declared size isn't
    /// `0x4C`. Every other irregularity is absorbed per the module documentation above.
    pub fn parse_with_options<T: DataCursorTrait + EndianRead>(
        input: &mut T,
        options: &Options,
    ) -> Result<Self> {
        let header = Header::read(input)?;
        let codepage = Codepage::from_label(&options.codepage);

        let linktarget_idlist = if header.link_flags.contains(LinkFlags::HAS_LINK_TARGET_ID_LIST) {
            Some(LinkTargetIdList::read(input))
        } else {
            None
        };

        let link_info = if header.link_flags.contains(LinkFlags::HAS_LINK_INFO) {
            Some(LinkInfo::read(input, codepage))
        } else {
            None
        };

        let string_data = StringData::read(input, header.link_flags);
        let extra_data = ExtraData::read(input, codepage);

        Ok(Self { header, linktarget_idlist, link_info, string_data, extra_data })
    }
}

#[cfg(test)]
mod tests {
    use shlink_core::data::{DataCursorRef, Endian};

    use super::*;
    use crate::error::Error;

    fn push_u32(bytes: &mut Vec<u8>, value: u32) {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    fn minimal_header(link_flags: LinkFlags) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(76);
        push_u32(&mut bytes, header::HEADER_SIZE);
        bytes.extend_from_slice(&[
            0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x46,
        ]);
        push_u32(&mut bytes, link_flags.bits());
        push_u32(&mut bytes, 0); // file attributes
        bytes.extend_from_slice(&0u64.to_le_bytes()); // creation
        bytes.extend_from_slice(&0u64.to_le_bytes()); // access
        bytes.extend_from_slice(&0u64.to_le_bytes()); // write
        push_u32(&mut bytes, 0); // file size
        bytes.extend_from_slice(&0i32.to_le_bytes()); // icon index
        push_u32(&mut bytes, 1); // ShowCommand::Normal
        bytes.extend_from_slice(&0u16.to_le_bytes()); // hotkey
        bytes.extend_from_slice(&0u16.to_le_bytes()); // reserved1
        push_u32(&mut bytes, 0); // reserved2
        push_u32(&mut bytes, 0); // reserved3
        bytes
    }

    #[test]
    fn parses_bare_link_with_no_optional_sections() {
        let bytes = minimal_header(LinkFlags::empty());
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let link = ShellLink::parse(&mut cursor).unwrap();

        assert!(link.linktarget_idlist.is_none());
        assert!(link.link_info.is_none());
        assert!(link.string_data.name_string.is_none());
        assert!(link.extra_data.blocks.is_empty());
    }

    #[test]
    fn parses_link_with_target_idlist_and_name() {
        let mut bytes =
            minimal_header(LinkFlags::HAS_LINK_TARGET_ID_LIST | LinkFlags::HAS_NAME);

        // LinkTargetIDList: Size = 2 (itself) + (2+3) (one item) + 2 (terminator) = 9
        bytes.extend_from_slice(&9u16.to_le_bytes());
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&0u16.to_le_bytes());

        // StringData: NAME_STRING only.
        bytes.extend_from_slice(&4u16.to_le_bytes());
        for unit in "Test".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        // ExtraData terminator.
        push_u32(&mut bytes, 0);

        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let link = ShellLink::parse(&mut cursor).unwrap();

        let idlist = link.linktarget_idlist.unwrap();
        assert_eq!(idlist.list.items.len(), 1);
        assert_eq!(link.string_data.name_string.as_deref(), Some("Test"));
    }

    #[test]
    fn rejects_bad_header_size() {
        let mut bytes = minimal_header(LinkFlags::empty());
        bytes[0] = 0;
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        assert!(matches!(ShellLink::parse(&mut cursor), Err(Error::InvalidHeaderSize { .. })));
    }
}

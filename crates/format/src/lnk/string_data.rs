//! The `StringData` section (MS-SHLLINK §2.4): up to five length-prefixed UTF-16LE strings, each
//! gated by its own `LinkFlags` bit. Strings here are always UTF-16LE regardless of the header's
//! `IS_UNICODE` flag.

use shlink_core::prelude::*;

use crate::lnk::header::LinkFlags;
use crate::lnk::strings::read_len_prefixed_utf16;

/// The subset of `StringData` strings a shell link may carry, in on-disk order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringData {
    pub name_string: Option<String>,
    pub relative_path: Option<String>,
    pub working_dir: Option<String>,
    pub command_line_arguments: Option<String>,
    pub icon_location: Option<String>,
}

impl StringData {
    /// Reads each string present per `link_flags`, in the fixed order `NAME_STRING`,
    /// `RELATIVE_PATH`, `WORKING_DIR`, `COMMAND_LINE_ARGUMENTS`, `ICON_LOCATION`.
    ///
    /// A read failure on any individual string (truncated buffer) stops the section early; fields
    /// that hadn't been reached yet stay `None`, matching the "leave the rest of the record
    /// unparsed" handling used elsewhere in the format.
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T, link_flags: LinkFlags) -> Self {
        let mut result = Self::default();

        let fields: [(LinkFlags, fn(&mut Self) -> &mut Option<String>); 5] = [
            (LinkFlags::HAS_NAME, |s| &mut s.name_string),
            (LinkFlags::HAS_RELATIVE_PATH, |s| &mut s.relative_path),
            (LinkFlags::HAS_WORKING_DIR, |s| &mut s.working_dir),
            (LinkFlags::HAS_ARGUMENTS, |s| &mut s.command_line_arguments),
            (LinkFlags::HAS_ICON_LOCATION, |s| &mut s.icon_location),
        ];

        for (flag, field) in fields {
            if !link_flags.contains(flag) {
                continue;
            }
            match read_len_prefixed_utf16(input) {
                Ok(value) => *field(&mut result) = Some(value),
                Err(error) => {
                    log::warn!("string_data: truncated while reading a string: {error}");
                    break;
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use shlink_core::data::{DataCursorRef, Endian};

    use super::*;

    fn push_len_prefixed(bytes: &mut Vec<u8>, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        bytes.extend_from_slice(&(units.len() as u16).to_le_bytes());
        for unit in units {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
    }

    #[test]
    fn reads_only_flagged_strings_in_order() {
        let mut bytes = Vec::new();
        push_len_prefixed(&mut bytes, "My Shortcut");
        push_len_prefixed(&mut bytes, "/verbose");

        let flags = LinkFlags::HAS_NAME | LinkFlags::HAS_ARGUMENTS;
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let strings = StringData::read(&mut cursor, flags);

        assert_eq!(strings.name_string.as_deref(), Some("My Shortcut"));
        assert_eq!(strings.command_line_arguments.as_deref(), Some("/verbose"));
        assert!(strings.relative_path.is_none());
        assert!(strings.working_dir.is_none());
        assert!(strings.icon_location.is_none());
        assert_eq!(cursor.position(), bytes.len());
    }

    #[test]
    fn stops_early_on_truncated_string() {
        let mut bytes = Vec::new();
        push_len_prefixed(&mut bytes, "ok");
        bytes.extend_from_slice(&5u16.to_le_bytes()); // claims 5 chars, none follow

        let flags = LinkFlags::HAS_NAME | LinkFlags::HAS_RELATIVE_PATH | LinkFlags::HAS_WORKING_DIR;
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let strings = StringData::read(&mut cursor, flags);

        assert_eq!(strings.name_string.as_deref(), Some("ok"));
        assert!(strings.relative_path.is_none());
        assert!(strings.working_dir.is_none());
    }
}

//! Shell item ID lists (MS-SHLLINK §2.2), used both by `LinkTargetIDList` and by the
//! `VistaAndAboveIDListDataBlock` extra-data block.

use shlink_core::data::SeekFrom;
use shlink_core::prelude::*;

/// A single opaque shell item, as it appears inside an ID list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemId {
    pub data: Box<[u8]>,
}

/// An ordered sequence of shell items, terminated by a zero-size item or by running out of the
/// bytes allotted to the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdList {
    pub items: Vec<ItemId>,
}

impl IdList {
    /// Reads items until either a zero-size terminator is hit or `position() >= end`.
    ///
    /// Never fails: a read that runs out of bytes mid-item simply stops the list early, per the
    /// "abandon the remaining items and fall through" rule for `linktarget_idlist` and
    /// `VistaAndAboveIDList`.
    pub(crate) fn read_until<T: DataCursorTrait + EndianRead>(input: &mut T, end: usize) -> Self {
        let mut items = Vec::new();
        while input.position() < end {
            let item_size = match input.read_u16() {
                Ok(size) => size,
                Err(_) => {
                    log::warn!("id list: truncated while reading an item size");
                    break;
                }
            };
            if item_size == 0 {
                break;
            }
            let data_len = usize::from(item_size) - 2;
            match input.get_slice(data_len) {
                Ok(slice) => items.push(ItemId { data: slice.into() }),
                Err(_) => {
                    log::warn!("id list: truncated while reading a {data_len}-byte item");
                    break;
                }
            }
        }
        Self { items }
    }
}

/// The `LinkTargetIDList` structure: a `Size`-prefixed [`IdList`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkTargetIdList {
    pub size: u16,
    pub list: IdList,
}

impl LinkTargetIdList {
    /// Reads the `LinkTargetIDList` structure, unconditionally leaving the cursor at
    /// `pos0 + size - 2` (one past the list's terminator), where `pos0` is the position right
    /// after the `Size` field.
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T) -> Self {
        let size = match input.read_u16() {
            Ok(size) => size,
            Err(_) => {
                log::warn!("linktarget_idlist: truncated while reading Size");
                return Self::default();
            }
        };
        let pos0 = input.position();

        let (end, target) = if size >= 2 {
            let target = pos0 + (usize::from(size) - 2);
            (target, target)
        } else {
            (pos0, pos0)
        };

        let list = IdList::read_until(input, end);
        // Seek past the declared region regardless of how much of it we actually consumed.
        let _ = input.seek(SeekFrom::Start(target));

        Self { size, list }
    }
}

#[cfg(test)]
mod tests {
    use shlink_core::data::{DataCursorRef, Endian};

    use super::*;

    #[test]
    fn reads_two_item_list() {
        let mut bytes = Vec::new();
        // Size = 2 (header) + (2+3) + (2+1) + 2 (terminator) = 12
        bytes.extend_from_slice(&12u16.to_le_bytes());
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(b"x");
        bytes.extend_from_slice(&0u16.to_le_bytes());

        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let idlist = LinkTargetIdList::read(&mut cursor);
        assert_eq!(idlist.list.items.len(), 2);
        assert_eq!(&*idlist.list.items[0].data, b"abc");
        assert_eq!(&*idlist.list.items[1].data, b"x");
        assert_eq!(cursor.position(), 2 + (12 - 2));
    }

    #[test]
    fn truncated_idlist_stops_early_but_still_seeks_past_region() {
        // Declares Size = 0x40 but the buffer runs out well before that many item bytes exist.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x40u16.to_le_bytes());
        bytes.extend_from_slice(&0x1Eu16.to_le_bytes()); // claims 28 bytes of item data
        bytes.extend_from_slice(&[0u8; 10]); // only 10 are actually present

        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let idlist = LinkTargetIdList::read(&mut cursor);
        assert!(idlist.list.items.is_empty());
        // The cursor is left at the declared end of section even though the buffer itself is
        // shorter; seeking is not bounds-checked, only reading is.
        assert_eq!(cursor.position(), 2 + (0x40 - 2));
    }
}

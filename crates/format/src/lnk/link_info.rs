//! The `LinkInfo` structure (MS-SHLLINK §2.3): an offset table describing either a local volume
//! and path, or a network share, that the link targets.

use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use shlink_core::data::SeekFrom;
use shlink_core::prelude::*;

use crate::codepage::Codepage;
use crate::lnk::strings::{read_cstring_at, read_ucstring_at};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LinkInfoFlags: u32 {
        const VOLUME_ID_AND_LOCAL_BASE_PATH = 1 << 0;
        const COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX = 1 << 1;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NetworkLinkFlags: u32 {
        const VALID_DEVICE = 1 << 0;
        const VALID_NET_TYPE = 1 << 1;
    }
}

/// Sentinel `VolumeLabelOffset` value indicating that a separate Unicode offset follows instead.
const VOLUME_LABEL_OFFSET_UNICODE_SENTINEL: u32 = 0x14;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum DriveType {
    #[default]
    Unknown = 0,
    NoRootDir = 1,
    Removable = 2,
    Fixed = 3,
    Remote = 4,
    CdRom = 5,
    RamDisk = 6,
}

/// Local volume information, present when `LinkInfoFlags::VOLUME_ID_AND_LOCAL_BASE_PATH` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VolumeId {
    pub drive_type: DriveType,
    pub serial_number: u32,
    pub label: String,
}

impl VolumeId {
    /// Reads the volume-ID structure from the current position, which must already be seeked to
    /// `pos0 + VolumeIDOffset`.
    fn read<T: DataCursorTrait + EndianRead>(
        input: &mut T,
        base: usize,
        codepage: Codepage,
    ) -> Option<Self> {
        let _size = input.read_u32().ok()?;
        let raw_drive_type = input.read_u32().ok()?;
        let drive_type = DriveType::try_from(raw_drive_type).unwrap_or_else(|_| {
            log::warn!("unrecognized drive type {raw_drive_type}");
            DriveType::Unknown
        });
        let serial_number = input.read_u32().ok()?;
        let volume_label_offset = input.read_u32().ok()?;

        let label = if volume_label_offset == VOLUME_LABEL_OFFSET_UNICODE_SENTINEL {
            let unicode_offset = input.read_u32().ok()?;
            read_ucstring_at(input, base + unicode_offset as usize)
        } else {
            read_cstring_at(input, base + volume_label_offset as usize, codepage)
        }
        .unwrap_or_default();

        Some(Self { drive_type, serial_number, label })
    }
}

/// Network share information, present when
/// `LinkInfoFlags::COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommonNetworkRelativeLink {
    pub flags: NetworkLinkFlags,
    pub net_name: String,
    pub device_name: Option<String>,
    pub network_provider_type: u32,
}

impl CommonNetworkRelativeLink {
    /// Reads the network-share structure from the current position, which must already be
    /// seeked to `pos0 + CommonNetworkRelativeLinkOffset`. Whether the Unicode offset pair
    /// follows is its own, independent condition — `net_name_offset > 0x14` — not the outer
    /// `LinkInfo` header's `HeaderSize >= 0x24` flag.
    fn read<T: DataCursorTrait + EndianRead>(
        input: &mut T,
        base: usize,
        codepage: Codepage,
    ) -> Option<Self> {
        let _size = input.read_u32().ok()?;
        let flags = NetworkLinkFlags::from_bits_truncate(input.read_u32().ok()?);
        let net_name_offset = input.read_u32().ok()?;
        let device_name_offset = input.read_u32().ok()?;
        let network_provider_type = input.read_u32().ok()?;

        let has_unicode_offsets = net_name_offset > VOLUME_LABEL_OFFSET_UNICODE_SENTINEL;
        let (net_name_offset_unicode, device_name_offset_unicode) = if has_unicode_offsets {
            (input.read_u32().ok(), input.read_u32().ok())
        } else {
            (None, None)
        };

        let net_name = if let Some(offset) = net_name_offset_unicode {
            read_ucstring_at(input, base + offset as usize)
        } else {
            read_cstring_at(input, base + net_name_offset as usize, codepage)
        }
        .unwrap_or_default();

        let device_name = if flags.contains(NetworkLinkFlags::VALID_DEVICE) {
            if let Some(offset) = device_name_offset_unicode {
                read_ucstring_at(input, base + offset as usize)
            } else {
                read_cstring_at(input, base + device_name_offset as usize, codepage)
            }
        } else {
            None
        };

        Some(Self { flags, net_name, device_name, network_provider_type })
    }
}

/// The `LinkInfo` structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkInfo {
    pub size: u32,
    pub header_size: u32,
    pub flags: LinkInfoFlags,
    pub volume_id: Option<VolumeId>,
    pub local_base_path: Option<String>,
    pub common_network_relative_link: Option<CommonNetworkRelativeLink>,
    pub common_path_suffix: String,
}

impl LinkInfo {
    /// Reads the `LinkInfo` section starting at the current position (`pos0`), and unconditionally
    /// leaves the cursor at `pos0 + size` on return, matching the "seek past the declared region"
    /// invariant (§4.4 of the format notes).
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T, codepage: Codepage) -> Self {
        let pos0 = input.position();
        let mut result = Self::default();

        let size = match input.read_u32() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("link_info: truncated while reading Size");
                return result;
            }
        };
        result.size = size;

        let header_size = match input.read_u32() {
            Ok(value) => value,
            Err(_) => {
                let _ = input.seek(SeekFrom::Start(pos0 + size as usize));
                return result;
            }
        };
        result.header_size = header_size;

        let flags = LinkInfoFlags::from_bits_truncate(input.read_u32().unwrap_or(0));
        result.flags = flags;
        let volume_id_offset = input.read_u32().unwrap_or(0);
        let local_base_path_offset = input.read_u32().unwrap_or(0);
        let common_network_relative_link_offset = input.read_u32().unwrap_or(0);
        let common_path_suffix_offset = input.read_u32().unwrap_or(0);

        let unicode_present = header_size >= 0x24;
        let (local_base_path_offset_unicode, common_path_suffix_offset_unicode) =
            if unicode_present {
                (input.read_u32().ok(), input.read_u32().ok())
            } else {
                (None, None)
            };

        // 1. Common path suffix.
        result.common_path_suffix = if unicode_present {
            common_path_suffix_offset_unicode
                .and_then(|offset| read_ucstring_at(input, pos0 + offset as usize))
        } else {
            read_cstring_at(input, pos0 + common_path_suffix_offset as usize, codepage)
        }
        .unwrap_or_default();

        // 2. Volume ID + local base path.
        if flags.contains(LinkInfoFlags::VOLUME_ID_AND_LOCAL_BASE_PATH) {
            let volume_base = pos0 + volume_id_offset as usize;
            if input.seek(SeekFrom::Start(volume_base)).is_ok() {
                result.volume_id = VolumeId::read(input, volume_base, codepage);
            }

            result.local_base_path = if unicode_present {
                local_base_path_offset_unicode
                    .and_then(|offset| read_ucstring_at(input, pos0 + offset as usize))
            } else {
                read_cstring_at(input, pos0 + local_base_path_offset as usize, codepage)
            };
        }

        // 3. Common network relative link.
        if flags.contains(LinkInfoFlags::COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX) {
            let network_base = pos0 + common_network_relative_link_offset as usize;
            if input.seek(SeekFrom::Start(network_base)).is_ok() {
                result.common_network_relative_link =
                    CommonNetworkRelativeLink::read(input, network_base, codepage);
            }
        }

        let _ = input.seek(SeekFrom::Start(pos0 + size as usize));
        result
    }
}

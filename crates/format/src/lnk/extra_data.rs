//! The `ExtraData` section (MS-SHLLINK §2.5): a sequence of tagged, length-prefixed blocks,
//! terminated by a block whose declared size is smaller than the 4-byte size field itself.

use shlink_core::data::{DataCursorRef, SeekFrom};
use shlink_core::prelude::*;

use crate::codepage::Codepage;
use crate::guid::Guid;
use crate::lnk::id_list::IdList;
use crate::lnk::strings::{bounded, read_fixed_cstring, read_fixed_ucstring};
use crate::property_store::PropertyStorage;

/// Below this, a declared `Size` cannot even cover the `Size` field itself, and the extra-data
/// sequence ends.
const MIN_BLOCK_SIZE: u32 = 0x04;

const SIG_ENVIRONMENT_VARIABLE: u32 = 0xA000_0001;
const SIG_CONSOLE: u32 = 0xA000_0002;
const SIG_TRACKER: u32 = 0xA000_0003;
const SIG_CONSOLE_FE: u32 = 0xA000_0004;
const SIG_SPECIAL_FOLDER: u32 = 0xA000_0005;
const SIG_DARWIN: u32 = 0xA000_0006;
const SIG_ICON_ENVIRONMENT: u32 = 0xA000_0007;
const SIG_SHIM: u32 = 0xA000_0008;
const SIG_PROPERTY_STORE: u32 = 0xA000_0009;
const SIG_KNOWN_FOLDER: u32 = 0xA000_000B;
const SIG_VISTA_AND_ABOVE_ID_LIST: u32 = 0xA000_000C;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentVariable {
    pub target_ansi: String,
    pub target_unicode: String,
}

#[derive(Clone, Debug, Default)]
pub struct Console {
    pub fill_attributes: u16,
    pub popup_fill_attributes: u16,
    pub screen_buffer_size_x: u16,
    pub screen_buffer_size_y: u16,
    pub window_size_x: u16,
    pub window_size_y: u16,
    pub window_origin_x: u16,
    pub window_origin_y: u16,
    pub font_size: u32,
    pub font_family: u32,
    pub font_weight: u32,
    pub face_name: String,
    pub cursor_size: u32,
    pub full_screen: bool,
    pub quick_edit: bool,
    pub insert_mode: bool,
    pub auto_position: bool,
    pub history_buffer_size: u32,
    pub number_of_history_buffers: u32,
    /// `HistoryNoDup == 0x00000000` means duplicate history entries are kept; anything else means
    /// the console suppresses them.
    pub history_duplicates_allowed: bool,
    pub color_table: Vec<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tracker {
    pub machine_id: String,
    pub droid_volume_id: Guid,
    pub droid_file_id: Guid,
    pub droid_birth_volume_id: Guid,
    pub droid_birth_file_id: Guid,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsoleFe {
    pub code_page: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpecialFolder {
    pub special_folder_id: u32,
    pub offset: u32,
}

/// `DarwinDataBlock`'s ANSI copy is redundant with the Unicode one and is discarded on read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Darwin {
    pub application_identifier: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconEnvironment {
    pub target_ansi: String,
    pub target_unicode: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shim {
    pub layer_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnownFolder {
    pub known_folder_id: Guid,
    pub offset: u32,
}

/// One block of the `ExtraData` section, tagged by its `Signature`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraDataBlock {
    EnvironmentVariable(EnvironmentVariable),
    Console(Box<Console>),
    Tracker(Tracker),
    ConsoleFe(ConsoleFe),
    SpecialFolder(SpecialFolder),
    Darwin(Darwin),
    IconEnvironment(IconEnvironment),
    Shim(Shim),
    PropertyStore(PropertyStorage),
    KnownFolder(KnownFolder),
    VistaAndAboveIdList(IdList),
    /// Any signature not among the eleven documented blocks, kept verbatim.
    Raw { signature: u32, bytes: Box<[u8]> },
}

impl PartialEq for Console {
    fn eq(&self, other: &Self) -> bool {
        self.face_name == other.face_name && self.color_table == other.color_table
    }
}
impl Eq for Console {}

/// The `ExtraData` section: zero or more [`ExtraDataBlock`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraData {
    pub blocks: Vec<ExtraDataBlock>,
}

impl ExtraData {
    /// Reads blocks until a terminating (`Size < 0x04`) or truncated size field is hit, or the
    /// cursor runs out of data. Each block is skipped to its declared end regardless of whether
    /// its body decoded cleanly, so one malformed block never desyncs the rest of the sequence.
    pub fn read<T: DataCursorTrait + EndianRead>(input: &mut T, codepage: Codepage) -> Self {
        let mut blocks = Vec::new();

        loop {
            let block_start = input.position();
            let size = match input.read_u32() {
                Ok(value) => value,
                Err(_) => break,
            };
            if size < MIN_BLOCK_SIZE {
                let _ = input.seek(SeekFrom::Start(block_start));
                break;
            }

            let signature = match input.read_u32() {
                Ok(value) => value,
                Err(_) => {
                    let _ = input.seek(SeekFrom::Start(block_start));
                    break;
                }
            };

            let block_end = block_start + size as usize;
            let body_len = (size as usize).saturating_sub(8);

            let mut body = match bounded(input, body_len) {
                Ok(body) => body,
                Err(_) => {
                    log::warn!("extra_data: block declares {body_len} body bytes past end of data");
                    let _ = input.seek(SeekFrom::Start(block_start));
                    break;
                }
            };
            blocks.push(Self::read_body(&mut body, signature, codepage));

            if input.seek(SeekFrom::Start(block_end)).is_err() {
                break;
            }
        }

        Self { blocks }
    }

    /// Decodes one block's body against a cursor already bounded to exactly its declared
    /// `Size - 8` bytes, so no arm here can read into the next block no matter what it's fed.
    fn read_body(input: &mut DataCursorRef<'_>, signature: u32, codepage: Codepage) -> ExtraDataBlock {
        let body_len = input.len();
        match signature {
            SIG_ENVIRONMENT_VARIABLE => ExtraDataBlock::EnvironmentVariable(EnvironmentVariable {
                target_ansi: read_fixed_cstring(input, 260, codepage).unwrap_or_default(),
                target_unicode: read_fixed_ucstring(input, 520).unwrap_or_default(),
            }),
            SIG_CONSOLE => ExtraDataBlock::Console(Box::new(read_console(input).unwrap_or_default())),
            SIG_TRACKER => ExtraDataBlock::Tracker(read_tracker(input, codepage).unwrap_or_default()),
            SIG_CONSOLE_FE => ExtraDataBlock::ConsoleFe(ConsoleFe {
                code_page: input.read_u32().unwrap_or(0),
            }),
            SIG_SPECIAL_FOLDER => ExtraDataBlock::SpecialFolder(SpecialFolder {
                special_folder_id: input.read_u32().unwrap_or(0),
                offset: input.read_u32().unwrap_or(0),
            }),
            SIG_DARWIN => {
                // Discard the ANSI copy; it carries no information the Unicode one doesn't.
                let _ = read_fixed_cstring(input, 260, codepage);
                ExtraDataBlock::Darwin(Darwin {
                    application_identifier: read_fixed_ucstring(input, 520).unwrap_or_default(),
                })
            }
            SIG_ICON_ENVIRONMENT => ExtraDataBlock::IconEnvironment(IconEnvironment {
                target_ansi: read_fixed_cstring(input, 260, codepage).unwrap_or_default(),
                target_unicode: read_fixed_ucstring(input, 520).unwrap_or_default(),
            }),
            SIG_SHIM => {
                let unit_count = body_len / 2;
                ExtraDataBlock::Shim(Shim {
                    layer_name: read_fixed_ucstring(input, unit_count * 2).unwrap_or_default(),
                })
            }
            SIG_PROPERTY_STORE => {
                let mut buffer = vec![0u8; body_len];
                let bytes = if input.read_length(&mut buffer).is_ok() { buffer } else { Vec::new() };
                ExtraDataBlock::PropertyStore(PropertyStorage::new(&bytes))
            }
            SIG_KNOWN_FOLDER => ExtraDataBlock::KnownFolder(KnownFolder {
                known_folder_id: Guid::read(input).unwrap_or_default(),
                offset: input.read_u32().unwrap_or(0),
            }),
            SIG_VISTA_AND_ABOVE_ID_LIST => {
                let end = input.len();
                ExtraDataBlock::VistaAndAboveIdList(IdList::read_until(input, end))
            }
            other => {
                let mut buffer = vec![0u8; body_len];
                let bytes = if input.read_length(&mut buffer).is_ok() {
                    buffer.into_boxed_slice()
                } else {
                    Box::default()
                };
                ExtraDataBlock::Raw { signature: other, bytes }
            }
        }
    }
}

fn read_console(input: &mut DataCursorRef<'_>) -> Option<Console> {
    let fill_attributes = input.read_u16().ok()?;
    let popup_fill_attributes = input.read_u16().ok()?;
    let screen_buffer_size_x = input.read_u16().ok()?;
    let screen_buffer_size_y = input.read_u16().ok()?;
    let window_size_x = input.read_u16().ok()?;
    let window_size_y = input.read_u16().ok()?;
    let window_origin_x = input.read_u16().ok()?;
    let window_origin_y = input.read_u16().ok()?;
    let _unused1 = input.read_u32().ok()?;
    let _unused2 = input.read_u32().ok()?;
    let font_size = input.read_u32().ok()?;
    let font_family = input.read_u32().ok()?;
    let font_weight = input.read_u32().ok()?;
    let face_name = read_fixed_ucstring(input, 64).ok()?;
    let cursor_size = input.read_u32().ok()?;
    let full_screen = input.read_u32().ok()? != 0;
    let quick_edit = input.read_u32().ok()? != 0;
    let insert_mode = input.read_u32().ok()? != 0;
    let auto_position = input.read_u32().ok()? != 0;
    let history_buffer_size = input.read_u32().ok()?;
    let number_of_history_buffers = input.read_u32().ok()?;
    let history_duplicates_allowed = input.read_u32().ok()? == 0x0000_0000;
    let mut color_table = Vec::with_capacity(16);
    for _ in 0..16 {
        color_table.push(input.read_u32().ok()?);
    }

    Some(Console {
        fill_attributes,
        popup_fill_attributes,
        screen_buffer_size_x,
        screen_buffer_size_y,
        window_size_x,
        window_size_y,
        window_origin_x,
        window_origin_y,
        font_size,
        font_family,
        font_weight,
        face_name,
        cursor_size,
        full_screen,
        quick_edit,
        insert_mode,
        auto_position,
        history_buffer_size,
        number_of_history_buffers,
        history_duplicates_allowed,
        color_table,
    })
}

fn read_tracker(input: &mut DataCursorRef<'_>, codepage: Codepage) -> Option<Tracker> {
    let _length = input.read_u32().ok()?;
    let _version = input.read_u32().ok()?;
    let machine_id = read_fixed_cstring(input, 16, codepage).ok()?;
    let droid_volume_id = Guid::read(input).ok()?;
    let droid_file_id = Guid::read(input).ok()?;
    let droid_birth_volume_id = Guid::read(input).ok()?;
    let droid_birth_file_id = Guid::read(input).ok()?;

    Some(Tracker {
        machine_id,
        droid_volume_id,
        droid_file_id,
        droid_birth_volume_id,
        droid_birth_file_id,
    })
}
